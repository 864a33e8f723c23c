use crate::flatten::{Flattened, TreeFlattener};
use crate::graph::{GraphLink, GraphModel};
use grove_core::{CrossEdge, DocumentSnapshot, ThinkingNode};

/// Builds the [`GraphModel`] for one snapshot: tree links first, then every
/// cross-edge whose endpoints both exist. Dangling cross-edges are silently
/// dropped, never reported as errors.
pub struct GraphAssembler;

impl GraphAssembler {
    pub fn assemble(flattened: Flattened, cross_edges: &[CrossEdge]) -> GraphModel {
        let mut model = GraphModel::new();
        for node in flattened.nodes {
            model.add_node(node);
        }
        for link in flattened.links {
            model.add_link(link);
        }

        let mut dropped = 0usize;
        for edge in cross_edges {
            let link = GraphLink::cross(edge.source.clone(), edge.target.clone(), &edge.label);
            if model.add_link(link).is_none() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::debug!("Dropped {} cross-edges with unresolved endpoints", dropped);
        }

        model
    }

    pub fn from_tree(tree: Option<&ThinkingNode>, cross_edges: &[CrossEdge]) -> GraphModel {
        match tree {
            Some(root) => Self::assemble(TreeFlattener::flatten(root), cross_edges),
            None => GraphModel::new(),
        }
    }

    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> GraphModel {
        Self::from_tree(snapshot.tree.as_ref(), &snapshot.edges)
    }
}
