use crate::geometry::Vec2;
use crate::graph::{GraphLink, GraphNode};
use crate::style::radius_for;
use grove_core::ThinkingNode;
use std::collections::HashSet;

/// Output of [`TreeFlattener::flatten`]: nodes in pre-order and one tree
/// link per parent/child pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Turns a nested thinking tree into a flat node list plus parent links.
///
/// Pure and deterministic: flattening the same tree twice yields the same
/// output. Positions start at the origin and are seeded by the layout engine.
pub struct TreeFlattener;

impl TreeFlattener {
    pub fn flatten(root: &ThinkingNode) -> Flattened {
        let mut out = Flattened::default();
        let mut seen_ids = HashSet::new();

        for visit in root.preorder() {
            let node = visit.node;
            if !seen_ids.insert(&node.id) {
                tracing::warn!("Duplicate thought id {} in tree, keeping first", node.id);
                continue;
            }
            out.nodes.push(Self::graph_node(node));
            if let Some(parent) = visit.parent {
                out.links
                    .push(GraphLink::tree(parent.id.clone(), node.id.clone()));
            }
        }

        out
    }

    fn graph_node(node: &ThinkingNode) -> GraphNode {
        GraphNode {
            id: node.id.clone(),
            label: node.label.clone(),
            prose: node.prose.clone(),
            heat: node.heat,
            by: node.by.clone(),
            initial_seen: node.seen,
            radius: radius_for(node.heat),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkKind;
    use grove_core::{Heat, NodeId};

    fn sample() -> ThinkingNode {
        ThinkingNode::new("root", "Root")
            .with_heat(Heat::Hot)
            .with_seen(true)
            .with_child(
                ThinkingNode::new("a", "A")
                    .with_heat(Heat::Warm)
                    .with_child(ThinkingNode::new("a1", "A1").with_heat(Heat::Growing)),
            )
            .with_child(ThinkingNode::new("b", "B"))
    }

    #[test]
    fn test_flatten_preorder_with_radii() {
        let flat = TreeFlattener::flatten(&sample());
        let ids: Vec<&str> = flat.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "b"]);

        let radii: Vec<f32> = flat.nodes.iter().map(|n| n.radius).collect();
        assert_eq!(radii, vec![100.0, 78.0, 60.0, 46.0]);
        assert!(flat.nodes[0].initial_seen);
        assert!(!flat.nodes[1].initial_seen);
    }

    #[test]
    fn test_flatten_links_parent_to_child() {
        let flat = TreeFlattener::flatten(&sample());
        let pairs: Vec<(&str, &str)> = flat
            .links
            .iter()
            .map(|l| (l.source.as_str(), l.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("root", "a"), ("a", "a1"), ("root", "b")]);
        assert!(flat.links.iter().all(|l| l.kind == LinkKind::Tree));
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let tree = sample();
        assert_eq!(TreeFlattener::flatten(&tree), TreeFlattener::flatten(&tree));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let tree = ThinkingNode::new("root", "Root")
            .with_child(ThinkingNode::new("x", "first"))
            .with_child(ThinkingNode::new("x", "second"));
        let flat = TreeFlattener::flatten(&tree);
        assert_eq!(flat.nodes.len(), 2);
        assert_eq!(flat.nodes[1].label, "first");
        assert_eq!(flat.links.len(), 1);
        assert_eq!(flat.links[0].target, NodeId::from("x"));
    }

    #[test]
    fn test_missing_text_flattens_to_empty() {
        let flat = TreeFlattener::flatten(&ThinkingNode::new("solo", ""));
        assert_eq!(flat.nodes.len(), 1);
        assert!(flat.links.is_empty());
        assert_eq!(flat.nodes[0].label, "");
        assert_eq!(flat.nodes[0].prose, "");
        assert_eq!(flat.nodes[0].radius, 46.0);
    }
}
