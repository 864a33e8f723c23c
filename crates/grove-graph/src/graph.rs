use crate::geometry::Vec2;
use crate::style::{CROSS_LABEL_COLOR, CROSS_LABEL_LIFT, Color};
use grove_core::{Authorship, Heat, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkIndex(pub usize);

impl fmt::Display for LinkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A thought as placed on the canvas.
///
/// Position, velocity and the drag pin are simulation state, mutated only by
/// the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub prose: String,
    pub heat: Heat,
    pub by: Authorship,
    pub initial_seen: bool,
    pub radius: f32,
    pub position: Vec2,
    #[serde(skip)]
    pub(crate) velocity: Vec2,
    #[serde(skip)]
    pub(crate) pin: Option<Vec2>,
}

impl GraphNode {
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    Tree,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub kind: LinkKind,
    pub source: NodeId,
    pub target: NodeId,
    pub label: Option<String>,
}

impl GraphLink {
    pub fn tree(parent: NodeId, child: NodeId) -> Self {
        Self {
            kind: LinkKind::Tree,
            source: parent,
            target: child,
            label: None,
        }
    }

    pub fn cross(source: NodeId, target: NodeId, label: &str) -> Self {
        Self {
            kind: LinkKind::Cross,
            source,
            target,
            label: (!label.is_empty()).then(|| label.to_string()),
        }
    }
}

/// Text of a cross-link, placed over the link's midpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLabel {
    pub text: String,
    pub position: Vec2,
    pub color: Color,
}

/// Nodes and links of one snapshot, with every link resolved to node indices.
#[derive(Debug, Default, Clone)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,
    endpoints: Vec<(NodeIndex, NodeIndex)>,
    node_map: HashMap<NodeId, NodeIndex>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless its id is already present.
    pub fn add_node(&mut self, node: GraphNode) -> Option<NodeIndex> {
        if self.node_map.contains_key(&node.id) {
            tracing::warn!("Skipping duplicate node id {}", node.id);
            return None;
        }
        let idx = NodeIndex(self.nodes.len());
        self.node_map.insert(node.id.clone(), idx);
        self.nodes.push(node);
        Some(idx)
    }

    /// Insert a link if both endpoints resolve; dangling links are dropped.
    pub fn add_link(&mut self, link: GraphLink) -> Option<LinkIndex> {
        match (self.node_map.get(&link.source), self.node_map.get(&link.target)) {
            (Some(&src), Some(&target)) => {
                let idx = LinkIndex(self.links.len());
                self.endpoints.push((src, target));
                self.links.push(link);
                Some(idx)
            }
            _ => {
                tracing::debug!(
                    "Dropping {:?} link {} -> {}: endpoint missing from graph model",
                    link.kind,
                    link.source,
                    link.target
                );
                None
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    pub fn link_endpoints(&self, index: LinkIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.endpoints.get(index.0).copied()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + use<> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn link_indices(&self) -> impl Iterator<Item = LinkIndex> + use<> {
        (0..self.links.len()).map(LinkIndex)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.index_of(id).map(|idx| &self.nodes[idx.0])
    }

    /// Tree links pointing at `id`, i.e. the link from its parent.
    pub fn incoming_tree_links<'a>(
        &'a self,
        id: &'a NodeId,
    ) -> impl Iterator<Item = LinkIndex> + 'a {
        self.links
            .iter()
            .enumerate()
            .filter(move |(_, link)| link.kind == LinkKind::Tree && &link.target == id)
            .map(|(i, _)| LinkIndex(i))
    }

    /// Label of a cross-link at the current node positions. Tree links and
    /// unlabeled cross-links have none.
    pub fn link_label(&self, index: LinkIndex) -> Option<LinkLabel> {
        let link = self.links.get(index.0)?;
        if link.kind != LinkKind::Cross {
            return None;
        }
        let text = link.label.clone()?;
        let (src, target) = self.link_endpoints(index)?;
        let mid = (self.nodes[src.0].position + self.nodes[target.0].position) * 0.5;
        Some(LinkLabel {
            text,
            position: Vec2::new(mid.x, mid.y - CROSS_LABEL_LIFT),
            color: CROSS_LABEL_COLOR,
        })
    }

    /// Number of links attached to each node, indexed like `nodes()`.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for &(src, target) in &self.endpoints {
            degrees[src.0] += 1;
            degrees[target.0] += 1;
        }
        degrees
    }
}

impl Index<NodeIndex> for GraphModel {
    type Output = GraphNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl Index<LinkIndex> for GraphModel {
    type Output = GraphLink;
    fn index(&self, index: LinkIndex) -> &Self::Output {
        &self.links[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: NodeId::from(id),
            label: id.to_string(),
            prose: String::new(),
            heat: Heat::Quiet,
            by: Authorship::Unknown,
            initial_seen: false,
            radius: 46.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    #[test]
    fn test_graph_model() {
        let mut model = GraphModel::new();
        assert_eq!(model.add_node(node("a")), Some(NodeIndex(0)));
        assert_eq!(model.add_node(node("b")), Some(NodeIndex(1)));
        assert_eq!(model.add_node(node("a")), None);

        let tree = model.add_link(GraphLink::tree("a".into(), "b".into()));
        assert_eq!(tree, Some(LinkIndex(0)));
        assert_eq!(
            model.link_endpoints(LinkIndex(0)),
            Some((NodeIndex(0), NodeIndex(1)))
        );
        assert_eq!(model.add_link(GraphLink::cross("a".into(), "z".into(), "x")), None);

        assert_eq!(model.node_count(), 2);
        assert_eq!(model.link_count(), 1);
        assert_eq!(model.degrees(), vec![1, 1]);
        let b = NodeId::from("b");
        assert_eq!(model.incoming_tree_links(&b).collect::<Vec<_>>(), vec![LinkIndex(0)]);
    }

    #[test]
    fn test_link_label_sits_above_midpoint() {
        let mut model = GraphModel::new();
        model.add_node(GraphNode {
            position: Vec2::new(0.0, 0.0),
            ..node("a")
        });
        model.add_node(GraphNode {
            position: Vec2::new(100.0, 40.0),
            ..node("b")
        });
        let tree = model.add_link(GraphLink::tree("a".into(), "b".into())).unwrap();
        let bare = model.add_link(GraphLink::cross("b".into(), "a".into(), "")).unwrap();
        let labeled = model
            .add_link(GraphLink::cross("a".into(), "b".into(), "echoes"))
            .unwrap();

        let label = model.link_label(labeled).unwrap();
        assert_eq!(label.text, "echoes");
        assert_eq!(label.position, Vec2::new(50.0, 16.0));
        assert_eq!(label.color.to_css(), "rgba(180,160,220,0.70)");
        assert_eq!(model.link_label(tree), None);
        assert_eq!(model.link_label(bare), None);
        assert_eq!(model.link_label(LinkIndex(9)), None);
    }

    #[test]
    fn test_cross_link_label_is_optional() {
        assert_eq!(GraphLink::cross("a".into(), "b".into(), "").label, None);
        assert_eq!(
            GraphLink::cross("a".into(), "b".into(), "echoes").label.as_deref(),
            Some("echoes")
        );
    }
}
