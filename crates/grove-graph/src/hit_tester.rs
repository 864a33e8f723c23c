use crate::geometry::Vec2;
use crate::graph::GraphModel;
use grove_core::NodeId;

/// Hit testing against the current layout.
///
/// Nodes are painted in model order, so when circles overlap the one painted
/// last (highest index) is on top and wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitTester;

impl HitTester {
    pub fn new() -> Self {
        Self
    }

    /// Top-most node whose circle contains the world-space `pos`.
    pub fn hit_test_node(&self, model: &GraphModel, pos: Vec2) -> Option<NodeId> {
        model
            .nodes()
            .iter()
            .rev()
            .find(|node| node.position.distance(pos) <= node.radius)
            .map(|node| node.id.clone())
    }
}
