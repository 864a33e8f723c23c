//! Seen/unseen bookkeeping and the reveal animation.
//!
//! A node is seen when the snapshot says so or when it was acknowledged
//! earlier in this session. The acknowledged set only grows: a later
//! snapshot that still reports a node as unseen cannot hide it again.

use crate::tween::{Easing, Tween};
use grove_core::{NodeId, TimingSettings};
use grove_events::CanvasBoundary;
use grove_graph::{
    CROSS_LINK_STYLE, GraphModel, GraphNode, HOVER_STROKE_BOOST, LinkIndex, LinkKind, LinkStyle,
    NodeVisual, TREE_LINK_STYLE, UNSEEN_TREE_LINK_STYLE, unseen_glow,
};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Ids acknowledged locally during this session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityState {
    acknowledged: HashSet<NodeId>,
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was not yet present.
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.acknowledged.insert(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.acknowledged.contains(id)
    }

    pub fn len(&self) -> usize {
        self.acknowledged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acknowledged.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.acknowledged.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Unseen,
    Seen,
}

#[derive(Debug, Default)]
pub struct VisibilityStateMachine {
    state: VisibilityState,
    timing: TimingSettings,
    reveals: HashMap<NodeId, Tween<NodeVisual>>,
    link_reveals: HashMap<LinkIndex, Tween<LinkStyle>>,
    hover: HashMap<NodeId, Tween<f32>>,
}

impl VisibilityStateMachine {
    pub fn new(timing: TimingSettings) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn is_seen(&self, node: &GraphNode) -> bool {
        node.initial_seen || self.state.contains(&node.id)
    }

    pub fn visibility(&self, node: &GraphNode) -> Visibility {
        if self.is_seen(node) {
            Visibility::Seen
        } else {
            Visibility::Unseen
        }
    }

    pub fn unseen_count(&self, model: &GraphModel) -> usize {
        model.nodes().iter().filter(|n| !self.is_seen(n)).count()
    }

    /// Move an unseen node to seen.
    ///
    /// Records the id, acknowledges it through the boundary and starts the
    /// reveal tweens of the node and of the tree link leading to it. Returns
    /// false, with no side effects, when the node is already seen. A failed
    /// acknowledgment is logged and the node stays seen.
    pub fn transition(
        &mut self,
        model: &GraphModel,
        id: &NodeId,
        boundary: &dyn CanvasBoundary,
        now: Duration,
    ) -> bool {
        let Some(node) = model.get_node(id) else {
            return false;
        };
        if self.is_seen(node) {
            return false;
        }

        self.state.insert(id.clone());
        if let Err(error) = boundary.acknowledge(id) {
            tracing::warn!("Failed to acknowledge thought {}: {:#}", id, error);
        }

        let duration = Duration::from_millis(self.timing.reveal_duration_ms);
        self.reveals.insert(
            id.clone(),
            Tween::new(
                NodeVisual::unseen(node.heat).with_glow(unseen_glow(now)),
                NodeVisual::steady(node.heat),
                now,
                duration,
                Easing::CubicOut,
            ),
        );
        for link in model.incoming_tree_links(id) {
            self.link_reveals.insert(
                link,
                Tween::new(
                    UNSEEN_TREE_LINK_STYLE,
                    TREE_LINK_STYLE,
                    now,
                    duration,
                    Easing::CubicOut,
                ),
            );
        }

        tracing::debug!("Thought {} revealed", id);
        true
    }

    /// Ease the hover stroke boost in or out from wherever it currently is.
    pub fn set_hovered(&mut self, id: &NodeId, hovered: bool, now: Duration) {
        let current = self.hover_boost(id, now);
        let (target, ms) = if hovered {
            (HOVER_STROKE_BOOST, self.timing.hover_in_ms)
        } else {
            (0.0, self.timing.hover_out_ms)
        };
        self.hover.insert(
            id.clone(),
            Tween::new(
                current,
                target,
                now,
                Duration::from_millis(ms),
                Easing::CubicInOut,
            ),
        );
    }

    pub fn hover_boost(&self, id: &NodeId, now: Duration) -> f32 {
        self.hover.get(id).map_or(0.0, |tween| tween.value(now))
    }

    /// Paint attributes at `now`. Unseen nodes carry the pulsing glow,
    /// which does not count as an animation for [`Self::is_animating`].
    pub fn resolve_node_visual(&self, node: &GraphNode, now: Duration) -> NodeVisual {
        let base = match self.reveals.get(&node.id) {
            Some(tween) => tween.value(now),
            None if self.is_seen(node) => NodeVisual::steady(node.heat),
            None => NodeVisual::unseen(node.heat).with_glow(unseen_glow(now)),
        };
        let width = base.stroke_width + self.hover_boost(&node.id, now);
        base.with_stroke_width(width)
    }

    pub fn resolve_link_visual(
        &self,
        model: &GraphModel,
        link: LinkIndex,
        now: Duration,
    ) -> LinkStyle {
        if model[link].kind == LinkKind::Cross {
            return CROSS_LINK_STYLE;
        }
        if let Some(tween) = self.link_reveals.get(&link) {
            return tween.value(now);
        }
        let target_seen = model
            .link_endpoints(link)
            .is_some_and(|(_, target)| self.is_seen(&model[target]));
        if target_seen {
            TREE_LINK_STYLE
        } else {
            UNSEEN_TREE_LINK_STYLE
        }
    }

    /// Whether any tween is still moving at `now`.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.reveals.values().any(|t| !t.is_finished(now))
            || self.link_reveals.values().any(|t| !t.is_finished(now))
            || self.hover.values().any(|t| !t.is_finished(now))
    }

    /// Drop tweens that have reached their end state. A finished hover-in
    /// tween is kept since it holds the boost.
    pub fn retire(&mut self, now: Duration) {
        self.reveals.retain(|_, tween| !tween.is_finished(now));
        self.link_reveals.retain(|_, tween| !tween.is_finished(now));
        self.hover
            .retain(|_, tween| !(tween.is_finished(now) && *tween.end() == 0.0));
    }

    /// Snap every animation to its end state. The acknowledged set is kept.
    pub fn cancel_animations(&mut self) {
        self.reveals.clear();
        self.link_reveals.clear();
        self.hover.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::{Heat, ThinkingNode};
    use grove_events::{Event, InMemoryBoundary};
    use grove_graph::GraphAssembler;

    fn model() -> GraphModel {
        let root = ThinkingNode::new("root", "Root")
            .with_seen(true)
            .with_child(ThinkingNode::new("a", "A").with_heat(Heat::Hot))
            .with_child(ThinkingNode::new("b", "B"));
        GraphAssembler::from_tree(Some(&root), &[])
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_transition_once() {
        let model = model();
        let (boundary, rx) = InMemoryBoundary::channel();
        let mut vis = VisibilityStateMachine::new(TimingSettings::default());
        let a = NodeId::from("a");

        assert_eq!(vis.unseen_count(&model), 2);
        assert!(vis.transition(&model, &a, &boundary, ms(0)));
        assert!(!vis.transition(&model, &a, &boundary, ms(10)));
        assert_eq!(vis.unseen_count(&model), 1);

        let acks: Vec<Event> = rx.try_iter().collect();
        assert_eq!(acks, vec![Event::AcknowledgeNode { id: a }]);
    }

    #[test]
    fn test_initially_seen_node_never_transitions() {
        let model = model();
        let (boundary, rx) = InMemoryBoundary::channel();
        let mut vis = VisibilityStateMachine::new(TimingSettings::default());
        assert!(!vis.transition(&model, &NodeId::from("root"), &boundary, ms(0)));
        assert!(vis.state().is_empty());
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn test_ack_failure_keeps_node_seen() {
        let model = model();
        let (boundary, rx) = InMemoryBoundary::channel();
        drop(rx);
        let mut vis = VisibilityStateMachine::new(TimingSettings::default());
        let b = NodeId::from("b");

        assert!(vis.transition(&model, &b, &boundary, ms(0)));
        assert!(vis.state().contains(&b));
        assert_eq!(vis.unseen_count(&model), 1);
    }

    #[test]
    fn test_reveal_tween_runs_to_heat_palette() {
        let model = model();
        let (boundary, _rx) = InMemoryBoundary::channel();
        let mut vis = VisibilityStateMachine::new(TimingSettings::default());
        let a = NodeId::from("a");
        let node = model.get_node(&a).unwrap().clone();

        assert_eq!(vis.resolve_node_visual(&node, ms(0)), NodeVisual::unseen(Heat::Hot));
        let pulsing = NodeVisual::unseen(Heat::Hot).with_glow(unseen_glow(ms(1_000)));
        assert_eq!(vis.resolve_node_visual(&node, ms(1_000)), pulsing);
        vis.transition(&model, &a, &boundary, ms(1_000));

        assert_eq!(vis.resolve_node_visual(&node, ms(1_000)), pulsing);
        let mid = vis.resolve_node_visual(&node, ms(1_400));
        assert_ne!(mid, pulsing);
        assert_ne!(mid, NodeVisual::steady(Heat::Hot));
        assert_eq!(vis.resolve_node_visual(&node, ms(1_800)), NodeVisual::steady(Heat::Hot));

        let link = model.incoming_tree_links(&a).next().unwrap();
        assert_eq!(vis.resolve_link_visual(&model, link, ms(1_000)), UNSEEN_TREE_LINK_STYLE);
        assert_eq!(vis.resolve_link_visual(&model, link, ms(1_800)), TREE_LINK_STYLE);

        vis.retire(ms(1_800));
        assert!(!vis.is_animating(ms(2_000)));
        assert_eq!(vis.resolve_link_visual(&model, link, ms(2_000)), TREE_LINK_STYLE);
    }

    #[test]
    fn test_hover_boosts_stroke() {
        let model = model();
        let mut vis = VisibilityStateMachine::new(TimingSettings::default());
        let root = model.get_node(&NodeId::from("root")).unwrap().clone();
        let steady = NodeVisual::steady(root.heat).stroke_width;

        vis.set_hovered(&root.id, true, ms(0));
        assert_eq!(vis.resolve_node_visual(&root, ms(0)).stroke_width, steady);
        assert_eq!(vis.resolve_node_visual(&root, ms(200)).stroke_width, steady + 1.5);

        vis.set_hovered(&root.id, false, ms(500));
        assert_eq!(vis.resolve_node_visual(&root, ms(500)).stroke_width, steady + 1.5);
        assert_eq!(vis.resolve_node_visual(&root, ms(800)).stroke_width, steady);

        vis.retire(ms(800));
        assert!(!vis.is_animating(ms(2_000)));
    }

    #[test]
    fn test_unseen_glow_pulses_until_revealed() {
        let model = model();
        let vis = VisibilityStateMachine::new(TimingSettings::default());
        let b = model.get_node(&NodeId::from("b")).unwrap();
        let root = model.get_node(&NodeId::from("root")).unwrap();

        let dim = vis.resolve_node_visual(b, ms(0)).glow;
        let bright = vis.resolve_node_visual(b, ms(1_500)).glow;
        assert!(bright.a > dim.a);
        assert_eq!(vis.resolve_node_visual(b, ms(3_000)).glow, dim);
        assert_eq!(
            vis.resolve_node_visual(root, ms(0)),
            vis.resolve_node_visual(root, ms(1_500))
        );
        assert!(!vis.is_animating(ms(1_500)));
    }

    #[test]
    fn test_cancel_snaps_to_end_state() {
        let model = model();
        let (boundary, _rx) = InMemoryBoundary::channel();
        let mut vis = VisibilityStateMachine::new(TimingSettings::default());
        let a = NodeId::from("a");
        vis.transition(&model, &a, &boundary, ms(0));

        vis.cancel_animations();
        let node = model.get_node(&a).unwrap();
        assert_eq!(vis.resolve_node_visual(node, ms(1)), NodeVisual::steady(Heat::Hot));
        assert!(vis.state().contains(&a));
    }
}
