use grove_canvas::CanvasSession;
use grove_core::{CanvasSettings, CrossEdge, DocumentSnapshot, NodeId, ThinkingNode};
use grove_events::{Event, InMemoryBoundary};
use grove_graph::Vec2;
use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

const NODE_COUNT: usize = 6;

#[derive(Debug, Clone)]
enum Pointer {
    Enter(usize),
    Leave,
    Reload,
}

fn pointer_strategy() -> impl Strategy<Value = Pointer> {
    prop_oneof![
        // One past the last id hovers something that is not in the tree.
        (0..=NODE_COUNT).prop_map(Pointer::Enter),
        Just(Pointer::Leave),
        Just(Pointer::Reload),
    ]
}

fn snapshot(seen_mask: u8) -> DocumentSnapshot {
    let mut root = ThinkingNode::new("n0", "root").with_seen(seen_mask & 1 == 1);
    for i in 1..NODE_COUNT {
        root.children
            .push(ThinkingNode::new(format!("n{i}"), "").with_seen(seen_mask >> i & 1 == 1));
    }
    DocumentSnapshot::new(Some(root), vec![CrossEdge::new("n1", "n2", "")])
}

proptest! {
    /// The acknowledged set never shrinks, and every id is acknowledged at
    /// most once no matter how often it is hovered or the tree reloaded.
    #[test]
    fn prop_seen_set_is_monotonic(
        seen_mask in any::<u8>(),
        ops in prop::collection::vec(pointer_strategy(), 0..40),
    ) {
        let (boundary, rx) = InMemoryBoundary::channel();
        let mut session = CanvasSession::new(
            CanvasSettings::default(),
            Vec2::new(800.0, 600.0),
            Box::new(boundary),
        );
        let doc = snapshot(seen_mask);
        session.load_snapshot(&doc, Duration::ZERO);

        let mut previous = 0;
        let mut previous_unseen = session.unseen_count();
        for (step, op) in ops.iter().enumerate() {
            let now = Duration::from_millis(step as u64 * 40);
            match op {
                Pointer::Enter(i) => {
                    session.hover_enter(&NodeId::new(format!("n{i}")), Vec2::ZERO, now)
                }
                Pointer::Leave => session.hover_leave(now),
                Pointer::Reload => session.load_snapshot(&doc, now),
            }
            session.frame(now);

            let size = session.state().visibility.state().len();
            prop_assert!(size >= previous);
            prop_assert!(session.unseen_count() <= previous_unseen);
            previous = size;
            previous_unseen = session.unseen_count();
        }

        let acks: Vec<NodeId> = rx
            .try_iter()
            .filter_map(|event| match event {
                Event::AcknowledgeNode { id } => Some(id),
                _ => None,
            })
            .collect();
        let unique: HashSet<&NodeId> = acks.iter().collect();
        prop_assert_eq!(unique.len(), acks.len());
        prop_assert_eq!(acks.len(), session.state().visibility.state().len());
    }
}
