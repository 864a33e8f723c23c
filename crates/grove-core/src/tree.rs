//! Tree walks over [`ThinkingNode`].
//!
//! Documents can nest deeply, so every walk here keeps its own stack instead
//! of recursing.

use crate::{NodeId, ThinkingNode};

/// A node reached during a pre-order walk, with its parent and depth.
#[derive(Debug, Clone, Copy)]
pub struct TreeVisit<'a> {
    pub node: &'a ThinkingNode,
    pub parent: Option<&'a ThinkingNode>,
    pub depth: usize,
}

/// Pre-order iterator driven by an explicit stack.
pub struct Preorder<'a> {
    stack: Vec<TreeVisit<'a>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = TreeVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        // Reverse so the first child is popped first.
        for child in visit.node.children.iter().rev() {
            self.stack.push(TreeVisit {
                node: child,
                parent: Some(visit.node),
                depth: visit.depth + 1,
            });
        }
        Some(visit)
    }
}

impl ThinkingNode {
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![TreeVisit {
                node: self,
                parent: None,
                depth: 0,
            }],
        }
    }

    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    pub fn find(&self, id: &NodeId) -> Option<&ThinkingNode> {
        self.preorder()
            .map(|visit| visit.node)
            .find(|node| &node.id == id)
    }

    /// Number of nodes that are neither seen on the server nor acknowledged
    /// locally.
    pub fn count_unseen<F>(&self, acknowledged: F) -> usize
    where
        F: Fn(&NodeId) -> bool,
    {
        self.preorder()
            .filter(|visit| !visit.node.seen && !acknowledged(&visit.node.id))
            .count()
    }

    pub fn max_depth(&self) -> usize {
        self.preorder().map(|visit| visit.depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> ThinkingNode {
        ThinkingNode::new("root", "Root")
            .with_seen(true)
            .with_child(
                ThinkingNode::new("a", "A")
                    .with_child(ThinkingNode::new("a1", "A1"))
                    .with_child(ThinkingNode::new("a2", "A2").with_seen(true)),
            )
            .with_child(ThinkingNode::new("b", "B"))
    }

    #[test]
    fn test_preorder_order_and_parents() {
        let tree = sample();
        let visits: Vec<_> = tree
            .preorder()
            .map(|v| (v.node.id.0.clone(), v.parent.map(|p| p.id.0.clone()), v.depth))
            .collect();

        assert_eq!(
            visits,
            vec![
                ("root".to_string(), None, 0),
                ("a".to_string(), Some("root".to_string()), 1),
                ("a1".to_string(), Some("a".to_string()), 2),
                ("a2".to_string(), Some("a".to_string()), 2),
                ("b".to_string(), Some("root".to_string()), 1),
            ]
        );
    }

    #[test]
    fn test_find_and_label_lookup() {
        let tree = sample();
        assert_eq!(
            tree.find(&NodeId::from("a2")).map(|n| n.label.as_str()),
            Some("A2")
        );
        assert!(tree.find(&NodeId::from("zzz")).is_none());
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_count_unseen_merges_local_acknowledgements() {
        let tree = sample();
        assert_eq!(tree.count_unseen(|_| false), 3);

        let acked: HashSet<NodeId> = [NodeId::from("a1")].into_iter().collect();
        assert_eq!(tree.count_unseen(|id| acked.contains(id)), 2);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut node = ThinkingNode::new("leaf", "leaf");
        for depth in 0..50_000 {
            node = ThinkingNode::new(format!("n{depth}"), "").with_child(node);
        }
        assert_eq!(node.node_count(), 50_001);
        assert_eq!(node.max_depth(), 50_000);

        // Dropping a deeply nested tree recurses in the generated drop glue,
        // so unwind it by hand.
        let mut stack = vec![node];
        while let Some(mut n) = stack.pop() {
            stack.append(&mut n.children);
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn tree_strategy() -> impl Strategy<Value = ThinkingNode> {
        let leaf = any::<bool>().prop_map(|seen| ThinkingNode::new("", "").with_seen(seen));
        leaf.prop_recursive(4, 40, 5, |inner| {
            (any::<bool>(), prop::collection::vec(inner, 0..5)).prop_map(|(seen, children)| {
                let mut node = ThinkingNode::new("", "").with_seen(seen);
                node.children = children;
                node
            })
        })
    }

    proptest! {
        #[test]
        fn prop_preorder_visits_every_node_once(tree in tree_strategy()) {
            let visits: Vec<_> = tree.preorder().collect();
            prop_assert_eq!(visits.len(), tree.node_count());
            prop_assert_eq!(visits.iter().filter(|v| v.parent.is_none()).count(), 1);
            for visit in &visits {
                if let Some(parent) = visit.parent {
                    prop_assert!(visit.depth >= 1);
                    prop_assert!(parent.children.iter().any(|c| std::ptr::eq(c, visit.node)));
                }
            }
            let unseen = visits.iter().filter(|v| !v.node.seen).count();
            prop_assert_eq!(tree.count_unseen(|_| false), unseen);
            prop_assert_eq!(tree.count_unseen(|_| true), 0);
        }
    }
}
