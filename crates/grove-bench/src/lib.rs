use grove_core::{CrossEdge, DocumentSnapshot, Heat, ThinkingNode};

/// A balanced tree of `node_count` thoughts with `fanout` children per
/// parent, cycling through the heat tiers, plus one cross-edge for every
/// `cross_every` thoughts.
pub fn synthetic_snapshot(
    node_count: usize,
    fanout: usize,
    cross_every: usize,
) -> DocumentSnapshot {
    if node_count == 0 {
        return DocumentSnapshot::default();
    }
    let fanout = fanout.max(1);
    let root = build(0, node_count, fanout);

    let edges = (1..node_count)
        .step_by(cross_every.max(1))
        .map(|i| {
            let target = (i * 7 + 3) % node_count;
            CrossEdge::new(format!("t{i}"), format!("t{target}"), "relates")
        })
        .collect();
    DocumentSnapshot::new(Some(root), edges)
}

fn build(index: usize, node_count: usize, fanout: usize) -> ThinkingNode {
    let heat = Heat::ALL[index % Heat::ALL.len()];
    let mut node = ThinkingNode::new(format!("t{index}"), format!("Thought {index}"))
        .with_prose(format!("Working notes for thought number {index} in the grove"))
        .with_heat(heat)
        .with_seen(index % 3 == 0);
    for slot in 1..=fanout {
        let child = index * fanout + slot;
        if child < node_count {
            node.children.push(build(child, node_count, fanout));
        }
    }
    node
}
