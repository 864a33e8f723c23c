use crossbeam_channel::{Receiver, Sender, unbounded};
use grove_core::NodeId;
use serde::{Deserialize, Serialize};

pub mod boundary;

pub use boundary::{CanvasBoundary, InMemoryBoundary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipInfo {
    pub node_id: NodeId,
    pub title: String,
    pub description: String,
    pub byline: String,
    /// CSS color of the node's accent, used for the panel border.
    pub accent: String,
    /// CSS color of the authoring persona, for voice-authored thoughts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byline_color: Option<String>,
}

/// Everything the canvas reports to the outside world. Payloads carry only
/// identifiers and display data, never document semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Interaction
    HoverChanged {
        id: Option<NodeId>,
    },
    AcknowledgeNode {
        id: NodeId,
    },

    // Tooltip
    TooltipShow {
        info: TooltipInfo,
        x: f32,
        y: f32,
    },
    TooltipHide,

    // Canvas state
    UnseenCountChanged {
        count: usize,
    },
    SnapshotLoaded {
        node_count: usize,
        link_count: usize,
    },
    LayoutSettled {
        ticks: u64,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Drain everything published so far without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_publish_receive() {
        let bus = EventBus::new();
        let sender = bus.sender();
        let receiver = bus.receiver();

        sender
            .send(Event::HoverChanged {
                id: Some(NodeId::from("n1")),
            })
            .unwrap();

        match receiver.recv().unwrap() {
            Event::HoverChanged { id } => assert_eq!(id, Some(NodeId::from("n1"))),
            other => panic!("Expected HoverChanged, got {other:?}"),
        }
    }

    #[test]
    fn test_drain_preserves_publish_order() {
        let bus = EventBus::new();
        bus.publish(Event::UnseenCountChanged { count: 2 });
        bus.publish(Event::AcknowledgeNode {
            id: NodeId::from("a"),
        });
        bus.publish(Event::UnseenCountChanged { count: 1 });

        let events = bus.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], Event::UnseenCountChanged { count: 1 });
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_events_serialize_with_ids_only() {
        let json = serde_json::to_value(Event::AcknowledgeNode {
            id: NodeId::from("x"),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"AcknowledgeNode": {"id": "x"}}));
    }
}
