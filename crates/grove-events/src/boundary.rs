use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, unbounded};
use grove_core::NodeId;

use crate::{Event, EventBus};

/// Outbound callbacks of the canvas.
///
/// `acknowledge` is fire-and-forget from the canvas' point of view: the
/// caller logs a failure and keeps its local state.
pub trait CanvasBoundary {
    fn hover_changed(&self, id: Option<&NodeId>);
    fn acknowledge(&self, id: &NodeId) -> Result<()>;
    fn publish(&self, _event: Event) {}
}

impl CanvasBoundary for EventBus {
    fn hover_changed(&self, id: Option<&NodeId>) {
        self.publish(Event::HoverChanged { id: id.cloned() });
    }

    fn acknowledge(&self, id: &NodeId) -> Result<()> {
        self.publish(Event::AcknowledgeNode { id: id.clone() });
        Ok(())
    }

    fn publish(&self, event: Event) {
        EventBus::publish(self, event);
    }
}

/// Channel backed boundary whose receiving half belongs to the collaborator.
/// Once the receiver is dropped every acknowledgment fails.
#[derive(Clone)]
pub struct InMemoryBoundary {
    event_tx: Sender<Event>,
}

impl InMemoryBoundary {
    pub fn channel() -> (Self, Receiver<Event>) {
        let (event_tx, event_rx) = unbounded();
        (Self { event_tx }, event_rx)
    }
}

impl CanvasBoundary for InMemoryBoundary {
    fn hover_changed(&self, id: Option<&NodeId>) {
        if self
            .event_tx
            .send(Event::HoverChanged { id: id.cloned() })
            .is_err()
        {
            tracing::debug!("Hover change dropped, no collaborator listening");
        }
    }

    fn acknowledge(&self, id: &NodeId) -> Result<()> {
        self.event_tx
            .send(Event::AcknowledgeNode { id: id.clone() })
            .map_err(|error| anyhow::anyhow!("acknowledgment for {} not delivered: {}", id, error))
    }

    fn publish(&self, event: Event) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_boundary_delivers_events() {
        let (boundary, rx) = InMemoryBoundary::channel();
        let id = NodeId::from("a");

        boundary.hover_changed(Some(&id));
        boundary.acknowledge(&id).unwrap();
        boundary.hover_changed(None);

        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                Event::HoverChanged {
                    id: Some(id.clone())
                },
                Event::AcknowledgeNode { id },
                Event::HoverChanged { id: None },
            ]
        );
    }

    #[test]
    fn test_acknowledge_fails_without_receiver() {
        let (boundary, rx) = InMemoryBoundary::channel();
        drop(rx);

        assert!(boundary.acknowledge(&NodeId::from("a")).is_err());
        // Hover reports are best effort and never fail.
        boundary.hover_changed(None);
    }

    #[test]
    fn test_event_bus_boundary_never_fails() {
        let bus = EventBus::new();
        assert!(CanvasBoundary::acknowledge(&bus, &NodeId::from("a")).is_ok());
        assert_eq!(bus.drain().len(), 1);
    }
}
