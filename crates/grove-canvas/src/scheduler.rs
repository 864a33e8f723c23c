use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Deferred work the session runs once its time has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    DismissTooltip,
    /// Frame the layout of the given engine generation.
    FitViewport { generation: u64 },
}

#[derive(Debug, Clone)]
struct Entry {
    id: TaskId,
    due: Duration,
    task: ScheduledTask,
}

/// Cancellable one-shot timers on the session clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, task: ScheduledTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        tracing::trace!("Scheduled {:?} as {} at {:?}", task, id, due);
        self.entries.push(Entry { id, due, task });
        id
    }

    /// Returns false if the task already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Remove and return every task due at `now`, earliest first. Ties run
    /// in scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<(TaskId, ScheduledTask)> {
        let (mut due, pending): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.due <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.due, entry.id));
        due.into_iter().map(|entry| (entry.id, entry.task)).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(ms(300), ScheduledTask::DismissTooltip);
        let early = scheduler.schedule(ms(100), ScheduledTask::FitViewport { generation: 1 });

        assert!(scheduler.take_due(ms(50)).is_empty());
        assert_eq!(
            scheduler.take_due(ms(300)),
            vec![
                (early, ScheduledTask::FitViewport { generation: 1 }),
                (late, ScheduledTask::DismissTooltip),
            ]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(ms(100), ScheduledTask::DismissTooltip);
        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.take_due(ms(1_000)).is_empty());
    }

    #[test]
    fn test_task_runs_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(10), ScheduledTask::DismissTooltip);
        assert_eq!(scheduler.take_due(ms(10)).len(), 1);
        assert!(scheduler.take_due(ms(20)).is_empty());
    }
}
