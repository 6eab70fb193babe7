//! Delayed state changes owned by a single bubble.
//!
//! A task only runs when its owner drains it, and canceling removes it from
//! the queue, so a canceled or torn-down task can never touch stale state.
//! Time is whatever clock the owner passes in (seconds).

/// Identifies one scheduled task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    due: f64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct ScheduledTasks<T> {
    next_id: u64,
    pending: Vec<ScheduledTask<T>>,
}

impl<T> Default for ScheduledTasks<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> ScheduledTasks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to become due at time `due`.
    pub fn schedule(&mut self, due: f64, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledTask { handle, due, task });
        handle
    }

    /// Remove a pending task. Returns false if it already ran or was canceled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|scheduled| scheduled.handle == handle)
    }

    /// Remove and return every task due at or before `now`, earliest first;
    /// tasks due at the same time come out in scheduling order.
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.due <= now);
        self.pending = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.handle.0.cmp(&b.handle.0)));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|scheduled| scheduled.due)
            .min_by(f64::total_cmp)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_runs_early() {
        let mut tasks = ScheduledTasks::new();
        tasks.schedule(1.0, "purge");
        assert!(tasks.drain_due(0.999).is_empty());
        assert_eq!(tasks.drain_due(1.0), vec!["purge"]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_runs_exactly_once() {
        let mut tasks = ScheduledTasks::new();
        tasks.schedule(0.5, 7);
        assert_eq!(tasks.drain_due(2.0), vec![7]);
        assert!(tasks.drain_due(3.0).is_empty());
    }

    #[test]
    fn test_due_order_then_schedule_order() {
        let mut tasks = ScheduledTasks::new();
        tasks.schedule(2.0, 'c');
        tasks.schedule(1.0, 'a');
        tasks.schedule(1.0, 'b');
        tasks.schedule(9.0, 'z');
        assert_eq!(tasks.drain_due(5.0), vec!['a', 'b', 'c']);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.next_due(), Some(9.0));
    }

    #[test]
    fn test_cancel_prevents_run() {
        let mut tasks = ScheduledTasks::new();
        let keep = tasks.schedule(1.0, 1);
        let dropped = tasks.schedule(1.0, 2);
        assert!(tasks.cancel(dropped));
        assert!(!tasks.cancel(dropped), "second cancel is a no-op");
        assert!(tasks.is_pending(keep));
        assert!(!tasks.is_pending(dropped));
        assert_eq!(tasks.drain_due(1.0), vec![1]);
        assert!(!tasks.cancel(keep), "cannot cancel a task that already ran");
    }

    #[test]
    fn test_cancel_all() {
        let mut tasks = ScheduledTasks::new();
        for i in 0..5 {
            tasks.schedule(i as f64, i);
        }
        tasks.cancel_all();
        assert!(tasks.drain_due(100.0).is_empty());
        assert_eq!(tasks.next_due(), None);
    }

    #[test]
    fn test_handles_are_unique_after_cancel() {
        let mut tasks = ScheduledTasks::new();
        let first = tasks.schedule(1.0, ());
        tasks.cancel_all();
        let second = tasks.schedule(1.0, ());
        assert_ne!(first, second);
        assert!(!tasks.cancel(first));
        assert!(tasks.is_pending(second));
    }
}
