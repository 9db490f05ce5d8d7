//! Single-threaded delayed task queue driven by the frame clock.
//!
//! Nothing here blocks or spawns: the owner posts tasks with a delay, advances
//! the clock once per frame, and runs whatever came due. Tasks are plain values
//! so the owner decides how to execute them.

/// Handle to a posted task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    due_ms: u64,
    task: T,
}

/// Delayed tasks ordered by due time, then by post order.
#[derive(Debug)]
pub struct TaskQueue<T> {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Current clock value in milliseconds.
    #[cfg(test)]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Post `task` to run once the clock has advanced by `delay_ms`.
    pub fn post_delayed(&mut self, task: T, delay_ms: u32) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled {
            handle,
            due_ms: self.now_ms + u64::from(delay_ms),
            task,
        });
        handle
    }

    /// Cancel a posted task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    /// Cancel every pending task matching `pred`. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| !pred(&s.task));
        before - self.pending.len()
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    /// Whether any pending task matches `pred`.
    #[cfg(test)]
    pub fn any(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.pending.iter().any(|s| pred(&s.task))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Advance the clock by `dt_ms` and drain every task that is now due.
    pub fn advance(&mut self, dt_ms: u32) -> Vec<T> {
        self.now_ms += u64::from(dt_ms);
        let now = self.now_ms;
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|s| (s.due_ms, s.handle.0));
        due.into_iter().map(|s| s.task).collect()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_runs_after_delay() {
        let mut q = TaskQueue::new();
        q.post_delayed("show", 100);
        assert!(q.advance(99).is_empty());
        assert_eq!(q.advance(1), vec!["show"]);
        assert!(q.is_empty());
    }

    #[test]
    fn zero_delay_runs_on_next_advance() {
        let mut q = TaskQueue::new();
        q.post_delayed(1, 0);
        assert_eq!(q.advance(0), vec![1]);
    }

    #[test]
    fn due_tasks_come_out_in_time_order() {
        let mut q = TaskQueue::new();
        q.post_delayed("late", 50);
        q.post_delayed("early", 10);
        q.post_delayed("early-second", 10);
        assert_eq!(q.advance(60), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn cancel_prevents_run() {
        let mut q = TaskQueue::new();
        let h = q.post_delayed("show", 100);
        assert!(q.is_pending(h));
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(q.advance(200).is_empty());
    }

    #[test]
    fn cancel_where_filters_by_value() {
        let mut q = TaskQueue::new();
        q.post_delayed(1, 10);
        q.post_delayed(2, 10);
        q.post_delayed(3, 10);
        assert_eq!(q.cancel_where(|t| *t % 2 == 1), 2);
        assert!(q.any(|t| *t == 2));
        assert_eq!(q.advance(10), vec![2]);
    }

    #[test]
    fn clock_accumulates() {
        let mut q: TaskQueue<()> = TaskQueue::new();
        q.advance(16);
        q.advance(16);
        assert_eq!(q.now_ms(), 32);
    }
}
