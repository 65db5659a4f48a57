//! Prioritized background tasks.
//!
//! Thin wrapper over OS threads for the few pieces of per-frame work that
//! run off the render thread. A spawned task is joined at a fixed point in
//! the frame, so the handle exposes a blocking [`TaskHandle::join`] rather
//! than any polling machinery.

use std::io;
use std::thread;

/// Priority level for task execution.
///
/// Higher priority tasks are executed before lower priority tasks.
///
/// # Ordering
///
/// `Critical > High > Low` — derives `Ord` so priorities can be compared
/// and sorted directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Fills gaps when higher-priority work is unavailable.
    /// May span multiple frames.
    Low,
    /// Should complete this frame.
    High,
    /// Must complete this frame; the frame blocks on it.
    Critical,
}

/// Handle to a spawned task. Joining consumes the handle.
#[derive(Debug)]
pub struct TaskHandle<T> {
    handle: thread::JoinHandle<T>,
    name: String,
}

impl<T> TaskHandle<T> {
    /// Name the task was spawned under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the task has run to completion (or panicked).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the task completes and return its result.
    ///
    /// A panic on the worker thread is resumed on the calling thread, so it
    /// reaches the same top-level guard as a panic in frame code.
    pub fn join(self) -> T {
        match self.handle.join() {
            Ok(value) => value,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

/// Spawn a named task at the given priority.
///
/// On OS threads the priority is a scheduling hint only; it is recorded for
/// diagnostics and for executors that can honor it.
pub fn spawn<T, F>(priority: Priority, name: &str, f: F) -> io::Result<TaskHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    log::trace!("spawning task '{name}' at {priority:?}");
    let handle = thread::Builder::new().name(name.to_string()).spawn(f)?;
    Ok(TaskHandle {
        handle,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Low);
        assert!(Priority::Critical > Priority::Low);
    }

    #[test]
    fn join_returns_task_result() {
        let task = spawn(Priority::High, "sum", || 2 + 2).unwrap();
        assert_eq!(task.join(), 4);
    }

    #[test]
    fn join_acts_as_barrier() {
        let counter = Arc::new(AtomicUsize::new(0));
        let worker_counter = Arc::clone(&counter);

        let task = spawn(Priority::Critical, "barrier", move || {
            worker_counter.store(7, Ordering::SeqCst);
        })
        .unwrap();

        task.join();
        assert_eq!(counter.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn name_is_preserved() {
        let task = spawn(Priority::Low, "render_main_sprites", || ()).unwrap();
        assert_eq!(task.name(), "render_main_sprites");
        task.join();
    }

    #[test]
    fn worker_panic_resumes_on_join() {
        let task = spawn(Priority::High, "explode", || panic!("boom")).unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| task.join()));
        assert!(result.is_err());
    }
}
