//! Owned background tasks
//!
//! Every task a view-state starts lives in its [`TaskScope`]. Dropping the
//! scope (with the view-state) aborts them all.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::task::JoinSet;

/// Set of tasks aborted together on drop
#[derive(Default)]
pub struct TaskScope {
    tasks: Mutex<JoinSet<()>>,
}

impl TaskScope {
    /// Empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task owned by this scope
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.lock().spawn(task);
    }

    /// Number of tasks spawned and not yet reaped
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no tasks are tracked
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Abort every task now
    pub fn shutdown(&self) {
        self.lock().abort_all();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn dropping_scope_aborts_tasks() {
        let dropped = Arc::new(AtomicBool::new(false));
        let scope = TaskScope::new();

        let guard = SetOnDrop(Arc::clone(&dropped));
        scope.spawn(async move {
            let _guard = guard;
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        assert_eq!(scope.len(), 1);

        tokio::task::yield_now().await;
        drop(scope);

        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("task was not aborted");
    }
}
