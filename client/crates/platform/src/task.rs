//! Scoped Background Tasks
//!
//! A spawned tokio task whose lifetime is tied to a value: dropping the
//! [`TaskGuard`] aborts the task, so a timer can never outlive the state that
//! started it.

use std::future::Future;

use tokio::task::JoinHandle;

/// Owns a spawned task and aborts it on drop
#[derive(Debug)]
pub struct TaskGuard {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TaskGuard {
    /// Spawn `future` on the current runtime
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            name,
            handle: Some(tokio::spawn(future)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Abort the task now. Calling it again is a no-op.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::trace!(task = self.name, "Background task cancelled");
        }
    }

    /// Let the task run to completion without the guard
    pub fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let guard = TaskGuard::spawn("ticker", async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        drop(guard);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let mut guard = TaskGuard::spawn("idle", std::future::pending());
        guard.cancel();
        guard.cancel();
        assert!(guard.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_keeps_running() {
        let done = Arc::new(AtomicUsize::new(0));
        let flag = done.clone();
        TaskGuard::spawn("oneshot", async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(1, Ordering::SeqCst);
        })
        .detach();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
