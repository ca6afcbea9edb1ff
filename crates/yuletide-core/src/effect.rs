// Cancellable background task owned by the page.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A spawned effect paired with the token that stops it.
///
/// The task body is raced against the token, so cancellation takes effect at
/// the effect's next await point. Dropping the handle cancels the task;
/// `shutdown` additionally waits for it to finish.
pub struct EffectHandle {
    name: &'static str,
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl EffectHandle {
    pub fn spawn<F>(name: &'static str, effect: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => debug!(effect = name, "effect cancelled"),
                _ = effect => debug!(effect = name, "effect finished"),
            }
        });
        EffectHandle {
            name,
            token,
            join: Some(join),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the task has returned, either by finishing or by cancellation.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                warn!(effect = self.name, "effect task failed: {}", e);
            }
        }
    }
}

impl Drop for EffectHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_a_looping_effect() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let handle = EffectHandle::spawn("ticker", async move {
            loop {
                tokio::time::sleep(Duration::from_millis(100)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_task() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let handle = EffectHandle::spawn("ticker", async move {
            loop {
                tokio::time::sleep(Duration::from_millis(100)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn finished_effect_reports_finished() {
        let handle = EffectHandle::spawn("one-shot", async {});
        for _ in 0..10 {
            if handle.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(handle.is_finished());
        assert!(!handle.is_cancelled());
        assert_eq!(handle.name(), "one-shot");
    }
}
