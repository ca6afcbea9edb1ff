// Emoji loader: one fetch for the tree lights.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::DataSource;
use crate::protocol::PageEvent;

/// Fetch the light glyphs once. On failure nothing is sent and the tree stays
/// unlit.
pub async fn run(source: Arc<dyn DataSource>, tx: mpsc::Sender<PageEvent>) {
    match source.fetch_emojis().await {
        Ok(glyphs) => {
            info!("Loaded {} emoji lights", glyphs.len());
            if tx.send(PageEvent::EmojisLoaded(glyphs)).await.is_err() {
                debug!("Emoji receiver gone, lights dropped");
            }
        }
        Err(e) => warn!("Emoji fetch failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::ScriptedSource;

    #[tokio::test]
    async fn sends_glyphs_once() {
        let glyphs = vec!["🎄".to_string(), "🎁".to_string()];
        let source = Arc::new(ScriptedSource::new().with_emojis(glyphs.clone()));
        let (tx, mut rx) = mpsc::channel(4);

        run(source, tx).await;
        assert_eq!(rx.recv().await, Some(PageEvent::EmojisLoaded(glyphs)));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn returns_when_page_stopped_listening() {
        let source = Arc::new(ScriptedSource::new().with_emojis(vec!["🔔".to_string()]));
        let (tx, rx) = mpsc::channel(4);
        drop(rx);

        tokio::time::timeout(std::time::Duration::from_secs(1), run(source, tx))
            .await
            .expect("loader should return once the receiver is gone");
    }

    #[tokio::test]
    async fn failure_leaves_lights_off() {
        let source = Arc::new(ScriptedSource::new());
        let (tx, mut rx) = mpsc::channel(4);

        run(source, tx).await;
        assert_eq!(rx.recv().await, None);
    }
}
