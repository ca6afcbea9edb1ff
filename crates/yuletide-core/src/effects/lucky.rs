// Lucky number poller: fetch on mount, then every `period`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::DataSource;
use crate::protocol::PageEvent;

/// Poll the lucky number until cancelled or the page stops listening.
///
/// The first request goes out immediately. A failed request is logged and the
/// previous value stands; the next tick retries as usual. Requests never
/// overlap: a slow one pushes the following tick back.
pub async fn run(source: Arc<dyn DataSource>, period: Duration, tx: mpsc::Sender<PageEvent>) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match source.fetch_lucky_number().await {
            Ok(number) => {
                debug!(number, "lucky number fetched");
                if tx.send(PageEvent::LuckyNumber(number)).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("Lucky number fetch failed: {}", e),
        }
    }
}
