// Countdown receiver: consumes the server-push channel.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::DataSource;
use crate::protocol::{parse_countdown, PageEvent, PushFrame};

/// Why a push subscription stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// The channel reported an error; it is not reopened.
    Failed(String),
    /// The stream ran dry without reporting an error.
    Ended,
    /// The page stopped listening.
    ReceiverClosed,
}

/// Open the countdown subscription and forward every valid value.
///
/// There is no reconnect: after the first channel error the subscription is
/// dropped and the last value stays on screen.
pub async fn run(source: Arc<dyn DataSource>, tx: mpsc::Sender<PageEvent>) {
    let stream = match source.subscribe_countdown() {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Countdown subscription failed: {}", e);
            return;
        }
    };

    match consume_push_stream(stream, &tx).await {
        PushOutcome::Failed(reason) => {
            warn!("Countdown stream error, closing subscription: {}", reason)
        }
        PushOutcome::Ended => info!("Countdown stream ended"),
        PushOutcome::ReceiverClosed => debug!("Countdown receiver gone"),
    }
}

/// Drive a push stream, sending one `PageEvent::Countdown` per well-formed
/// message. Malformed messages are logged and skipped.
///
/// Generic over the stream so it can be tested without a server.
pub async fn consume_push_stream<St>(mut stream: St, tx: &mpsc::Sender<PageEvent>) -> PushOutcome
where
    St: Stream<Item = PushFrame> + Unpin,
{
    while let Some(frame) = stream.next().await {
        match frame {
            PushFrame::Opened => info!("Countdown stream opened"),
            PushFrame::Data(data) => match parse_countdown(&data) {
                Ok(seconds) => {
                    if tx.send(PageEvent::Countdown(seconds)).await.is_err() {
                        return PushOutcome::ReceiverClosed;
                    }
                }
                Err(e) => warn!("Ignoring countdown message: {}", e),
            },
            PushFrame::Failed(reason) => return PushOutcome::Failed(reason),
        }
    }
    PushOutcome::Ended
}
