// Backend access: the `DataSource` seam and its reqwest implementation.
//
// One-shot reads go through `get_json` with a per-request timeout. The
// countdown subscription uses reqwest-eventsource and is adapted into a plain
// stream of `PushFrame`s that ends after the first error, so the event source
// never gets the chance to reconnect.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::StatusCode;
use reqwest_eventsource::{Event, EventSource, RequestBuilderExt};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, EndpointsConfig};
use crate::protocol::{EmojisPayload, LuckyNumberPayload, LyricsPayload, PushFrame};

/// Stream of frames from a push subscription. Dropping it closes the channel.
pub type PushStream = BoxStream<'static, PushFrame>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: StatusCode,
    },

    #[error("malformed payload from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error("could not open push subscription: {0}")]
    Subscribe(String),
}

// ---------------------------------------------------------------------------
// DataSource
// ---------------------------------------------------------------------------

/// Everything the page reads from the backend.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full ordered lyrics, fetched once.
    async fn fetch_lyrics(&self) -> Result<Vec<String>, FetchError>;

    /// Display glyphs for the tree lights, fetched once.
    async fn fetch_emojis(&self) -> Result<Vec<String>, FetchError>;

    /// Current lucky number; polled.
    async fn fetch_lucky_number(&self) -> Result<i64, FetchError>;

    /// Open the countdown push channel.
    fn subscribe_countdown(&self) -> Result<PushStream, FetchError>;
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    endpoints: EndpointsConfig,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str, endpoints: EndpointsConfig, request_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
            request_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.backend.base_url,
            config.endpoints.clone(),
            config.request_timeout(),
        )
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self
            .http
            .get(self.url(path))
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: path.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Malformed {
            endpoint: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DataSource for HttpBackend {
    async fn fetch_lyrics(&self) -> Result<Vec<String>, FetchError> {
        let payload: LyricsPayload = self.get_json(&self.endpoints.lyrics).await?;
        Ok(payload.lyrics)
    }

    async fn fetch_emojis(&self) -> Result<Vec<String>, FetchError> {
        let payload: EmojisPayload = self.get_json(&self.endpoints.emojis).await?;
        Ok(payload.into_glyphs())
    }

    async fn fetch_lucky_number(&self) -> Result<i64, FetchError> {
        let payload: LuckyNumberPayload = self.get_json(&self.endpoints.lucky_number).await?;
        Ok(payload.number)
    }

    fn subscribe_countdown(&self) -> Result<PushStream, FetchError> {
        let es = self
            .http
            .get(self.url(&self.endpoints.countdown))
            .header("accept", "text/event-stream")
            .eventsource()
            .map_err(|e| FetchError::Subscribe(e.to_string()))?;
        Ok(push_frames(es))
    }
}

/// Adapt an `EventSource` into `PushFrame`s. The first error is yielded as
/// `Failed` and the source is closed; the stream ends right after.
fn push_frames(es: EventSource) -> PushStream {
    stream::unfold(Some(es), |state| async move {
        let mut es = state?;
        loop {
            match es.next().await {
                Some(Ok(Event::Open)) => return Some((PushFrame::Opened, Some(es))),
                Some(Ok(Event::Message(msg))) => {
                    if !is_default_event(&msg.event) {
                        debug!(event = %msg.event, "ignoring named push event");
                        continue;
                    }
                    return Some((PushFrame::Data(msg.data), Some(es)));
                }
                Some(Err(err)) => {
                    let reason = describe_stream_error(&err);
                    es.close();
                    return Some((PushFrame::Failed(reason), None));
                }
                None => return None,
            }
        }
    })
    .boxed()
}

/// Unnamed SSE events arrive with the default type `message`.
fn is_default_event(event: &str) -> bool {
    event.is_empty() || event == "message"
}

fn describe_stream_error(err: &reqwest_eventsource::Error) -> String {
    match err {
        reqwest_eventsource::Error::InvalidStatusCode(status, _response) => {
            format!("server returned status {status}")
        }
        reqwest_eventsource::Error::Transport(e) => format!("network error: {e}"),
        reqwest_eventsource::Error::StreamEnded => "stream ended by server".to_string(),
        other => format!("stream error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
