// In-memory `DataSource` for effect tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};

use crate::api::{DataSource, FetchError, PushStream};
use crate::protocol::PushFrame;

pub(crate) fn malformed(endpoint: &str) -> FetchError {
    FetchError::Malformed {
        endpoint: endpoint.to_string(),
        source: serde_json::from_str::<i64>("not json").unwrap_err(),
    }
}

/// Answers from fixed scripts. Anything left unscripted fails as malformed.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    lyrics: Option<Vec<String>>,
    emojis: Option<Vec<String>>,
    lucky: Mutex<VecDeque<Option<i64>>>,
    countdown: Mutex<Option<Vec<PushFrame>>>,
    lucky_calls: AtomicUsize,
    subscribe_calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_lyrics(mut self, lines: Vec<String>) -> Self {
        self.lyrics = Some(lines);
        self
    }

    pub(crate) fn with_emojis(mut self, glyphs: Vec<String>) -> Self {
        self.emojis = Some(glyphs);
        self
    }

    /// Successive poll answers; `None` is a failed request.
    pub(crate) fn with_lucky(self, answers: Vec<Option<i64>>) -> Self {
        *self.lucky.lock().unwrap() = answers.into();
        self
    }

    pub(crate) fn with_countdown(self, frames: Vec<PushFrame>) -> Self {
        *self.countdown.lock().unwrap() = Some(frames);
        self
    }

    pub(crate) fn lucky_calls(&self) -> usize {
        self.lucky_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn fetch_lyrics(&self) -> Result<Vec<String>, FetchError> {
        self.lyrics.clone().ok_or_else(|| malformed("/api/lucky/"))
    }

    async fn fetch_emojis(&self) -> Result<Vec<String>, FetchError> {
        self.emojis.clone().ok_or_else(|| malformed("/api/emojis/"))
    }

    async fn fetch_lucky_number(&self) -> Result<i64, FetchError> {
        self.lucky_calls.fetch_add(1, Ordering::SeqCst);
        self.lucky
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| malformed("/api/lucky-number/"))
    }

    fn subscribe_countdown(&self) -> Result<PushStream, FetchError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        match self.countdown.lock().unwrap().take() {
            Some(frames) => Ok(stream::iter(frames).boxed()),
            None => Err(FetchError::Subscribe("no script".into())),
        }
    }
}
