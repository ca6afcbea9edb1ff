// Wire payloads from the backend and the events effects send to the page.

use serde::Deserialize;
use thiserror::Error;

use crate::effects::snow::{Snowflake, SnowflakeId};

// ---------------------------------------------------------------------------
// Backend payloads
// ---------------------------------------------------------------------------

/// `GET /api/lucky/` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LyricsPayload {
    pub lyrics: Vec<String>,
}

/// `GET /api/emojis/` body. Items carry extra layout fields we ignore.
#[derive(Debug, Clone, Deserialize)]
pub struct EmojisPayload {
    pub emojis: Vec<EmojiItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmojiItem {
    #[serde(rename = "char")]
    pub glyph: String,
}

impl EmojisPayload {
    pub fn into_glyphs(self) -> Vec<String> {
        self.emojis.into_iter().map(|e| e.glyph).collect()
    }
}

/// `GET /api/lucky-number/` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LuckyNumberPayload {
    pub number: i64,
}

/// Data field of one `/api/countdown-sse/` message.
#[derive(Debug, Clone, Deserialize)]
pub struct CountdownPayload {
    pub seconds: i64,
}

// ---------------------------------------------------------------------------
// Push-stream decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
#[error("malformed push message {data:?}: {source}")]
pub struct PayloadError {
    pub data: String,
    pub source: serde_json::Error,
}

/// Decode the `seconds` field of a countdown message.
pub fn parse_countdown(data: &str) -> Result<i64, PayloadError> {
    serde_json::from_str::<CountdownPayload>(data)
        .map(|p| p.seconds)
        .map_err(|source| PayloadError {
            data: data.to_string(),
            source,
        })
}

/// One item yielded by a push subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum PushFrame {
    /// The stream has been established.
    Opened,
    /// Raw `data:` payload of one message.
    Data(String),
    /// The channel failed or ended; nothing follows.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Page events
// ---------------------------------------------------------------------------

/// State changes produced by the effects, applied by the page in arrival
/// order. Each variant touches exactly one state slice.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    LuckyNumber(i64),
    Countdown(i64),
    /// The lyrics fetch succeeded; `total` lines will be revealed.
    LyricsLoaded { total: usize },
    LyricRevealed { index: usize, line: String },
    EmojisLoaded(Vec<String>),
    SnowflakeSpawned(Snowflake),
    SnowflakeMelted(SnowflakeId),
}
