// Composition root: owns every state slice and the lifecycle of the effects
// that feed them.
//
// `Page::mount` spawns the five effects, each holding a clone of one event
// sender. The renderer pulls `PageEvent`s off the receiver and applies them to
// `PageState`. `Page::unmount` cancels all effects together.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::api::DataSource;
use crate::config::EffectSettings;
use crate::effect::EffectHandle;
use crate::effects::lyrics::RevealPhase;
use crate::effects::snow::{Snowflake, SnowflakeId};
use crate::effects::{countdown, emojis, lucky, lyrics, snow};
use crate::protocol::PageEvent;

/// Capacity of the effect -> page event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// PageState
// ---------------------------------------------------------------------------

/// A snowflake currently on screen, with the instant it appeared.
#[derive(Debug, Clone)]
pub struct FallingFlake {
    pub flake: Snowflake,
    pub born: Instant,
}

impl FallingFlake {
    /// Fraction of the fall completed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        let fall = self.flake.fall.as_secs_f32();
        if fall <= 0.0 {
            return 1.0;
        }
        (now.saturating_duration_since(self.born).as_secs_f32() / fall).clamp(0.0, 1.0)
    }
}

/// Everything the renderer draws. Each field is an independent slice.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// `None` until the first successful poll.
    pub lucky_number: Option<i64>,
    /// `None` until the first valid push message.
    pub countdown: Option<i64>,
    pub emojis: Vec<String>,
    /// Number of lines fetched; `None` while the lyrics are not loaded.
    pub lyrics_total: Option<usize>,
    /// Revealed lines, append-only in source order.
    pub displayed_lyrics: Vec<String>,
    pub snowflakes: HashMap<SnowflakeId, FallingFlake>,
}

impl PageState {
    /// Apply one effect event. `now` stamps newly spawned snowflakes.
    pub fn apply(&mut self, event: PageEvent, now: Instant) {
        match event {
            PageEvent::LuckyNumber(n) => self.lucky_number = Some(n),
            PageEvent::Countdown(s) => self.countdown = Some(s),
            PageEvent::LyricsLoaded { total } => self.lyrics_total = Some(total),
            PageEvent::LyricRevealed { index, line } => {
                if index == self.displayed_lyrics.len() {
                    self.displayed_lyrics.push(line);
                } else {
                    debug!(
                        index,
                        shown = self.displayed_lyrics.len(),
                        "out-of-order lyric line dropped"
                    );
                }
            }
            PageEvent::EmojisLoaded(glyphs) => self.emojis = glyphs,
            PageEvent::SnowflakeSpawned(flake) => {
                self.snowflakes
                    .insert(flake.id, FallingFlake { flake, born: now });
            }
            PageEvent::SnowflakeMelted(id) => {
                self.snowflakes.remove(&id);
            }
        }
    }

    pub fn lyrics_phase(&self) -> RevealPhase {
        match self.lyrics_total {
            None => RevealPhase::Idle,
            Some(total) if self.displayed_lyrics.len() < total => RevealPhase::Revealing,
            Some(_) => RevealPhase::Done,
        }
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

pub struct Page {
    state: PageState,
    events: mpsc::Receiver<PageEvent>,
    effects: Vec<EffectHandle>,
}

impl Page {
    /// Start all effects against `source`.
    pub fn mount(source: Arc<dyn DataSource>, settings: EffectSettings) -> Self {
        let (tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let effects = vec![
            EffectHandle::spawn(
                "lucky-number",
                lucky::run(source.clone(), settings.lucky_poll, tx.clone()),
            ),
            EffectHandle::spawn("countdown", countdown::run(source.clone(), tx.clone())),
            EffectHandle::spawn(
                "lyrics",
                lyrics::run(source.clone(), settings.lyric_reveal, tx.clone()),
            ),
            EffectHandle::spawn("emojis", emojis::run(source, tx.clone())),
            EffectHandle::spawn(
                "snowfall",
                snow::run(settings.snow, settings.snow_spawn, tx),
            ),
        ];
        info!("Page mounted with {} effects", effects.len());

        Page {
            state: PageState::default(),
            events,
            effects,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Split borrow for render loops that wait on events while drawing state.
    pub fn parts_mut(&mut self) -> (&mut PageState, &mut mpsc::Receiver<PageEvent>) {
        (&mut self.state, &mut self.events)
    }

    /// Wait for the next event and apply it. Returns `false` once every
    /// effect has dropped its sender.
    pub async fn pump(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.state.apply(event, Instant::now());
                true
            }
            None => false,
        }
    }

    /// Apply every event already queued, without waiting. Returns how many
    /// were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(event, Instant::now());
            applied += 1;
        }
        applied
    }

    /// Names of effects that are still running.
    pub fn running_effects(&self) -> Vec<&'static str> {
        self.effects
            .iter()
            .filter(|e| !e.is_finished())
            .map(EffectHandle::name)
            .collect()
    }

    /// Cancel every effect and wait for them to stop, giving up after
    /// `grace`.
    pub async fn unmount(self, grace: Duration) {
        let Page {
            mut events,
            effects,
            ..
        } = self;

        for effect in &effects {
            effect.cancel();
        }
        events.close();

        let shutdown = async {
            for effect in effects {
                effect.shutdown().await;
            }
        };
        if tokio::time::timeout(grace, shutdown).await.is_err() {
            info!("Page unmount timed out after {:?}", grace);
        } else {
            info!("Page unmounted");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
