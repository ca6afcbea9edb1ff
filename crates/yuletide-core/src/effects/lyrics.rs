// Lyrics revealer: one fetch, then one line per tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::DataSource;
use crate::protocol::PageEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Nothing loaded yet, or the fetch failed.
    Idle,
    Revealing,
    Done,
}

/// Reveal cursor over a fetched line sequence.
#[derive(Debug, Clone)]
pub struct LyricsRevealer {
    lines: Vec<String>,
    cursor: usize,
    phase: RevealPhase,
}

impl Default for LyricsRevealer {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsRevealer {
    pub fn new() -> Self {
        LyricsRevealer {
            lines: Vec::new(),
            cursor: 0,
            phase: RevealPhase::Idle,
        }
    }

    /// Idle -> Revealing. An empty sequence goes straight to Done.
    /// Ignored unless idle.
    pub fn load(&mut self, lines: Vec<String>) {
        if self.phase != RevealPhase::Idle {
            return;
        }
        self.phase = if lines.is_empty() {
            RevealPhase::Done
        } else {
            RevealPhase::Revealing
        };
        self.lines = lines;
        self.cursor = 0;
    }

    /// Reveal the next line, advancing the cursor. Returns the index and line,
    /// or `None` when not revealing.
    pub fn advance(&mut self) -> Option<(usize, String)> {
        if self.phase != RevealPhase::Revealing {
            return None;
        }
        let index = self.cursor;
        let line = self.lines.get(index)?.clone();
        self.cursor += 1;
        if self.cursor >= self.lines.len() {
            self.phase = RevealPhase::Done;
        }
        Some((index, line))
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.lines.len()
    }
}

/// Fetch the lyrics and reveal them one line per `period`.
///
/// The first line appears one full period after the fetch resolves. When the
/// cursor reaches the end the timer is dropped and the task returns. A failed
/// fetch leaves the revealer idle.
pub async fn run(source: Arc<dyn DataSource>, period: Duration, tx: mpsc::Sender<PageEvent>) {
    let lines = match source.fetch_lyrics().await {
        Ok(lines) => lines,
        Err(e) => {
            warn!("Lyrics fetch failed, nothing to reveal: {}", e);
            return;
        }
    };

    let mut revealer = LyricsRevealer::new();
    revealer.load(lines);
    info!("Loaded {} lyric lines", revealer.total());
    if tx
        .send(PageEvent::LyricsLoaded {
            total: revealer.total(),
        })
        .await
        .is_err()
    {
        return;
    }

    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    while revealer.phase() == RevealPhase::Revealing {
        ticker.tick().await;
        let Some((index, line)) = revealer.advance() else {
            break;
        };
        debug!(index, "revealing lyric line");
        if tx.send(PageEvent::LyricRevealed { index, line }).await.is_err() {
            return;
        }
    }
    debug!("Lyrics fully revealed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::ScriptedSource;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_revealer_is_idle() {
        let mut r = LyricsRevealer::new();
        assert_eq!(r.phase(), RevealPhase::Idle);
        assert_eq!(r.advance(), None);
        assert_eq!(r.cursor(), 0);
    }

    #[test]
    fn reveals_every_line_in_order_then_done() {
        let mut r = LyricsRevealer::new();
        r.load(lines(&["a", "b", "c"]));
        assert_eq!(r.phase(), RevealPhase::Revealing);

        assert_eq!(r.advance(), Some((0, "a".to_string())));
        assert_eq!(r.advance(), Some((1, "b".to_string())));
        assert_eq!(r.phase(), RevealPhase::Revealing);
        assert_eq!(r.advance(), Some((2, "c".to_string())));
        assert_eq!(r.phase(), RevealPhase::Done);
        assert_eq!(r.cursor(), 3);
        assert_eq!(r.advance(), None);
    }

    #[test]
    fn empty_sequence_is_done_immediately() {
        let mut r = LyricsRevealer::new();
        r.load(Vec::new());
        assert_eq!(r.phase(), RevealPhase::Done);
        assert_eq!(r.advance(), None);
    }

    #[test]
    fn second_load_is_ignored() {
        let mut r = LyricsRevealer::new();
        r.load(lines(&["a"]));
        r.load(lines(&["x", "y"]));
        assert_eq!(r.total(), 1);
        assert_eq!(r.advance(), Some((0, "a".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn one_line_per_period() {
        let source = Arc::new(ScriptedSource::new().with_lyrics(lines(&["a", "b"])));
        let (tx, mut rx) = mpsc::channel(16);
        let task = tokio::spawn(run(source, Duration::from_secs(1), tx));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(rx.try_recv().unwrap(), PageEvent::LyricsLoaded { total: 2 });
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            PageEvent::LyricRevealed {
                index: 0,
                line: "a".into()
            }
        );
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            PageEvent::LyricRevealed {
                index: 1,
                line: "b".into()
            }
        );

        task.await.unwrap();
        assert!(rx.recv().await.is_none(), "no ticks after the last line");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_stays_idle() {
        let source = Arc::new(ScriptedSource::new());
        let (tx, mut rx) = mpsc::channel(16);

        run(source, Duration::from_secs(1), tx).await;
        assert!(rx.recv().await.is_none());
    }
}
