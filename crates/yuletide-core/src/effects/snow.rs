// Snowflake animator: spawn on a fixed cadence, melt after each flake's own
// fall duration.

use std::ops::Range;
use std::time::Duration;

use futures_util::StreamExt;
use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::time::DelayQueue;
use tracing::debug;

use crate::config::SnowConfig;
use crate::protocol::PageEvent;

/// Identity of a snowflake: wall-clock creation time plus a random
/// tiebreaker, so flakes spawned in the same millisecond stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnowflakeId {
    pub created_ms: i64,
    pub salt: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub id: SnowflakeId,
    /// Horizontal offset as a percentage of the width, in `[0, 100)`.
    pub left: f32,
    pub size: f32,
    pub fall: Duration,
}

/// Ranges the random flake attributes are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowParams {
    pub size: Range<f32>,
    pub fall_secs: Range<f32>,
}

impl From<&SnowConfig> for SnowParams {
    fn from(c: &SnowConfig) -> Self {
        SnowParams {
            size: c.min_size..c.max_size,
            fall_secs: c.min_fall_secs..c.max_fall_secs,
        }
    }
}

impl Snowflake {
    pub fn random<R: Rng>(rng: &mut R, params: &SnowParams, created_ms: i64) -> Self {
        Snowflake {
            id: SnowflakeId {
                created_ms,
                salt: rng.random(),
            },
            left: rng.random_range(0.0..100.0),
            size: rng.random_range(params.size.clone()),
            fall: Duration::from_secs_f32(rng.random_range(params.fall_secs.clone())),
        }
    }
}

/// Spawn one flake per `every` and report each one's melt when its fall
/// duration elapses.
///
/// Pending melts live in a `DelayQueue` owned by this task, so cancelling the
/// task also drops every scheduled removal.
pub async fn run(params: SnowParams, every: Duration, tx: mpsc::Sender<PageEvent>) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
    let mut melts: DelayQueue<SnowflakeId> = DelayQueue::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let created_ms = chrono::Utc::now().timestamp_millis();
                let flake = Snowflake::random(&mut rand::rng(), &params, created_ms);
                melts.insert(flake.id, flake.fall);
                if tx.send(PageEvent::SnowflakeSpawned(flake)).await.is_err() {
                    break;
                }
            }
            Some(expired) = melts.next() => {
                if tx.send(PageEvent::SnowflakeMelted(expired.into_inner())).await.is_err() {
                    break;
                }
            }
        }
    }
    debug!("Snowfall stopped with {} flakes pending", melts.len());
}
