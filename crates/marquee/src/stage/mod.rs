pub mod board;
pub mod model;
pub mod view;

pub use board::{BoardEntry, SnapshotBoard};
pub use model::Stage;

use crate::events::AppEvent;
use async_channel::Receiver;
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;

/// Monotonic millisecond clock shared by every controller on the stage.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn instant_at(&self, ms: u64) -> Instant {
        self.epoch + Duration::from_millis(ms)
    }
}

async fn sleep_until_deadline(clock: Clock, deadline: Option<u64>) {
    match deadline {
        Some(ms) => tokio::time::sleep_until(clock.instant_at(ms)).await,
        None => std::future::pending().await,
    }
}

/// Drives the stage until shutdown: events and deadlines are handled one at a
/// time on the calling task. Returns the output sink.
pub async fn run<W: Write>(mut stage: Stage, rx: Receiver<AppEvent>, clock: Clock, mut out: W) -> W {
    if let Err(e) = stage.render_pending(clock.now_ms(), &mut out) {
        log::error!("Render error: {}", e);
    }

    loop {
        let deadline = stage.next_deadline();
        tokio::select! {
            event = rx.recv() => match event {
                Ok(AppEvent::Shutdown) | Err(_) => break,
                Ok(event) => stage.handle(event, clock.now_ms()),
            },
            _ = sleep_until_deadline(clock, deadline) => {
                stage.advance(clock.now_ms());
            }
        }

        if let Err(e) = stage.render_pending(clock.now_ms(), &mut out) {
            log::error!("Render error: {}", e);
        }
    }

    stage.dispose_all();
    log::info!("Stage stopped");
    out
}
