//! Queue daemon: the drain/refill state machine
//!
//! One perpetual loop drives all polling. At most one track is in flight at
//! any time; the fixed poll interval is the only scheduling primitive. The
//! loop never exits on a remote failure, it logs and moves to the next
//! iteration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::model::{TrackQueue, TrackRef};
use crate::services::{CatalogSearch, PlaybackControl, RecommendationSource};

use super::QueueBuilder;

/// Sleep dependency, injected so tests can simulate time without real
/// delays.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn pause(&self, interval: Duration);
}

/// Production clock backed by the tokio timer.
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn pause(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// Daemon pacing knobs.
#[derive(Clone, Copy, Debug)]
pub struct DaemonConfig {
    /// Interval between loop iterations and between finish-wait polls.
    pub poll_interval: Duration,
    /// Optional cap on finish-wait polls per track. `None` keeps the wait
    /// unbounded: a device that never reports stopped stalls the daemon on
    /// that one track.
    pub finish_poll_limit: Option<u32>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            finish_poll_limit: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DaemonState {
    ColdStart,
    Draining,
    Refilling,
    IdleWaiting,
}

/// Owns the shared queue and the cold-start / drain / refill cycle.
///
/// Until the queue has been observed non-empty once, empty-queue refills
/// are suppressed so startup enqueues get their chance to populate it.
pub struct QueueDaemon<P, R, S> {
    queue: TrackQueue,
    playback: P,
    recommendations: R,
    builder: QueueBuilder<S>,
    clock: Arc<dyn Clock>,
    config: DaemonConfig,
    state: DaemonState,
    cold_start: bool,
}

impl<P, R, S> QueueDaemon<P, R, S>
where
    P: PlaybackControl,
    R: RecommendationSource,
    S: CatalogSearch,
{
    pub fn new(
        queue: TrackQueue,
        playback: P,
        recommendations: R,
        builder: QueueBuilder<S>,
        clock: Arc<dyn Clock>,
        config: DaemonConfig,
    ) -> Self {
        Self {
            queue,
            playback,
            recommendations,
            builder,
            clock,
            config,
            state: DaemonState::ColdStart,
            cold_start: true,
        }
    }

    /// Run the loop for the lifetime of the process. Never returns on its
    /// own; external termination is the only stop mechanism.
    pub async fn run(mut self) {
        tracing::info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            finish_poll_limit = ?self.config.finish_poll_limit,
            "Queue daemon started"
        );

        loop {
            self.tick().await;
            self.clock.pause(self.config.poll_interval).await;
        }
    }

    /// One loop iteration: drain one track, or refill, or hold cold start.
    async fn tick(&mut self) {
        match self.queue.pop().await {
            Some(track) => {
                self.cold_start = false;
                self.set_state(DaemonState::Draining);
                self.drain(track).await;
            }
            None if self.cold_start => {
                tracing::trace!("Queue empty before first drain, refill suppressed");
            }
            None => {
                self.set_state(DaemonState::Refilling);
                self.refill().await;
            }
        }

        self.set_state(if self.cold_start {
            DaemonState::ColdStart
        } else {
            DaemonState::IdleWaiting
        });
    }

    async fn drain(&mut self, track: TrackRef) {
        match self.playback.start_playback(&track).await {
            Ok(()) => {
                tracing::info!(%track, "Playback started");
                self.wait_until_stopped(&track).await;
                tracing::info!(%track, "Track drained");
            }
            Err(e) => {
                // The track is dropped, not requeued and not retried.
                tracing::warn!(%track, error = %e, "Play command failed, dropping track");
            }
        }
    }

    /// Poll the device every interval until it reports stopped.
    async fn wait_until_stopped(&self, track: &TrackRef) {
        let mut polls: u32 = 0;
        loop {
            self.clock.pause(self.config.poll_interval).await;
            polls += 1;

            match self.playback.playback_state().await {
                Ok(state) if !state.is_playing => return,
                Ok(_) => {}
                Err(e) => {
                    // An unreadable snapshot is not "stopped"; keep polling.
                    tracing::warn!(%track, error = %e, "Playback state poll failed");
                }
            }

            if let Some(limit) = self.config.finish_poll_limit {
                if polls >= limit {
                    tracing::warn!(%track, polls, "Gave up waiting for track to finish");
                    return;
                }
            }
        }
    }

    async fn refill(&mut self) {
        match self.recommendations.fetch_batch().await {
            Ok(items) => {
                let batch_size = items.len();
                let report = self
                    .builder
                    .build_from_recommendations(items, &self.queue)
                    .await;
                tracing::info!(
                    batch_size,
                    enqueued = report.enqueued,
                    skipped = report.skipped,
                    queue_depth = self.queue.len().await,
                    "Queue refilled"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation fetch failed, queue stays empty");
            }
        }
    }

    fn set_state(&mut self, next: DaemonState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "Daemon state change");
            self.state = next;
        }
    }
}
