//! Manual entry points: seeding, direct enqueue, pause

use crate::error::Result;
use crate::model::{TrackQueue, TrackRef};
use crate::services::{CatalogSearch, PlaybackControl};

use super::TrackResolver;

/// Cloneable front door for everything that is not the daemon loop:
/// seeding the queue before startup and manual control afterwards.
#[derive(Clone)]
pub struct PlayerHandle<S, P> {
    queue: TrackQueue,
    resolver: TrackResolver<S>,
    playback: P,
}

impl<S: CatalogSearch, P: PlaybackControl> PlayerHandle<S, P> {
    pub fn new(queue: TrackQueue, resolver: TrackResolver<S>, playback: P) -> Self {
        Self {
            queue,
            resolver,
            playback,
        }
    }

    /// Append an already-resolved track at the back of the queue.
    pub async fn enqueue_track(&self, track: TrackRef) {
        tracing::info!(%track, "Manual enqueue");
        self.queue.push(track).await;
    }

    /// Resolve free text to the catalog's top match and enqueue it.
    pub async fn search_and_enqueue(&self, search_text: &str) -> Result<TrackRef> {
        let track = self.resolver.resolve(search_text).await?;
        self.queue.push(track.clone()).await;
        tracing::info!(query = search_text, %track, "Resolved and enqueued");
        Ok(track)
    }

    /// Fire-and-forget pause of the remote device.
    pub async fn pause(&self) {
        self.playback.pause_playback().await;
    }
}
