//! Services module - Remote capability traits and their concrete clients
//!
//! The core consumes the two remote services through narrow port traits so
//! the daemon, builder, and resolver can be exercised against mocks.
//! Production implementations:
//!
//! - `spotify`: catalog search and playback control over the Web API
//! - `deezer`: the recommendation flow feed

mod deezer;
mod spotify;

pub use deezer::FlowClient;
pub use spotify::SpotifyClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{PlaybackState, RecommendationItem, TrackRef};

/// Remote catalog search capability.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Search the catalog for `query` and return the top match, or `None`
    /// when the catalog has nothing for it.
    async fn search_track(&self, query: &str) -> Result<Option<TrackRef>>;
}

/// Remote playback device capability.
#[async_trait]
pub trait PlaybackControl: Send + Sync {
    /// Start playing `track` now, replacing whatever the device is doing.
    async fn start_playback(&self, track: &TrackRef) -> Result<()>;

    /// Fetch the current playback snapshot. An absent remote session maps
    /// to a stopped snapshot, not an error.
    async fn playback_state(&self) -> Result<PlaybackState>;

    /// Fire-and-forget pause. Failures are logged, never surfaced.
    async fn pause_playback(&self);
}

/// Remote recommendation feed capability.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Fetch one ordered batch of recommendations for the configured
    /// listener.
    async fn fetch_batch(&self) -> Result<Vec<RecommendationItem>>;
}
