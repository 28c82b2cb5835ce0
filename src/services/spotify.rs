//! Spotify Web API client: catalog search and playback control

use std::sync::Arc;

use async_trait::async_trait;
use rspotify::{
    AuthCodeSpotify,
    model::{Market, PlayableId, SearchType, TrackId},
    prelude::*,
};

use crate::error::{Error, Result};
use crate::model::{PlaybackState, TrackRef};

use super::{CatalogSearch, PlaybackControl};

/// Thin wrapper around an authorized [`AuthCodeSpotify`] client, exposing
/// only the catalog and playback capabilities the core consumes.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyClient {
    pub fn new(client: AuthCodeSpotify) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Resolve the device to target with playback commands.
    ///
    /// Commands go to the currently active Connect device; with no active
    /// device we pass `None` and let the service pick (which surfaces the
    /// usual "no active device" rejection on play).
    async fn active_device_id(&self) -> Option<String> {
        match self.client.device().await {
            Ok(devices) => {
                if let Some(device) = devices.iter().find(|d| d.is_active) {
                    tracing::debug!(device_name = %device.name, device_id = ?device.id, "Found active device");
                    return device.id.clone();
                }
                tracing::debug!(available_devices = devices.len(), "No active device found");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Failed to get devices list");
                None
            }
        }
    }
}

#[async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search_track(&self, query: &str) -> Result<Option<TrackRef>> {
        let market: Option<Market> = None;
        tracing::debug!(query, "API: search");

        let result = self
            .client
            .search(query, SearchType::Track, market, None, Some(1), None)
            .await
            .map_err(|e| Error::transport("spotify", e))?;

        if let rspotify::model::SearchResult::Tracks(page) = result {
            let top = page
                .items
                .into_iter()
                .next()
                .and_then(|track| track.id.map(|id| TrackRef::new(id.id())));
            return Ok(top);
        }

        Ok(None)
    }
}

#[async_trait]
impl PlaybackControl for SpotifyClient {
    async fn start_playback(&self, track: &TrackRef) -> Result<()> {
        let device_id = self.active_device_id().await;
        tracing::debug!(track = %track, device_id = ?device_id, "API: start_playback");

        let id = TrackId::from_id(track.id())
            .map_err(|e| Error::PlaybackRejected(e.to_string()))?;

        self.client
            .start_uris_playback(
                [PlayableId::Track(id)],
                device_id.as_deref(),
                None,
                None,
            )
            .await
            .map_err(|e| Error::PlaybackRejected(e.to_string()))?;
        Ok(())
    }

    async fn playback_state(&self) -> Result<PlaybackState> {
        tracing::trace!("Fetching current playback state");
        let playback = self
            .client
            .current_playback(None, None::<Vec<_>>)
            .await
            .map_err(|e| Error::transport("spotify", e))?;

        // No active playback session reads as stopped, not as an error.
        let is_playing = playback.map(|p| p.is_playing).unwrap_or(false);
        tracing::trace!(is_playing, "Got playback state");
        Ok(PlaybackState { is_playing })
    }

    async fn pause_playback(&self) {
        let device_id = self.active_device_id().await;
        tracing::debug!(device_id = ?device_id, "API: pause_playback");
        if let Err(e) = self.client.pause_playback(device_id.as_deref()).await {
            tracing::warn!(error = %e, "Pause command failed");
        }
    }
}
