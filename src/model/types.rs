//! Core type definitions for the agent

use std::fmt;

/// Opaque identifier for a playable track, as understood by the remote
/// playback service. No internal structure is assumed beyond "the playback
/// service accepts it back".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackRef(String);

impl TrackRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An {artist, title} pair suggested by the recommendation service, not yet
/// resolved to a [`TrackRef`]. Transient: produced by a batch fetch,
/// consumed by the resolver, then discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationItem {
    pub artist: String,
    pub title: String,
}

impl RecommendationItem {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// The free-text query handed to the resolver for this item.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.artist, self.title)
    }
}

/// Snapshot of the remote device's playback state, fetched on demand and
/// never cached beyond a single poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
}

/// Outcome of one queue-builder pass over a recommendation batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Items resolved and appended to the queue.
    pub enqueued: usize,
    /// Items dropped because resolution failed.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_is_artist_then_title() {
        let item = RecommendationItem::new("Daft Punk", "Veridis Quo");
        assert_eq!(item.search_query(), "Daft Punk Veridis Quo");
    }

    #[test]
    fn track_ref_displays_raw_id() {
        let track = TrackRef::new("4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(track.to_string(), "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(track.id(), "4uLU6hMCjMI75M1A2tKUQC");
    }
}
