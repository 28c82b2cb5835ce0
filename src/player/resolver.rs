//! Track resolver: free-text search terms to a single track reference

use crate::error::{Error, Result};
use crate::model::TrackRef;
use crate::services::CatalogSearch;

/// Resolves free-text queries to the catalog's top-match track.
///
/// Selection is deterministic: the first returned result wins, no ranking
/// beyond what the catalog already applied. Both failure modes (`no match`,
/// transport) are recoverable by callers.
#[derive(Clone)]
pub struct TrackResolver<S> {
    catalog: S,
}

impl<S: CatalogSearch> TrackResolver<S> {
    pub fn new(catalog: S) -> Self {
        Self { catalog }
    }

    pub async fn resolve(&self, search_text: &str) -> Result<TrackRef> {
        match self.catalog.search_track(search_text).await? {
            Some(track) => {
                tracing::debug!(query = search_text, track = %track, "Resolved track");
                Ok(track)
            }
            None => Err(Error::TrackNotFound(search_text.to_string())),
        }
    }
}
