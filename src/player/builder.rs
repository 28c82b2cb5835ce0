//! Queue builder: recommendation batches into the shared queue

use crate::model::{BatchReport, RecommendationItem, TrackQueue};
use crate::services::CatalogSearch;

use super::TrackResolver;

/// Resolves each recommendation in order and appends the successes to the
/// queue. Per-item failures are expected and skipped; the batch never
/// terminates early, and the aggregate outcome is reported once.
#[derive(Clone)]
pub struct QueueBuilder<S> {
    resolver: TrackResolver<S>,
}

impl<S: CatalogSearch> QueueBuilder<S> {
    pub fn new(resolver: TrackResolver<S>) -> Self {
        Self { resolver }
    }

    pub async fn build_from_recommendations(
        &self,
        items: Vec<RecommendationItem>,
        queue: &TrackQueue,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for item in items {
            let query = item.search_query();
            match self.resolver.resolve(&query).await {
                Ok(track) => {
                    queue.push(track).await;
                    report.enqueued += 1;
                }
                Err(e) => {
                    tracing::debug!(
                        artist = %item.artist,
                        title = %item.title,
                        error = %e,
                        "Skipping unresolvable recommendation"
                    );
                    report.skipped += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::{Error, Result};
    use crate::model::TrackRef;

    use super::*;

    /// Catalog stub that records queries and fails for configured artists.
    #[derive(Clone, Default)]
    struct ScriptedCatalog {
        queries: Arc<Mutex<Vec<String>>>,
        not_found: Vec<String>,
        transport_fail: Vec<String>,
    }

    #[async_trait]
    impl CatalogSearch for ScriptedCatalog {
        async fn search_track(&self, query: &str) -> Result<Option<TrackRef>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.transport_fail.iter().any(|m| query.contains(m)) {
                return Err(Error::transport("spotify", "503"));
            }
            if self.not_found.iter().any(|m| query.contains(m)) {
                return Ok(None);
            }
            Ok(Some(TrackRef::new(format!("id:{query}"))))
        }
    }

    fn builder(catalog: ScriptedCatalog) -> QueueBuilder<ScriptedCatalog> {
        QueueBuilder::new(TrackResolver::new(catalog))
    }

    fn batch(pairs: &[(&str, &str)]) -> Vec<RecommendationItem> {
        pairs
            .iter()
            .map(|(artist, title)| RecommendationItem::new(*artist, *title))
            .collect()
    }

    #[tokio::test]
    async fn full_batch_is_enqueued_in_order() {
        let queue = TrackQueue::new();
        let report = builder(ScriptedCatalog::default())
            .build_from_recommendations(
                batch(&[("Artist1", "Song1"), ("Artist2", "Song2")]),
                &queue,
            )
            .await;

        assert_eq!(report, BatchReport { enqueued: 2, skipped: 0 });
        assert_eq!(queue.pop().await, Some(TrackRef::new("id:Artist1 Song1")));
        assert_eq!(queue.pop().await, Some(TrackRef::new("id:Artist2 Song2")));
    }

    #[tokio::test]
    async fn unresolvable_items_are_skipped_not_fatal() {
        let catalog = ScriptedCatalog {
            not_found: vec!["Artist2".to_string()],
            ..Default::default()
        };

        let queue = TrackQueue::new();
        let report = builder(catalog)
            .build_from_recommendations(
                batch(&[("Artist1", "Song1"), ("Artist2", "Song2")]),
                &queue,
            )
            .await;

        assert_eq!(report, BatchReport { enqueued: 1, skipped: 1 });
        assert_eq!(queue.pop().await, Some(TrackRef::new("id:Artist1 Song1")));
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn successes_keep_relative_order_around_failures() {
        let catalog = ScriptedCatalog {
            not_found: vec!["B".to_string()],
            transport_fail: vec!["D".to_string()],
            ..Default::default()
        };

        let queue = TrackQueue::new();
        let report = builder(catalog)
            .build_from_recommendations(
                batch(&[("A", "s"), ("B", "s"), ("C", "s"), ("D", "s"), ("E", "s")]),
                &queue,
            )
            .await;

        assert_eq!(report, BatchReport { enqueued: 3, skipped: 2 });
        assert_eq!(queue.pop().await, Some(TrackRef::new("id:A s")));
        assert_eq!(queue.pop().await, Some(TrackRef::new("id:C s")));
        assert_eq!(queue.pop().await, Some(TrackRef::new("id:E s")));
    }

    #[tokio::test]
    async fn queries_are_artist_space_title() {
        let catalog = ScriptedCatalog::default();
        let queries = catalog.queries.clone();
        let queue = TrackQueue::new();

        builder(catalog)
            .build_from_recommendations(batch(&[("Artist1", "Song1")]), &queue)
            .await;

        assert_eq!(*queries.lock().unwrap(), vec!["Artist1 Song1".to_string()]);
    }
}
