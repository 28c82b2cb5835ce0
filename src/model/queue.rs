//! Shared track queue
//!
//! The daemon is the only consumer (pop from the front); the queue builder
//! and the manual enqueue path append at the back. The mutex exists because
//! the callback/manual path can run concurrently with the daemon loop; all
//! mutation still happens one lock holder at a time, so FIFO order holds.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::TrackRef;

/// Cloneable handle to the process-lifetime FIFO of queued tracks.
///
/// Append-back and pop-front are the only mutations. Duplicates are
/// allowed; no dedup check is performed.
#[derive(Clone, Default)]
pub struct TrackQueue {
    inner: Arc<Mutex<VecDeque<TrackRef>>>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track at the back of the queue.
    pub async fn push(&self, track: TrackRef) {
        let mut queue = self.inner.lock().await;
        queue.push_back(track);
        tracing::debug!(depth = queue.len(), "track enqueued");
    }

    /// Remove and return the front track, or `None` when empty.
    pub async fn pop(&self) -> Option<TrackRef> {
        self.inner.lock().await.pop_front()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_queue_is_empty() {
        let queue = TrackQueue::new();
        assert!(queue.is_empty().await);
        assert_eq!(queue.len().await, 0);
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn pop_order_matches_push_order() {
        let queue = TrackQueue::new();
        queue.push(TrackRef::new("a")).await;
        queue.push(TrackRef::new("b")).await;
        queue.push(TrackRef::new("c")).await;

        assert_eq!(queue.pop().await, Some(TrackRef::new("a")));
        assert_eq!(queue.pop().await, Some(TrackRef::new("b")));
        assert_eq!(queue.pop().await, Some(TrackRef::new("c")));
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn duplicates_are_allowed() {
        let queue = TrackQueue::new();
        queue.push(TrackRef::new("a")).await;
        queue.push(TrackRef::new("a")).await;

        assert_eq!(queue.len().await, 2);
        assert_eq!(queue.pop().await, Some(TrackRef::new("a")));
        assert_eq!(queue.pop().await, Some(TrackRef::new("a")));
    }

    #[tokio::test]
    async fn clones_share_the_same_queue() {
        let queue = TrackQueue::new();
        let writer = queue.clone();

        writer.push(TrackRef::new("a")).await;
        assert_eq!(queue.pop().await, Some(TrackRef::new("a")));
    }
}
