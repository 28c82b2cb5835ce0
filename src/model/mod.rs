//! Model module - Core data types and the shared track queue
//!
//! - `types`: track references, recommendation items, playback snapshots
//! - `queue`: the mutex-guarded FIFO consumed by the daemon

mod queue;
mod types;

pub use queue::TrackQueue;
pub use types::{BatchReport, PlaybackState, RecommendationItem, TrackRef};
