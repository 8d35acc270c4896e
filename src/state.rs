//! State management module - the shared playback record
//!
//! Holds the one playback state every client of the session reads and
//! writes, and the field-wise merge applied when a client submits a change.

mod store;
mod types;

pub use store::SyncStore;
pub use types::{PlaybackState, PlaybackUpdate};
