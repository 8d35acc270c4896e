//! Watch Sync - shared playback state for synchronized video viewing
//!
//! One process holds one playback record (position, play/pause, duration,
//! active video). Clients poll it and push partial updates over HTTP.

pub mod api;
pub mod config;
pub mod state;
