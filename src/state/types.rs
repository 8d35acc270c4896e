//! Playback state type definitions
//!
//! Defines the shared playback record and the partial update merged into it.

use serde::{Deserialize, Deserializer, Serialize};

/// The shared playback record every client reads and writes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Playback cursor position in seconds
    pub current_time: f64,
    /// Transport status
    pub is_playing: bool,
    /// Total media length in seconds (0 when unknown)
    pub duration: f64,
    /// Identifier or URI of the active video (empty when none is selected)
    pub video_path: String,
}

/// Partial update submitted by a client
///
/// Each field is tri-state:
/// - `None`: key absent, the stored field is left alone
/// - `Some(None)`: key present with `null`, the stored field is reset to its default
/// - `Some(Some(v))`: key present with a value, the stored field becomes `v`
///
/// Keys outside the four recognised fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackUpdate {
    #[serde(default, deserialize_with = "present")]
    pub current_time: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub is_playing: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    pub duration: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub video_path: Option<Option<String>>,
}

impl PlaybackUpdate {
    /// True when the update touches no field
    pub fn is_empty(&self) -> bool {
        self.current_time.is_none()
            && self.is_playing.is_none()
            && self.duration.is_none()
            && self.video_path.is_none()
    }

    /// Set the playback position
    pub fn with_current_time(mut self, seconds: f64) -> Self {
        self.current_time = Some(Some(seconds));
        self
    }

    /// Set the transport status
    pub fn with_playing(mut self, playing: bool) -> Self {
        self.is_playing = Some(Some(playing));
        self
    }

    /// Set the media duration
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(Some(seconds));
        self
    }

    /// Set the active video
    pub fn with_video_path(mut self, path: impl Into<String>) -> Self {
        self.video_path = Some(Some(path.into()));
        self
    }
}

/// Marks a key as present, so `null` and a missing key stay distinguishable.
/// Serde only calls this when the key exists; `#[serde(default)]` covers absence.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
