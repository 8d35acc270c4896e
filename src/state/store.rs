//! SyncStore - the single playback record shared by all clients
//!
//! Holds the authoritative PlaybackState and applies partial updates to it.
//! Every merge runs under one write guard, so a reader never sees an update
//! applied to some fields but not others.

use super::types::{PlaybackState, PlaybackUpdate};
use parking_lot::RwLock;
use std::sync::Arc;

/// Owns the shared playback record
///
/// Cloning shares the same record; create a new store for an independent one.
#[derive(Clone, Default)]
pub struct SyncStore {
    state: Arc<RwLock<PlaybackState>>,
}

impl SyncStore {
    /// Create a store holding the default record
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record, verbatim
    pub fn get(&self) -> PlaybackState {
        self.state.read().clone()
    }

    /// Apply a partial update and return the full resulting record
    ///
    /// Present fields replace the stored ones (last write wins), absent fields
    /// are untouched, `null` resets a field to its default. Values are not
    /// checked here; callers validate at their boundary.
    pub fn merge(&self, update: PlaybackUpdate) -> PlaybackState {
        let mut state = self.state.write();

        if let Some(current_time) = update.current_time {
            state.current_time = current_time.unwrap_or_default();
        }
        if let Some(is_playing) = update.is_playing {
            state.is_playing = is_playing.unwrap_or_default();
        }
        if let Some(duration) = update.duration {
            state.duration = duration.unwrap_or_default();
        }
        if let Some(video_path) = update.video_path {
            state.video_path = video_path.unwrap_or_default();
        }

        state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread;

    fn playing_state() -> SyncStore {
        let store = SyncStore::new();
        store.merge(
            PlaybackUpdate::default()
                .with_current_time(10.0)
                .with_playing(true)
                .with_duration(120.0)
                .with_video_path("a.mp4"),
        );
        store
    }

    #[test]
    fn test_new_store_has_default_state() {
        let store = SyncStore::new();
        let state = store.get();

        assert_eq!(state.current_time, 0.0);
        assert!(!state.is_playing);
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.video_path, "");
    }

    #[test]
    fn test_partial_update_preserves_other_fields() {
        let store = playing_state();

        let state = store.merge(PlaybackUpdate::default().with_playing(false));

        assert_eq!(
            state,
            PlaybackState {
                current_time: 10.0,
                is_playing: false,
                duration: 120.0,
                video_path: "a.mp4".to_string(),
            }
        );
        assert_eq!(store.get(), state);
    }

    #[test]
    fn test_zero_value_overwrites() {
        let store = SyncStore::new();
        store.merge(PlaybackUpdate::default().with_current_time(42.0));

        let state = store.merge(PlaybackUpdate::default().with_current_time(0.0));
        assert_eq!(state.current_time, 0.0);

        let state = store.merge(PlaybackUpdate::default().with_video_path(""));
        assert_eq!(state.video_path, "");
    }

    #[test]
    fn test_null_resets_field() {
        let store = playing_state();

        let state = store.merge(PlaybackUpdate {
            video_path: Some(None),
            is_playing: Some(None),
            ..Default::default()
        });

        assert_eq!(state.video_path, "");
        assert!(!state.is_playing);
        assert_eq!(state.current_time, 10.0);
        assert_eq!(state.duration, 120.0);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let store = playing_state();
        let before = store.get();

        let after = store.merge(PlaybackUpdate::default());
        assert_eq!(before, after);
    }

    #[test]
    fn test_merge_does_not_validate() {
        let store = SyncStore::new();
        let state = store.merge(PlaybackUpdate::default().with_current_time(-5.0));
        assert_eq!(state.current_time, -5.0);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SyncStore::new();
        let other = store.clone();

        other.merge(PlaybackUpdate::default().with_playing(true));
        assert!(store.get().is_playing);

        let independent = SyncStore::new();
        assert!(!independent.get().is_playing);
    }

    #[test]
    fn test_concurrent_merges_do_not_lose_updates() {
        for _ in 0..100 {
            let store = SyncStore::new();

            let a = {
                let store = store.clone();
                thread::spawn(move || store.merge(PlaybackUpdate::default().with_current_time(5.0)))
            };
            let b = {
                let store = store.clone();
                thread::spawn(move || store.merge(PlaybackUpdate::default().with_playing(true)))
            };
            a.join().unwrap();
            b.join().unwrap();

            let state = store.get();
            assert_eq!(state.current_time, 5.0);
            assert!(state.is_playing);
        }
    }

    #[test]
    fn test_readers_never_see_torn_writes() {
        let store = SyncStore::new();
        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    let n = f64::from(i);
                    store.merge(
                        PlaybackUpdate::default()
                            .with_current_time(n)
                            .with_duration(n),
                    );
                }
            })
        };

        for _ in 0..1000 {
            let state = store.get();
            assert_eq!(state.current_time, state.duration);
        }
        writer.join().unwrap();
    }

    fn field<T: std::fmt::Debug + Clone>(
        value: impl Strategy<Value = T>,
    ) -> impl Strategy<Value = Option<Option<T>>> {
        proptest::option::of(proptest::option::of(value))
    }

    fn any_update() -> impl Strategy<Value = PlaybackUpdate> {
        (
            field(0.0f64..10_000.0),
            field(any::<bool>()),
            field(0.0f64..10_000.0),
            field("[a-z]{0,8}\\.mp4"),
        )
            .prop_map(|(current_time, is_playing, duration, video_path)| PlaybackUpdate {
                current_time,
                is_playing,
                duration,
                video_path,
            })
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(update in any_update()) {
            let store = playing_state();
            let once = store.merge(update.clone());
            let twice = store.merge(update);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_absent_fields_untouched(update in any_update()) {
            let store = playing_state();
            let before = store.get();
            let after = store.merge(update.clone());

            if update.current_time.is_none() {
                prop_assert_eq!(after.current_time, before.current_time);
            }
            if update.is_playing.is_none() {
                prop_assert_eq!(after.is_playing, before.is_playing);
            }
            if update.duration.is_none() {
                prop_assert_eq!(after.duration, before.duration);
            }
            if update.video_path.is_none() {
                prop_assert_eq!(after.video_path, before.video_path);
            }
        }
    }
}
