use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Observable playback state, published after every controller mutation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PlaybackSnapshot {
    pub current_sound_id: Option<&'static str>,
    pub is_playing: bool,
    pub volume: f64,
    /// Sounds currently being acquired and started.
    pub loading: BTreeSet<&'static str>,
    /// Sounds whose handle has loaded at least once.
    pub ready: BTreeSet<&'static str>,
    /// The sound most recently passed to `play`.
    pub latest_request: Option<&'static str>,
}

impl PlaybackSnapshot {
    pub fn idle(volume: f64) -> Self {
        Self {
            current_sound_id: None,
            is_playing: false,
            volume,
            loading: BTreeSet::new(),
            ready: BTreeSet::new(),
            latest_request: None,
        }
    }

    /// `Loading` names the most recent request while it is still loading,
    /// falling back to the first loading id in order.
    pub fn phase(&self) -> PlaybackPhase {
        match (self.is_playing, self.current_sound_id) {
            (true, Some(id)) => PlaybackPhase::Playing(id),
            _ => {
                let loading = self
                    .latest_request
                    .filter(|id| self.loading.contains(id))
                    .or_else(|| self.loading.iter().next().copied());
                match loading {
                    Some(id) => PlaybackPhase::Loading(id),
                    None => PlaybackPhase::Idle,
                }
            }
        }
    }
}

/// Controller wide state. Playing is exclusive to one sound; loading is tracked
/// per sound, so a sound can load while another plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Loading(&'static str),
    Playing(&'static str),
}
