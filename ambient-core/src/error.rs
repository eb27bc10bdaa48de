use thiserror::Error;

/// Failures reported by an [`AudioEngine`](crate::AudioEngine) or its handles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoundError {
    /// The asset never became playable (missing file, bad format, I/O).
    #[error("failed to load {locator}: {reason}")]
    Load { locator: String, reason: String },

    /// The engine refused to start playback.
    #[error("failed to start playback: {reason}")]
    Start { reason: String },
}

impl SoundError {
    pub fn load(locator: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }

    pub fn start(reason: impl ToString) -> Self {
        Self::Start {
            reason: reason.to_string(),
        }
    }
}

/// Errors returned by the id-based controller entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("unknown sound id: {0}")]
    UnknownSound(String),
}
