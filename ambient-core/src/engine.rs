use async_trait::async_trait;

use crate::SoundError;

/// Trait representing an audio backend able to produce looping, volume controlled
/// handles for asset locators.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    type Handle: SoundHandle;

    /// Constructs a looping handle for `source` at `volume` and loads it.
    ///
    /// Resolves once the handle is ready to play, or with [`SoundError::Load`]
    /// if the asset cannot become playable. Nothing is loaded before this is
    /// called.
    async fn load(&self, source: &str, volume: f64) -> Result<Self::Handle, SoundError>;
}

/// An engine level object playing one specific audio resource.
///
/// Methods take `&self` so the controller can share a handle between its cache
/// and the active slot.
#[async_trait]
pub trait SoundHandle: Send + Sync + 'static {
    /// Starts (or resumes) playback from the current position.
    ///
    /// May fail with [`SoundError::Start`], e.g. when the output device refuses.
    async fn start(&self) -> Result<(), SoundError>;

    /// Pauses playback, keeping the position.
    fn pause(&self);

    /// Seeks back to the beginning.
    fn rewind(&self);

    fn set_volume(&self, volume: f64);

    /// Releases engine resources. The handle is not used afterwards.
    fn release(&self) {}
}
