use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ambient_core::{AudioEngine, SoundError, SoundHandle};
use async_trait::async_trait;
use color_eyre::eyre::Result;
use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::tween::Tween;
use tracing::{debug, warn};

type SharedManager = Arc<Mutex<AudioManager<DefaultBackend>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Plays sounds through the default output device, decoding whole files into memory.
pub struct KiraEngine {
    manager: SharedManager,
    asset_root: PathBuf,
}

impl KiraEngine {
    pub fn new(asset_root: impl Into<PathBuf>) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager: Arc::new(Mutex::new(manager)),
            asset_root: asset_root.into(),
        })
    }

    /// Maps a site-relative locator onto the asset directory.
    pub fn resolve(&self, source: &str) -> PathBuf {
        resolve(&self.asset_root, source)
    }
}

fn resolve(root: &Path, source: &str) -> PathBuf {
    root.join(source.trim_start_matches('/'))
}

#[async_trait]
impl AudioEngine for KiraEngine {
    type Handle = KiraHandle;

    async fn load(&self, source: &str, volume: f64) -> Result<KiraHandle, SoundError> {
        let path = self.resolve(source);
        if !path.exists() {
            return Err(SoundError::load(source, format!("{path:?} not found")));
        }

        debug!("decoding {:?}", path);
        let settings = StaticSoundSettings::new().loop_region(0.0..).volume(volume);
        let data = tokio::task::spawn_blocking(move || StaticSoundData::from_file(path, settings))
            .await
            .map_err(|e| SoundError::load(source, e))?
            .map_err(|e| SoundError::load(source, e))?;

        Ok(KiraHandle {
            data,
            manager: self.manager.clone(),
            playing: Mutex::new(None),
            volume: Mutex::new(volume),
        })
    }
}

/// A decoded sound. The kira handle only exists once playback was started.
pub struct KiraHandle {
    data: StaticSoundData,
    manager: SharedManager,
    playing: Mutex<Option<StaticSoundHandle>>,
    volume: Mutex<f64>,
}

#[async_trait]
impl SoundHandle for KiraHandle {
    async fn start(&self) -> Result<(), SoundError> {
        let mut playing = lock(&self.playing);
        if let Some(handle) = playing.as_mut() {
            return handle.resume(Tween::default()).map_err(SoundError::start);
        }

        let volume = *lock(&self.volume);
        let data = self.data.with_modified_settings(|s| s.volume(volume));
        let handle = lock(&self.manager).play(data).map_err(SoundError::start)?;
        playing.replace(handle);
        Ok(())
    }

    fn pause(&self) {
        if let Some(handle) = lock(&self.playing).as_mut() {
            if let Err(e) = handle.pause(Tween::default()) {
                warn!("failed to pause sound: {e}");
            }
        }
    }

    fn rewind(&self) {
        if let Some(handle) = lock(&self.playing).as_mut() {
            if let Err(e) = handle.seek_to(0.0) {
                warn!("failed to rewind sound: {e}");
            }
        }
    }

    fn set_volume(&self, volume: f64) {
        *lock(&self.volume) = volume;
        if let Some(handle) = lock(&self.playing).as_mut() {
            if let Err(e) = handle.set_volume(volume, Tween::default()) {
                warn!("failed to set volume: {e}");
            }
        }
    }

    fn release(&self) {
        if let Some(mut handle) = lock(&self.playing).take() {
            if let Err(e) = handle.stop(Tween::default()) {
                warn!("failed to stop sound: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn locators_resolve_under_asset_root() {
        assert_eq!(
            resolve(Path::new("./public"), "/sounds/ambients/rain.mp3"),
            PathBuf::from("./public/sounds/ambients/rain.mp3")
        );
        assert_eq!(
            resolve(Path::new("/srv"), "sounds/a.mp3"),
            PathBuf::from("/srv/sounds/a.mp3")
        );
    }
}
