use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    load_volume, AudioEngine, Catalog, ControllerError, PlaybackPhase, PlaybackSnapshot,
    PreferenceStore, SoundCategory, SoundDescriptor, SoundError, SoundHandle, VOLUME_KEY,
};

struct Inner<H> {
    cache: HashMap<&'static str, Arc<H>>,
    active: Option<(&'static str, Arc<H>)>,
    current_sound_id: Option<&'static str>,
    is_playing: bool,
    /// In-flight `play` calls per sound.
    loading: HashMap<&'static str, usize>,
    ready: BTreeSet<&'static str>,
    latest_request: Option<&'static str>,
    volume: f64,
    /// Bumped by every `play` and `stop`; a `play` whose token is no longer
    /// current must not touch the active slot.
    generation: u64,
}

impl<H: SoundHandle> Inner<H> {
    fn stop_active(&mut self) {
        if let Some((id, handle)) = self.active.take() {
            debug!("stopping {id}");
            handle.pause();
            handle.rewind();
        }
        self.is_playing = false;
        self.current_sound_id = None;
    }

    fn finish_loading(&mut self, id: &'static str) {
        if let Some(count) = self.loading.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.loading.remove(id);
            }
        }
    }

    fn is_active(&self, handle: &Arc<H>) -> bool {
        self.active
            .as_ref()
            .is_some_and(|(_, active)| Arc::ptr_eq(active, handle))
    }

    /// Pauses `handle` unless it is active or another request for `id` is
    /// still in flight and will claim it.
    fn silence_orphan(&self, id: &'static str, handle: &Arc<H>) {
        let claimed = self.loading.get(id).copied().unwrap_or(0) > 1;
        if !self.is_active(handle) && !claimed {
            handle.pause();
            handle.rewind();
        }
    }

    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_sound_id: self.current_sound_id,
            is_playing: self.is_playing,
            volume: self.volume,
            loading: self.loading.keys().copied().collect(),
            ready: self.ready.clone(),
            latest_request: self.latest_request,
        }
    }
}

/// Plays at most one looping ambient sound at a time.
///
/// Handles are created through the [`AudioEngine`] on the first request for a
/// sound and cached until [`teardown`](Self::teardown). The volume is read from
/// the [`PreferenceStore`] once at construction and written back on every
/// [`set_volume`](Self::set_volume).
pub struct AmbientSoundController<E: AudioEngine, S: PreferenceStore> {
    catalog: Catalog,
    engine: E,
    store: S,
    inner: Mutex<Inner<E::Handle>>,
    updates: watch::Sender<PlaybackSnapshot>,
}

impl<E: AudioEngine, S: PreferenceStore> AmbientSoundController<E, S> {
    pub fn new(engine: E, store: S) -> Self {
        Self::with_catalog(Catalog::default(), engine, store)
    }

    pub fn with_catalog(catalog: Catalog, engine: E, store: S) -> Self {
        let volume = load_volume(&store);
        debug!("initial ambient volume {volume}");
        let (updates, _) = watch::channel(PlaybackSnapshot::idle(volume));

        Self {
            catalog,
            engine,
            store,
            inner: Mutex::new(Inner {
                cache: HashMap::new(),
                active: None,
                current_sound_id: None,
                is_playing: false,
                loading: HashMap::new(),
                ready: BTreeSet::new(),
                latest_request: None,
                volume,
                generation: 0,
            }),
            updates,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<E::Handle>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = self.lock().snapshot();
        self.updates.send_replace(snapshot);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list_sounds(&self) -> &'static [SoundDescriptor] {
        self.catalog.sounds()
    }

    pub fn list_categories(&self) -> &'static [SoundCategory] {
        self.catalog.categories()
    }

    /// Stops whatever is playing and starts `sound` from the beginning.
    ///
    /// Failures are logged and leave the controller idle; they are never
    /// returned. If another `play` or `stop` is issued while this one is still
    /// loading or starting, this call leaves the state to the newer request.
    pub async fn play(&self, sound: &SoundDescriptor) {
        let (token, cached, volume) = {
            let mut inner = self.lock();
            inner.generation += 1;
            *inner.loading.entry(sound.id).or_insert(0) += 1;
            inner.latest_request = Some(sound.id);
            inner.stop_active();

            let cached = inner.cache.get(sound.id).cloned();
            if let Some(handle) = &cached {
                handle.rewind();
                handle.set_volume(inner.volume);
            }
            (inner.generation, cached, inner.volume)
        };
        self.publish();

        match self.acquire_and_start(sound, token, cached, volume).await {
            Ok(true) => info!("playing {}", sound.id),
            Ok(false) => debug!("play of {} superseded by a newer request", sound.id),
            Err(e) => {
                error!("error playing ambient sound {}: {}", sound.id, e);
                let mut inner = self.lock();
                if inner.generation == token {
                    inner.is_playing = false;
                    inner.current_sound_id = None;
                }
            }
        }

        self.lock().finish_loading(sound.id);
        self.publish();
    }

    /// Returns `Ok(false)` when the request was superseded before it could
    /// claim the active slot.
    async fn acquire_and_start(
        &self,
        sound: &SoundDescriptor,
        token: u64,
        cached: Option<Arc<E::Handle>>,
        volume: f64,
    ) -> Result<bool, SoundError> {
        let handle = match cached {
            Some(handle) => handle,
            None => {
                debug!("loading {} from {}", sound.id, sound.source);
                let loaded = Arc::new(self.engine.load(sound.source, volume).await?);

                let mut inner = self.lock();
                inner.ready.insert(sound.id);
                let existing = inner.cache.get(sound.id).cloned();
                let handle = match existing {
                    Some(existing) => {
                        // loaded concurrently by another request; keep the first
                        loaded.release();
                        existing
                    }
                    None => {
                        inner.cache.insert(sound.id, loaded.clone());
                        loaded
                    }
                };
                if inner.generation != token {
                    return Ok(false);
                }
                handle.rewind();
                handle.set_volume(inner.volume);
                handle
            }
        };
        self.publish();

        if let Err(e) = handle.start().await {
            // an overlapping request may have started this shared handle
            self.lock().silence_orphan(sound.id, &handle);
            return Err(e);
        }

        let mut inner = self.lock();
        if inner.generation != token {
            inner.silence_orphan(sound.id, &handle);
            return Ok(false);
        }
        inner.active = Some((sound.id, handle));
        inner.current_sound_id = Some(sound.id);
        inner.is_playing = true;
        Ok(true)
    }

    /// Plays the catalog sound with the given id.
    pub async fn play_id(&self, id: &str) -> Result<(), ControllerError> {
        let sound = self
            .catalog
            .find(id)
            .ok_or_else(|| ControllerError::UnknownSound(id.to_owned()))?;
        self.play(sound).await;
        Ok(())
    }

    /// Pauses and rewinds the active sound, if any. Safe to call when idle.
    pub fn stop(&self) {
        {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.stop_active();
        }
        self.publish();
    }

    /// Stops `sound` if it is the one playing, otherwise plays it.
    pub async fn toggle(&self, sound: &SoundDescriptor) {
        let playing_this = {
            let inner = self.lock();
            inner.is_playing && inner.current_sound_id == Some(sound.id)
        };
        if playing_this {
            self.stop();
        } else {
            self.play(sound).await;
        }
    }

    pub async fn toggle_id(&self, id: &str) -> Result<(), ControllerError> {
        let sound = self
            .catalog
            .find(id)
            .ok_or_else(|| ControllerError::UnknownSound(id.to_owned()))?;
        self.toggle(sound).await;
        Ok(())
    }

    /// Sets and persists the volume, applying it to every cached handle.
    ///
    /// Levels are clamped to `0.0..=1.0`; NaN is ignored.
    pub fn set_volume(&self, level: f64) {
        if level.is_nan() {
            warn!("ignoring NaN ambient volume");
            return;
        }
        let level = level.clamp(0.0, 1.0);

        {
            let mut inner = self.lock();
            inner.volume = level;
            if let Some((_, handle)) = &inner.active {
                handle.set_volume(level);
            }
            for handle in inner.cache.values() {
                handle.set_volume(level);
            }
        }

        if let Err(e) = self.store.set(VOLUME_KEY, &level.to_string()) {
            warn!("failed to persist ambient volume: {e}");
        }
        self.publish();
    }

    pub fn volume(&self) -> f64 {
        self.lock().volume
    }

    pub fn is_playing(&self) -> bool {
        self.lock().is_playing
    }

    pub fn current_sound_id(&self) -> Option<&'static str> {
        self.lock().current_sound_id
    }

    pub fn current_sound(&self) -> Option<&'static SoundDescriptor> {
        self.current_sound_id().and_then(|id| self.catalog.find(id))
    }

    /// Whether `id` has a handle that loaded successfully.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.lock().ready.contains(id)
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.lock().loading.contains_key(id)
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.snapshot().phase()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.lock().snapshot()
    }

    /// Receives a fresh [`PlaybackSnapshot`] after every state change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.updates.subscribe()
    }

    /// Stops playback and releases every cached handle.
    ///
    /// The controller stays usable; later requests load their handles again.
    pub fn teardown(&self) {
        let handles: Vec<_> = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.stop_active();
            inner.ready.clear();
            inner.cache.drain().map(|(_, handle)| handle).collect()
        };
        if !handles.is_empty() {
            debug!("releasing {} cached handles", handles.len());
        }
        for handle in handles {
            handle.release();
        }
        self.publish();
    }
}

impl<E: AudioEngine, S: PreferenceStore> Drop for AmbientSoundController<E, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
