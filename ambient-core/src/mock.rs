//! In-memory [`AudioEngine`] recording what the controller asks of it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::{AudioEngine, SoundError, SoundHandle};

#[derive(Debug, Default)]
struct HandleState {
    looping: bool,
    playing: bool,
    released: bool,
    volume: f64,
    rewinds: usize,
}

#[derive(Default)]
struct Shared {
    handles: Mutex<Vec<(String, Arc<Mutex<HandleState>>)>>,
    failing_loads: Mutex<HashSet<String>>,
    failing_starts: Mutex<HashSet<String>>,
    load_gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    start_gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Shared {
    async fn pass(gates: &Mutex<HashMap<String, Arc<Semaphore>>>, source: &str) {
        let gate = gates.lock().unwrap().get(source).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    fn states(&self, source: &str) -> Vec<Arc<Mutex<HandleState>>> {
        self.handles
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == source)
            .map(|(_, state)| state.clone())
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MockEngine {
    shared: Arc<Shared>,
}

impl MockEngine {
    pub fn fail_load(&self, source: &str) {
        self.shared.failing_loads.lock().unwrap().insert(source.to_owned());
    }

    pub fn fail_start(&self, source: &str) {
        self.shared.failing_starts.lock().unwrap().insert(source.to_owned());
    }

    /// Blocks loads of `source` until [`release_load`](Self::release_load).
    pub fn hold_load(&self, source: &str) {
        self.shared
            .load_gates
            .lock()
            .unwrap()
            .insert(source.to_owned(), Arc::new(Semaphore::new(0)));
    }

    pub fn release_load(&self, source: &str) {
        self.shared.load_gates.lock().unwrap()[source].add_permits(1);
    }

    pub fn hold_start(&self, source: &str) {
        self.shared
            .start_gates
            .lock()
            .unwrap()
            .insert(source.to_owned(), Arc::new(Semaphore::new(0)));
    }

    pub fn release_start(&self, source: &str) {
        self.shared.start_gates.lock().unwrap()[source].add_permits(1);
    }

    pub fn loads(&self, source: &str) -> usize {
        self.shared.states(source).len()
    }

    pub fn total_loads(&self) -> usize {
        self.shared.handles.lock().unwrap().len()
    }

    pub fn released(&self, source: &str) -> usize {
        self.shared
            .states(source)
            .iter()
            .filter(|state| state.lock().unwrap().released)
            .count()
    }

    pub fn rewinds(&self, source: &str) -> usize {
        self.shared
            .states(source)
            .iter()
            .map(|state| state.lock().unwrap().rewinds)
            .sum()
    }

    /// Volume of the most recently created handle for `source`.
    pub fn volume_of(&self, source: &str) -> Option<f64> {
        let state = self.shared.states(source).pop()?;
        let volume = state.lock().unwrap().volume;
        Some(volume)
    }

    pub fn looping(&self, source: &str) -> bool {
        self.shared
            .states(source)
            .iter()
            .all(|state| state.lock().unwrap().looping)
    }

    /// Sources with a handle currently producing sound.
    pub fn audible(&self) -> Vec<String> {
        self.shared
            .handles
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, state)| {
                let state = state.lock().unwrap();
                state.playing && !state.released
            })
            .map(|(source, _)| source.clone())
            .collect()
    }
}

pub struct MockHandle {
    source: String,
    shared: Arc<Shared>,
    state: Arc<Mutex<HandleState>>,
}

#[async_trait]
impl AudioEngine for MockEngine {
    type Handle = MockHandle;

    async fn load(&self, source: &str, volume: f64) -> Result<MockHandle, SoundError> {
        Shared::pass(&self.shared.load_gates, source).await;
        if self.shared.failing_loads.lock().unwrap().contains(source) {
            return Err(SoundError::load(source, "no such file"));
        }

        let state = Arc::new(Mutex::new(HandleState {
            looping: true,
            volume,
            ..Default::default()
        }));
        self.shared
            .handles
            .lock()
            .unwrap()
            .push((source.to_owned(), state.clone()));

        Ok(MockHandle {
            source: source.to_owned(),
            shared: self.shared.clone(),
            state,
        })
    }
}

#[async_trait]
impl SoundHandle for MockHandle {
    async fn start(&self) -> Result<(), SoundError> {
        Shared::pass(&self.shared.start_gates, &self.source).await;
        if self.shared.failing_starts.lock().unwrap().contains(&self.source) {
            return Err(SoundError::start("playback refused"));
        }
        self.state.lock().unwrap().playing = true;
        Ok(())
    }

    fn pause(&self) {
        self.state.lock().unwrap().playing = false;
    }

    fn rewind(&self) {
        self.state.lock().unwrap().rewinds += 1;
    }

    fn set_volume(&self, volume: f64) {
        self.state.lock().unwrap().volume = volume;
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.released = true;
    }
}
