//! Core library for the ambient sound player.
//! It contains the static sound catalog, the audio engine abstraction, the volume
//! preference store, and the single-voice playback controller.

pub mod catalog;
pub mod controller;
pub mod engine;
pub mod error;
pub mod preference;
pub mod state;

#[cfg(test)]
pub(crate) mod mock;

pub use catalog::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use preference::*;
pub use state::*;
