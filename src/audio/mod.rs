//! Sound playback
//!
//! Gameplay code talks to an [`AudioService`]; [`RodioAudio`] plays through
//! rodio, [`SilentAudio`] is used headless and in tests.

mod manager;
mod service;

pub use manager::RodioAudio;
pub use service::{AudioError, AudioService, PlayRequest, SilentAudio};
