//! Audio output through rodio

use std::io::Cursor;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use rustc_hash::FxHashMap;

use super::service::{AudioError, AudioService};
use crate::assets::SoundHandle;

/// [`AudioService`] playing through the default output device
///
/// Each code gets its own sink; playing a code again replaces its previous
/// sink. Rodio sinks have no panning, so `pan` is ignored.
pub struct RodioAudio {
    // must outlive the sinks
    stream: OutputStream,
    clips: FxHashMap<String, SoundHandle>,
    sinks: FxHashMap<String, Sink>,
    master_volume: f32,
}

impl RodioAudio {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|e| AudioError::NoDevice(e.to_string()))?
            .open_stream()
            .map_err(|e| AudioError::NoDevice(e.to_string()))?;
        log::info!("Audio output opened");
        Ok(Self {
            stream,
            clips: FxHashMap::default(),
            sinks: FxHashMap::default(),
            master_volume: 1.0,
        })
    }

    fn start(&self, clip: &SoundHandle, volume: f32, looping: bool) -> Result<Sink, AudioError> {
        let source = Decoder::new(Cursor::new(clip.bytes.clone()))
            .map_err(|e| AudioError::Decode(e.to_string()))?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(volume.max(0.0) * self.master_volume);
        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        Ok(sink)
    }
}

impl AudioService for RodioAudio {
    fn register(&mut self, code: &str, clip: SoundHandle) {
        self.clips.insert(code.to_string(), clip);
    }

    fn play(&mut self, code: &str, volume: f32, pan: f32, looping: bool) {
        let Some(clip) = self.clips.get(code) else {
            log::debug!("No clip registered for sound '{code}'");
            return;
        };
        if pan != 0.0 {
            log::debug!("Panning not supported, playing '{code}' centered");
        }
        match self.start(clip, volume, looping) {
            Ok(sink) => {
                self.sinks.insert(code.to_string(), sink);
            }
            Err(e) => log::error!("Failed to play '{code}': {e}"),
        }
    }

    fn is_playing(&self, code: &str) -> bool {
        self.sinks
            .get(code)
            .is_some_and(|sink| !sink.empty() && !sink.is_paused())
    }

    fn stop(&mut self, code: &str) {
        if let Some(sink) = self.sinks.remove(code) {
            sink.stop();
        }
    }

    fn stop_all(&mut self) {
        for (_, sink) in self.sinks.drain() {
            sink.stop();
        }
    }

    fn set_master_volume(&mut self, volume: f32) {
        let volume = volume.max(0.0);
        for sink in self.sinks.values() {
            let ratio = if self.master_volume > 0.0 {
                sink.volume() / self.master_volume
            } else {
                1.0
            };
            sink.set_volume(ratio * volume);
        }
        self.master_volume = volume;
    }
}

impl std::fmt::Debug for RodioAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudio")
            .field("clips", &self.clips.len())
            .field("sinks", &self.sinks.len())
            .field("master_volume", &self.master_volume)
            .finish()
    }
}
