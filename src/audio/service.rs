//! Audio service seam and its headless implementation

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::assets::SoundHandle;

/// Sound playback as seen by gameplay code
///
/// Sounds are addressed by a short code (`"coin"`, `"jump"`...) bound to a
/// loaded clip with [`AudioService::register`]. Playing an unknown code is
/// not an error.
pub trait AudioService {
    /// Bind a clip to a code
    fn register(&mut self, code: &str, clip: SoundHandle);

    /// Start a sound; `volume` in 0..=1, `pan` in -1..=1
    fn play(&mut self, code: &str, volume: f32, pan: f32, looping: bool);

    /// Whether a sound with this code is currently audible
    fn is_playing(&self, code: &str) -> bool;

    /// Stop a sound
    fn stop(&mut self, code: &str);

    /// Stop every sound
    fn stop_all(&mut self);

    /// Global volume multiplier
    fn set_master_volume(&mut self, volume: f32);
}

/// A recorded play request
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    /// Sound code
    pub code: String,
    /// Requested volume
    pub volume: f32,
    /// Requested stereo position
    pub pan: f32,
    /// Loop until stopped
    pub looping: bool,
}

/// Audio service that plays nothing and remembers what it was asked.
///
/// A code counts as playing from its first request until it is stopped.
#[derive(Debug)]
pub struct SilentAudio {
    clips: FxHashMap<String, SoundHandle>,
    requests: Vec<PlayRequest>,
    playing: FxHashSet<String>,
    master_volume: f32,
}

impl SilentAudio {
    /// Create an idle service
    pub fn new() -> Self {
        Self {
            clips: FxHashMap::default(),
            requests: Vec::new(),
            playing: FxHashSet::default(),
            master_volume: 1.0,
        }
    }

    /// Every play request so far, oldest first
    pub fn requests(&self) -> &[PlayRequest] {
        &self.requests
    }

    /// Whether a clip is bound to `code`
    pub fn is_registered(&self, code: &str) -> bool {
        self.clips.contains_key(code)
    }

    /// Current master volume
    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }
}

impl Default for SilentAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioService for SilentAudio {
    fn register(&mut self, code: &str, clip: SoundHandle) {
        self.clips.insert(code.to_string(), clip);
    }

    fn play(&mut self, code: &str, volume: f32, pan: f32, looping: bool) {
        log::trace!("play {code} (volume {volume}, pan {pan}, loop {looping})");
        self.requests.push(PlayRequest {
            code: code.to_string(),
            volume,
            pan,
            looping,
        });
        self.playing.insert(code.to_string());
    }

    fn is_playing(&self, code: &str) -> bool {
        self.playing.contains(code)
    }

    fn stop(&mut self, code: &str) {
        self.playing.remove(code);
    }

    fn stop_all(&mut self) {
        self.playing.clear();
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.max(0.0);
    }
}

/// Errors raised while opening audio output or decoding clips
#[derive(Debug, Clone)]
pub enum AudioError {
    /// No output device could be opened
    NoDevice(String),
    /// A clip could not be decoded
    Decode(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice(e) => write!(f, "No audio output device available: {e}"),
            Self::Decode(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for AudioError {}
