//! Core engine module
//!
//! Contains the game loop, its shared context and configuration

mod config;
mod debug;
mod engine;
mod messages;
mod time;

pub use config::{CONFIG_KEYS, ConfigError, EngineConfig};
pub use debug::{DebugInfo, FrameStats, MAX_DEBUG_LEVEL};
pub use engine::{Game, GameContext};
pub use messages::Messages;
pub use time::Time;
