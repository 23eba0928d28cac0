//! Input source
//!
//! Key and mouse state over winit key codes, queried by behaviors.

mod state;

pub use state::{Input, key_from_name};
