//! Resource loading
//!
//! An explicit cache value owned by the game context: images are decoded
//! with the `image` crate, sounds are kept as raw bytes, and both are
//! deduplicated by path.

mod handle;
mod storage;

pub use handle::{AssetHandle, ImageHandle, SoundClip, SoundHandle};
pub use storage::{Assets, ResourceCache};
