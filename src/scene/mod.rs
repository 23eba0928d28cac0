//! Scene lifecycle
//!
//! A scene owns a named set of entities. At most one scene is live at a
//! time; activating another one disposes the current scene completely
//! before the next one is set up.

mod manager;
mod scene;

pub use manager::{SceneError, SceneManager};
pub use scene::{Scene, SceneState, Stage};
