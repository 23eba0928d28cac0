//! Rendering module
//!
//! Software 2D rendering: entities are drawn by per-kind plugins into an
//! offscreen RGBA surface, through an optional follow camera, then handed
//! to a presenter.

mod camera;
mod overlay;
mod pipeline;
mod plugins;
mod present;
mod surface;

pub use camera::Camera;
pub use overlay::Overlay;
pub use pipeline::{FrameReport, Renderer};
pub use plugins::{DrawPlugin, EllipsePlugin, ImagePlugin, RectanglePlugin, TextPlugin, default_plugins};
pub use present::{HeadlessPresenter, Presenter};
pub use surface::{Color, RasterSurface, Surface, TextLine, rgba};
