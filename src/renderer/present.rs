//! Frame presentation

use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Receives every finished frame
pub trait Presenter {
    /// Show `frame` scaled by `scale`
    fn present(&mut self, frame: &RgbaImage, scale: f64);

    /// Called once when the loop ends
    fn finish(&mut self) -> Result<(), image::ImageError> {
        Ok(())
    }
}

/// Presenter without a window: keeps the last scaled frame around
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    frames: u64,
    capture: Option<PathBuf>,
    last: Option<RgbaImage>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the last frame to `path` when the loop ends
    #[must_use]
    pub fn with_capture(mut self, path: impl Into<PathBuf>) -> Self {
        self.capture = Some(path.into());
        self
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Last presented (scaled) frame
    pub fn last(&self) -> Option<&RgbaImage> {
        self.last.as_ref()
    }

    /// Save the last frame as an image; format follows the extension
    pub fn save_last(&self, path: &Path) -> Result<(), image::ImageError> {
        match &self.last {
            Some(frame) => frame.save(path),
            None => {
                log::warn!("No frame to save to {}", path.display());
                Ok(())
            }
        }
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, frame: &RgbaImage, scale: f64) {
        self.frames += 1;
        let scaled = if (scale - 1.0).abs() < f64::EPSILON || scale <= 0.0 {
            frame.clone()
        } else {
            let width = (f64::from(frame.width()) * scale).round().max(1.0) as u32;
            let height = (f64::from(frame.height()) * scale).round().max(1.0) as u32;
            imageops::resize(frame, width, height, FilterType::Nearest)
        };
        self.last = Some(scaled);
    }

    fn finish(&mut self) -> Result<(), image::ImageError> {
        match &self.capture {
            Some(path) => {
                self.save_last(path)?;
                log::info!("Saved frame {} to {}", self.frames, path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_present_scales_frame() {
        let mut presenter = HeadlessPresenter::new();
        let frame = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255]));

        presenter.present(&frame, 2.0);

        let last = presenter.last().unwrap();
        assert_eq!(last.dimensions(), (8, 6));
        assert_eq!(last.get_pixel(7, 5), &Rgba([1, 2, 3, 255]));
        assert_eq!(presenter.frames(), 1);
    }

    #[test]
    fn test_unit_scale_keeps_size() {
        let mut presenter = HeadlessPresenter::new();
        presenter.present(&RgbaImage::new(5, 5), 1.0);
        assert_eq!(presenter.last().unwrap().dimensions(), (5, 5));
    }

    #[test]
    fn test_finish_without_capture_is_noop() {
        let mut presenter = HeadlessPresenter::new();
        assert!(presenter.finish().is_ok());
    }
}
