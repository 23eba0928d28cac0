//! Offscreen drawing target
//!
//! Everything is drawn into an [`RgbaImage`] through a current affine
//! transform. Shapes are filled by inverse-mapping each device pixel into
//! local space, so rotated rectangles and ellipses come out right without a
//! polygon rasterizer.

use glam::{DAffine2, DVec2};
use image::{Pixel, Rgba, RgbaImage};

/// RGBA color with 8 bits per channel
pub type Color = Rgba<u8>;

/// Build a color from its channels
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    Rgba([r, g, b, a])
}

/// A text line recorded by the surface, in device coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Label
    pub text: String,
    /// Baseline origin after the transform
    pub position: DVec2,
    /// Text color
    pub color: Color,
}

/// Graphics target handed to behaviors, plugins and overlays
pub trait Surface {
    /// Pixel dimensions
    fn size(&self) -> (u32, u32);

    /// Fill everything with `color` and reset the transform
    fn clear(&mut self, color: Color);

    /// Current local-to-device transform
    fn transform(&self) -> DAffine2;

    /// Replace the transform
    fn set_transform(&mut self, transform: DAffine2);

    /// Append a translation to the transform
    fn translate(&mut self, offset: DVec2) {
        let transform = self.transform() * DAffine2::from_translation(offset);
        self.set_transform(transform);
    }

    /// Append a rotation (radians) to the transform
    fn rotate(&mut self, angle: f64) {
        let transform = self.transform() * DAffine2::from_angle(angle);
        self.set_transform(transform);
    }

    /// Filled rectangle
    fn fill_rect(&mut self, position: DVec2, size: DVec2, color: Color);

    /// Rectangle outline of the given width, drawn inside the bounds
    fn stroke_rect(&mut self, position: DVec2, size: DVec2, color: Color, width: f64);

    /// Filled ellipse inscribed in the bounds
    fn fill_ellipse(&mut self, position: DVec2, size: DVec2, color: Color);

    /// Ellipse outline of the given width, drawn inside the bounds
    fn stroke_ellipse(&mut self, position: DVec2, size: DVec2, color: Color, width: f64);

    /// One pixel wide line
    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color);

    /// Scaled bitmap
    fn draw_image(&mut self, image: &RgbaImage, position: DVec2, size: DVec2);

    /// Text label at a baseline origin
    fn draw_text(&mut self, text: &str, position: DVec2, color: Color);
}

/// [`Surface`] over an in-memory RGBA buffer
#[derive(Debug, Clone)]
pub struct RasterSurface {
    buffer: RgbaImage,
    transform: DAffine2,
    text: Vec<TextLine>,
}

impl RasterSurface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width.max(1), height.max(1)),
            transform: DAffine2::IDENTITY,
            text: Vec::new(),
        }
    }

    /// Pixels drawn so far
    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Text recorded since the last clear
    pub fn text(&self) -> &[TextLine] {
        &self.text
    }

    /// Color of one device pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.buffer.get_pixel_checked(x, y).copied()
    }

    /// Device-space pixel range covered by a transformed local rectangle
    fn device_bounds(&self, position: DVec2, size: DVec2) -> Option<(u32, u32, u32, u32)> {
        let corners = [
            position,
            position + DVec2::new(size.x, 0.0),
            position + DVec2::new(0.0, size.y),
            position + size,
        ]
        .map(|corner| self.transform.transform_point2(corner));

        let min = corners.iter().fold(DVec2::INFINITY, |acc, c| acc.min(*c));
        let max = corners.iter().fold(DVec2::NEG_INFINITY, |acc, c| acc.max(*c));
        let (width, height) = self.buffer.dimensions();

        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(f64::from(width));
        let y1 = max.y.ceil().min(f64::from(height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Blend `color` into every pixel whose center maps inside the region
    fn fill_region(
        &mut self,
        position: DVec2,
        size: DVec2,
        color: Color,
        inside: impl Fn(DVec2) -> bool,
    ) {
        if size.x <= 0.0 || size.y <= 0.0 || color[3] == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.device_bounds(position, size) else {
            return;
        };
        let inverse = self.transform.inverse();
        for y in y0..y1 {
            for x in x0..x1 {
                let center = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if inside(inverse.transform_point2(center)) {
                    self.buffer.get_pixel_mut(x, y).blend(&color);
                }
            }
        }
    }

    fn plot(&mut self, point: DVec2, color: Color) {
        let (width, height) = self.buffer.dimensions();
        if point.x < 0.0 || point.y < 0.0 {
            return;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x < width && y < height {
            self.buffer.get_pixel_mut(x, y).blend(&color);
        }
    }
}

/// Clip a device-space segment to `[0, bounds]` (Liang-Barsky)
fn clip_line(from: DVec2, to: DVec2, bounds: DVec2) -> Option<(DVec2, DVec2)> {
    let delta = to - from;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-delta.x, from.x),
        (delta.x, bounds.x - from.x),
        (-delta.y, from.y),
        (delta.y, bounds.y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((from + delta * t0, from + delta * t1))
}

fn in_rect(point: DVec2, position: DVec2, size: DVec2) -> bool {
    let end = position + size;
    point.x >= position.x && point.y >= position.y && point.x < end.x && point.y < end.y
}

fn in_ellipse(point: DVec2, position: DVec2, size: DVec2) -> bool {
    let radius = size * 0.5;
    if radius.x <= 0.0 || radius.y <= 0.0 {
        return false;
    }
    let d = (point - (position + radius)) / radius;
    d.length_squared() <= 1.0
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    fn clear(&mut self, color: Color) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = color;
        }
        self.transform = DAffine2::IDENTITY;
        self.text.clear();
    }

    fn transform(&self) -> DAffine2 {
        self.transform
    }

    fn set_transform(&mut self, transform: DAffine2) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, position: DVec2, size: DVec2, color: Color) {
        self.fill_region(position, size, color, |p| in_rect(p, position, size));
    }

    fn stroke_rect(&mut self, position: DVec2, size: DVec2, color: Color, width: f64) {
        let inner_position = position + DVec2::splat(width);
        let inner_size = size - DVec2::splat(width * 2.0);
        self.fill_region(position, size, color, |p| {
            in_rect(p, position, size) && !in_rect(p, inner_position, inner_size)
        });
    }

    fn fill_ellipse(&mut self, position: DVec2, size: DVec2, color: Color) {
        self.fill_region(position, size, color, |p| in_ellipse(p, position, size));
    }

    fn stroke_ellipse(&mut self, position: DVec2, size: DVec2, color: Color, width: f64) {
        let inner_position = position + DVec2::splat(width);
        let inner_size = size - DVec2::splat(width * 2.0);
        self.fill_region(position, size, color, |p| {
            in_ellipse(p, position, size) && !in_ellipse(p, inner_position, inner_size)
        });
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color) {
        let (width, height) = self.buffer.dimensions();
        let bounds = DVec2::new(f64::from(width), f64::from(height));
        let Some((from, to)) = clip_line(
            self.transform.transform_point2(from),
            self.transform.transform_point2(to),
            bounds,
        ) else {
            return;
        };
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0);
        let increment = delta / steps;
        let mut point = from;
        for _ in 0..=(steps as u32) {
            self.plot(point, color);
            point += increment;
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, position: DVec2, size: DVec2) {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.device_bounds(position, size) else {
            return;
        };
        let inverse = self.transform.inverse();
        let scale = DVec2::new(f64::from(width), f64::from(height)) / size;
        for y in y0..y1 {
            for x in x0..x1 {
                let center = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let local = inverse.transform_point2(center);
                if !in_rect(local, position, size) {
                    continue;
                }
                let texel = ((local - position) * scale).floor();
                let u = (texel.x as u32).min(width - 1);
                let v = (texel.y as u32).min(height - 1);
                let source = *image.get_pixel(u, v);
                self.buffer.get_pixel_mut(x, y).blend(&source);
            }
        }
    }

    fn draw_text(&mut self, text: &str, position: DVec2, color: Color) {
        self.text.push(TextLine {
            text: text.to_string(),
            position: self.transform.transform_point2(position),
            color,
        });
    }
}
