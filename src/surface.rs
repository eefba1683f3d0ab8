use crate::error::Result;
use crate::sample::{Point, Rgba};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        SurfaceSize { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

/// Soft shadow painted under the next shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f64,
}

/// Full-viewport drawing surface owned by a single layer.
///
/// Glow is state, like a 2D canvas shadow: it applies to every fill until it
/// is reset.
pub trait Surface {
    fn size(&self) -> SurfaceSize;

    /// Reallocates the backing store. Content is lost.
    fn resize(&mut self, size: SurfaceSize) -> Result<()>;

    fn clear(&mut self);

    fn set_glow(&mut self, glow: Option<Glow>);

    fn fill_circle(&mut self, center: Point, radius: f64, fill: Rgba);

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba);
}

/// Resource wrapping a layer's surface.
pub struct Graphics {
    pub surface: Box<dyn Surface>,
}
