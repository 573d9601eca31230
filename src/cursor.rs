use nalgebra::{Point2, Vector2};

use crate::target::Viewport;

/// Device units per glyph-space pixel along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceScale {
    pub sx: f32,
    pub sy: f32,
}

impl DeviceScale {
    pub fn new(aspect: f32, pixel_scale: u32, viewport: Viewport) -> Self {
        Self {
            sx: aspect * pixel_scale as f32 / viewport.width as f32,
            sy: aspect * pixel_scale as f32 / viewport.height as f32,
        }
    }

    /// Maps a top-left-origin pixel position into `[-1, 1]` device space.
    pub fn to_device(&self, x: f32, y: f32) -> Point2<f32> {
        Point2::new(-1.0 + x * self.sx, 1.0 - y * self.sy)
    }

    pub fn scale(&self, v: Vector2<f32>) -> Vector2<f32> {
        Vector2::new(v.x * self.sx, v.y * self.sy)
    }
}

/// Aspect factor that fits a `box_w` x `box_h` pixel box inside the viewport.
/// Degenerate boxes leave the scale alone.
pub fn fit_aspect(viewport: Viewport, box_w: f32, box_h: f32) -> f32 {
    if box_w <= 0.0 || box_h <= 0.0 || !box_w.is_finite() || !box_h.is_finite() {
        return 1.0;
    }
    (viewport.width as f32 / box_w).min(viewport.height as f32 / box_h)
}

/// Pen position in device coordinates, remembering where the current line started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub position: Point2<f32>,
    line_start: f32,
}

impl Pen {
    pub fn new(start: Point2<f32>) -> Self {
        Self {
            position: start,
            line_start: start.x,
        }
    }

    /// Moves down one line of `line_height` device units and back to the line start.
    pub fn newline(&mut self, line_height: f32) {
        self.position.y -= line_height;
        self.position.x = self.line_start;
    }

    pub fn advance(&mut self, by: Vector2<f32>) {
        self.position += by;
    }
}
