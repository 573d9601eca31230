use std::fmt::Debug;

use crate::plain::Plain;

/// One vertex of a glyph quad: device-space position in `xy`, texture coordinate in `zw`.
/// Matches the 4-component `coord` attribute.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphVertex {
    pub coord: [f32; 4],
}

unsafe impl Plain for GlyphVertex {}

impl GlyphVertex {
    pub fn position(&self) -> (f32, f32) {
        (self.coord[0], self.coord[1])
    }

    pub fn uv(&self) -> (f32, f32) {
        (self.coord[2], self.coord[3])
    }
}

/// A single glyph quad laid out as a 4-vertex triangle strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphQuad {
    pub vertices: [GlyphVertex; 4],
}

impl GlyphQuad {
    /// Builds the strip for a quad whose top-left corner is at `(x, top)`.
    /// Order: top-left, top-right, bottom-left, bottom-right.
    pub fn new(x: f32, top: f32, w: f32, h: f32) -> Self {
        Self {
            vertices: [
                GlyphVertex {
                    coord: [x, top, 0.0, 0.0],
                },
                GlyphVertex {
                    coord: [x + w, top, 1.0, 0.0],
                },
                GlyphVertex {
                    coord: [x, top - h, 0.0, 1.0],
                },
                GlyphVertex {
                    coord: [x + w, top - h, 1.0, 1.0],
                },
            ],
        }
    }

    pub fn left(&self) -> f32 {
        self.vertices[0].coord[0]
    }

    pub fn top(&self) -> f32 {
        self.vertices[0].coord[1]
    }

    pub fn width(&self) -> f32 {
        self.vertices[1].coord[0] - self.vertices[0].coord[0]
    }

    pub fn height(&self) -> f32 {
        self.vertices[0].coord[1] - self.vertices[2].coord[1]
    }
}

impl Geometry for GlyphQuad {
    fn contents(&self) -> &[u8] {
        self.vertices.as_bytes()
    }

    fn length(&self) -> u32 {
        self.vertices.len() as u32
    }
}

pub trait Geometry: Debug {
    fn contents(&self) -> &[u8];

    fn length(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_order_shares_the_diagonal() {
        let quad = GlyphQuad::new(-0.5, 0.5, 0.25, 0.1);
        let [tl, tr, bl, br] = quad.vertices;

        assert_eq!(tl.position(), (-0.5, 0.5));
        assert_eq!(tr.position(), (-0.25, 0.5));
        assert_eq!(bl.position(), (-0.5, 0.4));
        assert_eq!(br.position(), (-0.25, 0.4));

        assert_eq!(tl.uv(), (0.0, 0.0));
        assert_eq!(br.uv(), (1.0, 1.0));
    }

    #[test]
    fn contents_are_four_vec4s() {
        let quad = GlyphQuad::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(quad.length(), 4);
        assert_eq!(quad.contents().len(), 4 * 4 * std::mem::size_of::<f32>());
    }

    #[test]
    fn extents_round_trip() {
        let quad = GlyphQuad::new(0.125, 0.75, 0.5, 0.25);
        assert_eq!(quad.left(), 0.125);
        assert_eq!(quad.top(), 0.75);
        assert_eq!(quad.width(), 0.5);
        assert_eq!(quad.height(), 0.25);
    }
}
