use std::path::Path;

use generational_arena::Index;
use nalgebra::Vector2;

use crate::{error::EngineError, texture::GlyphBitmap};

/// Non-owning handle to a face held by a [`FontEngine`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct FaceHandle(pub Index);

/// One rasterized character and its placement metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub bitmap: GlyphBitmap,
    /// Horizontal bearing from the pen to the bitmap's left edge, in pixels.
    pub left: i32,
    /// Vertical bearing from the baseline up to the bitmap's top row, in pixels.
    pub top: i32,
    /// Pen advance in 1/64 pixel units.
    pub advance: Vector2<i32>,
}

impl Glyph {
    /// Advance truncated to whole pixels.
    pub fn advance_px(&self) -> Vector2<i32> {
        self.advance.map(|v| v >> 6)
    }
}

pub trait FontEngine {
    fn init(&mut self) -> Result<(), EngineError>;

    /// Drops every face the engine owns.
    fn shutdown(&mut self);

    fn open_face(&mut self, path: &Path) -> Result<FaceHandle, EngineError>;

    fn close_face(&mut self, face: FaceHandle);

    /// Sizes `face` for later rasterization. A size of 0 rasterizes at the smallest size.
    fn set_pixel_size(&mut self, face: FaceHandle, px: u32) -> Result<(), EngineError>;

    /// The size last set on `face`, if any.
    fn pixel_size(&self, face: FaceHandle) -> Option<u32>;

    /// Rasterizes `character` at the face's current pixel size.
    fn rasterize(&mut self, face: FaceHandle, character: char) -> Result<Glyph, EngineError>;

    fn family_name(&self, face: FaceHandle) -> Option<String>;
}
