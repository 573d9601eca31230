use crate::{error::InitError, geometry::GlyphQuad, settings::Color, texture::GlyphBitmap};

pub const TEX_UNIFORM: &str = "tex";
pub const COLOR_UNIFORM: &str = "color";
pub const COORD_ATTRIBUTE: &str = "coord";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where a uniform lives in the shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub group: u32,
    pub binding: u32,
}

/// The three named bindings the glyph renderer needs from a shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderBindings {
    pub tex: Slot,
    pub color: Slot,
    /// Vertex attribute location of `coord`.
    pub coord: u32,
}

/// The graphics side of glyph rendering: one texture, one quad buffer, one draw at a time.
///
/// Every call assumes the target's context is current on the calling thread.
/// Upload and draw calls for one glyph complete before the next glyph's begin.
pub trait GlyphTarget {
    type Program: ?Sized;

    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<Slot>;

    fn attribute_location(&self, program: &Self::Program, name: &str) -> Option<u32>;

    /// Makes `program` active and allocates the shared texture, vertex array and buffer.
    fn create_resources(
        &mut self,
        program: &Self::Program,
        bindings: ShaderBindings,
    ) -> Result<(), InitError>;

    fn release_resources(&mut self);

    fn viewport(&self) -> Viewport;

    /// Binds the shared resources for a draw and uploads the text color.
    fn begin(&mut self, color: Color);

    /// Replaces the shared texture's contents with `bitmap`.
    fn upload_bitmap(&mut self, bitmap: &GlyphBitmap);

    /// Replaces the shared vertex buffer's contents with `quad`.
    fn upload_quad(&mut self, quad: &GlyphQuad);

    /// Draws the uploaded quad as a 4-vertex triangle strip.
    fn draw_strip(&mut self);
}
