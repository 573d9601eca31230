pub mod bind;
pub mod cursor;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod plain;
pub mod program;
pub mod recording;
pub mod render;
pub mod settings;
pub mod target;
pub mod text;
pub mod texture;

pub use error::{DrawError, Error, FontLoadError, FontSetError, InitError, Result};
pub use settings::{Aspect, Color, RenderSettings};
pub use text::{
    font::{FaceHandle, FontEngine, Glyph},
    fontdue_engine::FontdueEngine,
    renderer::{GlyphRenderer, TextRun},
};

// layout of the crate:
// - text: the renderer loop plus the font engine seam (fontdue behind it)
// - target: the graphics seam, implemented by `render::WgpuTarget` and `recording::RecordingTarget`
// - bind/pipeline/program: wgpu plumbing for the glyph shader
//
// a glyph atlas with batched draws would slot in behind `GlyphTarget` without touching the
// renderer loop, but every glyph currently goes through the same texture and buffer.
