use std::collections::HashMap;

use crate::{
    error::InitError,
    geometry::GlyphQuad,
    settings::Color,
    target::{GlyphTarget, ShaderBindings, Slot, Viewport},
    texture::GlyphBitmap,
};

/// Name tables standing in for a linked shader program.
#[derive(Clone, Debug, Default)]
pub struct RecordingProgram {
    pub uniforms: HashMap<String, Slot>,
    pub attributes: HashMap<String, u32>,
}

impl RecordingProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// A program exposing `tex`, `color` and `coord`.
    pub fn glyph() -> Self {
        Self::new()
            .with_uniform("tex", Slot { group: 0, binding: 0 })
            .with_uniform("color", Slot { group: 0, binding: 1 })
            .with_attribute("coord", 0)
    }

    pub fn with_uniform(mut self, name: &str, slot: Slot) -> Self {
        self.uniforms.insert(name.into(), slot);
        self
    }

    pub fn with_attribute(mut self, name: &str, location: u32) -> Self {
        self.attributes.insert(name.into(), location);
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.uniforms.remove(name);
        self.attributes.remove(name);
        self
    }
}

/// Ids of the objects a target allocates in `create_resources`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceIds {
    pub texture: u32,
    pub vertex_array: u32,
    pub buffer: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Begin { color: Color },
    UploadBitmap { width: u32, height: u32 },
    UploadQuad(GlyphQuad),
    DrawStrip,
}

/// [`GlyphTarget`] that draws nothing and remembers every call, for layout checks without a GPU.
#[derive(Debug)]
pub struct RecordingTarget {
    viewport: Viewport,
    next_id: u32,
    resources: Option<ResourceIds>,
    bindings: Option<ShaderBindings>,
    commands: Vec<Command>,
}

impl RecordingTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            next_id: 1,
            resources: None,
            bindings: None,
            commands: Vec::new(),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn resources(&self) -> Option<ResourceIds> {
        self.resources
    }

    pub fn bindings(&self) -> Option<ShaderBindings> {
        self.bindings
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, Command::DrawStrip))
            .count()
    }

    /// Quads in upload order.
    pub fn quads(&self) -> Vec<GlyphQuad> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::UploadQuad(quad) => Some(*quad),
                _ => None,
            })
            .collect()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GlyphTarget for RecordingTarget {
    type Program = RecordingProgram;

    fn uniform_location(&self, program: &RecordingProgram, name: &str) -> Option<Slot> {
        program.uniforms.get(name).copied()
    }

    fn attribute_location(&self, program: &RecordingProgram, name: &str) -> Option<u32> {
        program.attributes.get(name).copied()
    }

    fn create_resources(
        &mut self,
        _program: &RecordingProgram,
        bindings: ShaderBindings,
    ) -> Result<(), InitError> {
        self.resources = Some(ResourceIds {
            texture: self.next_id(),
            vertex_array: self.next_id(),
            buffer: self.next_id(),
        });
        self.bindings = Some(bindings);
        Ok(())
    }

    fn release_resources(&mut self) {
        self.resources = None;
        self.bindings = None;
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn begin(&mut self, color: Color) {
        self.commands.push(Command::Begin { color });
    }

    fn upload_bitmap(&mut self, bitmap: &GlyphBitmap) {
        self.commands.push(Command::UploadBitmap {
            width: bitmap.width,
            height: bitmap.height,
        });
    }

    fn upload_quad(&mut self, quad: &GlyphQuad) {
        self.commands.push(Command::UploadQuad(*quad));
    }

    fn draw_strip(&mut self) {
        self.commands.push(Command::DrawStrip);
    }
}
