use std::{fs, path::Path};

use fontdue::{Font, FontSettings, Metrics};
use generational_arena::Arena;
use nalgebra::Vector2;

use crate::{error::EngineError, texture::GlyphBitmap};

use super::font::{FaceHandle, FontEngine, Glyph};

struct Face {
    font: Font,
    px: Option<u32>,
    family: Option<String>,
}

/// [`FontEngine`] backed by fontdue.
///
/// Faces stay parsed in memory until closed or until the engine shuts down.
#[derive(Default)]
pub struct FontdueEngine {
    faces: Arena<Face>,
    ready: bool,
}

impl FontdueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, handle: FaceHandle) -> Result<&Face, EngineError> {
        if !self.ready {
            return Err(EngineError::NotInitialized);
        }
        self.faces.get(handle.0).ok_or(EngineError::StaleFace)
    }
}

impl FontEngine for FontdueEngine {
    fn init(&mut self) -> Result<(), EngineError> {
        self.ready = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        // remove one by one so old handles stay stale after the slots are reused
        let handles = self.faces.iter().map(|(index, _)| index).collect::<Vec<_>>();
        for index in handles {
            self.faces.remove(index);
        }
        self.ready = false;
    }

    fn open_face(&mut self, path: &Path) -> Result<FaceHandle, EngineError> {
        if !self.ready {
            return Err(EngineError::NotInitialized);
        }
        let bytes = fs::read(path)?;
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|err| EngineError::Parse(err.to_string()))?;

        // fontdue keeps no name table around, the file stem is the best label we have
        let family = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());

        let index = self.faces.insert(Face {
            font,
            px: None,
            family,
        });
        Ok(FaceHandle(index))
    }

    fn close_face(&mut self, face: FaceHandle) {
        self.faces.remove(face.0);
    }

    fn set_pixel_size(&mut self, face: FaceHandle, px: u32) -> Result<(), EngineError> {
        self.face(face)?;
        if let Some(entry) = self.faces.get_mut(face.0) {
            entry.px = Some(px);
        }
        Ok(())
    }

    fn pixel_size(&self, face: FaceHandle) -> Option<u32> {
        self.faces.get(face.0).and_then(|face| face.px)
    }

    fn rasterize(&mut self, face: FaceHandle, character: char) -> Result<Glyph, EngineError> {
        let face = self.face(face)?;
        let px = face.px.ok_or(EngineError::NoPixelSize)?;
        // a zero size rasterizes at the smallest size there is
        let (metrics, bitmap) = face.font.rasterize(character, px.max(1) as f32);
        Ok(glyph_from_metrics(metrics, bitmap))
    }

    fn family_name(&self, face: FaceHandle) -> Option<String> {
        self.faces.get(face.0).and_then(|face| face.family.clone())
    }
}

fn glyph_from_metrics(metrics: Metrics, bitmap: Vec<u8>) -> Glyph {
    Glyph {
        bitmap: GlyphBitmap::new(metrics.width as u32, metrics.height as u32, bitmap),
        left: metrics.xmin,
        top: metrics.ymin + metrics.height as i32,
        advance: Vector2::new((metrics.advance_width * 64.0).round() as i32, 0),
    }
}
