#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use generational_arena::Arena;
use glyphquad::{error::EngineError, texture::GlyphBitmap, FaceHandle, FontEngine, Glyph};
use nalgebra::Vector2;

pub const EPSILON: f32 = 1e-5;

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn glyph(width: u32, height: u32, left: i32, top: i32, advance_px: i32) -> Glyph {
    Glyph {
        bitmap: GlyphBitmap::new(width, height, vec![0xff; (width * height) as usize]),
        left,
        top,
        advance: Vector2::new(advance_px * 64, 0),
    }
}

struct ScriptedFace {
    family: String,
    px: u32,
}

/// Font engine with canned glyphs and switchable failures.
pub struct ScriptedEngine {
    faces: Arena<ScriptedFace>,
    files: HashMap<PathBuf, String>,
    glyphs: HashMap<char, Glyph>,
    fallback: Glyph,
    failing_chars: HashSet<char>,
    failing_sizes: HashSet<u32>,
    pub fail_all: bool,
    pub fail_init: bool,
    pub ready: bool,
    pub rasterize_calls: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            faces: Arena::new(),
            files: HashMap::new(),
            glyphs: HashMap::new(),
            fallback: glyph(6, 8, 1, 8, 8),
            failing_chars: HashSet::new(),
            failing_sizes: HashSet::new(),
            fail_all: false,
            fail_init: false,
            ready: false,
            rasterize_calls: 0,
        }
    }

    pub fn with_file(mut self, path: &str, family: &str) -> Self {
        self.files.insert(PathBuf::from(path), family.into());
        self
    }

    pub fn with_glyph(mut self, character: char, glyph: Glyph) -> Self {
        self.glyphs.insert(character, glyph);
        self
    }

    pub fn failing_char(mut self, character: char) -> Self {
        self.failing_chars.insert(character);
        self
    }

    pub fn failing_size(mut self, px: u32) -> Self {
        self.failing_sizes.insert(px);
        self
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

impl FontEngine for ScriptedEngine {
    fn init(&mut self) -> Result<(), EngineError> {
        if self.fail_init {
            return Err(EngineError::NotInitialized);
        }
        self.ready = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        let handles = self.faces.iter().map(|(index, _)| index).collect::<Vec<_>>();
        for index in handles {
            self.faces.remove(index);
        }
        self.ready = false;
    }

    fn open_face(&mut self, path: &Path) -> Result<FaceHandle, EngineError> {
        let family = self.files.get(path).cloned().ok_or_else(|| {
            EngineError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such font",
            ))
        })?;
        Ok(FaceHandle(self.faces.insert(ScriptedFace { family, px: 0 })))
    }

    fn close_face(&mut self, face: FaceHandle) {
        self.faces.remove(face.0);
    }

    fn set_pixel_size(&mut self, face: FaceHandle, px: u32) -> Result<(), EngineError> {
        let face = self.faces.get_mut(face.0).ok_or(EngineError::StaleFace)?;
        face.px = px;
        Ok(())
    }

    fn pixel_size(&self, face: FaceHandle) -> Option<u32> {
        self.faces.get(face.0).map(|face| face.px)
    }

    fn rasterize(&mut self, face: FaceHandle, character: char) -> Result<Glyph, EngineError> {
        self.rasterize_calls += 1;
        let face = self.faces.get(face.0).ok_or(EngineError::StaleFace)?;
        if self.fail_all
            || self.failing_chars.contains(&character)
            || self.failing_sizes.contains(&face.px)
        {
            return Err(EngineError::Rasterize(character));
        }
        Ok(self
            .glyphs
            .get(&character)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn family_name(&self, face: FaceHandle) -> Option<String> {
        self.faces.get(face.0).map(|face| face.family.clone())
    }
}
