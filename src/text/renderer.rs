use std::path::Path;

use log::{debug, error, info, trace, warn};
use nalgebra::{Point2, Vector2};

use crate::{
    cursor::{fit_aspect, DeviceScale, Pen},
    error::{BindingKind, DrawError, FontLoadError, FontSetError, InitError},
    geometry::GlyphQuad,
    settings::{Aspect, Color, RenderSettings},
    target::{GlyphTarget, ShaderBindings, COLOR_UNIFORM, COORD_ATTRIBUTE, TEX_UNIFORM},
};

use super::font::{FaceHandle, FontEngine, Glyph};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Uninitialized,
    Initialized,
    Released,
}

/// The active rendering configuration shared across draw calls.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub face: Option<FaceHandle>,
    pub point_size: u32,
    pub pixel_scale: u32,
    pub color: Color,
    pub background: Color,
}

/// What a single `draw` call did, in device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextRun {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
    pub drawn: usize,
    pub skipped: usize,
}

/// Draws strings one glyph at a time through a single shared texture and quad buffer.
///
/// `E` rasterizes glyphs, `T` owns the GPU objects. A renderer is initialized once, drawn
/// with any number of times and released once:
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use glyphquad::{
///     program::WgslProgram,
///     render::WgpuTarget,
///     text::{fontdue_engine::FontdueEngine, renderer::GlyphRenderer},
/// };
///
/// let target = WgpuTarget::new(640, 480)?;
/// let mut renderer = GlyphRenderer::new(FontdueEngine::new(), target);
/// renderer.init(&WgslProgram::glyph()?)?;
///
/// let face = renderer.load_face("DejaVuSans.ttf")?;
/// renderer.set_face(face, 24)?;
/// renderer.draw("Hello\nworld", 10.0, 10.0, 0, 0)?;
/// # Ok(())
/// # }
/// ```
pub struct GlyphRenderer<E, T> {
    engine: E,
    target: T,
    settings: RenderSettings,
    state: RenderState,
    stage: Stage,
}

impl<E: FontEngine, T: GlyphTarget> GlyphRenderer<E, T> {
    pub fn new(engine: E, target: T) -> Self {
        Self::with_settings(engine, target, RenderSettings::default())
    }

    pub fn with_settings(engine: E, target: T, settings: RenderSettings) -> Self {
        let state = RenderState {
            face: None,
            point_size: settings.point_size,
            pixel_scale: settings.pixel_scale,
            color: settings.color,
            background: settings.background,
        };
        Self {
            engine,
            target,
            settings,
            state,
            stage: Stage::Uninitialized,
        }
    }

    pub fn init(&mut self, program: &T::Program) -> Result<(), InitError> {
        if self.stage != Stage::Uninitialized {
            error!("Glyph renderer has already been initialized!");
            return Err(InitError::AlreadyInitialized);
        }

        self.engine.init().map_err(|err| {
            error!("Could not initialize the font engine: {err}");
            InitError::Engine(err)
        })?;

        let bindings = match self.resolve_bindings(program) {
            Ok(bindings) => bindings,
            Err(err) => {
                self.engine.shutdown();
                return Err(err);
            }
        };

        if let Err(err) = self.target.create_resources(program, bindings) {
            error!("{err}");
            self.engine.shutdown();
            return Err(err);
        }

        debug!("glyph renderer bound to {bindings:?}");
        self.stage = Stage::Initialized;
        Ok(())
    }

    fn resolve_bindings(&self, program: &T::Program) -> Result<ShaderBindings, InitError> {
        let uniform = |name: &'static str| {
            self.target.uniform_location(program, name).ok_or_else(|| {
                error!("Could not bind {name} uniform");
                InitError::MissingBinding {
                    kind: BindingKind::Uniform,
                    name,
                }
            })
        };

        let tex = uniform(TEX_UNIFORM)?;
        let color = uniform(COLOR_UNIFORM)?;
        let coord = self
            .target
            .attribute_location(program, COORD_ATTRIBUTE)
            .ok_or_else(|| {
                error!("Could not bind {COORD_ATTRIBUTE} attribute");
                InitError::MissingBinding {
                    kind: BindingKind::Attribute,
                    name: COORD_ATTRIBUTE,
                }
            })?;

        Ok(ShaderBindings { tex, color, coord })
    }

    pub fn release(&mut self) {
        if self.stage != Stage::Initialized {
            warn!("release called on a glyph renderer in stage {:?}", self.stage);
            return;
        }
        self.target.release_resources();
        self.engine.shutdown();
        self.state.face = None;
        self.stage = Stage::Released;
    }

    pub fn load_face<P: AsRef<Path>>(&mut self, path: P) -> Result<FaceHandle, FontLoadError> {
        let path = path.as_ref();
        if self.stage != Stage::Initialized {
            return Err(FontLoadError::NotInitialized);
        }

        let face = self.engine.open_face(path).map_err(|source| {
            error!("Could not open font '{}': {source}", path.display());
            FontLoadError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let sentinel = self
            .engine
            .set_pixel_size(face, self.settings.load_size)
            .and_then(|_| self.engine.rasterize(face, self.settings.sentinel));

        if let Err(source) = sentinel {
            let family = self.engine.family_name(face);
            error!(
                "Could not load character for font '{}': {source}",
                family.as_deref().unwrap_or("<unknown>")
            );
            self.engine.close_face(face);
            return Err(FontLoadError::Sentinel { family, source });
        }

        info!("loaded font '{}'", path.display());
        Ok(face)
    }

    /// Makes `face` current at `point_size`. The sentinel is only re-rasterized when the
    /// point size changes. On failure the face keeps the pixel size it had before.
    pub fn set_face(&mut self, face: FaceHandle, point_size: u32) -> Result<(), FontSetError> {
        if self.stage != Stage::Initialized {
            return Err(FontSetError::NotInitialized);
        }

        let previous = self.engine.pixel_size(face);
        let mut validated = self.engine.set_pixel_size(face, point_size);
        if validated.is_ok() && point_size != self.state.point_size {
            validated = self
                .engine
                .rasterize(face, self.settings.sentinel)
                .map(|_| ());
        }

        if let Err(source) = validated {
            if let Some(px) = previous {
                let _ = self.engine.set_pixel_size(face, px);
            }
            let family = self.engine.family_name(face);
            error!(
                "Could not load character for font '{}': {source}",
                family.as_deref().unwrap_or("<unknown>")
            );
            return Err(FontSetError::Rasterize {
                family,
                size: point_size,
                source,
            });
        }

        self.state.point_size = point_size;
        self.state.face = Some(face);
        Ok(())
    }

    pub fn set_pixel_scale(&mut self, scale: u32) {
        self.state.pixel_scale = scale;
    }

    pub fn set_color(&mut self, color: Color) {
        self.state.color = color;
    }

    pub fn set_background(&mut self, color: Color) {
        self.state.background = color;
    }

    /// Draws `text` with its first line's top-left corner at pixel `(x, y)`, `(0, 0)` being
    /// the viewport's top-left. `width` and `height` are the text box in character cells and
    /// only matter for [`Aspect::FitBox`].
    pub fn draw(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    ) -> Result<TextRun, DrawError> {
        if self.stage != Stage::Initialized {
            return Err(DrawError::NotInitialized);
        }
        let face = self.state.face.ok_or(DrawError::NoFace)?;
        let viewport = self.target.viewport();
        if viewport.is_empty() {
            return Err(DrawError::EmptyViewport);
        }

        self.target.begin(self.state.color);

        let point_size = self.state.point_size as f32;
        // bitmaps start at their bottom-left corner
        let y = y + point_size;

        let aspect = match self.settings.aspect {
            Aspect::Fixed(aspect) => aspect,
            Aspect::FitBox => {
                let cell_width = self
                    .engine
                    .rasterize(face, self.settings.sentinel)
                    .map(|glyph| glyph.bitmap.width as f32)
                    .unwrap_or(point_size);
                fit_aspect(
                    viewport,
                    width as f32 * cell_width + x,
                    height as f32 * point_size + y,
                )
            }
        };
        let scale = DeviceScale::new(aspect, self.state.pixel_scale, viewport);

        let start = scale.to_device(x, y);
        let mut pen = Pen::new(start);
        let mut drawn = 0;
        let mut skipped = 0;

        for character in text.chars() {
            match character {
                '\n' => pen.newline(point_size * scale.sy),
                '\r' => {}
                _ => match self.engine.rasterize(face, character) {
                    Ok(glyph) => {
                        self.render_glyph(&glyph, &mut pen, &scale);
                        drawn += 1;
                    }
                    Err(err) => {
                        trace!("skipping {character:?}: {err}");
                        skipped += 1;
                    }
                },
            }
        }

        Ok(TextRun {
            start,
            end: pen.position,
            drawn,
            skipped,
        })
    }

    fn render_glyph(&mut self, glyph: &Glyph, pen: &mut Pen, scale: &DeviceScale) {
        self.target.upload_bitmap(&glyph.bitmap);

        let advance = glyph.advance_px();
        // center narrow glyphs inside a point-size wide cell
        let centering = (self.state.point_size as f32 - advance.x as f32) / 2.0;

        let x = pen.position.x + (glyph.left as f32 + centering) * scale.sx;
        let top = pen.position.y + glyph.top as f32 * scale.sy;
        let w = glyph.bitmap.width as f32 * scale.sx;
        let h = glyph.bitmap.height as f32 * scale.sy;

        self.target.upload_quad(&GlyphQuad::new(x, top, w, h));
        self.target.draw_strip();

        pen.advance(scale.scale(Vector2::new(advance.x as f32, advance.y as f32)));
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn current_face(&self) -> Option<FaceHandle> {
        self.state.face
    }

    pub fn point_size(&self) -> u32 {
        self.state.point_size
    }

    pub fn pixel_scale(&self) -> u32 {
        self.state.pixel_scale
    }

    pub fn color(&self) -> Color {
        self.state.color
    }

    pub fn background(&self) -> Color {
        self.state.background
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}
