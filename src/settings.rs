use crate::plain::Plain;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    RGBA(f32, f32, f32, f32),
}

impl Color {
    pub const WHITE: Color = Color::RGBA(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::RGBA(0.0, 0.0, 0.0, 1.0);

    pub fn as_array(&self) -> [f32; 4] {
        match *self {
            Color::RGBA(r, g, b, a) => [r, g, b, a],
        }
    }

    /// Parses `RRGGBB` or `RRGGBBAA` hex, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Some(Color::RGBA(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.as_array();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

/// How glyph-space pixels are stretched onto the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Aspect {
    /// A constant factor; `Fixed(1.0)` maps one scaled pixel to one viewport pixel.
    Fixed(f32),
    /// Scale the `width` x `height` cell box passed to `draw` so it fits the viewport.
    FitBox,
}

/// Configuration for a [`GlyphRenderer`](crate::text::renderer::GlyphRenderer).
///
/// ```
/// use glyphquad::settings::{Color, RenderSettings};
///
/// let settings = RenderSettings::new()
///     .with_point_size(24)
///     .with_color(Color::RGBA(1.0, 0.0, 0.0, 1.0));
/// assert_eq!(settings.point_size, 24);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub point_size: u32,
    pub pixel_scale: u32,
    pub color: Color,
    pub background: Color,
    pub sentinel: char,
    /// Pixel size applied to a face right after it is opened.
    pub load_size: u32,
    pub aspect: Aspect,
}

impl RenderSettings {
    pub fn new() -> Self {
        Self {
            point_size: 12,
            pixel_scale: 2,
            color: Color::WHITE,
            background: Color::BLACK,
            sentinel: 'X',
            load_size: 12,
            aspect: Aspect::Fixed(1.0),
        }
    }

    pub fn with_point_size(mut self, point_size: u32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_pixel_scale(mut self, pixel_scale: u32) -> Self {
        self.pixel_scale = pixel_scale;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_sentinel(mut self, sentinel: char) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn with_load_size(mut self, load_size: u32) -> Self {
        self.load_size = load_size;
        self
    }

    pub fn with_aspect(mut self, aspect: Aspect) -> Self {
        self.aspect = aspect;
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// The color uniform as uploaded to the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorUniform {
    pub color: [f32; 4],
}

unsafe impl Plain for ColorUniform {}

impl From<Color> for ColorUniform {
    fn from(color: Color) -> Self {
        Self {
            color: color.as_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.point_size, 12);
        assert_eq!(settings.pixel_scale, 2);
        assert_eq!(settings.color, Color::WHITE);
        assert_eq!(settings.background, Color::BLACK);
        assert_eq!(settings.sentinel, 'X');
        assert_eq!(settings.aspect, Aspect::Fixed(1.0));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_hex("#ffffff"), Some(Color::WHITE));
        assert_eq!(
            Color::from_hex("ff000080"),
            Some(Color::RGBA(1.0, 0.0, 0.0, 128.0 / 255.0))
        );
        assert_eq!(Color::from_hex("fff"), None);
        assert_eq!(Color::from_hex("gg0000"), None);
    }
}
