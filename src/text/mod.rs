// text drawing, one glyph at a time:
// - a font engine turns characters into single-channel bitmaps + metrics
// - every bitmap goes into the same texture, every quad into the same buffer
// - one triangle strip per glyph, the pen walks along the advances

pub mod font;
pub mod fontdue_engine;
pub mod pipeline;
pub mod renderer;
