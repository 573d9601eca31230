use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glyphquad::{
    program::WgslProgram, render::WgpuTarget, Color, FontdueEngine, GlyphRenderer,
    RenderSettings,
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a line of text into a PNG")]
struct Args {
    /// TrueType or OpenType font file.
    font: PathBuf,
    /// Text to draw; `\n` starts a new line.
    text: String,
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 640)]
    width: u32,
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Left edge of the first line, in pixels.
    #[arg(long, default_value_t = 0.0)]
    x: f32,
    /// Top edge of the first line, in pixels.
    #[arg(long, default_value_t = 0.0)]
    y: f32,
    #[arg(long, default_value_t = 24)]
    point_size: u32,
    #[arg(long, default_value_t = 2)]
    pixel_scale: u32,
    /// Text color as RRGGBB or RRGGBBAA.
    #[arg(long, default_value = "ffffffff", value_parser = parse_color)]
    color: Color,
    #[arg(long, default_value = "000000ff", value_parser = parse_color)]
    background: Color,
}

fn parse_color(hex: &str) -> Result<Color, String> {
    Color::from_hex(hex).ok_or_else(|| format!("`{hex}` is not an RRGGBB[AA] color"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = RenderSettings::new()
        .with_pixel_scale(args.pixel_scale)
        .with_color(args.color)
        .with_background(args.background);
    let target = WgpuTarget::new(args.width, args.height)?;
    let mut renderer = GlyphRenderer::with_settings(FontdueEngine::new(), target, settings);
    renderer.init(&WgslProgram::glyph()?)?;

    let face = renderer.load_face(&args.font)?;
    renderer.set_face(face, args.point_size)?;

    let background = renderer.background();
    renderer.target_mut().clear(background);
    let text = args.text.replace("\\n", "\n");
    let run = renderer.draw(&text, args.x, args.y, 0, 0)?;
    info!(
        "drew {} glyphs ({} skipped), pen ended at {:?}",
        run.drawn, run.skipped, run.end
    );

    renderer.target().read_pixels()?.save(&args.output)?;
    renderer.release();
    println!("wrote {}", args.output.display());

    Ok(())
}
