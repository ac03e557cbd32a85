use std::path::{Path, PathBuf};

use crate::{
    config::model::{DrawOrder, RainConfig},
    encode::gif::{GifSink, GifSinkOpts},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{FrameIndex, Point, Rect, Rgba8},
    foundation::error::RainResult,
    rain::renderer::RainRenderer,
    render::cpu::CpuSurface,
    render::fonts::FontStore,
    render::surface::{FrameRGBA, GradientBlend, LinearGradient, Surface},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub frames: u64,
    pub glyphs: u64,
}

/// Compose one frame onto `surface` and read it back.
pub fn render_frame(
    cfg: &RainConfig,
    frame: FrameIndex,
    surface: &mut dyn Surface,
) -> RainResult<(FrameRGBA, u64)> {
    let renderer = RainRenderer::new(cfg);
    compose_frame(cfg, &renderer, frame, surface)
}

/// Render every frame of `cfg` onto `surface` and stream them into `sink`.
#[tracing::instrument(skip_all, fields(frames = cfg.total_frames, layers = cfg.layers))]
pub fn generate(
    cfg: &RainConfig,
    surface: &mut dyn Surface,
    sink: &mut dyn FrameSink,
) -> RainResult<GenerateStats> {
    cfg.validate()?;

    let range = cfg.frame_range()?;
    sink.begin(SinkConfig {
        width: cfg.width,
        height: cfg.height,
        fps: cfg.fps()?,
        loop_count: cfg.gif.loop_count,
    })?;

    let renderer = RainRenderer::new(cfg);
    let mut stats = GenerateStats::default();
    for idx in range.iter() {
        let (frame, glyphs) = compose_frame(cfg, &renderer, idx, surface)?;
        sink.push_frame(idx, &frame)?;
        stats.frames += 1;
        stats.glyphs += glyphs;
        tracing::debug!(frame = idx.0, glyphs, "frame composed");
    }
    sink.end()?;

    tracing::info!(frames = stats.frames, glyphs = stats.glyphs, "animation generated");
    Ok(stats)
}

/// Render `cfg` with the CPU surface and write a GIF to `out` (defaults to `cfg.out_path`).
pub fn generate_to_file(cfg: &RainConfig, out: Option<&Path>) -> RainResult<PathBuf> {
    cfg.validate()?;
    let out = out.map_or_else(|| cfg.out_path.clone(), Path::to_path_buf);

    let mut surface = CpuSurface::new(cfg.canvas(), FontStore::new(cfg.font_path.clone()))?;
    let mut sink = GifSink::to_file(&out, GifSinkOpts::from_config(cfg));
    generate(cfg, &mut surface, &mut sink)?;
    Ok(out)
}

fn compose_frame(
    cfg: &RainConfig,
    renderer: &RainRenderer<'_>,
    idx: FrameIndex,
    surface: &mut dyn Surface,
) -> RainResult<(FrameRGBA, u64)> {
    let full = surface.canvas().rect();
    surface.clear_rect(full)?;
    if let Some(bg) = cfg.background {
        surface.set_fill_style(bg.rgba8());
        surface.fill_rect(full)?;
    }

    let mut glyphs = 0u64;
    for layer in layer_order(cfg) {
        glyphs += renderer.render_layer(idx, layer, surface)? as u64;
    }

    if let Some(fade_px) = cfg.bottom_fade_px {
        apply_bottom_fade(cfg, surface, fade_px)?;
    }

    Ok((surface.snapshot()?, glyphs))
}

fn layer_order(cfg: &RainConfig) -> Box<dyn Iterator<Item = u32>> {
    match cfg.draw_order {
        DrawOrder::Ascending => Box::new(0..cfg.layers),
        DrawOrder::BackToFront => Box::new((0..cfg.layers).rev()),
    }
}

fn apply_bottom_fade(cfg: &RainConfig, surface: &mut dyn Surface, fade_px: f64) -> RainResult<()> {
    let height = f64::from(cfg.height);
    let top = (height - fade_px).max(0.0);
    let band = Rect::new(0.0, top, f64::from(cfg.width), height);

    let gradient = match cfg.background {
        // Paint the background back in, transparent at the top of the band.
        Some(bg) => {
            let bg = bg.rgba8();
            LinearGradient {
                start: Point::new(0.0, top),
                end: Point::new(0.0, height),
                from: Rgba8 { a: 0, ..bg },
                to: bg,
                blend: GradientBlend::Over,
            }
        }
        None => LinearGradient {
            start: Point::new(0.0, top),
            end: Point::new(0.0, height),
            from: Rgba8::new(0, 0, 0, 255),
            to: Rgba8::TRANSPARENT,
            blend: GradientBlend::Mask,
        },
    };
    surface.fill_gradient(band, &gradient)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
