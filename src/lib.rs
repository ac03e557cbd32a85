//! Datarain renders the "data rain" header animation: layered, vertically scrolling streams of
//! binary digits and small decorative symbols, encoded as a looping animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: [`RainConfig`] (defaults reproduce the stock 600x200, 15 fps, 60 frame loop)
//! 2. **Plan**: [`RainRenderer`] derives per-layer [`LayerParams`] and glyph placements
//! 3. **Draw**: placements are painted through the [`Surface`] trait ([`CpuSurface`] rasterizes)
//! 4. **Encode**: frames stream into a [`FrameSink`] ([`GifSink`] writes the GIF)
//!
//! [`generate`] drives all four steps; [`generate_to_file`] wires the CPU surface and GIF sink.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: every frame is a pure function of the configuration, its seed, and the
//!   frame index, so any frame can be rendered on its own.
//! - **Premultiplied RGBA8** out of surfaces; sinks convert as their format requires.
#![forbid(unsafe_code)]

mod config;
mod encode;
mod foundation;
mod pipeline;
mod rain;
mod render;

pub use config::color::ColorDef;
pub use config::model::{
    DEFAULT_OUT_PATH, DrawOrder, GifOptions, GlyphSelection, MAX_GLYPHS_PER_LAYER, RainConfig,
};
pub use encode::gif::{GifSink, GifSinkOpts, GifTarget, ensure_parent_dir, gif_delay_ms};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8, Rgba8Premul};
pub use foundation::error::{RainError, RainResult};
pub use pipeline::{GenerateStats, generate, generate_to_file, render_frame};
pub use rain::layer::{JITTER_PHASE, LayerParams, is_binary_digit};
pub use rain::renderer::{GlyphPlacement, RainRenderer};
pub use render::cpu::CpuSurface;
pub use render::fonts::{FontStore, ShapedText};
pub use render::recording::{DrawCall, RecordingSurface};
pub use render::surface::{FontSpec, FrameRGBA, GradientBlend, LinearGradient, Surface};
