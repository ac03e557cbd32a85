use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    config::color::ColorDef,
    foundation::core::{Canvas, Fps, FrameIndex, FrameRange},
    foundation::error::{RainError, RainResult},
};

/// Default output location, relative to the working directory.
pub const DEFAULT_OUT_PATH: &str = "dist/header-animation.gif";

/// Upper bound on glyphs drawn by a single layer in one frame.
pub const MAX_GLYPHS_PER_LAYER: u64 = 1 << 16;

/// How a glyph is chosen for each vertical repeat of a symbol slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphSelection {
    /// Seeded uniform pick from the alphabet, independently per repeat.
    #[default]
    Random,
    /// `symbols[slot % symbols.len()]`.
    Cyclic,
}

/// Order in which layers are composited within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawOrder {
    /// Layer 0 first, deepest layer last (on top).
    #[default]
    Ascending,
    /// Deepest layer first, layer 0 on top.
    BackToFront,
}

/// GIF encoder knobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifOptions {
    /// NeuQuant sampling speed, `1..=30`. Lower is slower and more accurate.
    pub speed: i32,
    /// Loop count. `None` loops forever.
    pub loop_count: Option<u16>,
    /// Without a background, pixels whose alpha is below this become transparent.
    pub transparency_threshold: u8,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            speed: 10,
            loop_count: None,
            transparency_threshold: 32,
        }
    }
}

/// Complete, immutable description of one animation.
///
/// Every field has a default, so a JSON file only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub width: u32,
    pub height: u32,

    pub frames_per_second: u32,
    pub total_frames: u64,

    pub binary_font_size: f32,
    pub special_font_size: f32,
    /// Font size lost per layer of depth.
    pub font_size_step: f32,
    /// Family name, or one of the generic families (`monospace`, `sans-serif`, `serif`).
    pub font_family: String,
    /// Explicit font file; takes precedence over `font_family`.
    pub font_path: Option<PathBuf>,
    pub symbols: Vec<String>,
    pub glyph_selection: GlyphSelection,
    pub seed: u64,

    pub layers: u32,
    pub base_alpha: f64,
    pub alpha_decrease: f64,
    pub draw_order: DrawOrder,

    pub base_speed: f64,
    pub speed_decrease: f64,

    pub symbols_per_layer: u32,
    pub horizontal_spread: f64,
    pub edge_margin: f64,

    pub symbol_color: ColorDef,
    /// Opaque fill behind every frame. `None` keeps the frame transparent.
    pub background: Option<ColorDef>,
    /// Height of the fade band at the bottom edge, in pixels.
    pub bottom_fade_px: Option<f64>,

    pub gif: GifOptions,
    pub out_path: PathBuf,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 200,
            frames_per_second: 15,
            total_frames: 60,
            binary_font_size: 16.0,
            special_font_size: 14.0,
            font_size_step: 3.0,
            font_family: "monospace".to_string(),
            font_path: None,
            symbols: ["1", "0", "1", "0", "•", "◆", "○", "□"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            glyph_selection: GlyphSelection::Random,
            seed: 1,
            layers: 4,
            base_alpha: 0.8,
            alpha_decrease: 0.15,
            draw_order: DrawOrder::Ascending,
            base_speed: 4.0,
            speed_decrease: 0.5,
            symbols_per_layer: 5,
            horizontal_spread: 0.05,
            edge_margin: 40.0,
            symbol_color: ColorDef::rgb(120, 235, 126),
            background: None,
            bottom_fade_px: None,
            gif: GifOptions::default(),
            out_path: PathBuf::from(DEFAULT_OUT_PATH),
        }
    }
}

impl RainConfig {
    /// Read a (partial) JSON configuration file.
    pub fn from_json_file(path: &Path) -> RainResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    pub fn from_json_slice(bytes: &[u8]) -> RainResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| RainError::serde(format!("config json: {e}")))
    }

    pub fn to_json_pretty(&self) -> RainResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RainError::serde(e.to_string()))
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn fps(&self) -> RainResult<Fps> {
        Fps::new(self.frames_per_second, 1)
    }

    pub fn frame_range(&self) -> RainResult<FrameRange> {
        FrameRange::new(FrameIndex(0), FrameIndex(self.total_frames))
    }

    pub fn validate(&self) -> RainResult<()> {
        self.canvas().to_u16()?;
        if self.width == 0 || self.height == 0 {
            return Err(RainError::validation("width/height must be non-zero"));
        }
        self.fps()?;
        if self.total_frames == 0 {
            return Err(RainError::validation("total_frames must be non-zero"));
        }
        if self.layers == 0 {
            return Err(RainError::validation("layers must be non-zero"));
        }
        if self.symbols.is_empty() {
            return Err(RainError::validation("symbols must be non-empty"));
        }
        if let Some(s) = self.symbols.iter().find(|s| s.is_empty()) {
            return Err(RainError::validation(format!(
                "symbols must be non-empty strings (got {s:?})"
            )));
        }

        let finite = [
            ("base_alpha", self.base_alpha),
            ("alpha_decrease", self.alpha_decrease),
            ("base_speed", self.base_speed),
            ("speed_decrease", self.speed_decrease),
            ("horizontal_spread", self.horizontal_spread),
            ("edge_margin", self.edge_margin),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(RainError::validation(format!("{name} must be finite")));
            }
        }

        if self.edge_margin < 0.0 || 2.0 * self.edge_margin >= f64::from(self.width) {
            return Err(RainError::validation(
                "edge_margin must be >= 0 and leave a usable width",
            ));
        }

        // Layer 0 has the most slots and the most repeats.
        let front_glyphs = u64::from(self.symbols_per_layer) * u64::from(self.layers);
        if front_glyphs > MAX_GLYPHS_PER_LAYER {
            return Err(RainError::validation(format!(
                "symbols_per_layer * layers must be <= {MAX_GLYPHS_PER_LAYER} (got {front_glyphs})"
            )));
        }

        let deepest = f64::from(self.layers - 1);
        let alpha_range = 0.0..=1.0;
        if !alpha_range.contains(&self.base_alpha)
            || !alpha_range.contains(&(self.base_alpha - deepest * self.alpha_decrease))
        {
            return Err(RainError::validation(format!(
                "layer alpha must stay within 0..=1 for all {} layers",
                self.layers
            )));
        }

        let deepest_f32 = (self.layers - 1) as f32;
        for (name, base) in [
            ("binary_font_size", self.binary_font_size),
            ("special_font_size", self.special_font_size),
        ] {
            let smallest = base - deepest_f32 * self.font_size_step;
            if !base.is_finite() || !smallest.is_finite() || smallest <= 0.0 {
                return Err(RainError::validation(format!(
                    "{name} must stay > 0 for all {} layers",
                    self.layers
                )));
            }
        }

        if !(1..=30).contains(&self.gif.speed) {
            return Err(RainError::validation("gif.speed must be in 1..=30"));
        }
        if let Some(h) = self.bottom_fade_px
            && (!h.is_finite() || h <= 0.0)
        {
            return Err(RainError::validation("bottom_fade_px must be finite and > 0"));
        }
        if self.background.is_some_and(|c| c.rgba8().a != 255) {
            return Err(RainError::validation("background must be fully opaque"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
