use crate::{config::model::RainConfig, foundation::core::FrameIndex};

/// Multiplier applied to the slot index before `sin`, decorrelating neighbouring jitter.
pub const JITTER_PHASE: f64 = 397.0;

/// Per-layer values derived from the configuration. Layer 0 is the front layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerParams {
    pub index: u32,
    /// Vertical period after which the layer's pattern repeats.
    pub tile_height: f64,
    pub symbol_count: u32,
    /// Number of tiles stacked down the canvas.
    pub repeats: u32,
    pub alpha: f64,
    pub speed: f64,
    pub binary_font_size: f32,
    pub special_font_size: f32,
}

impl LayerParams {
    /// Derive parameters for `layer`. Callers keep `layer < cfg.layers`.
    pub fn derive(cfg: &RainConfig, layer: u32) -> Self {
        let repeats = cfg.layers.saturating_sub(layer).max(1);
        let l = f64::from(layer);
        let shrink = layer as f32 * cfg.font_size_step;
        Self {
            index: layer,
            tile_height: f64::from(cfg.height) / f64::from(repeats),
            symbol_count: cfg.symbols_per_layer / (layer + 1),
            repeats,
            alpha: cfg.base_alpha - l * cfg.alpha_decrease,
            speed: cfg.base_speed - l * cfg.speed_decrease,
            binary_font_size: cfg.binary_font_size - shrink,
            special_font_size: cfg.special_font_size - shrink,
        }
    }

    /// Font size for `symbol`: binary digits and decorative glyphs use separate bases.
    pub fn font_size_for(&self, symbol: &str) -> f32 {
        if is_binary_digit(symbol) {
            self.binary_font_size
        } else {
            self.special_font_size
        }
    }

    /// Clamped horizontal position of slot `i`.
    pub fn slot_x(&self, cfg: &RainConfig, i: u32) -> f64 {
        let margin = cfg.edge_margin;
        let usable = f64::from(cfg.width) - 2.0 * margin;
        let base_x = if self.symbol_count > 1 {
            margin + (f64::from(i) / f64::from(self.symbol_count - 1)) * usable
        } else {
            margin + usable / 2.0
        };
        let offset = (f64::from(i) * JITTER_PHASE).sin() * usable * cfg.horizontal_spread;
        (base_x + offset).clamp(margin, f64::from(cfg.width) - margin)
    }

    /// Scrolled vertical offset of slot `i` within one tile, in `[0, tile_height)`.
    pub fn slot_y(&self, frame: FrameIndex, i: u32) -> f64 {
        if self.symbol_count == 0 || self.tile_height <= 0.0 {
            return 0.0;
        }
        let raw = frame.0 as f64 * self.speed
            + f64::from(i) * self.tile_height / f64::from(self.symbol_count);
        let y = raw.rem_euclid(self.tile_height);
        // rem_euclid can round up to the modulus for tiny negative inputs.
        if y >= self.tile_height { 0.0 } else { y }
    }
}

pub fn is_binary_digit(symbol: &str) -> bool {
    symbol == "0" || symbol == "1"
}

#[cfg(test)]
#[path = "../../tests/unit/rain/layer.rs"]
mod tests;
