use crate::{
    config::model::{GlyphSelection, RainConfig},
    foundation::core::FrameIndex,
    foundation::error::{RainError, RainResult},
    foundation::math::{Fnv1a64, Rng64},
    rain::layer::LayerParams,
    render::surface::{FontSpec, Surface},
};

/// One glyph placement produced by [`RainRenderer::plan_layer`].
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphPlacement {
    pub slot: u32,
    pub repeat: u32,
    pub symbol: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f32,
}

/// Draws the parallax symbol layers of one frame onto a [`Surface`].
///
/// The renderer holds no per-frame state: every placement, including random glyph choice, is a
/// pure function of the configuration, the seed, and `(frame, layer, slot, repeat)`.
#[derive(Clone, Debug)]
pub struct RainRenderer<'a> {
    cfg: &'a RainConfig,
}

impl<'a> RainRenderer<'a> {
    pub fn new(cfg: &'a RainConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RainConfig {
        self.cfg
    }

    /// Glyph placements of `layer` at `frame`, in draw order.
    pub fn plan_layer(&self, frame: FrameIndex, layer: u32) -> Vec<GlyphPlacement> {
        if self.cfg.symbols.is_empty() {
            return Vec::new();
        }
        let params = LayerParams::derive(self.cfg, layer);
        let capacity = (params.symbol_count as usize).saturating_mul(params.repeats as usize);
        let mut out = Vec::with_capacity(capacity);

        for i in 0..params.symbol_count {
            let x = params.slot_x(self.cfg, i);
            let y = params.slot_y(frame, i);
            for repeat in 0..params.repeats {
                let symbol = self.pick_symbol(frame, layer, i, repeat);
                out.push(GlyphPlacement {
                    slot: i,
                    repeat,
                    symbol: symbol.to_string(),
                    x,
                    y: y + f64::from(repeat) * params.tile_height,
                    font_size: params.font_size_for(symbol),
                });
            }
        }
        out
    }

    /// Draw `layer` of `frame`. Returns the number of glyphs drawn.
    #[tracing::instrument(level = "trace", skip(self, surface))]
    pub fn render_layer(
        &self,
        frame: FrameIndex,
        layer: u32,
        surface: &mut dyn Surface,
    ) -> RainResult<usize> {
        if layer >= self.cfg.layers {
            return Err(RainError::validation(format!(
                "layer {layer} out of range (layers = {})",
                self.cfg.layers
            )));
        }

        let params = LayerParams::derive(self.cfg, layer);
        surface.set_fill_style(self.cfg.symbol_color.rgba8().with_opacity(params.alpha));

        let placements = self.plan_layer(frame, layer);
        let mut current_size = None;
        for p in &placements {
            if current_size != Some(p.font_size) {
                surface.set_font(&FontSpec::new(&self.cfg.font_family, p.font_size));
                current_size = Some(p.font_size);
            }
            surface.fill_text(&p.symbol, p.x, p.y)?;
        }
        Ok(placements.len())
    }

    fn pick_symbol(&self, frame: FrameIndex, layer: u32, slot: u32, repeat: u32) -> &'a str {
        let symbols = &self.cfg.symbols;
        let idx = match self.cfg.glyph_selection {
            GlyphSelection::Cyclic => slot as usize % symbols.len(),
            GlyphSelection::Random => {
                let mut h = Fnv1a64::new_default();
                h.write_u8(b'G');
                h.write_u64(self.cfg.seed);
                h.write_u64(frame.0);
                h.write_u64(u64::from(layer));
                h.write_u64(u64::from(slot));
                h.write_u64(u64::from(repeat));
                Rng64::new(h.finish()).next_index(symbols.len())
            }
        };
        symbols[idx].as_str()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rain/renderer.rs"]
mod tests;
