use crate::{
    foundation::core::{Canvas, Point, Rect, Rgba8},
    foundation::error::{RainError, RainResult},
    foundation::math::{mul_div255_u16, over},
    render::fonts::FontStore,
    render::surface::{FontSpec, FrameRGBA, GradientBlend, LinearGradient, Surface},
};

/// CPU raster surface backed by `vello_cpu`.
///
/// Vector draws (rects, glyph runs) are batched into a `vello_cpu::RenderContext` and composited
/// over the canvas on the next pixel-level operation (`clear_rect`, `fill_gradient`,
/// `snapshot`). The canvas is premultiplied RGBA8.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    pending: Option<vello_cpu::RenderContext>,
    fill: Rgba8,
    font: Option<FontSpec>,
    fonts: FontStore,
}

impl CpuSurface {
    pub fn new(canvas: Canvas, fonts: FontStore) -> RainResult<Self> {
        let (width, height) = canvas.to_u16()?;
        if width == 0 || height == 0 {
            return Err(RainError::validation("surface width/height must be non-zero"));
        }
        Ok(Self {
            canvas,
            width,
            height,
            pixels: vec![0u8; canvas.pixel_count() * 4],
            pending: None,
            fill: Rgba8::new(0, 0, 0, 255),
            font: None,
            fonts,
        })
    }

    pub fn fonts_mut(&mut self) -> &mut FontStore {
        &mut self.fonts
    }

    fn ctx(&mut self) -> &mut vello_cpu::RenderContext {
        let (w, h) = (self.width, self.height);
        self.pending.get_or_insert_with(|| vello_cpu::RenderContext::new(w, h))
    }

    fn commit(&mut self) {
        let Some(mut ctx) = self.pending.take() else {
            return;
        };
        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);

        for (d, s) in self
            .pixels
            .chunks_exact_mut(4)
            .zip(layer.data_as_u8_slice().chunks_exact(4))
        {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }

    /// Integer pixel bounds covered by `rect`, clipped to the canvas.
    fn pixel_bounds(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let r = rect.abs().intersect(self.canvas.rect());
        if r.width() <= 0.0 || r.height() <= 0.0 {
            return None;
        }
        Some((
            r.x0.floor() as u32,
            r.y0.floor() as u32,
            (r.x1.ceil() as u32).min(self.canvas.width),
            (r.y1.ceil() as u32).min(self.canvas.height),
        ))
    }

    fn for_each_pixel(&mut self, rect: Rect, mut f: impl FnMut(u32, u32, &mut [u8])) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(rect) else {
            return;
        };
        let stride = self.canvas.width as usize * 4;
        for y in y0..y1 {
            let row = &mut self.pixels[y as usize * stride..(y as usize + 1) * stride];
            for x in x0..x1 {
                let i = x as usize * 4;
                f(x, y, &mut row[i..i + 4]);
            }
        }
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn set_fill_style(&mut self, color: Rgba8) {
        self.fill = color;
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.font = Some(font.clone());
    }

    fn clear_rect(&mut self, rect: Rect) -> RainResult<()> {
        self.commit();
        self.for_each_pixel(rect, |_, _, px| px.fill(0));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> RainResult<()> {
        let c = self.fill;
        let ctx = self.ctx();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> RainResult<()> {
        let font = self
            .font
            .clone()
            .ok_or_else(|| RainError::render("fill_text called before set_font"))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(RainError::render(format!(
                "text position must be finite (got {x}, {y})"
            )));
        }

        let shaped = self.fonts.shape(&font, text)?;
        let c = self.fill;
        let ctx = self.ctx();
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            x,
            y - f64::from(shaped.baseline),
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        ctx.glyph_run(&shaped.font)
            .font_size(shaped.size_px)
            .fill_glyphs(shaped.glyphs.iter().cloned());
        Ok(())
    }

    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) -> RainResult<()> {
        self.commit();
        let g = *gradient;
        self.for_each_pixel(rect, |x, y, px| {
            let t = g.t_at(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5));
            let c = g.color_at(t);
            match g.blend {
                GradientBlend::Over => {
                    let out = over([px[0], px[1], px[2], px[3]], c.premultiply().to_array());
                    px.copy_from_slice(&out);
                }
                GradientBlend::Mask => {
                    let k = u16::from(c.a);
                    for v in px.iter_mut() {
                        *v = mul_div255_u16(u16::from(*v), k) as u8;
                    }
                }
            }
        });
        Ok(())
    }

    fn snapshot(&mut self) -> RainResult<FrameRGBA> {
        self.commit();
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixels.clone(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
