use crate::{
    foundation::core::{Canvas, Point, Rect, Rgba8},
    foundation::error::RainResult,
    foundation::math::unpremultiply,
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent premultiplied frame.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.pixel_count() * 4],
            premultiplied: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Pixel data as straight (non-premultiplied) RGBA8, e.g. for PNG export.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        self.data
            .chunks_exact(4)
            .flat_map(|px| unpremultiply([px[0], px[1], px[2], px[3]]))
            .collect()
    }
}

/// Font family plus pixel size, as in a CSS `font` shorthand (`"16px monospace"`).
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_px: f32) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

/// How a gradient combines with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientBlend {
    /// Paint the gradient over existing pixels.
    Over,
    /// Keep existing pixels, scaled by the gradient's alpha (destination-in).
    Mask,
}

/// Two-stop linear gradient between `start` and `end` in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub from: Rgba8,
    pub to: Rgba8,
    pub blend: GradientBlend,
}

impl LinearGradient {
    /// Gradient position of `p`, clamped to `0..=1`.
    pub fn t_at(&self, p: Point) -> f64 {
        let d = self.end - self.start;
        let len2 = d.hypot2();
        if len2 <= f64::EPSILON {
            return 0.0;
        }
        ((p - self.start).dot(d) / len2).clamp(0.0, 1.0)
    }

    /// Interpolated straight color at `t`.
    pub fn color_at(&self, t: f64) -> Rgba8 {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| -> u8 {
            let af = f64::from(a);
            let bf = f64::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba8::new(
            lerp(self.from.r, self.to.r),
            lerp(self.from.g, self.to.g),
            lerp(self.from.b, self.to.b),
            lerp(self.from.a, self.to.a),
        )
    }
}

/// Minimal 2D raster canvas the rain renderer draws through.
///
/// The state model mirrors an HTML canvas context: fill style and font are sticky and apply to
/// subsequent `fill_*` calls.
pub trait Surface {
    /// Canvas dimensions.
    fn canvas(&self) -> Canvas;
    /// Set the straight-alpha color used by `fill_rect` and `fill_text`.
    fn set_fill_style(&mut self, color: Rgba8);
    /// Set the font used by `fill_text`.
    fn set_font(&mut self, font: &FontSpec);
    /// Reset `rect` to fully transparent.
    fn clear_rect(&mut self, rect: Rect) -> RainResult<()>;
    /// Fill `rect` with the current fill style.
    fn fill_rect(&mut self, rect: Rect) -> RainResult<()>;
    /// Draw `text` left-aligned with its alphabetic baseline at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> RainResult<()>;
    /// Apply `gradient` inside `rect`.
    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) -> RainResult<()>;
    /// Read back the composed frame.
    fn snapshot(&mut self) -> RainResult<FrameRGBA>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
