use crate::{
    foundation::core::{Canvas, Rect, Rgba8},
    foundation::error::{RainError, RainResult},
    render::surface::{FontSpec, FrameRGBA, LinearGradient, Surface},
};

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// `clear_rect`.
    Clear(Rect),
    /// `fill_rect` with the fill style active at the time.
    FillRect { rect: Rect, color: Rgba8 },
    /// `fill_text` with the fill style and font active at the time.
    Text {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Rgba8,
    },
    /// `fill_gradient`.
    Gradient { rect: Rect, gradient: LinearGradient },
    /// `snapshot`; separates frames.
    Snapshot,
}

/// Surface that records calls instead of rasterizing.
///
/// Snapshots are fully transparent frames of the right size, so a `RecordingSurface` can drive a
/// real sink without any font being installed.
#[derive(Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    fill: Rgba8,
    font: Option<FontSpec>,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            fill: Rgba8::new(0, 0, 0, 255),
            font: None,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Text calls only, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f64, f64, &FontSpec, Rgba8)> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text {
                text,
                x,
                y,
                font,
                color,
            } => Some((text.as_str(), *x, *y, font, *color)),
            _ => None,
        })
    }

    /// Calls grouped per snapshot. Calls after the last snapshot are dropped.
    pub fn frames(&self) -> Vec<&[DrawCall]> {
        let mut out = Vec::new();
        let mut start = 0usize;
        for (i, c) in self.calls.iter().enumerate() {
            if *c == DrawCall::Snapshot {
                out.push(&self.calls[start..i]);
                start = i + 1;
            }
        }
        out
    }
}

impl Surface for RecordingSurface {
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
        self.calls.push(DrawCall::Clear(rect));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> RainResult<()> {
        self.calls.push(DrawCall::FillRect {
            rect,
            color: self.fill,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> RainResult<()> {
        let font = self
            .font
            .clone()
            .ok_or_else(|| RainError::render("fill_text called before set_font"))?;
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            font,
            color: self.fill,
        });
        Ok(())
    }

    fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) -> RainResult<()> {
        self.calls.push(DrawCall::Gradient {
            rect,
            gradient: *gradient,
        });
        Ok(())
    }

    fn snapshot(&mut self) -> RainResult<FrameRGBA> {
        self.calls.push(DrawCall::Snapshot);
        Ok(FrameRGBA::transparent(self.canvas))
    }
}
