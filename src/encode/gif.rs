use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::{
    config::model::RainConfig,
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{Fps, FrameIndex, Rgba8},
    foundation::error::{RainError, RainResult},
    foundation::math::{mul_div255_u16, unpremultiply},
    render::surface::FrameRGBA,
};

/// Where a [`GifSink`] puts the encoded stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GifTarget {
    /// Write to this path on `end`, creating parent directories.
    File(PathBuf),
    /// Keep the bytes; read them back with [`GifSink::bytes`].
    Memory,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GifSinkOpts {
    /// NeuQuant sampling speed, `1..=30`.
    pub speed: i32,
    /// Opaque color frames are flattened over. `None` keeps GIF transparency.
    pub background: Option<Rgba8>,
    /// Without a background, pixels below this alpha become transparent.
    pub transparency_threshold: u8,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            speed: 10,
            background: None,
            transparency_threshold: 32,
        }
    }
}

impl GifSinkOpts {
    pub fn from_config(cfg: &RainConfig) -> Self {
        Self {
            speed: cfg.gif.speed,
            background: cfg.background.map(|c| c.rgba8()),
            transparency_threshold: cfg.gif.transparency_threshold,
        }
    }
}

/// Frame sink producing an animated GIF through `image`'s GIF codec.
///
/// Frames are converted and queued as they arrive; the stream is encoded and written on `end`,
/// so a failed run never leaves a truncated file behind.
pub struct GifSink {
    target: GifTarget,
    opts: GifSinkOpts,
    cfg: Option<SinkConfig>,
    delay: image::Delay,
    frames: Vec<image::Frame>,
    last_idx: Option<FrameIndex>,
    bytes: Option<Vec<u8>>,
}

impl GifSink {
    pub fn new(target: GifTarget, opts: GifSinkOpts) -> Self {
        Self {
            target,
            opts,
            cfg: None,
            delay: image::Delay::from_numer_denom_ms(0, 1),
            frames: Vec::new(),
            last_idx: None,
            bytes: None,
        }
    }

    pub fn to_file(path: impl Into<PathBuf>, opts: GifSinkOpts) -> Self {
        Self::new(GifTarget::File(path.into()), opts)
    }

    pub fn in_memory(opts: GifSinkOpts) -> Self {
        Self::new(GifTarget::Memory, opts)
    }

    /// Encoded stream, available after `end`.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> RainResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(RainError::validation("gif width/height must be non-zero"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(RainError::validation("gif width/height must fit in u16"));
        }
        if !(1..=30).contains(&self.opts.speed) {
            return Err(RainError::validation("gif speed must be in 1..=30"));
        }

        self.delay = image::Delay::from_numer_denom_ms(gif_delay_ms(cfg.fps), 1);
        self.cfg = Some(cfg);
        self.frames.clear();
        self.last_idx = None;
        self.bytes = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RainResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| RainError::encode("push_frame called before begin"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(RainError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != cfg.width as usize * cfg.height as usize * 4 {
            return Err(RainError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(RainError::encode(format!(
                "frames must arrive in increasing order (got {} after {:?})",
                idx.0, self.last_idx
            )));
        }

        let mut rgba = vec![0u8; frame.data.len()];
        match self.opts.background {
            Some(bg) => flatten_to_opaque_rgba8(&mut rgba, &frame.data, frame.premultiplied, bg)?,
            None => to_gif_transparency(
                &mut rgba,
                &frame.data,
                frame.premultiplied,
                self.opts.transparency_threshold,
            )?,
        }

        let buffer = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| RainError::encode("frame buffer does not match its dimensions"))?;
        self.frames
            .push(image::Frame::from_parts(buffer, 0, 0, self.delay));
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> RainResult<()> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| RainError::encode("end called before begin"))?;
        if self.frames.is_empty() {
            return Err(RainError::encode("gif sink received no frames"));
        }

        let mut buf = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut buf, self.opts.speed);
            let repeat = match cfg.loop_count {
                None => Repeat::Infinite,
                Some(n) => Repeat::Finite(n),
            };
            encoder
                .set_repeat(repeat)
                .map_err(|e| RainError::encode(format!("set gif repeat: {e}")))?;
            encoder
                .encode_frames(std::mem::take(&mut self.frames))
                .map_err(|e| RainError::encode(format!("encode gif frames: {e}")))?;
        }

        if let GifTarget::File(path) = &self.target {
            ensure_parent_dir(path)?;
            std::fs::write(path, &buf)
                .with_context(|| format!("write gif '{}'", path.display()))?;
            tracing::info!(path = %path.display(), bytes = buf.len(), "wrote gif");
        }
        self.bytes = Some(buf);
        Ok(())
    }
}

/// Per-frame delay in milliseconds, rounded to the GIF's centisecond resolution.
///
/// 15 fps is 66.67 ms, stored as 7 cs (70 ms).
pub fn gif_delay_ms(fps: Fps) -> u32 {
    let cs = (fps.frame_duration_ms() / 10.0).round().max(1.0);
    (cs as u32).saturating_mul(10)
}

pub fn ensure_parent_dir(path: &Path) -> RainResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// GIF has 1-bit transparency: faint pixels drop out, the rest become opaque straight color.
fn to_gif_transparency(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    threshold: u8,
) -> RainResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RainError::validation(
            "to_gif_transparency expects equal-length rgba8 buffers",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3];
        if a == 0 || a < threshold {
            d.copy_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let straight = if src_is_premul {
            unpremultiply([s[0], s[1], s[2], a])
        } else {
            [s[0], s[1], s[2], a]
        };
        d.copy_from_slice(&[straight[0], straight[1], straight[2], 255]);
    }

    Ok(())
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> RainResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RainError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg.r);
    let bg_g = u16::from(bg.g);
    let bg_b = u16::from(bg.b);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - a;

        let (r, g, b) = if src_is_premul {
            (
                u16::from(s[0]) + mul_div255_u16(bg_r, inv),
                u16::from(s[1]) + mul_div255_u16(bg_g, inv),
                u16::from(s[2]) + mul_div255_u16(bg_b, inv),
            )
        } else {
            (
                mul_div255_u16(u16::from(s[0]), a) + mul_div255_u16(bg_r, inv),
                mul_div255_u16(u16::from(s[1]), a) + mul_div255_u16(bg_g, inv),
                mul_div255_u16(u16::from(s[2]), a) + mul_div255_u16(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
