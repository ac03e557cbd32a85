use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;

/// Configuration-facing color.
///
/// Accepted forms:
/// - `"120, 235, 126"` or `"120, 235, 126, 0.5"` (CSS `rgb()`/`rgba()` argument lists,
///   alpha in `0..=1`)
/// - `"#78eb7e"` / `"#78eb7e80"`
/// - `[120, 235, 126]` / `[120, 235, 126, 128]`
///
/// Serializes as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorDef(pub Rgba8);

impl ColorDef {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Rgba8::new(r, g, b, 255))
    }

    pub fn rgba8(self) -> Rgba8 {
        self.0
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.starts_with('#') {
            parse_hex(s)
        } else {
            parse_components(s)
        }
    }
}

impl Serialize for ColorDef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let Rgba8 { r, g, b, a } = self.0;
        let s = if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        };
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for ColorDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self(Rgba8::new(*r, *g, *b, 255))),
                [r, g, b, a] => Ok(Self(Rgba8::new(*r, *g, *b, *a))),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<ColorDef, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(ColorDef(Rgba8::new(r, g, b, a)))
}

fn parse_components(s: &str) -> Result<ColorDef, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();

    fn channel(p: &str) -> Result<u8, String> {
        p.parse::<u8>()
            .map_err(|_| format!("color channel \"{p}\" must be an integer in 0..=255"))
    }

    match parts.as_slice() {
        [r, g, b] => Ok(ColorDef(Rgba8::new(channel(r)?, channel(g)?, channel(b)?, 255))),
        [r, g, b, a] => {
            let alpha = a
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && (0.0..=1.0).contains(v))
                .ok_or_else(|| format!("alpha \"{a}\" must be a number in 0..=1"))?;
            Ok(ColorDef(
                Rgba8::new(channel(r)?, channel(g)?, channel(b)?, 255).with_opacity(alpha),
            ))
        }
        _ => Err(format!(
            "color \"{s}\" must be \"r, g, b\", \"r, g, b, a\" or a hex string"
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/color.rs"]
mod tests;
