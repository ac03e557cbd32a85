use std::{borrow::Cow, collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::Context as _;

use crate::{
    foundation::error::{RainError, RainResult},
    render::surface::FontSpec,
};

/// Glyphs of one shaped string, positioned relative to the layout's top-left corner.
pub struct ShapedText {
    pub glyphs: Vec<vello_cpu::Glyph>,
    /// Distance from the layout top to the first line's alphabetic baseline.
    pub baseline: f32,
    pub size_px: f32,
    pub font: vello_cpu::peniko::FontData,
}

#[derive(Clone)]
struct LoadedFace {
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

/// Resolves font families to font data and shapes short strings with Parley.
///
/// Faces are resolved once per family and shaped strings are cached per `(family, text, size)`,
/// so a long animation shapes each distinct glyph only a handful of times.
pub struct FontStore {
    font_path: Option<PathBuf>,
    system_db: Option<usvg::fontdb::Database>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: HashMap<String, LoadedFace>,
    shaped: HashMap<(String, String, u32), Arc<ShapedText>>,
}

impl std::fmt::Debug for FontStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontStore")
            .field("font_path", &self.font_path)
            .field("faces", &self.faces.keys().collect::<Vec<_>>())
            .field("shaped_len", &self.shaped.len())
            .finish()
    }
}

impl FontStore {
    /// `font_path`, when set, is used for every family.
    pub fn new(font_path: Option<PathBuf>) -> Self {
        Self {
            font_path,
            system_db: None,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            shaped: HashMap::new(),
        }
    }

    /// Resolved family name for `family`, loading the face if needed.
    pub fn family_name(&mut self, family: &str) -> RainResult<String> {
        Ok(self.face(family)?.family_name)
    }

    /// Shape `text` with `font`, returning a cached result when available.
    pub fn shape(&mut self, font: &FontSpec, text: &str) -> RainResult<Arc<ShapedText>> {
        if !font.size_px.is_finite() || font.size_px <= 0.0 {
            return Err(RainError::render("font size must be finite and > 0"));
        }

        let key = (font.family.clone(), text.to_string(), font.size_px.to_bits());
        if let Some(hit) = self.shaped.get(&key) {
            return Ok(hit.clone());
        }

        let face = self.face(&font.family)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut baseline = None;
        for line in layout.lines() {
            baseline.get_or_insert(line.metrics().baseline);
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        let shaped = Arc::new(ShapedText {
            glyphs,
            baseline: baseline.unwrap_or(font.size_px),
            size_px: font.size_px,
            font: face.data,
        });
        self.shaped.insert(key, shaped.clone());
        Ok(shaped)
    }

    fn face(&mut self, family: &str) -> RainResult<LoadedFace> {
        if let Some(face) = self.faces.get(family) {
            return Ok(face.clone());
        }

        let (bytes, index) = self.load_face_bytes(family)?;
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|f| f.index() == index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| RainError::render("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RainError::render("registered font family has no name"))?
            .to_string();

        tracing::debug!(requested = family, resolved = %family_name, "resolved font family");

        let face = LoadedFace {
            family_name,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index),
        };
        self.faces.insert(family.to_string(), face.clone());
        Ok(face)
    }

    fn load_face_bytes(&mut self, family: &str) -> RainResult<(Vec<u8>, u32)> {
        if let Some(path) = &self.font_path {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font file '{}'", path.display()))?;
            return Ok((bytes, 0));
        }

        let db = self.system_db.get_or_insert_with(system_font_db);

        let lowered = family.trim().to_ascii_lowercase();
        let requested = match lowered.as_str() {
            "monospace" => usvg::fontdb::Family::Monospace,
            "sans-serif" => usvg::fontdb::Family::SansSerif,
            "serif" => usvg::fontdb::Family::Serif,
            "cursive" => usvg::fontdb::Family::Cursive,
            "fantasy" => usvg::fontdb::Family::Fantasy,
            _ => usvg::fontdb::Family::Name(family.trim()),
        };
        let families = [requested, usvg::fontdb::Family::Monospace];
        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight::NORMAL,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };

        let id = db
            .query(&query)
            .or_else(|| {
                let fallback = db
                    .faces()
                    .find(|f| f.monospaced)
                    .or_else(|| db.faces().next())?;
                tracing::warn!(
                    requested = family,
                    fallback = ?fallback.families.first().map(|(name, _)| name),
                    "no installed font matches family, using fallback face"
                );
                Some(fallback.id)
            })
            .ok_or_else(|| {
                RainError::render(format!(
                    "no fonts installed for family '{family}' (set font_path to a .ttf/.otf file)"
                ))
            })?;
        db.with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| RainError::render(format!("failed to load font data for '{family}'")))
    }
}

/// Families tried, in order, for the generic `monospace` family.
const PREFERRED_MONOSPACE: [&str; 7] = [
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Ubuntu Mono",
    "Menlo",
    "Consolas",
    "Courier New",
];

/// System font database with the generic `monospace` family bound to an installed face.
///
/// fontdb maps generic families to fixed names ("Courier New" for monospace) that are often
/// not installed, so the binding is made from what the scan found.
pub(crate) fn system_font_db() -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(family) = installed_monospace_family(&db) {
        tracing::debug!(family = %family, faces = db.len(), "bound generic monospace family");
        db.set_monospace_family(family);
    }
    db
}

fn installed_monospace_family(db: &usvg::fontdb::Database) -> Option<String> {
    let installed: Vec<&str> = db
        .faces()
        .filter(|f| f.monospaced)
        .filter_map(|f| f.families.first().map(|(name, _)| name.as_str()))
        .collect();
    PREFERRED_MONOSPACE
        .into_iter()
        .find(|name| installed.contains(name))
        .or_else(|| installed.iter().min().copied())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
