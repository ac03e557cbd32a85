/// CPU raster surface (`vello_cpu` + `parley`).
pub mod cpu;
/// Font resolution and glyph shaping.
pub mod fonts;
/// Call-recording surface for tests and previews.
pub mod recording;
/// Drawing-surface trait and frame types.
pub mod surface;
