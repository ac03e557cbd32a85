/// Per-layer derived values and slot geometry.
pub mod layer;
/// Layer renderer.
pub mod renderer;
