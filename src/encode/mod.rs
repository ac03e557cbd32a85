//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are driven by [`crate::generate`].

/// Animated GIF sink.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
