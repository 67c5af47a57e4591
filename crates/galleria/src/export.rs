//! Document export.
//!
//! Galleries are serialized to SVG only; see [`svg`].

pub mod svg;
