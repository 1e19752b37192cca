//! Data models for keymap documents, bindings, and key geometry.
//!
//! This module contains the core data structures used throughout the application.
//! Models are designed to be independent of rendering and loading logic.

pub mod key_geometry;
pub mod keymap;

// Re-export all model types
pub use key_geometry::{KeyGeometry, KeyboardBounds};
pub use keymap::{Binding, KeymapDocument, Sensor};
