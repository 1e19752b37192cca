//! Service layer for business logic.
//!
//! This module contains services that derive facts from a loaded keymap
//! document and resolve external assets for the renderers.

pub mod icons;
pub mod layer_refs;

// Re-export commonly used types and functions
pub use icons::IconResolver;
pub use layer_refs::{build_activation_index, build_navigation_report, ActivationIndex};
