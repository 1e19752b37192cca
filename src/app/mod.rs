//! Application state layer
//!
//! Holds the interactive view state (active layer, theme) shared by the
//! static exporter and the HTTP viewer.

/// View state, actions and the reducer
pub mod state;

// Re-export commonly used types for convenience
pub use state::{reduce, Action, Theme, ViewState};
