//! View state and its reducer.
//!
//! The viewer's only mutable state is the active layer, the theme and the
//! layer activation index derived from the document. Every change goes
//! through [`reduce`].

use serde::{Deserialize, Serialize};

use crate::config::ThemeMode;
use crate::models::KeymapDocument;
use crate::services::layer_refs::{build_activation_index, ActivationIndex};

/// Resolved presentation theme.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background
    #[default]
    Dark,
    /// Light background
    Light,
}

impl Theme {
    /// Detects the OS theme, falling back to dark.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::Light,
            // Fall back to dark theme for dark mode, unspecified, or errors
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::Dark,
        }
    }

    /// Resolves a configured preference.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::Dark,
            ThemeMode::Light => Self::Light,
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Value for the `data-theme` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Label of the button that switches away from this theme.
    #[must_use]
    pub const fn switch_label(self) -> &'static str {
        match self {
            Self::Dark => "Light Mode",
            Self::Light => "Dark Mode",
        }
    }
}

/// A state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Reset to the base layer and rebuild the activation index
    Load,
    /// Show the named layer
    SelectLayer(String),
    /// Flip between dark and light
    ToggleTheme,
}

/// Everything the renderer needs besides the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Layer currently displayed; `None` only before the first load
    pub active_layer: Option<String>,
    /// Presentation theme
    pub theme: Theme,
    /// Layer name → base-layer key that activates it
    pub activation: ActivationIndex,
}

impl ViewState {
    /// Empty state before any document is loaded.
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            active_layer: None,
            theme,
            activation: ActivationIndex::new(),
        }
    }

    /// State right after loading `document`.
    #[must_use]
    pub fn loaded(document: &KeymapDocument, theme: Theme) -> Self {
        reduce(Self::new(theme), &Action::Load, document)
    }

    /// True when the active layer is the document's base layer.
    #[must_use]
    pub fn is_base_active(&self, document: &KeymapDocument) -> bool {
        self.active_layer.is_some() && self.active_layer.as_deref() == document.base_layer()
    }
}

/// Applies one action.
///
/// `ToggleTheme` re-runs the load transition after flipping the theme, so
/// the view returns to the base layer with a freshly built index.
#[must_use]
pub fn reduce(state: ViewState, action: &Action, document: &KeymapDocument) -> ViewState {
    match action {
        Action::Load => ViewState {
            active_layer: document.base_layer().map(str::to_string),
            activation: build_activation_index(document),
            ..state
        },
        Action::SelectLayer(name) => {
            if document.layer_index(name).is_some() {
                ViewState {
                    active_layer: Some(name.clone()),
                    ..state
                }
            } else {
                state
            }
        }
        Action::ToggleTheme => {
            let theme = state.theme.toggled();
            reduce(ViewState { theme, ..state }, &Action::Load, document)
        }
    }
}
