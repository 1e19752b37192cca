//! HTTP viewer for a keymap document.
//!
//! Serves the rendered keyboard page and keeps the view state (active layer,
//! theme) on the server. Each request applies at most one reducer action.
//!
//! # Endpoints
//!
//! - `GET /` - Current page (`?overview=true` for all layers at once)
//! - `POST /layers/{name}` - Select a layer, redirects to `/`
//! - `POST /theme/toggle` - Toggle the theme, redirects to `/`
//! - `GET /api/state` - Current view state
//! - `GET /api/resolve?keycode=` - Resolve one keycode token
//! - `GET /health` - Health check
//! - `GET /icons/*` - Icon assets, when a local icon directory is configured

use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::app::{reduce, Action, Theme, ViewState};
use crate::config::Config;
use crate::export::{render_error_page, render_page, Navigation, PageOptions};
use crate::keycode_db::{DisplayMode, IconRef, KeycodeDb, KeycodeRenderer};
use crate::models::KeymapDocument;
use crate::parser;
use crate::services::layer_refs::ActivationIndex;
use crate::services::IconResolver;

/// URL prefix under which a local icon directory is served.
const ICON_ROUTE: &str = "/icons";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the viewer.
#[derive(Clone)]
pub struct AppState {
    /// Loaded document, or the load error shown in its place
    document: Arc<Result<KeymapDocument, String>>,
    /// The single mutable view state
    view: Arc<RwLock<ViewState>>,
    /// Symbol tables (immutable after load)
    keycode_db: Arc<KeycodeDb>,
    /// Icon resolver producing `/icons/..` URLs for local assets
    icons: Arc<IconResolver>,
    /// Local icon directory to serve, if any
    icon_dir: Option<PathBuf>,
    /// Application configuration
    config: Arc<Config>,
}

impl AppState {
    /// Loads the document and tables.
    ///
    /// A document that fails to load is kept as an error so the viewer can
    /// still come up and show it; broken symbol tables fail here.
    pub fn new(config: Config, document_path: &FsPath, theme: Option<Theme>) -> anyhow::Result<Self> {
        let keycode_db = config.keycode_db()?;
        let document = parser::load_document(document_path).map_err(|e| {
            warn!("Failed to load keymap document: {e:#}");
            format!("{e:#}")
        });
        Ok(Self::from_parts(config, document, keycode_db, theme))
    }

    /// Builds the state from an already loaded document.
    #[must_use]
    pub fn from_parts(
        config: Config,
        document: Result<KeymapDocument, String>,
        keycode_db: KeycodeDb,
        theme: Option<Theme>,
    ) -> Self {
        let theme = theme.unwrap_or_else(|| Theme::from_mode(config.ui.theme_mode));
        let view = match &document {
            Ok(document) => ViewState::loaded(document, theme),
            Err(_) => ViewState::new(theme),
        };

        let icon_dir = config
            .paths
            .icons
            .as_ref()
            .filter(|_| !config.paths.icons_are_remote())
            .map(PathBuf::from);
        let icons = match &icon_dir {
            Some(dir) => IconResolver::mounted(dir, ICON_ROUTE, config.paths.icon_extension.as_deref()),
            None => config.icon_resolver(),
        };

        Self {
            document: Arc::new(document),
            view: Arc::new(RwLock::new(view)),
            keycode_db: Arc::new(keycode_db),
            icons: Arc::new(icons),
            icon_dir,
            config: Arc::new(config),
        }
    }

    fn snapshot(&self) -> ViewState {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies one action and returns the new state.
    fn dispatch(&self, action: &Action) -> ViewState {
        let mut view = self.view.write().unwrap_or_else(PoisonError::into_inner);
        let next = match &*self.document {
            Ok(document) => reduce(view.clone(), action, document),
            // Without a document only the theme can change
            Err(_) if *action == Action::ToggleTheme => ViewState {
                theme: view.theme.toggled(),
                ..view.clone()
            },
            Err(_) => view.clone(),
        };
        *view = next.clone();
        next
    }

    fn renderer(&self, mode: DisplayMode) -> KeycodeRenderer<'_> {
        KeycodeRenderer::new(&self.keycode_db, &self.icons, mode)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Whether the keymap document loaded.
    pub document_loaded: bool,
}

/// Query parameters for the page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Show all layers on one keyboard.
    #[serde(default)]
    pub overview: bool,
}

/// View state response.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Active layer name.
    pub active_layer: Option<String>,
    /// Current theme.
    pub theme: Theme,
    /// Layer names, base layer first.
    pub layers: Vec<String>,
    /// Layer name to activating base-layer key.
    pub activation: ActivationIndex,
}

/// Query parameters for keycode resolution.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Raw keycode token.
    pub keycode: Option<String>,
    /// Display mode for `rendered` (defaults to the configured mode).
    pub mode: Option<DisplayMode>,
}

/// Keycode resolution response.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    /// Token as given.
    pub input: String,
    /// Plain text label.
    pub text: String,
    /// Markup label.
    pub html: String,
    /// Icon reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconRef>,
    /// Keycap markup in the requested mode.
    pub rendered: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        document_loaded: state.document.is_ok(),
    })
}

/// GET / - Renders the current page, or the inline error page.
async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let view = state.snapshot();

    let document = match &*state.document {
        Ok(document) => document,
        Err(message) => return Html(render_error_page(message, view.theme)),
    };

    let renderer = state.renderer(state.config.ui.display_mode);
    let options = PageOptions {
        scale: state.config.ui.keyboard_scale,
        layer_colors: &state.config.ui.layer_colors,
        navigation: Navigation::Forms,
        overview: query.overview,
    };
    Html(render_page(document, &view, &renderer, &options))
}

/// POST /layers/{name} - Selects a layer; unknown names are ignored.
async fn select_layer(State(state): State<AppState>, Path(name): Path<String>) -> Redirect {
    let view = state.dispatch(&Action::SelectLayer(name.clone()));
    if view.active_layer.as_deref() == Some(name.as_str()) {
        debug!("Selected layer '{name}'");
    } else {
        debug!("Ignored unknown layer '{name}'");
    }
    Redirect::to("/")
}

/// POST /theme/toggle - Flips the theme.
async fn toggle_theme(State(state): State<AppState>) -> Redirect {
    let view = state.dispatch(&Action::ToggleTheme);
    debug!("Theme is now {}", view.theme.as_str());
    Redirect::to("/")
}

/// GET /api/state - Current view state.
async fn get_state(State(state): State<AppState>) -> ApiResult<StateResponse> {
    let document = match &*state.document {
        Ok(document) => document,
        Err(message) => {
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiError::with_details("Keymap document not loaded", message.clone())),
            ))
        }
    };

    let view = state.snapshot();
    Ok(Json(StateResponse {
        active_layer: view.active_layer,
        theme: view.theme,
        layers: document.layer_order.clone(),
        activation: view.activation,
    }))
}

/// GET /api/resolve - Resolves one keycode token.
async fn resolve_keycode(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> ApiResult<ResolveResponse> {
    let keycode = query.keycode.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("Missing 'keycode' query parameter")),
        )
    })?;

    let display = state.keycode_db.normalize(&keycode);
    let rendered = state
        .renderer(query.mode.unwrap_or(state.config.ui.display_mode))
        .render(Some(&keycode), None);

    Ok(Json(ResolveResponse {
        input: keycode,
        text: display.text,
        html: display.html,
        icon: display.icon,
        rendered,
    }))
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // The viewer runs locally next to the browser
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(index))
        .route("/layers/{name}", post(select_layer))
        .route("/theme/toggle", post(toggle_theme))
        .route("/api/state", get(get_state))
        .route("/api/resolve", get(resolve_keycode))
        .route("/health", get(health_check));

    if let Some(dir) = &state.icon_dir {
        router = router.nest_service(ICON_ROUTE, ServeDir::new(dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the viewer.
///
/// # Errors
///
/// Returns an error if the tables fail to load or the server fails to start.
pub async fn run_server(
    config: Config,
    document_path: PathBuf,
    theme: Option<Theme>,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let state = AppState::new(config, &document_path, theme)?;
    let app = create_router(state);

    info!("Serving {} on http://{}", document_path.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn test_state(document: Result<KeymapDocument, String>) -> AppState {
        AppState::from_parts(
            Config::default(),
            document,
            KeycodeDb::load().unwrap(),
            Some(Theme::Dark),
        )
    }

    fn test_document() -> KeymapDocument {
        parse_document(
            r#"{
                "layout": [{"x": 0}, {"x": 1}],
                "keymap": {"Base": ["&kp A", "&mo 1"], "Nav": ["&kp LEFT", "___"]},
                "layer_order": ["Base", "Nav"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_dispatch_select_and_toggle() {
        let state = test_state(Ok(test_document()));
        assert_eq!(state.snapshot().active_layer.as_deref(), Some("Base"));

        let view = state.dispatch(&Action::SelectLayer("Nav".into()));
        assert_eq!(view.active_layer.as_deref(), Some("Nav"));

        let view = state.dispatch(&Action::SelectLayer("Missing".into()));
        assert_eq!(view.active_layer.as_deref(), Some("Nav"));

        let view = state.dispatch(&Action::ToggleTheme);
        assert_eq!(view.theme, Theme::Light);
        assert_eq!(state.snapshot(), view);
    }

    #[test]
    fn test_dispatch_without_document() {
        let state = test_state(Err("boom".into()));
        assert_eq!(state.dispatch(&Action::ToggleTheme).theme, Theme::Light);
        assert_eq!(state.dispatch(&Action::SelectLayer("Base".into())).active_layer, None);
    }

    #[test]
    fn test_remote_icons_are_not_mounted() {
        let mut config = Config::default();
        config.paths.icons = Some("https://cdn.example.com/icons".into());
        let state = AppState::from_parts(config, Ok(test_document()), KeycodeDb::load().unwrap(), None);
        assert!(state.icon_dir.is_none());
        assert!(!state.icons.is_disabled());
    }
}
