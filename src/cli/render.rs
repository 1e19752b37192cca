//! Render command: writes static HTML viewer pages.

use crate::app::{reduce, Action, Theme, ViewState};
use crate::cli::common::{load_config, load_document, load_keycode_db, require_layer, CliError, CliResult};
use crate::config::Config;
use crate::export::{layer_file_name, render_page, Navigation, PageOptions};
use crate::keycode_db::{DisplayMode, KeycodeDb, KeycodeRenderer};
use crate::models::KeymapDocument;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Render a keymap document to HTML
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Path to the keymap document (JSON)
    #[arg(value_name = "DOC")]
    pub document: PathBuf,

    /// Output file, or output directory with --all
    /// (defaults to [doc_name]_keymap_[date].html)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Layer to show (defaults to the base layer)
    #[arg(long, value_name = "NAME", conflicts_with_all = ["all", "overview"])]
    pub layer: Option<String>,

    /// Write one page per layer, linked through the layer tabs
    #[arg(long)]
    pub all: bool,

    /// Show every layer on one keyboard
    #[arg(long, conflicts_with = "all")]
    pub overview: bool,

    /// Page theme (defaults to the configured theme mode)
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Keycap label representation (defaults to the configured mode)
    #[arg(long, value_enum)]
    pub mode: Option<DisplayMode>,
}

impl RenderArgs {
    /// Execute the render command
    pub fn execute(&self) -> CliResult<()> {
        let document = load_document(&self.document)?;
        let config = load_config()?;
        let db = load_keycode_db(&config)?;

        if let Some(layer) = &self.layer {
            require_layer(&document, layer)?;
        }

        let theme = self
            .theme
            .unwrap_or_else(|| Theme::from_mode(config.ui.theme_mode));
        let mode = self.mode.unwrap_or(config.ui.display_mode);
        debug!("Rendering with theme {} and mode {mode}", theme.as_str());

        let stem = document_stem(&self.document);
        let pages = PageSet {
            document: &document,
            config: &config,
            db: &db,
            mode,
            stem: &stem,
        };
        let initial = ViewState::loaded(&document, theme);

        if self.all {
            let dir = self.output.clone().unwrap_or_else(|| PathBuf::from("."));
            fs::create_dir_all(&dir).map_err(|e| {
                CliError::io(format!("Failed to create output directory {}: {e}", dir.display()))
            })?;

            for layer in &document.layer_order {
                let state = reduce(initial.clone(), &Action::SelectLayer(layer.clone()), &document);
                let path = dir.join(layer_file_name(&stem, layer));
                write_page(&path, &pages.render(&state, false))?;
                println!("✓ Rendered layer '{layer}' to: {}", path.display());
            }
            info!("Rendered {} layer pages", document.layer_order.len());
            return Ok(());
        }

        let state = match &self.layer {
            Some(layer) => reduce(initial, &Action::SelectLayer(layer.clone()), &document),
            None => initial,
        };
        let path = self.output_path(&stem);
        write_page(&path, &pages.render(&state, self.overview))?;
        println!("✓ Rendered keymap to: {}", path.display());

        Ok(())
    }

    /// Get the output file path (either user-specified or auto-generated)
    fn output_path(&self, stem: &str) -> PathBuf {
        if let Some(ref path) = self.output {
            return path.clone();
        }

        let date = chrono::Local::now().format("%Y-%m-%d");
        PathBuf::from(format!("{stem}_keymap_{date}.html"))
    }
}

/// Everything shared by the pages of one render run.
struct PageSet<'a> {
    document: &'a KeymapDocument,
    config: &'a Config,
    db: &'a KeycodeDb,
    mode: DisplayMode,
    stem: &'a str,
}

impl PageSet<'_> {
    fn render(&self, state: &ViewState, overview: bool) -> String {
        let icons = self.config.icon_resolver();
        let renderer = KeycodeRenderer::new(self.db, &icons, self.mode);
        let options = PageOptions {
            scale: self.config.ui.keyboard_scale,
            layer_colors: &self.config.ui.layer_colors,
            navigation: Navigation::StaticFiles {
                stem: self.stem.to_string(),
            },
            overview,
        };
        render_page(self.document, state, &renderer, &options)
    }
}

fn write_page(path: &Path, html: &str) -> CliResult<()> {
    fs::write(path, html)
        .map_err(|e| CliError::io(format!("Failed to write output file {}: {e}", path.display())))
}

/// File stem of the document, lowercased with spaces replaced.
fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(' ', "_").to_lowercase())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "keymap".to_string())
}
