//! Keycode resolution command.

use crate::cli::common::{load_config, load_keycode_db, CliError, CliResult};
use crate::keycode_db::{DisplayMode, IconRef, KeycodeRenderer};
use clap::Args;
use serde::Serialize;

/// Show how keycode tokens are displayed
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Keycode tokens (e.g. "&kp A", "LC(RET)", "SK LSHIFT")
    #[arg(value_name = "TOKEN", required = true)]
    pub tokens: Vec<String>,

    /// Display mode used for the rendered label
    #[arg(long, value_enum)]
    pub mode: Option<DisplayMode>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ResolveResult<'a> {
    input: &'a str,
    text: String,
    html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<IconRef>,
    rendered: String,
}

impl ResolveArgs {
    /// Execute the resolve command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let db = load_keycode_db(&config)?;
        let icons = config.icon_resolver();
        let renderer = KeycodeRenderer::new(&db, &icons, self.mode.unwrap_or(config.ui.display_mode));

        let results: Vec<ResolveResult<'_>> = self
            .tokens
            .iter()
            .map(|token| {
                let display = db.normalize(token);
                ResolveResult {
                    input: token,
                    rendered: renderer.render(Some(token), None),
                    text: display.text,
                    html: display.html,
                    icon: display.icon,
                }
            })
            .collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&results)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
            return Ok(());
        }

        for (idx, result) in results.iter().enumerate() {
            if idx > 0 {
                println!();
            }
            println!("Input:    {}", result.input);
            println!("Text:     {}", result.text);
            if !result.html.is_empty() {
                println!("HTML:     {}", result.html);
            }
            if let Some(icon) = &result.icon {
                println!("Icon:     {icon}");
            }
            println!("Rendered: {} ({})", result.rendered, renderer.mode());
        }

        Ok(())
    }
}
