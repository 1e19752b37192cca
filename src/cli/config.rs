//! Configuration management CLI commands.

use crate::cli::common::{load_config, CliError, CliResult};
use crate::config::{Config, ThemeMode};
use crate::keycode_db::DisplayMode;
use clap::{Args, Subcommand};
use serde::Serialize;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print the configuration file location
    Path,
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Theme mode
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Keycap label display mode
    #[arg(long, value_enum)]
    mode: Option<DisplayMode>,

    /// Icon directory or http(s) URL prefix ("" clears it)
    #[arg(long, value_name = "DIR")]
    icons: Option<String>,

    /// Pixels per keyboard unit
    #[arg(long, value_name = "PX")]
    scale: Option<f32>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput<'a> {
    config_file: Option<String>,
    #[serde(flatten)]
    config: &'a Config,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("{e:#}")))?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        if self.json {
            let output = ConfigOutput {
                config_file: Config::config_file_path()
                    .ok()
                    .map(|p| p.to_string_lossy().to_string()),
                config: &config,
            };
            let json = serde_json::to_string_pretty(&output).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.theme.is_none() && self.mode.is_none() && self.icons.is_none() && self.scale.is_none() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --theme, --mode, --icons, or --scale",
            ));
        }

        let mut config = load_config()?;

        if let Some(theme) = self.theme {
            config.ui.theme_mode = theme;
        }
        if let Some(mode) = self.mode {
            config.ui.display_mode = mode;
        }
        if let Some(icons) = &self.icons {
            config.paths.icons = Some(icons.trim().to_string()).filter(|icons| !icons.is_empty());
        }
        if let Some(scale) = self.scale {
            config.ui.keyboard_scale = scale;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e:#}")))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("Configuration:");
    println!();
    println!("Paths:");
    println!(
        "  Icons:          {}",
        config.paths.icons.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Icon extension: {}",
        config.paths.icon_extension.as_deref().unwrap_or("svg")
    );
    for (label, path) in [("Symbols", &config.paths.symbols), ("Modifiers", &config.paths.modifiers)] {
        match path {
            Some(path) => println!("  {:<15} {}", format!("{label}:"), path.display()),
            None => println!("  {:<15} (built-in)", format!("{label}:")),
        }
    }
    println!();
    println!("UI:");
    println!("  Theme:          {}", config.ui.theme_mode.as_str());
    println!("  Display mode:   {}", config.ui.display_mode);
    println!("  Scale:          {} px", config.ui.keyboard_scale);
    println!("  Layer colors:   {}", config.ui.layer_colors.join(", "));
}
