//! ZMK Keymap Viewer Library
//!
//! Core functionality for viewing extracted ZMK keymaps: loading keymap
//! documents, resolving keycodes to display labels, tracking the viewer's
//! layer/theme state and rendering HTML, text and KLE output.

// Module declarations
pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod keycode_db;
pub mod models;
pub mod parser;
pub mod services;
#[cfg(feature = "web")]
pub mod web;
