//! Keycode normalization and label rendering.
//!
//! [`KeycodeDb::normalize`] turns one raw keycode token (`&kp A`, `LC(RET)`,
//! `SK LSHIFT`, `N1,`) into a [`ResolvedDisplay`]. [`KeycodeRenderer`] picks
//! the markup to show on a keycap for a given [`DisplayMode`].
//!
//! Resolution precedence, after stripping one `&`, trimming, uppercasing and
//! dropping a trailing comma:
//!
//! 1. modifier wrapper `[LR][CSAG](inner)`
//! 2. multi-token (`LEAD rest...` or the first resolvable token)
//! 3. direct symbol lookup
//! 4. single ASCII alphanumeric
//! 5. the raw input as text

use serde::{Deserialize, Serialize};

use super::{KeycodeDb, SymbolEntry};
use crate::services::icons::IconResolver;

/// Icon reference attached to a resolved keycode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IconRef {
    /// Single named glyph (e.g. `mdi-keyboard-return`)
    Named(String),
    /// Base glyph with modifier badges in the lower right corner, innermost
    /// modifier first
    Composite {
        /// Main glyph
        base: String,
        /// Corner badge glyphs
        badges: Vec<String>,
    },
}

impl IconRef {
    /// Adds a modifier badge on top of this glyph.
    #[must_use]
    pub fn with_badge(self, badge: impl Into<String>) -> Self {
        match self {
            Self::Named(base) => Self::Composite {
                base,
                badges: vec![badge.into()],
            },
            Self::Composite { base, mut badges } => {
                badges.push(badge.into());
                Self::Composite { base, badges }
            }
        }
    }
}

impl std::fmt::Display for IconRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Composite { base, badges } => {
                f.write_str(base)?;
                for badge in badges {
                    write!(f, "+{badge}")?;
                }
                Ok(())
            }
        }
    }
}

/// Display content for one keycode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedDisplay {
    /// Plain-text label
    pub text: String,
    /// Markup label; may be empty or equal to `text`
    pub html: String,
    /// Icon reference, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconRef>,
}

impl ResolvedDisplay {
    /// Display with only a text label.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn from_entry(entry: &SymbolEntry) -> Self {
        Self {
            text: entry.text.clone().unwrap_or_default(),
            html: entry.html.clone().unwrap_or_default(),
            icon: entry.icon.clone().map(IconRef::Named),
        }
    }

    /// Markup if present, otherwise the escaped text.
    #[must_use]
    pub fn markup(&self) -> String {
        if self.html.is_empty() {
            escape_html(&self.text)
        } else {
            self.html.clone()
        }
    }

    /// True when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.html.is_empty() && self.icon.is_none()
    }
}

impl KeycodeDb {
    /// Resolves a raw keycode token into display content.
    ///
    /// Total over all inputs: unknown tokens come back as their raw text and
    /// the empty string yields an empty display. Never mutates the tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use zmk_keymap_viewer::keycode_db::KeycodeDb;
    ///
    /// let db = KeycodeDb::load().unwrap();
    /// assert_eq!(db.normalize("&kp").text, "&kp");
    /// assert_eq!(db.normalize("q").text, "Q");
    /// assert_eq!(db.normalize("LS(N1)").text, "Shift+1");
    /// ```
    #[must_use]
    pub fn normalize(&self, raw: &str) -> ResolvedDisplay {
        if raw.is_empty() {
            return ResolvedDisplay::default();
        }

        let canonical = canonicalize(raw);

        // Wrappers are peeled iteratively, so nesting depth is bounded only by
        // the input length.
        let mut codes = Vec::new();
        let (mut cleaned, mut raw) = (canonical.as_str(), raw);
        while let Some((code, inner)) = split_modifier_wrapper(cleaned) {
            codes.push(code);
            raw = inner;
            cleaned = clean_token(inner);
        }

        let key = self.resolve_unwrapped(cleaned, raw);
        if codes.is_empty() {
            key
        } else {
            self.apply_modifiers(&codes, key)
        }
    }

    fn resolve_unwrapped(&self, cleaned: &str, raw: &str) -> ResolvedDisplay {
        if cleaned.contains(char::is_whitespace) {
            return self.resolve_multi_token(cleaned, raw);
        }

        if let Some(entry) = self.symbol(cleaned) {
            return ResolvedDisplay::from_entry(entry);
        }

        let mut chars = cleaned.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return ResolvedDisplay::text_only(c);
            }
        }

        ResolvedDisplay::text_only(raw)
    }

    /// Wraps `key` in the modifiers of `codes`, outermost first.
    fn apply_modifiers(&self, codes: &[&str], key: ResolvedDisplay) -> ResolvedDisplay {
        let modifiers: Vec<ResolvedDisplay> = codes
            .iter()
            .map(|code| {
                self.modifier(code).map_or_else(
                    || ResolvedDisplay {
                        text: (*code).to_string(),
                        html: (*code).to_string(),
                        icon: None,
                    },
                    ResolvedDisplay::from_entry,
                )
            })
            .collect();

        let mut text = String::new();
        for modifier in &modifiers {
            text.push_str(&modifier.text);
        }
        text.push_str(&key.text);

        let mut html = r#"<span class="combined"><span class="combined-key">"#.repeat(modifiers.len());
        html.push_str(&key.markup());
        for modifier in modifiers.iter().rev() {
            html.push_str(r#"</span><span class="combined-mod">"#);
            html.push_str(&modifier.markup());
            html.push_str("</span></span>");
        }

        // Every level needs both glyphs, otherwise the whole icon is dropped.
        let icon = key.icon.and_then(|base| {
            modifiers
                .iter()
                .rev()
                .try_fold(base, |icon, modifier| match &modifier.icon {
                    Some(IconRef::Named(badge)) => Some(icon.with_badge(badge.as_str())),
                    _ => None,
                })
        });

        ResolvedDisplay { text, html, icon }
    }

    fn resolve_multi_token(&self, cleaned: &str, raw: &str) -> ResolvedDisplay {
        let mut tokens = cleaned.split_whitespace();

        if let Some(lead) = tokens.next().and_then(|token| self.symbol(token)) {
            let lead = ResolvedDisplay::from_entry(lead);
            let mut text = lead.text.clone();
            let mut html = lead.markup();
            let mut icon = lead.icon;

            for token in tokens {
                let part = self.normalize(token);
                text.push(' ');
                text.push_str(&part.text);
                html.push(' ');
                html.push_str(&part.markup());
                if icon.is_none() {
                    icon = part.icon;
                }
            }

            return ResolvedDisplay { text, html, icon };
        }

        cleaned
            .split_whitespace()
            .find(|token| self.symbol(token).is_some())
            .map_or_else(|| ResolvedDisplay::text_only(raw), |token| self.normalize(token))
    }
}

/// Strips one leading `&`, trims, uppercases and drops a trailing comma.
fn canonicalize(raw: &str) -> String {
    clean_token(raw).to_uppercase()
}

/// [`canonicalize`] without the case change, borrowing from `token`.
fn clean_token(token: &str) -> &str {
    let stripped = token.strip_prefix('&').unwrap_or(token).trim();
    match stripped.strip_suffix(',') {
        Some(rest) => rest.trim_end(),
        None => stripped,
    }
}

/// Splits `LC(INNER)` into `("LC", "INNER")`.
fn split_modifier_wrapper(cleaned: &str) -> Option<(&str, &str)> {
    let bytes = cleaned.as_bytes();
    if bytes.len() < 5 {
        return None;
    }

    let side_ok = matches!(bytes[0], b'L' | b'R');
    let class_ok = matches!(bytes[1], b'C' | b'S' | b'A' | b'G');
    if !side_ok || !class_ok || bytes[2] != b'(' || bytes[bytes.len() - 1] != b')' {
        return None;
    }

    Some((&cleaned[..2], &cleaned[3..cleaned.len() - 1]))
}

/// Which representation keycaps show.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Markup labels (default)
    #[default]
    Html,
    /// Plain escaped text
    Text,
    /// Icons where available, markup otherwise
    Icon,
}

impl DisplayMode {
    /// Lowercase name as used in config and CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::Icon => "icon",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders keycodes to keycap markup in one display mode.
#[derive(Debug, Clone, Copy)]
pub struct KeycodeRenderer<'a> {
    db: &'a KeycodeDb,
    icons: &'a IconResolver,
    mode: DisplayMode,
}

impl<'a> KeycodeRenderer<'a> {
    /// Creates a renderer over the given tables and icon resolver.
    #[must_use]
    pub const fn new(db: &'a KeycodeDb, icons: &'a IconResolver, mode: DisplayMode) -> Self {
        Self { db, icons, mode }
    }

    /// The active display mode.
    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Renders a keycode, falling back to `fallback` text.
    ///
    /// The result is markup safe to embed in an element body: text content
    /// is always escaped, table markup is emitted as-is.
    #[must_use]
    pub fn render(&self, keycode: Option<&str>, fallback: Option<&str>) -> String {
        let fallback = fallback.unwrap_or_default();
        let Some(keycode) = keycode else {
            return escape_html(fallback);
        };

        let display = self.db.normalize(keycode);
        match self.mode {
            DisplayMode::Icon => self
                .icon_markup(&display)
                .unwrap_or_else(|| self.html_markup(&display, fallback)),
            DisplayMode::Html => self.html_markup(&display, fallback),
            DisplayMode::Text => {
                if display.text.is_empty() {
                    escape_html(fallback)
                } else {
                    escape_html(&display.text)
                }
            }
        }
    }

    fn html_markup(&self, display: &ResolvedDisplay, fallback: &str) -> String {
        if !display.html.is_empty() && display.html != display.text {
            return display.html.clone();
        }
        if !display.text.is_empty() {
            return escape_html(&display.text);
        }
        if !fallback.is_empty() {
            return escape_html(fallback);
        }
        self.icon_markup(display).unwrap_or_default()
    }

    /// Icon markup for a resolved display, if its icon resolves to a file.
    #[must_use]
    pub fn icon_markup(&self, display: &ResolvedDisplay) -> Option<String> {
        let alt = escape_html(&display.text);

        match display.icon.as_ref()? {
            IconRef::Named(name) => {
                let path = self.icons.resolve(name)?;
                Some(format!(
                    r#"<img class="key-icon" src="{}" alt="{alt}">"#,
                    escape_html(&path)
                ))
            }
            icon @ IconRef::Composite { .. } => {
                let body = self.svg_layer(icon)?;
                Some(format!(
                    r#"<svg class="key-icon" viewBox="0 0 1024 1024" role="img" aria-label="{alt}">{body}</svg>"#
                ))
            }
        }
    }

    fn svg_layer(&self, icon: &IconRef) -> Option<String> {
        match icon {
            IconRef::Named(name) => self.svg_image(name),
            IconRef::Composite { base, badges } => {
                let mut layers = self.svg_image(base)?;
                for badge in badges {
                    layers.push_str(r#"<g transform="translate(600,600) scale(0.4)">"#);
                    layers.push_str(&self.svg_image(badge)?);
                    layers.push_str("</g>");
                }
                Some(layers)
            }
        }
    }

    fn svg_image(&self, name: &str) -> Option<String> {
        let path = self.icons.resolve(name)?;
        Some(format!(
            r#"<image href="{}" width="1024" height="1024"/>"#,
            escape_html(&path)
        ))
    }
}

/// Escapes text for use in HTML element bodies and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
