//! Single-binding parser for raw ZMK binding strings.
//!
//! Extracted keymaps sometimes carry bindings as their raw source text
//! (`&kp A`, `&lt(NAV, SPACE)`, `___`). This turns one such string into a
//! [`Binding`]. It is deliberately limited to the binding forms that appear in
//! extracted JSON; it does not read `.keymap` devicetree files.

use crate::constants::{NONE_MARKER, TRANSPARENT_MARKER};
use crate::models::Binding;

/// Parses one raw binding string.
///
/// - `___` becomes `trans`, `XXX` becomes `none` (both without params)
/// - `&name(a, b)` becomes behavior `name` with comma-separated params
/// - `&name a b` becomes behavior `name` with space-separated params
///
/// The original text is preserved untrimmed in [`Binding::original`].
///
/// # Examples
///
/// ```
/// use zmk_keymap_viewer::parser::binding::parse_binding;
///
/// let binding = parse_binding("&mt LCTRL ESC");
/// assert_eq!(binding.behavior, "mt");
/// assert_eq!(binding.params, vec!["LCTRL", "ESC"]);
///
/// let binding = parse_binding("&lt(NAV, SPACE)");
/// assert_eq!(binding.behavior, "lt");
/// assert_eq!(binding.params, vec!["NAV", "SPACE"]);
/// ```
#[must_use]
pub fn parse_binding(raw: &str) -> Binding {
    let trimmed = raw.trim();

    if trimmed == TRANSPARENT_MARKER {
        return Binding::new("trans", Vec::new(), raw);
    }
    if trimmed == NONE_MARKER {
        return Binding::new("none", Vec::new(), raw);
    }

    let body = trimmed.strip_prefix('&').unwrap_or(trimmed).trim();

    if let Some((behavior, params)) = parse_call_form(body) {
        return Binding::new(behavior, params, raw);
    }

    let mut words = body.split_whitespace();
    let behavior = words.next().unwrap_or_default();
    let params = words.map(str::to_string).collect();

    Binding::new(behavior, params, raw)
}

/// Parses `name(arg, arg)` where `name` is an identifier.
///
/// Returns `None` when the body is not exactly an identifier followed by one
/// parenthesised argument list.
fn parse_call_form(body: &str) -> Option<(&str, Vec<String>)> {
    let open = body.find('(')?;
    let inner = body.strip_suffix(')')?.get(open + 1..)?;
    let name = body[..open].trim_end();

    if !is_identifier(name) || inner.contains(')') {
        return None;
    }

    let params = inner
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(str::to_string)
        .collect();

    Some((name, params))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
