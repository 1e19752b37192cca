//! Icon reference resolution.
//!
//! Symbol tables name icons (`mdi-keyboard-return`); renderers need an
//! addressable path or URL. An [`IconResolver`] maps names to locations and
//! reports `None` when no asset is available, in which case renderers fall
//! back to text.

use std::path::{Path, PathBuf};

/// Where icon files live.
#[derive(Debug, Clone, PartialEq, Eq)]
enum IconSource {
    /// No icon assets configured
    Disabled,
    /// Local directory; files must exist to resolve
    Directory(PathBuf),
    /// Remote or web-root prefix; resolved without checking
    Url(String),
    /// Local directory served under a URL prefix (used by the web viewer)
    Mounted { dir: PathBuf, prefix: String },
}

/// Maps icon names to asset paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResolver {
    source: IconSource,
    extension: String,
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::disabled()
    }
}

impl IconResolver {
    /// Default icon file extension.
    pub const DEFAULT_EXTENSION: &'static str = "svg";

    /// A resolver that never yields a path.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            source: IconSource::Disabled,
            extension: Self::DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Builds a resolver from a configured base.
    ///
    /// `http://` and `https://` bases are used as URL prefixes; anything
    /// else is treated as a local directory.
    #[must_use]
    pub fn from_base(base: Option<&str>, extension: Option<&str>) -> Self {
        let source = match base.map(str::trim) {
            None | Some("") => IconSource::Disabled,
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                IconSource::Url(url.trim_end_matches('/').to_string())
            }
            Some(dir) => IconSource::Directory(PathBuf::from(dir)),
        };

        Self {
            source,
            extension: normalize_extension(extension),
        }
    }

    /// Serves files from `dir` under the URL `prefix` (e.g. `/icons`).
    pub fn mounted(dir: impl Into<PathBuf>, prefix: &str, extension: Option<&str>) -> Self {
        Self {
            source: IconSource::Mounted {
                dir: dir.into(),
                prefix: prefix.trim_end_matches('/').to_string(),
            },
            extension: normalize_extension(extension),
        }
    }

    /// True when no icon can ever resolve.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.source == IconSource::Disabled
    }

    /// Resolves an icon name to a path or URL.
    ///
    /// Names containing path separators or `..` never resolve.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<String> {
        if !is_safe_name(name) {
            return None;
        }
        let file_name = format!("{name}.{}", self.extension);

        match &self.source {
            IconSource::Disabled => None,
            IconSource::Directory(dir) => {
                existing(dir, &file_name).map(|path| path.to_string_lossy().into_owned())
            }
            IconSource::Url(prefix) => Some(format!("{prefix}/{file_name}")),
            IconSource::Mounted { dir, prefix } => {
                existing(dir, &file_name).map(|_| format!("{prefix}/{file_name}"))
            }
        }
    }
}

fn normalize_extension(extension: Option<&str>) -> String {
    extension
        .map(|ext| ext.trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .unwrap_or(IconResolver::DEFAULT_EXTENSION)
        .to_string()
}

fn existing(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let path = dir.join(file_name);
    path.is_file().then_some(path)
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_disabled_never_resolves() {
        let resolver = IconResolver::disabled();
        assert!(resolver.is_disabled());
        assert_eq!(resolver.resolve("mdi-keyboard-return"), None);
        assert!(IconResolver::from_base(Some("  "), None).is_disabled());
    }

    #[test]
    fn test_url_base() {
        let resolver = IconResolver::from_base(Some("https://cdn.example.com/icons/"), None);
        assert_eq!(
            resolver.resolve("mdi-volume-high").as_deref(),
            Some("https://cdn.example.com/icons/mdi-volume-high.svg")
        );
    }

    #[test]
    fn test_directory_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mdi-backspace.svg"), "<svg/>").unwrap();

        let resolver = IconResolver::from_base(dir.path().to_str(), Some(".svg"));
        let resolved = resolver.resolve("mdi-backspace").unwrap();
        assert!(resolved.ends_with("mdi-backspace.svg"));
        assert_eq!(resolver.resolve("mdi-missing"), None);
    }

    #[test]
    fn test_mounted_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mdi-earth.png"), [0u8; 4]).unwrap();

        let resolver = IconResolver::mounted(dir.path(), "/icons/", Some("png"));
        assert_eq!(resolver.resolve("mdi-earth").as_deref(), Some("/icons/mdi-earth.png"));
        assert_eq!(resolver.resolve("mdi-missing"), None);
    }

    #[test]
    fn test_path_traversal_rejected() {
        let resolver = IconResolver::from_base(Some("https://cdn.example.com"), None);
        assert_eq!(resolver.resolve("../secret"), None);
        assert_eq!(resolver.resolve("a/b"), None);
        assert_eq!(resolver.resolve(""), None);
    }
}
