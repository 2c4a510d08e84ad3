//! Renderer configuration — explicit, immutable, fixed at creation.

use std::path::{Path, PathBuf};

/// ANSI styling used by the terminal renderer. Constructed once and handed
/// to the renderer as a value; there is no global color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub heading: String,
    pub target: String,
    pub alias: String,
    pub variable: String,
    pub strong: String,
    pub emphasis: String,
    pub code: String,
    pub url: String,
    pub reset: String,
}

impl ColorScheme {
    /// Scheme with every code empty; styling becomes a byte-for-byte no-op.
    pub fn plain() -> Self {
        Self {
            heading: String::new(),
            target: String::new(),
            alias: String::new(),
            variable: String::new(),
            strong: String::new(),
            emphasis: String::new(),
            code: String::new(),
            url: String::new(),
            reset: String::new(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            heading: "\x1b[1m".into(),
            target: "\x1b[36m".into(),
            alias: "\x1b[33m".into(),
            variable: "\x1b[32m".into(),
            strong: "\x1b[1m".into(),
            emphasis: "\x1b[3m".into(),
            code: "\x1b[96m".into(),
            url: "\x1b[4m".into(),
            reset: "\x1b[0m".into(),
        }
    }
}

/// Options shared by every renderer.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Insert ANSI color codes where the format supports them.
    pub use_color: bool,
    /// Explicit scheme override. Absent means: derive from `use_color`.
    pub color_scheme: Option<ColorScheme>,
    /// Base directory for shortening source paths in trailers.
    pub base_source_path: Option<PathBuf>,
}

impl RenderConfig {
    /// The scheme a renderer should actually use. Color enabled without an
    /// explicit scheme silently selects the default scheme, never an error.
    pub fn scheme(&self) -> ColorScheme {
        if !self.use_color {
            return ColorScheme::plain();
        }
        self.color_scheme.clone().unwrap_or_default()
    }

    /// Source path for a trailer, relative to the configured base when the
    /// base is a prefix of it.
    pub fn display_path(&self, path: &Path) -> String {
        match &self.base_source_path {
            Some(base) => path
                .strip_prefix(base)
                .unwrap_or(path)
                .display()
                .to_string(),
            None => path.display().to_string(),
        }
    }
}
