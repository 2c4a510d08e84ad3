//! Renderer module — trait-based format dispatch.

pub mod config;
mod html;
mod json;
mod layout;
mod make;
mod markdown;
mod text;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{DocModel, Target};

pub use config::{ColorScheme, RenderConfig};
pub use layout::{NO_DOCS_NOTICE, USAGE};

/// Errors surfaced by the rendering layer.
///
/// Rendering is a pure function of its inputs, so nothing here is worth
/// retrying; the caller decides whether to abort or try another format.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no documentation model to render")]
    MissingModel,
    #[error("no such target: {0}")]
    MissingTarget(String),
    #[error("unknown format: {0}. Use make, text, html, markdown, or json")]
    UnknownFormat(String),
    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),
    #[error("write failed")]
    Io(#[from] std::io::Error),
}

/// Trait for rendering the documentation model into one output format.
///
/// Renderers are stateless after construction, so one instance may serve
/// concurrent renders of different models. Output is written incrementally;
/// a sink failure aborts the render and propagates immediately, with no
/// rollback of bytes already flushed.
pub trait Renderer {
    /// Full help view: usage line, file docs, included files, targets.
    fn render_help(&self, model: &DocModel, out: &mut dyn Write) -> Result<(), RenderError>;

    /// Detailed view of one documented target.
    fn render_target(&self, target: &Target, out: &mut dyn Write) -> Result<(), RenderError>;

    /// Minimal view for a target without documentation.
    fn render_basic_target(
        &self,
        name: &str,
        file: &Path,
        line: u32,
        out: &mut dyn Write,
    ) -> Result<(), RenderError>;

    fn content_type(&self) -> &'static str;
    fn file_extension(&self) -> &'static str;
}

/// The closed set of output formats. Format-name strings resolve to this
/// enumeration exactly once, at the factory boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Make,
    Text,
    Html,
    Markdown,
    Json,
}

impl Format {
    /// All formats, in listing order.
    pub const ALL: [Format; 5] = [
        Format::Make,
        Format::Text,
        Format::Html,
        Format::Markdown,
        Format::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Make => "make",
            Format::Text => "text",
            Format::Html => "html",
            Format::Markdown => "markdown",
            Format::Json => "json",
        }
    }

    /// Accepted short forms, for listings and the factory.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Format::Make => &["mk"],
            Format::Text => &["txt"],
            Format::Html => &[],
            Format::Markdown => &["md"],
            Format::Json => &[],
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "make" | "mk" => Ok(Format::Make),
            "text" | "txt" => Ok(Format::Text),
            "html" => Ok(Format::Html),
            "markdown" | "md" => Ok(Format::Markdown),
            "json" => Ok(Format::Json),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

/// Create a renderer for an already-resolved format.
pub fn create(format: Format, config: RenderConfig) -> Box<dyn Renderer> {
    match format {
        Format::Make => Box::new(make::MakeRenderer::new(config)),
        Format::Text => Box::new(text::TextRenderer::new(config)),
        Format::Html => Box::new(html::HtmlRenderer::new(config)),
        Format::Markdown => Box::new(markdown::MarkdownRenderer::new(config)),
        Format::Json => Box::new(json::JsonRenderer::new(config)),
    }
}

/// Create a renderer from a format-name string.
pub fn create_by_name(name: &str, config: RenderConfig) -> Result<Box<dyn Renderer>, RenderError> {
    Ok(create(name.parse()?, config))
}

/// Render help for an optional model, the embedding shape where a scan may
/// not have produced one.
pub fn render_help_opt(
    renderer: &dyn Renderer,
    model: Option<&DocModel>,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    renderer.render_help(model.ok_or(RenderError::MissingModel)?, out)
}
