//! Plain/ANSI terminal text renderer.
//!
//! Bytes pass through untouched; ANSI codes are inserted only when the
//! configured scheme carries them, and always from the scheme value, never
//! from a global table.

use std::io::Write;
use std::path::Path;

use super::config::{ColorScheme, RenderConfig};
use super::layout::{self, HelpItem, TargetItem};
use super::{RenderError, Renderer};
use crate::escape::is_safe_url;
use crate::model::{DocModel, Target};
use crate::richtext::{self, RichText, Segment};

pub struct TextRenderer {
    config: RenderConfig,
    scheme: ColorScheme,
}

impl TextRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let scheme = config.scheme();
        Self { config, scheme }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", code, text, self.scheme.reset)
        }
    }

    /// Map rich-text segments to terminal text. A link keeps its URL in
    /// parentheses only when the URL is safe; the visible text always
    /// survives.
    fn rich(&self, rt: &RichText) -> String {
        let mut out = String::new();
        for segment in &rt.segments {
            match segment {
                Segment::Plain(s) => out.push_str(s),
                Segment::Bold(s) => out.push_str(&self.paint(&self.scheme.strong, s)),
                Segment::Italic(s) => out.push_str(&self.paint(&self.scheme.emphasis, s)),
                Segment::Code(s) => out.push_str(&self.paint(&self.scheme.code, s)),
                Segment::Link { text, url } => {
                    out.push_str(text);
                    if is_safe_url(url) {
                        out.push_str(" (");
                        out.push_str(&self.paint(&self.scheme.url, url));
                        out.push(')');
                    }
                }
            }
        }
        out
    }

    fn doc_line(&self, line: &str) -> String {
        self.rich(&richtext::parse(line))
    }

    fn target_line(&self, target: &Target) -> String {
        let mut line = String::from("  - ");
        line.push_str(&self.paint(&self.scheme.target, &target.name));
        for alias in &target.aliases {
            line.push(' ');
            line.push_str(&self.paint(&self.scheme.alias, alias));
        }
        if !target.summary.is_empty() {
            line.push_str(": ");
            line.push_str(&self.rich(&target.summary));
        }
        if !target.variables.is_empty() {
            let names: Vec<&str> = target.variables.iter().map(|v| v.name.as_str()).collect();
            line.push_str(" [");
            line.push_str(&names.join(", "));
            line.push(']');
        }
        line
    }

    fn write_target_items(
        &self,
        items: Vec<TargetItem<'_>>,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        for item in items {
            match item {
                TargetItem::Header { name, aliases } => {
                    let mut line = self.paint(&self.scheme.target, name);
                    for alias in aliases {
                        line.push(' ');
                        line.push_str(&self.paint(&self.scheme.alias, alias));
                    }
                    writeln!(out, "{}", line)?;
                }
                TargetItem::Blank => writeln!(out)?,
                TargetItem::VariablesHeading => {
                    writeln!(out, "{}", self.paint(&self.scheme.heading, "Variables:"))?;
                }
                TargetItem::Variable(v) => {
                    if v.description.is_empty() {
                        writeln!(out, "  {}", self.paint(&self.scheme.variable, &v.name))?;
                    } else {
                        writeln!(
                            out,
                            "  {}: {}",
                            self.paint(&self.scheme.variable, &v.name),
                            self.doc_line(&v.description)
                        )?;
                    }
                }
                TargetItem::DocLine(line) => writeln!(out, "{}", self.doc_line(line))?,
                TargetItem::Notice(notice) => writeln!(out, "{}", notice)?,
                TargetItem::Source { file, line } => {
                    writeln!(out, "Source: {}:{}", self.config.display_path(file), line)?;
                }
            }
        }
        Ok(())
    }
}

impl Renderer for TextRenderer {
    fn render_help(&self, model: &DocModel, out: &mut dyn Write) -> Result<(), RenderError> {
        for item in layout::help_items(model) {
            match item {
                HelpItem::Usage => {
                    writeln!(out, "{}", self.paint(&self.scheme.heading, layout::USAGE))?;
                }
                HelpItem::Blank => writeln!(out)?,
                HelpItem::DocLine(line) => writeln!(out, "{}", self.doc_line(line))?,
                HelpItem::IncludedFilesHeading => {
                    writeln!(
                        out,
                        "{}",
                        self.paint(&self.scheme.heading, "Included files:")
                    )?;
                }
                HelpItem::FileHeading(file) => {
                    writeln!(out, "  {}:", self.config.display_path(&file.path))?;
                }
                HelpItem::FileDocLine(line) => writeln!(out, "    {}", self.doc_line(line))?,
                HelpItem::TargetsHeading => {
                    writeln!(out, "{}", self.paint(&self.scheme.heading, "Targets:"))?;
                }
                HelpItem::CategoryHeading(category) => {
                    writeln!(out, "{}:", self.paint(&self.scheme.heading, &category.name))?;
                }
                HelpItem::TargetLine(target) => writeln!(out, "{}", self.target_line(target))?,
            }
        }
        Ok(())
    }

    fn render_target(&self, target: &Target, out: &mut dyn Write) -> Result<(), RenderError> {
        self.write_target_items(layout::target_items(target), out)
    }

    fn render_basic_target(
        &self,
        name: &str,
        file: &Path,
        line: u32,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        self.write_target_items(layout::basic_target_items(name, file, line), out)
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}
