//! HTML renderer — standalone page with semantic markup.
//!
//! Every literal string from the model is entity-escaped before any tag is
//! added around it; link URLs additionally pass the scheme check or the
//! anchor degrades to its text.

use std::io::Write;
use std::path::Path;

use super::config::RenderConfig;
use super::layout::{self, HelpItem, TargetItem};
use super::{RenderError, Renderer};
use crate::escape::{escape_html, is_safe_url};
use crate::model::{DocModel, Target};
use crate::richtext::{self, RichText, Segment};

pub struct HtmlRenderer {
    config: RenderConfig,
}

impl HtmlRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Map rich-text segments to HTML. Content is escaped first in every
    /// arm; only a safe URL earns an `href`.
    fn rich(rt: &RichText) -> String {
        let mut out = String::new();
        for segment in &rt.segments {
            match segment {
                Segment::Plain(s) => out.push_str(&escape_html(s)),
                Segment::Bold(s) => {
                    out.push_str("<strong>");
                    out.push_str(&escape_html(s));
                    out.push_str("</strong>");
                }
                Segment::Italic(s) => {
                    out.push_str("<em>");
                    out.push_str(&escape_html(s));
                    out.push_str("</em>");
                }
                Segment::Code(s) => {
                    out.push_str("<code>");
                    out.push_str(&escape_html(s));
                    out.push_str("</code>");
                }
                Segment::Link { text, url } => {
                    if is_safe_url(url) {
                        out.push_str(&format!(
                            "<a href=\"{}\">{}</a>",
                            escape_html(url),
                            escape_html(text)
                        ));
                    } else {
                        out.push_str(&escape_html(text));
                    }
                }
            }
        }
        out
    }

    fn doc_line(line: &str) -> String {
        Self::rich(&richtext::parse(line))
    }

    fn head(out: &mut dyn Write, title: &str) -> std::io::Result<()> {
        writeln!(out, "<!DOCTYPE html>\n<html>\n<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{}</title>", escape_html(title))?;
        writeln!(out, "<style>")?;
        writeln!(
            out,
            "body {{ font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }}"
        )?;
        writeln!(
            out,
            "code {{ background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }}"
        )?;
        writeln!(out, "dt {{ font-weight: bold; margin-top: 0.5em; }}")?;
        writeln!(out, "dd {{ margin-left: 1.5em; }}")?;
        writeln!(out, ".usage {{ font-weight: bold; }}")?;
        writeln!(out, ".source {{ color: #666; font-size: 0.85em; }}")?;
        writeln!(out, "</style>")?;
        writeln!(out, "</head>\n<body>")?;
        Ok(())
    }

    fn foot(out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "</body>\n</html>")
    }

    fn target_line(target: &Target) -> String {
        let mut line = format!("<strong>{}</strong>", escape_html(&target.name));
        for alias in &target.aliases {
            line.push_str(&format!(" <code>{}</code>", escape_html(alias)));
        }
        if !target.summary.is_empty() {
            line.push_str(": ");
            line.push_str(&Self::rich(&target.summary));
        }
        if !target.variables.is_empty() {
            let names: Vec<String> = target
                .variables
                .iter()
                .map(|v| format!("<code>{}</code>", escape_html(&v.name)))
                .collect();
            line.push_str(&format!(" [{}]", names.join(", ")));
        }
        format!("  <li>{}</li>", line)
    }

    fn write_target_items(
        &self,
        items: Vec<TargetItem<'_>>,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let mut in_list = false;
        for item in items {
            if in_list && !matches!(item, TargetItem::Variable(_)) {
                writeln!(out, "</dl>")?;
                in_list = false;
            }
            match item {
                TargetItem::Header { name, aliases } => {
                    let mut line = format!("<h1>{}", escape_html(name));
                    for alias in aliases {
                        line.push_str(&format!(" <code>{}</code>", escape_html(alias)));
                    }
                    line.push_str("</h1>");
                    writeln!(out, "{}", line)?;
                }
                TargetItem::Blank => {}
                TargetItem::VariablesHeading => writeln!(out, "<h2>Variables</h2>")?,
                TargetItem::Variable(v) => {
                    if !in_list {
                        writeln!(out, "<dl>")?;
                        in_list = true;
                    }
                    writeln!(out, "  <dt><code>{}</code></dt>", escape_html(&v.name))?;
                    if !v.description.is_empty() {
                        writeln!(out, "  <dd>{}</dd>", Self::doc_line(&v.description))?;
                    }
                }
                TargetItem::DocLine(line) => writeln!(out, "<p>{}</p>", Self::doc_line(line))?,
                TargetItem::Notice(notice) => {
                    writeln!(out, "<p><em>{}</em></p>", escape_html(notice))?;
                }
                TargetItem::Source { file, line } => {
                    writeln!(
                        out,
                        "<p class=\"source\">{}:{}</p>",
                        escape_html(&self.config.display_path(file)),
                        line
                    )?;
                }
            }
        }
        if in_list {
            writeln!(out, "</dl>")?;
        }
        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    fn render_help(&self, model: &DocModel, out: &mut dyn Write) -> Result<(), RenderError> {
        Self::head(out, "Makefile documentation")?;
        let mut in_list = false;
        for item in layout::help_items(model) {
            if in_list && !matches!(item, HelpItem::TargetLine(_)) {
                writeln!(out, "</ul>")?;
                in_list = false;
            }
            match item {
                HelpItem::Usage => {
                    writeln!(out, "<p class=\"usage\">{}</p>", escape_html(layout::USAGE))?;
                }
                HelpItem::Blank => {}
                HelpItem::DocLine(line) => writeln!(out, "<p>{}</p>", Self::doc_line(line))?,
                HelpItem::IncludedFilesHeading => writeln!(out, "<h2>Included files</h2>")?,
                HelpItem::FileHeading(file) => {
                    writeln!(
                        out,
                        "<h3><code>{}</code></h3>",
                        escape_html(&self.config.display_path(&file.path))
                    )?;
                }
                HelpItem::FileDocLine(line) => writeln!(out, "<p>{}</p>", Self::doc_line(line))?,
                HelpItem::TargetsHeading => writeln!(out, "<h2>Targets</h2>")?,
                HelpItem::CategoryHeading(category) => {
                    writeln!(out, "<h3>{}</h3>", escape_html(&category.name))?;
                }
                HelpItem::TargetLine(target) => {
                    if !in_list {
                        writeln!(out, "<ul>")?;
                        in_list = true;
                    }
                    writeln!(out, "{}", Self::target_line(target))?;
                }
            }
        }
        if in_list {
            writeln!(out, "</ul>")?;
        }
        Self::foot(out)?;
        Ok(())
    }

    fn render_target(&self, target: &Target, out: &mut dyn Write) -> Result<(), RenderError> {
        Self::head(out, &target.name)?;
        self.write_target_items(layout::target_items(target), out)?;
        Self::foot(out)?;
        Ok(())
    }

    fn render_basic_target(
        &self,
        name: &str,
        file: &Path,
        line: u32,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        Self::head(out, name)?;
        self.write_target_items(layout::basic_target_items(name, file, line), out)?;
        Self::foot(out)?;
        Ok(())
    }

    fn content_type(&self) -> &'static str {
        "text/html"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }
}
