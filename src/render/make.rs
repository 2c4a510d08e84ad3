//! Makefile-embeddable renderer.
//!
//! Emits an includable fragment defining `help` / `help-<name>` targets.
//! Never a multi-line printable block: every logical line becomes its own
//! escaped `@echo` recipe line, and literal control characters are turned
//! into two-character sequences first, so neither make nor the recipe
//! shell ever sees an unescaped newline, quote, backtick, or `$` that came
//! from model text.

use std::io::Write;
use std::path::Path;

use super::config::RenderConfig;
use super::layout::{self, HelpItem, TargetItem};
use super::{RenderError, Renderer};
use crate::escape::{escape_make, is_safe_url};
use crate::model::{DocModel, Target};
use crate::richtext::{self, RichText, Segment};

pub struct MakeRenderer {
    config: RenderConfig,
}

impl MakeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Flatten rich text for echoing: markup dropped, a safe link keeps
    /// its URL in parentheses, an unsafe one keeps only its text.
    fn rich(rt: &RichText) -> String {
        let mut out = String::new();
        for segment in &rt.segments {
            match segment {
                Segment::Link { text, url } => {
                    out.push_str(text);
                    if is_safe_url(url) {
                        out.push_str(" (");
                        out.push_str(url);
                        out.push(')');
                    }
                }
                other => out.push_str(other.content()),
            }
        }
        out
    }

    fn doc_line(line: &str) -> String {
        Self::rich(&richtext::parse(line))
    }

    fn target_line(target: &Target) -> String {
        let mut line = String::from("  - ");
        line.push_str(&target.name);
        for alias in &target.aliases {
            line.push(' ');
            line.push_str(alias);
        }
        if !target.summary.is_empty() {
            line.push_str(": ");
            line.push_str(&Self::rich(&target.summary));
        }
        if !target.variables.is_empty() {
            let names: Vec<&str> = target.variables.iter().map(|v| v.name.as_str()).collect();
            line.push_str(" [");
            line.push_str(&names.join(", "));
            line.push(']');
        }
        line
    }

    /// One logical output line, escaped independently and wrapped in its
    /// own print statement.
    fn echo(out: &mut dyn Write, line: &str) -> std::io::Result<()> {
        writeln!(out, "\t@echo \"{}\"", escape_make(line))
    }

    /// Open an includable rule named `name`.
    fn rule(out: &mut dyn Write, name: &str) -> std::io::Result<()> {
        writeln!(out, ".PHONY: {}", name)?;
        writeln!(out, "{}:", name)
    }

    /// Make target names tolerate only a narrow charset; anything else in
    /// a documented target's name is folded to `-` for the rule name. The
    /// echoed text still shows the real name.
    fn rule_name(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/') {
                    c
                } else {
                    '-'
                }
            })
            .collect()
    }

    fn write_target_items(
        &self,
        items: Vec<TargetItem<'_>>,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        for item in items {
            match item {
                TargetItem::Header { name, aliases } => {
                    let mut line = name.to_string();
                    for alias in aliases {
                        line.push(' ');
                        line.push_str(alias);
                    }
                    Self::echo(out, &line)?;
                }
                TargetItem::Blank => Self::echo(out, "")?,
                TargetItem::VariablesHeading => Self::echo(out, "Variables:")?,
                TargetItem::Variable(v) => {
                    if v.description.is_empty() {
                        Self::echo(out, &format!("  {}", v.name))?;
                    } else {
                        Self::echo(
                            out,
                            &format!("  {}: {}", v.name, Self::doc_line(&v.description)),
                        )?;
                    }
                }
                TargetItem::DocLine(line) => Self::echo(out, &Self::doc_line(line))?,
                TargetItem::Notice(notice) => Self::echo(out, notice)?,
                TargetItem::Source { file, line } => {
                    Self::echo(
                        out,
                        &format!("Source: {}:{}", self.config.display_path(file), line),
                    )?;
                }
            }
        }
        Ok(())
    }
}

impl Renderer for MakeRenderer {
    fn render_help(&self, model: &DocModel, out: &mut dyn Write) -> Result<(), RenderError> {
        writeln!(out, "# Generated documentation. Include and run `make help`.")?;
        Self::rule(out, "help")?;
        for item in layout::help_items(model) {
            match item {
                HelpItem::Usage => Self::echo(out, layout::USAGE)?,
                HelpItem::Blank => Self::echo(out, "")?,
                HelpItem::DocLine(line) => Self::echo(out, &Self::doc_line(line))?,
                HelpItem::IncludedFilesHeading => Self::echo(out, "Included files:")?,
                HelpItem::FileHeading(file) => {
                    Self::echo(out, &format!("  {}:", self.config.display_path(&file.path)))?;
                }
                HelpItem::FileDocLine(line) => {
                    Self::echo(out, &format!("    {}", Self::doc_line(line)))?;
                }
                HelpItem::TargetsHeading => Self::echo(out, "Targets:")?,
                HelpItem::CategoryHeading(category) => {
                    Self::echo(out, &format!("{}:", category.name))?;
                }
                HelpItem::TargetLine(target) => Self::echo(out, &Self::target_line(target))?,
            }
        }
        Ok(())
    }

    fn render_target(&self, target: &Target, out: &mut dyn Write) -> Result<(), RenderError> {
        writeln!(out, "# Generated documentation for one target.")?;
        Self::rule(out, &format!("help-{}", Self::rule_name(&target.name)))?;
        self.write_target_items(layout::target_items(target), out)
    }

    fn render_basic_target(
        &self,
        name: &str,
        file: &Path,
        line: u32,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        writeln!(out, "# Generated documentation for one target.")?;
        Self::rule(out, &format!("help-{}", Self::rule_name(name)))?;
        self.write_target_items(layout::basic_target_items(name, file, line), out)
    }

    fn content_type(&self) -> &'static str {
        "text/x-makefile"
    }

    fn file_extension(&self) -> &'static str {
        "mk"
    }
}
