//! GitHub-flavored markdown renderer.
//!
//! Structural strings (target names, category names, paths) go through
//! [`escape_markdown`] so a literal `build*test` cannot open emphasis.
//! Documentation body text is re-emitted from its parsed segments instead,
//! which preserves authored markup and still lets unsafe links degrade.

use std::io::Write;
use std::path::Path;

use super::config::RenderConfig;
use super::layout::{self, HelpItem, TargetItem};
use super::{RenderError, Renderer};
use crate::escape::{escape_markdown, is_safe_url};
use crate::model::{DocModel, Target};
use crate::richtext::{self, RichText, Segment};

pub struct MarkdownRenderer {
    config: RenderConfig,
}

impl MarkdownRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Map rich-text segments back to markdown syntax. Span content is
    /// authored text and passes through untouched; only the link construct
    /// is conditional on URL safety.
    fn rich(rt: &RichText) -> String {
        let mut out = String::new();
        for segment in &rt.segments {
            match segment {
                Segment::Plain(s) => out.push_str(s),
                Segment::Bold(s) => {
                    out.push_str("**");
                    out.push_str(s);
                    out.push_str("**");
                }
                Segment::Italic(s) => {
                    out.push('*');
                    out.push_str(s);
                    out.push('*');
                }
                Segment::Code(s) => {
                    out.push('`');
                    out.push_str(s);
                    out.push('`');
                }
                Segment::Link { text, url } => {
                    if is_safe_url(url) {
                        out.push_str(&format!("[{}]({})", text, url));
                    } else {
                        out.push_str(text);
                    }
                }
            }
        }
        out
    }

    fn doc_line(line: &str) -> String {
        Self::rich(&richtext::parse(line))
    }

    fn target_line(target: &Target) -> String {
        let mut line = format!("- **{}**", escape_markdown(&target.name));
        for alias in &target.aliases {
            line.push_str(&format!(" (`{}`)", escape_markdown(alias)));
        }
        if !target.summary.is_empty() {
            line.push_str(": ");
            line.push_str(&Self::rich(&target.summary));
        }
        if !target.variables.is_empty() {
            let names: Vec<String> = target
                .variables
                .iter()
                .map(|v| format!("`{}`", escape_markdown(&v.name)))
                .collect();
            line.push_str(&format!(" [{}]", names.join(", ")));
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
                    writeln!(out, "## {}", escape_markdown(name))?;
                    if !aliases.is_empty() {
                        let list: Vec<String> = aliases
                            .iter()
                            .map(|a| format!("`{}`", escape_markdown(a)))
                            .collect();
                        writeln!(out)?;
                        writeln!(out, "Aliases: {}", list.join(", "))?;
                    }
                }
                TargetItem::Blank => writeln!(out)?,
                TargetItem::VariablesHeading => {
                    writeln!(out, "### Variables")?;
                    writeln!(out)?;
                }
                TargetItem::Variable(v) => {
                    if v.description.is_empty() {
                        writeln!(out, "- `{}`", escape_markdown(&v.name))?;
                    } else {
                        writeln!(
                            out,
                            "- `{}`: {}",
                            escape_markdown(&v.name),
                            Self::doc_line(&v.description)
                        )?;
                    }
                }
                TargetItem::DocLine(line) => writeln!(out, "{}", Self::doc_line(line))?,
                TargetItem::Notice(notice) => writeln!(out, "_{}_", notice)?,
                TargetItem::Source { file, line } => {
                    writeln!(
                        out,
                        "Source: `{}:{}`",
                        self.config.display_path(file),
                        line
                    )?;
                }
            }
        }
        Ok(())
    }
}

impl Renderer for MarkdownRenderer {
    fn render_help(&self, model: &DocModel, out: &mut dyn Write) -> Result<(), RenderError> {
        for item in layout::help_items(model) {
            match item {
                HelpItem::Usage => writeln!(out, "Usage: `make [target]`")?,
                HelpItem::Blank => writeln!(out)?,
                HelpItem::DocLine(line) => writeln!(out, "{}", Self::doc_line(line))?,
                HelpItem::IncludedFilesHeading => {
                    writeln!(out, "## Included files")?;
                }
                HelpItem::FileHeading(file) => {
                    writeln!(out)?;
                    writeln!(
                        out,
                        "### {}",
                        escape_markdown(&self.config.display_path(&file.path))
                    )?;
                    writeln!(out)?;
                }
                HelpItem::FileDocLine(line) => writeln!(out, "{}", Self::doc_line(line))?,
                HelpItem::TargetsHeading => writeln!(out, "## Targets")?,
                HelpItem::CategoryHeading(category) => {
                    writeln!(out, "### {}", escape_markdown(&category.name))?;
                    writeln!(out)?;
                }
                HelpItem::TargetLine(target) => writeln!(out, "{}", Self::target_line(target))?,
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
        "text/markdown"
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, DocModel, Variable, UNCATEGORIZED};
    use std::path::PathBuf;

    fn target_named(name: &str) -> Target {
        Target {
            name: name.to_string(),
            aliases: Vec::new(),
            summary: richtext::parse("Does things."),
            docs: vec!["Does things.".to_string()],
            variables: Vec::new(),
            file: PathBuf::from("Makefile"),
            line: 1,
        }
    }

    fn model_with(target: Target) -> DocModel {
        DocModel {
            files: Vec::new(),
            grouped: false,
            categories: vec![Category {
                name: UNCATEGORIZED.to_string(),
                targets: vec![target],
            }],
        }
    }

    fn render_help_str(model: &DocModel) -> String {
        let renderer = MarkdownRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer.render_help(model, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn structural_name_is_escaped() {
        let output = render_help_str(&model_with(target_named("build*test")));
        assert!(output.contains(r"**build\*test**"));
    }

    #[test]
    fn body_markup_is_preserved() {
        let mut target = target_named("build");
        target.docs = vec!["Runs a **full** pass.".to_string()];
        let renderer = MarkdownRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer.render_target(&target, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Runs a **full** pass."));
    }

    #[test]
    fn variable_without_description_has_no_colon() {
        let mut target = target_named("build");
        target.variables = vec![Variable {
            name: "GOOS".to_string(),
            description: String::new(),
        }];
        let renderer = MarkdownRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer.render_target(&target, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("- `GOOS`\n"));
        assert!(!output.contains("- `GOOS`:"));
    }

    #[test]
    fn variable_with_description_keeps_it() {
        let mut target = target_named("build");
        target.variables = vec![Variable {
            name: "GOAL".to_string(),
            description: "what to build".to_string(),
        }];
        let renderer = MarkdownRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer.render_target(&target, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("- `GOAL`: what to build\n"));
    }

    #[test]
    fn unsafe_link_keeps_text_only() {
        let mut target = target_named("build");
        target.summary = richtext::parse("go [here](javascript:alert(1))");
        let output = render_help_str(&model_with(target));
        assert!(output.contains("here"));
        assert!(!output.contains("](javascript:"));
    }

    #[test]
    fn safe_link_survives() {
        let mut target = target_named("build");
        target.summary = richtext::parse("go [here](https://example.com)");
        let output = render_help_str(&model_with(target));
        assert!(output.contains("[here](https://example.com)"));
    }

    #[test]
    fn empty_model_is_just_usage() {
        let output = render_help_str(&DocModel::default());
        assert_eq!(output, "Usage: `make [target]`\n");
        assert!(!output.contains("## Targets"));
    }

    #[test]
    fn category_headers_render_escaped() {
        let model = DocModel {
            files: Vec::new(),
            grouped: true,
            categories: vec![Category {
                name: "Build #1".to_string(),
                targets: vec![target_named("build")],
            }],
        };
        let output = render_help_str(&model);
        assert!(output.contains(r"### Build \#1"));
    }
}
