//! JSON renderer — structured output for tooling integration.
//!
//! View structs serialize through `serde_json`, so string escaping is the
//! serializer's job, never assembled by hand. Rich text is flattened to
//! its plain-text rendering; consumers of structured data want readable
//! text, not display markup.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::config::RenderConfig;
use super::layout;
use super::{RenderError, Renderer};
use crate::model::{DocModel, Target, Variable};
use crate::richtext;

pub struct JsonRenderer {
    config: RenderConfig,
}

#[derive(Serialize)]
struct HelpView<'a> {
    usage: &'static str,
    grouped: bool,
    files: Vec<FileView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    categories: Vec<CategoryView<'a>>,
}

#[derive(Serialize)]
struct FileView {
    path: String,
    entry_point: bool,
    doc: Vec<String>,
}

#[derive(Serialize)]
struct CategoryView<'a> {
    /// Absent for the uncategorized sentinel, mirroring the suppressed
    /// header of the textual formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    targets: Vec<TargetView<'a>>,
}

#[derive(Serialize)]
struct TargetView<'a> {
    name: &'a str,
    aliases: &'a [String],
    summary: String,
    doc: Vec<String>,
    variables: Vec<VariableView<'a>>,
    file: String,
    line: u32,
}

#[derive(Serialize)]
struct VariableView<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
}

#[derive(Serialize)]
struct BasicTargetView<'a> {
    name: &'a str,
    notice: &'static str,
    file: String,
    line: u32,
}

impl JsonRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    fn flatten(line: &str) -> String {
        richtext::parse(line).plain()
    }

    fn variable_view<'a>(v: &'a Variable) -> VariableView<'a> {
        VariableView {
            name: &v.name,
            description: Self::flatten(&v.description),
        }
    }

    fn target_view<'a>(&self, target: &'a Target) -> TargetView<'a> {
        TargetView {
            name: &target.name,
            aliases: &target.aliases,
            summary: target.summary.plain(),
            doc: target.docs.iter().map(|l| Self::flatten(l)).collect(),
            variables: target.variables.iter().map(Self::variable_view).collect(),
            file: self.config.display_path(&target.file),
            line: target.line,
        }
    }

    fn emit<T: Serialize>(view: &T, out: &mut dyn Write) -> Result<(), RenderError> {
        serde_json::to_writer_pretty(&mut *out, view).map_err(std::io::Error::from)?;
        writeln!(out)?;
        Ok(())
    }
}

impl Renderer for JsonRenderer {
    fn render_help(&self, model: &DocModel, out: &mut dyn Write) -> Result<(), RenderError> {
        let view = HelpView {
            usage: layout::USAGE,
            grouped: model.grouped,
            files: model
                .ordered_files()
                .into_iter()
                .map(|f| FileView {
                    path: self.config.display_path(&f.path),
                    entry_point: f.entry_point,
                    doc: f.lines.iter().map(|l| Self::flatten(l)).collect(),
                })
                .collect(),
            categories: model
                .categories
                .iter()
                .map(|c| CategoryView {
                    name: (!c.is_uncategorized()).then_some(c.name.as_str()),
                    targets: c.targets.iter().map(|t| self.target_view(t)).collect(),
                })
                .collect(),
        };
        Self::emit(&view, out)
    }

    fn render_target(&self, target: &Target, out: &mut dyn Write) -> Result<(), RenderError> {
        Self::emit(&self.target_view(target), out)
    }

    fn render_basic_target(
        &self,
        name: &str,
        file: &Path,
        line: u32,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let view = BasicTargetView {
            name,
            notice: layout::NO_DOCS_NOTICE,
            file: self.config.display_path(file),
            line,
        };
        Self::emit(&view, out)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, DocModel, FileDoc, UNCATEGORIZED};
    use serde_json::Value;
    use std::path::PathBuf;

    fn sample_target() -> Target {
        Target {
            name: "build".to_string(),
            aliases: vec!["b".to_string()],
            summary: richtext::parse("Build with `code`."),
            docs: vec!["Build with `code`. See [docs](https://example.com).".to_string()],
            variables: vec![Variable {
                name: "GOOS".to_string(),
                description: String::new(),
            }],
            file: PathBuf::from("Makefile"),
            line: 3,
        }
    }

    fn render_help_value(model: &DocModel) -> Value {
        let renderer = JsonRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer.render_help(model, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn empty_model_parses_without_categories_key() {
        let value = render_help_value(&DocModel::default());
        assert_eq!(value["usage"], "Usage: make [target]");
        assert!(value.get("categories").is_none());
        assert_eq!(value["files"], serde_json::json!([]));
    }

    #[test]
    fn rich_text_is_flattened() {
        let model = DocModel {
            files: Vec::new(),
            grouped: false,
            categories: vec![Category {
                name: UNCATEGORIZED.to_string(),
                targets: vec![sample_target()],
            }],
        };
        let value = render_help_value(&model);
        let target = &value["categories"][0]["targets"][0];
        assert_eq!(target["summary"], "Build with code.");
        assert_eq!(target["doc"][0], "Build with code. See docs.");
    }

    #[test]
    fn sentinel_category_has_no_name_key() {
        let model = DocModel {
            files: Vec::new(),
            grouped: false,
            categories: vec![Category {
                name: UNCATEGORIZED.to_string(),
                targets: vec![sample_target()],
            }],
        };
        let value = render_help_value(&model);
        assert!(value["categories"][0].get("name").is_none());
    }

    #[test]
    fn named_category_keeps_name() {
        let model = DocModel {
            files: Vec::new(),
            grouped: true,
            categories: vec![Category {
                name: "Build".to_string(),
                targets: vec![sample_target()],
            }],
        };
        let value = render_help_value(&model);
        assert_eq!(value["categories"][0]["name"], "Build");
    }

    #[test]
    fn file_docs_are_listed_entry_first() {
        let model = DocModel {
            files: vec![
                FileDoc {
                    path: PathBuf::from("lib.mk"),
                    lines: vec!["Helpers.".to_string()],
                    entry_point: false,
                    order: 1,
                },
                FileDoc {
                    path: PathBuf::from("Makefile"),
                    lines: vec!["Entry.".to_string()],
                    entry_point: true,
                    order: 0,
                },
            ],
            grouped: false,
            categories: Vec::new(),
        };
        let value = render_help_value(&model);
        assert_eq!(value["files"][0]["path"], "Makefile");
        assert_eq!(value["files"][0]["entry_point"], true);
        assert_eq!(value["files"][1]["path"], "lib.mk");
    }

    #[test]
    fn detail_view_serializes_variables_and_source() {
        let renderer = JsonRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer.render_target(&sample_target(), &mut out).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["name"], "build");
        assert_eq!(value["aliases"][0], "b");
        assert_eq!(value["variables"][0]["name"], "GOOS");
        assert!(value["variables"][0].get("description").is_none());
        assert_eq!(value["file"], "Makefile");
        assert_eq!(value["line"], 3);
    }

    #[test]
    fn basic_view_carries_notice() {
        let renderer = JsonRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer
            .render_basic_target("mystery", Path::new("Makefile"), 9, &mut out)
            .unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["name"], "mystery");
        assert_eq!(value["notice"], "no documentation available");
        assert_eq!(value["line"], 9);
    }

    #[test]
    fn quotes_and_control_bytes_are_serializer_escaped() {
        let mut target = sample_target();
        target.name = "say \"hi\"\n".to_string();
        let renderer = JsonRenderer::new(RenderConfig::default());
        let mut out = Vec::new();
        renderer.render_target(&target, &mut out).unwrap();
        // Output must round-trip through a JSON parser.
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["name"], "say \"hi\"\n");
    }
}
