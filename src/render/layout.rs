//! Shared structural assembly for the line-oriented renderers.
//!
//! One pure pass turns the model into an ordered list of semantic items;
//! each format then maps items to its own syntax and escaping. Structure
//! lives here exactly once, so the formats cannot drift from each other.

use std::path::Path;

use crate::model::{Category, DocModel, FileDoc, Target, Variable};

/// Fixed usage line, identical in every format.
pub const USAGE: &str = "Usage: make [target]";

/// Notice rendered for a target with no documentation block.
pub const NO_DOCS_NOTICE: &str = "no documentation available";

/// One semantic line of the help view.
pub enum HelpItem<'a> {
    Usage,
    Blank,
    /// Free-form doc line from the entry-point file.
    DocLine(&'a str),
    IncludedFilesHeading,
    /// Included-file sub-header.
    FileHeading(&'a FileDoc),
    /// Free-form doc line belonging to an included file.
    FileDocLine(&'a str),
    TargetsHeading,
    /// Header of a named category. The uncategorized sentinel never
    /// produces this item.
    CategoryHeading(&'a Category),
    TargetLine(&'a Target),
}

/// Assemble the help view: usage line, entry-point docs, included-file
/// docs, then categories in insertion order.
pub fn help_items(model: &DocModel) -> Vec<HelpItem<'_>> {
    let mut items = vec![HelpItem::Usage];
    let files = model.ordered_files();

    for file in files.iter().filter(|f| f.entry_point && !f.lines.is_empty()) {
        items.push(HelpItem::Blank);
        for line in &file.lines {
            items.push(HelpItem::DocLine(line));
        }
    }

    let included: Vec<&FileDoc> = files
        .iter()
        .copied()
        .filter(|f| !f.entry_point && !f.lines.is_empty())
        .collect();
    if !included.is_empty() {
        items.push(HelpItem::Blank);
        items.push(HelpItem::IncludedFilesHeading);
        for file in included {
            items.push(HelpItem::FileHeading(file));
            for line in &file.lines {
                items.push(HelpItem::FileDocLine(line));
            }
        }
    }

    if !model.categories.is_empty() {
        items.push(HelpItem::Blank);
        items.push(HelpItem::TargetsHeading);
        for category in &model.categories {
            if !category.is_uncategorized() {
                items.push(HelpItem::Blank);
                items.push(HelpItem::CategoryHeading(category));
            }
            for target in &category.targets {
                items.push(HelpItem::TargetLine(target));
            }
        }
    }

    items
}

/// One semantic line of a detailed or basic target view.
pub enum TargetItem<'a> {
    /// Target name plus aliases.
    Header {
        name: &'a str,
        aliases: &'a [String],
    },
    Blank,
    VariablesHeading,
    Variable(&'a Variable),
    DocLine(&'a str),
    Notice(&'static str),
    /// `file:line` trailer.
    Source { file: &'a Path, line: u32 },
}

/// Assemble the detailed view of a documented target.
pub fn target_items(target: &Target) -> Vec<TargetItem<'_>> {
    let mut items = vec![TargetItem::Header {
        name: &target.name,
        aliases: &target.aliases,
    }];
    if !target.variables.is_empty() {
        items.push(TargetItem::Blank);
        items.push(TargetItem::VariablesHeading);
        for variable in &target.variables {
            items.push(TargetItem::Variable(variable));
        }
    }
    if !target.docs.is_empty() {
        items.push(TargetItem::Blank);
        for line in &target.docs {
            items.push(TargetItem::DocLine(line));
        }
    }
    items.push(TargetItem::Blank);
    items.push(TargetItem::Source {
        file: &target.file,
        line: target.line,
    });
    items
}

/// Assemble the minimal view for a target without documentation.
pub fn basic_target_items<'a>(name: &'a str, file: &'a Path, line: u32) -> Vec<TargetItem<'a>> {
    vec![
        TargetItem::Header { name, aliases: &[] },
        TargetItem::Blank,
        TargetItem::Notice(NO_DOCS_NOTICE),
        TargetItem::Blank,
        TargetItem::Source { file, line },
    ]
}
