//! Data model for scanned Makefile documentation — format-agnostic.

use std::path::PathBuf;

use crate::richtext::RichText;

/// Reserved category name for targets that appear before any `##@` group
/// marker. Compared by value, never by emptiness: a category named by the
/// author is never the empty string, but it could shadow anything shorter.
pub const UNCATEGORIZED: &str = "_uncategorized_";

/// Everything extracted from one scan, ready to render.
///
/// Read-only once built: renderers take `&DocModel` and there is no
/// mutating accessor, so one model may back any number of renders.
#[derive(Debug, Default)]
pub struct DocModel {
    /// Per-file doc blocks, in include-discovery order.
    pub files: Vec<FileDoc>,
    /// True when at least one `##@` group marker was seen.
    pub grouped: bool,
    /// Categories in first-seen order; targets keep their scan order.
    pub categories: Vec<Category>,
}

impl DocModel {
    /// Files in render order: the entry point first, the rest in
    /// discovery order.
    pub fn ordered_files(&self) -> Vec<&FileDoc> {
        let mut files: Vec<&FileDoc> = self.files.iter().collect();
        files.sort_by_key(|f| (!f.entry_point, f.order));
        files
    }

    /// Look up a target by name or alias across all categories.
    pub fn find_target(&self, name: &str) -> Option<&Target> {
        self.categories
            .iter()
            .flat_map(|c| c.targets.iter())
            .find(|t| t.name == name || t.aliases.iter().any(|a| a == name))
    }
}

/// Documentation block attached to one scanned file.
#[derive(Debug)]
pub struct FileDoc {
    pub path: PathBuf,
    /// Raw doc lines; inline markup is parsed at render time.
    pub lines: Vec<String>,
    /// True for the file the scan started from.
    pub entry_point: bool,
    /// Position in include-discovery order.
    pub order: usize,
}

/// A named group of targets.
#[derive(Debug)]
pub struct Category {
    pub name: String,
    pub targets: Vec<Target>,
}

impl Category {
    /// Whether this is the reserved header-less group.
    pub fn is_uncategorized(&self) -> bool {
        self.name == UNCATEGORIZED
    }
}

/// One Makefile target, documented or bare.
#[derive(Debug)]
pub struct Target {
    pub name: String,
    /// Extra names declared on the same rule line.
    pub aliases: Vec<String>,
    /// First sentence of the doc block, parsed once at scan time and
    /// never recomputed per render.
    pub summary: RichText,
    /// Full doc block lines, raw.
    pub docs: Vec<String>,
    /// Target-scoped variables in declaration order.
    pub variables: Vec<Variable>,
    pub file: PathBuf,
    pub line: u32,
}

impl Target {
    /// Targets without a doc block render through the basic path.
    pub fn is_documented(&self) -> bool {
        !self.docs.is_empty()
    }
}

/// A target-scoped variable. An empty description means none was given,
/// not an error.
#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub description: String,
}
