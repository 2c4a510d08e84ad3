//! Makefile annotation scanner — line-by-line state machine.
//!
//! Recognized annotations:
//!
//! - `## text` doc lines, accumulated into a block
//! - `##@ Name` category markers
//! - rule lines `name alias…: prereqs` (the pending block becomes the
//!   target's documentation; extra names are aliases)
//! - target-scoped variables `name: VAR ?= value  ## description`
//! - `include` / `-include` / `sinclude` directives
//!
//! A doc block not followed directly by a rule becomes the file's doc
//! block if none was set yet and no target has been seen; later orphaned
//! blocks are dropped.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Target, Variable, UNCATEGORIZED};
use crate::richtext;

// -- Regex patterns -----------------------------------------------------------

static RE_CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##@[[:blank:]]*(.*?)[[:blank:]]*$").unwrap());

static RE_DOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##[[:blank:]]?(.*)$").unwrap());

static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-|s)?include[[:blank:]]+(.+?)[[:blank:]]*$").unwrap());

// Target-scoped variable: `name: VAR op value`. Checked before plain rules
// because both start with `name:`.
static RE_TARGET_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([^\s:=#]+)[[:blank:]]*:[[:blank:]]*([A-Za-z_][A-Za-z0-9_]*)[[:blank:]]*(\?=|:=|\+=|=)[[:blank:]]*(.*)$",
    )
    .unwrap()
});

// Rule line: one or more target names, a colon, optional prerequisites.
// A second `:` right after the first (`::` rules) is tolerated.
static RE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:=#][^:=#]*):{1,2}([^=].*)?$").unwrap());

static RE_BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[[:blank:]]*$").unwrap());

// -- Scan results -------------------------------------------------------------

/// Everything extracted from a single Makefile.
#[derive(Debug, Default)]
pub struct FileScan {
    /// File-level doc block.
    pub doc_lines: Vec<String>,
    /// Targets with the category each belongs to, in scan order.
    pub targets: Vec<(String, Target)>,
    /// Include paths, verbatim, in scan order.
    pub includes: Vec<String>,
    /// True when a `##@` marker was seen.
    pub grouped: bool,
}

// -- Scanner state ------------------------------------------------------------

#[derive(Default)]
struct Scanner {
    result: FileScan,
    /// Accumulating `##` block.
    pending: Vec<String>,
    current_category: Option<String>,
    file_block_set: bool,
}

/// Scan one Makefile's text. Infallible: unrecognized lines reset state,
/// they never error.
pub fn scan_file(path: &Path, content: &str) -> FileScan {
    let mut scanner = Scanner::default();
    for (index, line) in content.lines().enumerate() {
        scanner.process_line(path, line, index as u32 + 1);
    }
    scanner.flush_pending();
    scanner.result
}

impl Scanner {
    fn process_line(&mut self, path: &Path, line: &str, line_no: u32) {
        // 1. `##@ Category`
        if let Some(caps) = RE_CATEGORY.captures(line) {
            self.flush_pending();
            let name = caps[1].to_string();
            if !name.is_empty() {
                self.current_category = Some(name);
                self.result.grouped = true;
            }
            return;
        }

        // 2. `## doc line`
        if let Some(caps) = RE_DOC.captures(line) {
            self.pending.push(caps[1].to_string());
            return;
        }

        // 3. Recipe lines never interact with annotations.
        if line.starts_with('\t') {
            self.flush_pending();
            return;
        }

        // 4. Blank line: a pending block not attached to a rule is either
        // the file block or dropped.
        if RE_BLANK.is_match(line) {
            self.flush_pending();
            return;
        }

        // 5. `include` and friends.
        if let Some(caps) = RE_INCLUDE.captures(line) {
            self.flush_pending();
            for path_word in caps[1].split_whitespace() {
                if path_word.contains("$(") || path_word.contains("${") {
                    log::debug!("skipping unexpandable include: {}", path_word);
                    continue;
                }
                self.result.includes.push(path_word.to_string());
            }
            return;
        }

        // 6. Target-scoped variable, before the generic rule match.
        if let Some(caps) = RE_TARGET_VAR.captures(line) {
            let target_name = caps[1].to_string();
            let var_name = caps[2].to_string();
            let description = inline_description(&caps[4])
                .map(str::to_string)
                .unwrap_or_else(|| self.pending.join(" "));
            self.pending.clear();
            match self.find_target_mut(&target_name) {
                Some(target) => target.variables.push(Variable {
                    name: var_name,
                    description,
                }),
                None => log::warn!(
                    "{}:{}: variable {} for unknown target {}",
                    path.display(),
                    line_no,
                    var_name,
                    target_name
                ),
            }
            return;
        }

        // 7. Rule line: attach the pending block.
        if let Some(caps) = RE_RULE.captures(line) {
            let names: Vec<&str> = caps[1].split_whitespace().collect();
            let Some(&name) = names.first() else {
                self.pending.clear();
                return;
            };
            // Special targets (.PHONY and friends) carry no docs.
            if name.starts_with('.') {
                self.pending.clear();
                return;
            }
            let docs = std::mem::take(&mut self.pending);
            let category = self
                .current_category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            self.result.targets.push((
                category,
                Target {
                    name: name.to_string(),
                    aliases: names[1..].iter().map(|s| s.to_string()).collect(),
                    summary: richtext::summarize(&docs),
                    docs,
                    variables: Vec::new(),
                    file: path.to_path_buf(),
                    line: line_no,
                },
            ));
            return;
        }

        // Anything else (global assignments, conditionals, ...) breaks a
        // pending block, exactly like a blank line.
        self.flush_pending();
    }

    /// An unattached block becomes the file block only at the top of the
    /// file: before any target and only once.
    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let block = std::mem::take(&mut self.pending);
        if !self.file_block_set && self.result.targets.is_empty() {
            self.result.doc_lines = block;
            self.file_block_set = true;
        }
    }

    fn find_target_mut(&mut self, name: &str) -> Option<&mut Target> {
        self.result
            .targets
            .iter_mut()
            .map(|(_, t)| t)
            .find(|t| t.name == name)
    }
}

/// Trailing `## description` on a variable's value, if present.
fn inline_description(value: &str) -> Option<&str> {
    value.split_once("##").map(|(_, desc)| desc.trim())
}
