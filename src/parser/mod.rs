//! Scanner module — entry point that walks includes and builds the model.

pub mod makefile;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{Category, DocModel, FileDoc, Target};

/// Scan an entry Makefile and everything it includes into one model.
///
/// Include paths resolve relative to the including file; files are visited
/// once even when included from several places, and a missing included
/// file is a warning, not an error. Only a missing entry file fails.
pub fn scan(entry: &Path) -> Result<DocModel> {
    let mut model = DocModel::default();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    // Paths still to scan, breadth-first so discovery order is stable.
    let mut queue: Vec<PathBuf> = vec![entry.to_path_buf()];
    let mut order = 0;

    while !queue.is_empty() {
        let mut next_round = Vec::new();
        for path in queue.drain(..) {
            let key = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !visited.insert(key) {
                continue;
            }

            let is_entry = order == 0;
            let content = if is_entry {
                fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?
            } else {
                match fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(err) => {
                        log::warn!("skipping include {}: {}", path.display(), err);
                        continue;
                    }
                }
            };

            let scan = makefile::scan_file(&path, &content);
            log::debug!(
                "scanned {}: {} targets, {} includes",
                path.display(),
                scan.targets.len(),
                scan.includes.len()
            );

            model.files.push(FileDoc {
                path: path.clone(),
                lines: scan.doc_lines,
                entry_point: is_entry,
                order,
            });
            model.grouped |= scan.grouped;
            for (category, target) in scan.targets {
                push_target(&mut model, category, target);
            }

            let base = path.parent().unwrap_or_else(|| Path::new("."));
            for include in scan.includes {
                next_round.push(base.join(include));
            }
            order += 1;
        }
        queue = next_round;
    }

    Ok(model)
}

/// Append a target to its category, creating the category on first use.
/// Category order is first-seen order; target order is scan order.
fn push_target(model: &mut DocModel, category_name: String, target: Target) {
    match model
        .categories
        .iter_mut()
        .find(|c| c.name == category_name)
    {
        Some(category) => category.targets.push(target),
        None => model.categories.push(Category {
            name: category_name,
            targets: vec![target],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNCATEGORIZED;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn entry_and_included_files_are_both_scanned() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "lib.mk",
            "## Helper rules.\n\n## Print the version.\nversion:\n",
        );
        let entry = write_file(
            dir.path(),
            "Makefile",
            "## Entry docs.\n\ninclude lib.mk\n\n## Build.\nbuild:\n",
        );

        let model = scan(&entry).unwrap();
        assert_eq!(model.files.len(), 2);
        assert!(model.files[0].entry_point);
        assert_eq!(model.files[0].lines, vec!["Entry docs."]);
        assert!(!model.files[1].entry_point);
        assert_eq!(model.files[1].lines, vec!["Helper rules."]);
        assert!(model.find_target("build").is_some());
        assert!(model.find_target("version").is_some());
    }

    #[test]
    fn missing_optional_include_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let entry = write_file(
            dir.path(),
            "Makefile",
            "-include missing.mk\n## Build.\nbuild:\n",
        );
        let model = scan(&entry).unwrap();
        assert_eq!(model.files.len(), 1);
        assert!(model.find_target("build").is_some());
    }

    #[test]
    fn missing_entry_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn include_cycles_terminate() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.mk", "include b.mk\n## A.\na:\n");
        write_file(dir.path(), "b.mk", "include a.mk\n## B.\nb:\n");
        let entry = write_file(dir.path(), "Makefile", "include a.mk\n");

        let model = scan(&entry).unwrap();
        assert_eq!(model.files.len(), 3);
        assert!(model.find_target("a").is_some());
        assert!(model.find_target("b").is_some());
    }

    #[test]
    fn categories_merge_across_files_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "extra.mk", "##@ Build\n## Extra.\nextra:\n");
        let entry = write_file(
            dir.path(),
            "Makefile",
            "##@ Build\n## Build.\nbuild:\ninclude extra.mk\n",
        );

        let model = scan(&entry).unwrap();
        assert!(model.grouped);
        let build = model
            .categories
            .iter()
            .find(|c| c.name == "Build")
            .unwrap();
        let names: Vec<&str> = build.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["build", "extra"]);
    }

    #[test]
    fn uncategorized_targets_land_in_sentinel_category() {
        let dir = tempfile::tempdir().unwrap();
        let entry = write_file(dir.path(), "Makefile", "## Build.\nbuild:\n");
        let model = scan(&entry).unwrap();
        assert_eq!(model.categories.len(), 1);
        assert_eq!(model.categories[0].name, UNCATEGORIZED);
        assert!(model.categories[0].is_uncategorized());
    }

    #[test]
    fn alias_lookup_works_through_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let entry = write_file(dir.path(), "Makefile", "## Build.\nbuild b:\n");
        let model = scan(&entry).unwrap();
        let target = model.find_target("b").unwrap();
        assert_eq!(target.name, "build");
    }
}
