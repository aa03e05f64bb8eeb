//! Discovery of the files a run converts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ConvertError;

static JS_EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(?:c|m)?js$").unwrap());

/// One file to convert and where its output goes (before the `.mjs`
/// rename).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Whether a directory entry named `name` is visited.
///
/// Hidden entries and `node_modules*` are skipped, and so is anything whose
/// name does not end in `.js`, `.mjs` or `.cjs`. This applies to
/// directories too: a subdirectory is only entered when its own name looks
/// like a JavaScript file.
pub fn is_eligible(name: &str) -> bool {
    !name.starts_with('.') && !name.starts_with("node_modules") && JS_EXTENSION.is_match(name)
}

/// Every conversion task for `source`, mirrored under `dest`.
///
/// A regular file yields a single task regardless of its name. A directory
/// is walked recursively in file-name order. Anything else yields nothing.
pub fn collect_tasks(source: &Path, dest: &Path) -> Result<Vec<ConversionTask>, ConvertError> {
    let metadata = fs::metadata(source).map_err(|e| ConvertError::Stat {
        path: source.to_path_buf(),
        source: e,
    })?;

    if metadata.is_file() {
        return Ok(vec![ConversionTask {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
        }]);
    }
    if !metadata.is_dir() {
        debug!(path = %source.display(), "ignoring special file");
        return Ok(Vec::new());
    }

    let mut tasks = Vec::new();
    let walker = WalkDir::new(source)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let keep = entry.file_name().to_str().is_some_and(is_eligible);
            if !keep {
                debug!(path = %entry.path().display(), "skipped");
            }
            keep
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            let source = e.into();
            if path.is_dir() {
                ConvertError::ReadDir { path, source }
            } else {
                ConvertError::Stat { path, source }
            }
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            debug!(path = %entry.path().display(), "ignoring special file");
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        debug!(path = %entry.path().display(), "discovered");
        tasks.push(ConversionTask {
            source: entry.path().to_path_buf(),
            dest: dest.join(relative),
        });
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_names() {
        assert!(is_eligible("index.js"));
        assert!(is_eligible("index.mjs"));
        assert!(is_eligible("index.cjs"));
        assert!(is_eligible("lib.js"));

        assert!(!is_eligible("index.ts"));
        assert!(!is_eligible("index.json"));
        assert!(!is_eligible("index.jsx"));
        assert!(!is_eligible(".eslintrc.js"));
        assert!(!is_eligible("node_modules"));
        assert!(!is_eligible("node_modules.js"));
        assert!(!is_eligible("lib"));
    }

    #[test]
    fn missing_source_is_a_stat_error() {
        let err = collect_tasks(Path::new("/definitely/not/here.js"), Path::new("out.js"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Stat { .. }));
    }
}
