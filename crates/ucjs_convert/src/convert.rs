//! Per-file conversion and the parallel driver over a whole tree.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};
use ucjs_transform::patch_import_meta;

use crate::context::{ConvertContext, ConvertOptions, ConvertReport};
use crate::error::ConvertError;
use crate::walker::{collect_tasks, ConversionTask};

/// Where a destination path is actually written: a trailing `.mjs` becomes
/// `.js`.
pub fn output_path(dest: &Path) -> PathBuf {
    match dest.to_str().and_then(|s| s.strip_suffix(".mjs")) {
        Some(stem) => PathBuf::from(format!("{stem}.js")),
        None => dest.to_path_buf(),
    }
}

impl ConvertContext {
    /// Read, transform and write one file, preparing its output directory
    /// first.
    pub fn convert_file(&self, task: &ConversionTask) -> Result<(), ConvertError> {
        let bytes = fs::read(&task.source).map_err(|e| ConvertError::Read {
            path: task.source.clone(),
            source: e,
        })?;
        let source = String::from_utf8_lossy(&bytes);

        let code = self
            .transformer
            .transform(&source, &task.source)
            .map_err(|e| ConvertError::Transform {
                path: task.source.clone(),
                source: e,
            })?;

        let dest = output_path(&task.dest);
        if let Some(dir) = dest.parent() {
            let outcome = self.directories.prepare(dir, &self.options.manifest_name)?;
            self.record_marker(outcome);
        }

        let code = if self.options.module.import_meta {
            patch_import_meta(&code)
        } else {
            code
        };
        fs::write(&dest, code).map_err(|e| ConvertError::Write {
            path: dest.clone(),
            source: e,
        })?;

        self.record_file();
        debug!(source = %task.source.display(), dest = %dest.display(), "converted");
        Ok(())
    }

    /// Convert `source` (a file or a directory tree) into `dest`.
    ///
    /// Files are converted in parallel; the first failure ends the run.
    pub fn run(&self, source: &Path, dest: &Path) -> Result<ConvertReport, ConvertError> {
        let tasks = collect_tasks(source, dest)?;
        debug!(count = tasks.len(), "collected conversion tasks");

        tasks.par_iter().try_for_each(|task| self.convert_file(task))?;

        let report = self.report();
        info!(
            files = report.files_converted,
            manifests_written = report.manifests_written,
            manifests_kept = report.manifests_kept,
            "conversion finished"
        );
        Ok(report)
    }
}

/// Convert `source` into `dest` with a fresh context.
pub fn convert_tree(
    source: &Path,
    dest: &Path,
    options: ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    ConvertContext::new(options).run(source, dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mjs_outputs_become_js() {
        assert_eq!(output_path(Path::new("out/a.mjs")), PathBuf::from("out/a.js"));
        assert_eq!(output_path(Path::new("out/a.cjs")), PathBuf::from("out/a.cjs"));
        assert_eq!(output_path(Path::new("out/a.js")), PathBuf::from("out/a.js"));
        assert_eq!(
            output_path(Path::new("out.mjs/a.mjs.js")),
            PathBuf::from("out.mjs/a.mjs.js")
        );
    }
}
