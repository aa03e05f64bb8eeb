//! `package.json` markers declaring output directories as CommonJS.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConvertError;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    CommonJs,
}

/// The manifest written into each output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "type")]
    pub module_type: ModuleType,
}

impl Manifest {
    pub fn commonjs() -> Self {
        Self {
            module_type: ModuleType::CommonJs,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// What preparing a directory did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    /// The directory was created or confirmed and a manifest written.
    Written,
    /// A manifest was already there and left alone.
    Kept,
    /// Another task prepared the directory earlier in this run.
    AlreadyPrepared,
}

/// Output directories prepared during one run.
///
/// The first task to reach a directory creates it and handles the manifest
/// while holding that directory's lock; tasks arriving meanwhile block until
/// it is done, then see it as prepared.
#[derive(Debug, Default)]
pub struct DirectoryRegistry {
    dirs: DashMap<PathBuf, Arc<Mutex<bool>>>,
}

impl DirectoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `dir` exists and carries a manifest named `manifest_name`.
    pub fn prepare(&self, dir: &Path, manifest_name: &str) -> Result<MarkerOutcome, ConvertError> {
        let slot = self.dirs.entry(dir.to_path_buf()).or_default().clone();
        let mut ready = slot.lock();
        if *ready {
            return Ok(MarkerOutcome::AlreadyPrepared);
        }

        fs::create_dir_all(dir).map_err(|e| ConvertError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let manifest = dir.join(manifest_name);
        let outcome = write_manifest(&manifest).map_err(|e| ConvertError::Manifest {
            path: manifest.clone(),
            source: e,
        })?;
        debug!(path = %manifest.display(), ?outcome, "prepared output directory");

        *ready = true;
        Ok(outcome)
    }
}

/// Write the CommonJS manifest at `path` unless something already exists
/// there.
fn write_manifest(path: &Path) -> io::Result<MarkerOutcome> {
    if fs::metadata(path).is_ok() {
        return Ok(MarkerOutcome::Kept);
    }
    let json = Manifest::commonjs().to_json()?;
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(json.as_bytes())?;
            Ok(MarkerOutcome::Written)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(MarkerOutcome::Kept),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn manifest_json_is_exact() {
        assert_eq!(Manifest::commonjs().to_json().unwrap(), r#"{"type":"commonjs"}"#);
        let parsed: Manifest = serde_json::from_str(r#"{ "type": "commonjs" }"#).unwrap();
        assert_eq!(parsed, Manifest::commonjs());
    }

    #[test]
    fn directory_is_prepared_once() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b");
        let registry = DirectoryRegistry::new();

        assert_eq!(registry.prepare(&dir, MANIFEST_FILE).unwrap(), MarkerOutcome::Written);
        assert_eq!(
            registry.prepare(&dir, MANIFEST_FILE).unwrap(),
            MarkerOutcome::AlreadyPrepared
        );
        assert_eq!(
            fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap(),
            r#"{"type":"commonjs"}"#
        );
        assert_eq!(registry.dirs.len(), 1);
    }

    #[test]
    fn existing_manifest_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = tmp.path().join(MANIFEST_FILE);
        fs::write(&manifest, r#"{"type":"module","name":"x"}"#).unwrap();

        let registry = DirectoryRegistry::new();
        assert_eq!(registry.prepare(tmp.path(), MANIFEST_FILE).unwrap(), MarkerOutcome::Kept);
        assert_eq!(
            fs::read_to_string(&manifest).unwrap(),
            r#"{"type":"module","name":"x"}"#
        );
    }

    #[test]
    fn concurrent_tasks_write_one_manifest() {
        use rayon::prelude::*;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("shared");
        let registry = DirectoryRegistry::new();

        let outcomes: Vec<MarkerOutcome> = (0..32)
            .into_par_iter()
            .map(|_| registry.prepare(&dir, MANIFEST_FILE).unwrap())
            .collect();

        let written = outcomes
            .iter()
            .filter(|o| **o == MarkerOutcome::Written)
            .count();
        assert_eq!(written, 1);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, MarkerOutcome::Written | MarkerOutcome::AlreadyPrepared)));
    }
}
