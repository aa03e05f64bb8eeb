use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use ucjs_ast::ModuleOptions;
use ucjs_transform::{CommonJsTransformer, ModuleTransformer};

use crate::marker::{DirectoryRegistry, MarkerOutcome, MANIFEST_FILE};

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub module: ModuleOptions,
    /// File name of the marker written into each output directory.
    pub manifest_name: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            module: ModuleOptions::default(),
            manifest_name: MANIFEST_FILE.to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn with_interop(mut self, interop: bool) -> Self {
        self.module.interop = interop;
        self
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    pub files_converted: usize,
    pub manifests_written: usize,
    pub manifests_kept: usize,
}

/// State shared by every task of a run.
pub struct ConvertContext {
    pub options: ConvertOptions,
    pub(crate) transformer: Box<dyn ModuleTransformer>,
    pub(crate) directories: DirectoryRegistry,
    converted: AtomicUsize,
    manifests_written: AtomicUsize,
    manifests_kept: AtomicUsize,
}

impl ConvertContext {
    /// Context converting with the swc-based CommonJS transformer.
    pub fn new(options: ConvertOptions) -> Self {
        let transformer = CommonJsTransformer::new(options.module);
        Self::with_transformer(options, Box::new(transformer))
    }

    pub fn with_transformer(options: ConvertOptions, transformer: Box<dyn ModuleTransformer>) -> Self {
        Self {
            options,
            transformer,
            directories: DirectoryRegistry::new(),
            converted: AtomicUsize::new(0),
            manifests_written: AtomicUsize::new(0),
            manifests_kept: AtomicUsize::new(0),
        }
    }

    pub(crate) fn record_file(&self) {
        self.converted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_marker(&self, outcome: MarkerOutcome) {
        let counter = match outcome {
            MarkerOutcome::Written => &self.manifests_written,
            MarkerOutcome::Kept => &self.manifests_kept,
            MarkerOutcome::AlreadyPrepared => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> ConvertReport {
        ConvertReport {
            files_converted: self.converted.load(Ordering::Relaxed),
            manifests_written: self.manifests_written.load(Ordering::Relaxed),
            manifests_kept: self.manifests_kept.load(Ordering::Relaxed),
        }
    }
}
