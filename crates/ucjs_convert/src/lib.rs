//! Conversion pipeline for ucjs.
//!
//! - `walker`: finds the files to convert and mirrors their paths
//! - `convert`: reads, transforms, patches and writes each file in parallel
//! - `marker`: writes one `{"type":"commonjs"}` manifest per output directory

pub mod context;
pub mod convert;
pub mod error;
pub mod marker;
pub mod walker;

pub use context::{ConvertContext, ConvertOptions, ConvertReport};
pub use convert::{convert_tree, output_path};
pub use error::ConvertError;
pub use marker::{DirectoryRegistry, Manifest, MarkerOutcome, MANIFEST_FILE};
pub use walker::{collect_tasks, is_eligible, ConversionTask};
