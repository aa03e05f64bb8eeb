//! ES module to CommonJS conversion for ucjs.
//!
//! Transforms:
//! - `import x from "m"`       → `const _m = _interop_require_default(require("m"))`
//! - `export const a = 1`      → `Object.defineProperty(exports, "a", { get: ... })`
//! - `import("m")`             → `Promise.resolve().then(() => require("m"))`
//! - `import.meta`             → `({url: require('url').pathToFileURL(__filename).href})`
//!
//! The first three run swc's `common_js` pass between `resolver` and
//! `hygiene`/`fixer`. The last is a text patch applied after codegen that
//! leaves literals untouched.

pub mod emit;
pub mod indirect;
pub mod meta;
pub mod transform;

pub use meta::{patch_import_meta, IMPORT_META_URL};
pub use transform::{
    commonjs_config, transform_and_patch, transform_source, CommonJsTransformer, ModuleTransformer,
};
