//! ECMAScript AST for ucjs.
//!
//! Re-exports the standard SWC AST and adds `ModuleOptions`, the switches
//! handed to the CommonJS transformer.

pub use swc_ecma_ast::*;

use serde::{Deserialize, Serialize};

/// Switches controlling how an ES module is turned into CommonJS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOptions {
    /// Rewrite `import.meta` into an object carrying the file URL.
    pub import_meta: bool,
    /// Emit interop helpers bridging default exports between module formats.
    pub interop: bool,
    /// Rewrite dynamic `import()` calls into `require` calls.
    pub dynamic_import: bool,
}

impl ModuleOptions {
    /// Same as the default, with interop helpers turned off.
    pub fn without_interop() -> Self {
        Self {
            interop: false,
            ..Self::default()
        }
    }
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            import_meta: true,
            interop: true,
            dynamic_import: true,
        }
    }
}
