use std::path::Path;

use anyhow::Result;
use swc_common::{Globals, Mark, GLOBALS};
use swc_ecma_ast::Program;
use swc_ecma_transforms_base::{
    fixer::fixer,
    helpers::{inject_helpers, Helpers, HELPERS},
    hygiene::hygiene,
    resolver,
};
use swc_ecma_transforms_module::{
    common_js::{self, FeatureFlag},
    path::Resolver,
    util::Config,
};
use tracing::debug;
use ucjs_ast::ModuleOptions;

use crate::emit::emit_program;
use crate::indirect::detach_optional_calls;
use crate::meta::patch_import_meta;

/// Turns the text of one source file into CommonJS.
///
/// Implementations must be shareable across the worker threads converting
/// a tree.
pub trait ModuleTransformer: Send + Sync {
    fn transform(&self, source: &str, path: &Path) -> Result<String>;
}

/// The swc-based ES module to CommonJS transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonJsTransformer {
    pub options: ModuleOptions,
}

impl CommonJsTransformer {
    pub fn new(options: ModuleOptions) -> Self {
        Self { options }
    }
}

impl ModuleTransformer for CommonJsTransformer {
    fn transform(&self, source: &str, path: &Path) -> Result<String> {
        transform_source(source, &path.display().to_string(), &self.options)
    }
}

/// Configuration of swc's CommonJS pass for `options`.
///
/// `import.meta` is always preserved here; it is rewritten as text after
/// codegen instead.
pub fn commonjs_config(options: &ModuleOptions) -> Config {
    Config {
        no_interop: !options.interop,
        ignore_dynamic: !options.dynamic_import,
        preserve_import_meta: true,
        ..Default::default()
    }
}

/// Parse `source`, convert its module syntax to CommonJS and print it.
///
/// `import.meta` is left in place; see [`transform_and_patch`].
pub fn transform_source(source: &str, filename: &str, options: &ModuleOptions) -> Result<String> {
    let parsed = ucjs_parser::parse_source(source, filename)?;
    let comments = parsed.comments;

    let program = GLOBALS.set(&Globals::new(), || {
        let unresolved_mark = Mark::new();
        let top_level_mark = Mark::new();

        HELPERS.set(&Helpers::new(false), || {
            let mut program = Program::Module(parsed.module);
            program.mutate(resolver(unresolved_mark, top_level_mark, false));

            if let Program::Module(module) = &mut program {
                let detached = detach_optional_calls(module);
                if detached > 0 {
                    debug!(filename, detached, "detached optional calls on imports");
                }
            }

            program.apply((
                common_js::common_js(
                    Resolver::Default,
                    unresolved_mark,
                    commonjs_config(options),
                    FeatureFlag {
                        support_block_scoping: true,
                        support_arrow: true,
                    },
                ),
                inject_helpers(unresolved_mark),
                hygiene(),
                fixer(Some(&comments)),
            ))
        })
    });

    let code = emit_program(&program, parsed.source_map, &comments)?;
    debug!(filename, bytes = code.len(), "emitted CommonJS");
    Ok(code)
}

/// [`transform_source`] followed by the `import.meta` rewrite, when enabled.
pub fn transform_and_patch(source: &str, filename: &str, options: &ModuleOptions) -> Result<String> {
    let code = transform_source(source, filename, options)?;
    Ok(if options.import_meta {
        patch_import_meta(&code)
    } else {
        code
    })
}
