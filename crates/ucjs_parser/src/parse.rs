use anyhow::Result;
use swc_common::{
    comments::SingleThreadedComments, errors::Handler, sync::Lrc, FileName, SourceMap,
};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{error::Error as SyntaxError, EsSyntax, Syntax};
use tracing::debug;

/// Result of parsing a source file.
pub struct ParseResult {
    pub module: Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Parse a JavaScript source string as an ES module.
///
/// Every input is treated as a module, the way module transpilers do by
/// default, so `import.meta` and top-level `import`/`export` are accepted.
/// Syntax errors (including ones the parser recovered from) are printed as
/// diagnostics to stderr and turned into an error naming `filename`.
pub fn parse_source(source: &str, filename: &str) -> Result<ParseResult> {
    let source_map: Lrc<SourceMap> = Default::default();
    let comments = SingleThreadedComments::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let syntax = Syntax::Es(EsSyntax::default());

    let mut recovered = vec![];
    let parsed = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax,
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    );

    let module = match parsed {
        Ok(module) if recovered.is_empty() => module,
        Ok(_) => return Err(report(&source_map, filename, recovered)),
        Err(e) => {
            recovered.insert(0, e);
            return Err(report(&source_map, filename, recovered));
        }
    };

    debug!(
        filename,
        items = module.body.len(),
        "parsed module"
    );

    Ok(ParseResult {
        module,
        comments,
        source_map,
    })
}

fn report(source_map: &Lrc<SourceMap>, filename: &str, errors: Vec<SyntaxError>) -> anyhow::Error {
    let handler =
        Handler::with_emitter_writer(Box::new(std::io::stderr()), Some(source_map.clone()));
    let count = errors.len();
    for e in errors {
        e.into_diagnostic(&handler).emit();
    }
    anyhow::anyhow!("failed to parse {filename} ({count} syntax error(s))")
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_ast::{ModuleDecl, ModuleItem};

    #[test]
    fn parses_import_meta_and_module_declarations() {
        let parsed = parse_source(
            "import a from './a.js';\nexport const url = import.meta.url;\n",
            "meta.js",
        )
        .unwrap();
        assert_eq!(parsed.module.body.len(), 2);
        assert!(matches!(
            parsed.module.body[0],
            ModuleItem::ModuleDecl(ModuleDecl::Import(_))
        ));
        assert!(matches!(
            parsed.module.body[1],
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(_))
        ));
    }

    #[test]
    fn plain_scripts_parse_as_modules() {
        let parsed = parse_source("module.exports = 1;", "plain.cjs").unwrap();
        assert_eq!(parsed.module.body.len(), 1);
    }

    #[test]
    fn syntax_errors_name_the_file() {
        let err = parse_source("export const = ;", "broken.js")
            .err()
            .expect("parse should fail");
        assert!(err.to_string().contains("broken.js"));
    }
}
