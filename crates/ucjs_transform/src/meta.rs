//! Text-level rewrite of `import.meta` in generated code.

use std::sync::LazyLock;

use regex::Regex;
use ucjs_lexer::mask_literals;

/// What `import.meta` becomes in CommonJS output.
pub const IMPORT_META_URL: &str = "({url: require('url').pathToFileURL(__filename).href})";

static IMPORT_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bimport\.meta\b").unwrap());

/// Replace every `import.meta` outside string, template, comment and regex
/// literals with [`IMPORT_META_URL`].
pub fn patch_import_meta(code: &str) -> String {
    if !code.contains("import.meta") {
        return code.to_string();
    }
    let masked = mask_literals(code);
    let patched = IMPORT_META.replace_all(&masked.code, IMPORT_META_URL);
    masked.restore(&patched)
}
