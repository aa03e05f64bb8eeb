use anyhow::{Context, Result};
use swc_common::{comments::SingleThreadedComments, sync::Lrc, SourceMap};
use swc_ecma_ast::{EsVersion, Program};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

/// Print `program` back to JavaScript, keeping the comments collected while
/// parsing it.
pub fn emit_program(
    program: &Program,
    source_map: Lrc<SourceMap>,
    comments: &SingleThreadedComments,
) -> Result<String> {
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(EsVersion::latest()),
            cm: source_map,
            comments: Some(comments),
            wr: writer,
        };
        program
            .emit_with(&mut emitter)
            .context("failed to emit JavaScript")?;
    }
    String::from_utf8(buf).context("emitted JavaScript is not valid UTF-8")
}
