//! ECMAScript parser front end.
//!
//! Wraps the standard SWC parser: `parse_source` reads a whole file as an
//! ES module and keeps its comments for codegen.

pub mod parse;

pub use parse::{parse_source, ParseResult};
