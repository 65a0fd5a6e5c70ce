//! A tree-walking interpreter for Bisaya++, a small imperative language
//! with Cebuano keywords.
//!
//! The pipeline is the usual three stages, each its own module:
//! [`token::tokenize`] → [`parse::parse`] → [`engine::run`]. This crate
//! performs no I/O of its own beyond the reader/writer the evaluator is
//! explicitly given; wiring those to a real terminal is the CLI's job.

pub mod ast;
pub mod engine;
pub mod error;
pub mod parse;
pub mod scope;
pub mod token;
pub mod value;

pub use error::Error;

use std::io::{BufRead, Write};

/// Tokenizes, parses and runs a complete Bisaya++ source string against
/// the given reader/writer, in one call.
pub fn run<R: BufRead, W: Write>(source: &str, input: &mut R, output: &mut W) -> Result<(), Error> {
    let tokens = token::tokenize(source)?;
    let program = parse::parse(tokens)?;
    engine::run(&program, input, output)?;
    Ok(())
}
