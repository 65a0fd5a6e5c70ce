//! Shared harness for the integration tests: runs a complete Bisaya++
//! source string against an in-memory reader/writer pair and hands back
//! the captured output (or the error that aborted the run).

use std::io::{BufReader, Cursor};

use bisaya::error::Error;

pub fn run_capture(source: &str) -> Result<String, Error> {
    run_with_input(source, "")
}

pub fn run_with_input(source: &str, input: &str) -> Result<String, Error> {
    let mut reader = BufReader::new(Cursor::new(input.as_bytes().to_vec()));
    let mut output = Vec::new();
    bisaya::run(source, &mut reader, &mut output)?;
    Ok(String::from_utf8(output).expect("output is valid UTF-8"))
}
