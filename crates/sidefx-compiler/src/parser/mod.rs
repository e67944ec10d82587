//! Parser infrastructure for the source language.
//!
//! Produces an owned syntax tree ([`ast::SourceFile`]) from a pre-lexed token
//! stream. Recovery rules:
//!
//! 1. Missing expected tokens emit a diagnostic but don't consume
//! 2. Statements and items resynchronize at `;` or `}`
//! 3. Unparsable expressions become `ExprKind::Error` placeholders
//!
//! Fuel exhaustion (exec fuel, recursion fuel) returns an actual error immediately.

pub mod ast;
pub mod lexer;

mod core;
mod grammar;


pub use core::Parser;

use crate::PassResult;
use crate::module::{DEFAULT_PARSE_FUEL, DEFAULT_RECURSION_LIMIT};
use ast::SourceFile;
use lexer::lex;

/// Main entry point with default limits. Returns Err on fuel exhaustion.
pub fn parse(source: &str) -> PassResult<SourceFile> {
    parse_with_limits(source, DEFAULT_PARSE_FUEL, DEFAULT_RECURSION_LIMIT)
}

pub fn parse_with_limits(source: &str, fuel: u32, recursion_limit: u32) -> PassResult<SourceFile> {
    let mut parser = Parser::new(source, lex(source), fuel, recursion_limit);
    let file = parser.parse_source_file();
    parser.finish(file)
}
