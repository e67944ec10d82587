//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Source file to analyze (positional, `-` for stdin).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .default_value("-")
        .help("Source file to analyze (use \"-\" for stdin)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Fail on warnings (-w/--warnings-as-errors).
pub fn warnings_as_errors_arg() -> Arg {
    Arg::new("warnings_as_errors")
        .short('w')
        .long("warnings-as-errors")
        .action(ArgAction::SetTrue)
        .conflicts_with("no_warnings")
        .help("Treat warnings as errors")
}

/// Suppress warnings (--no-warnings).
pub fn no_warnings_arg() -> Arg {
    Arg::new("no_warnings")
        .long("no-warnings")
        .action(ArgAction::SetTrue)
        .help("Do not report warnings")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print diagnostics as JSON on stdout")
}
