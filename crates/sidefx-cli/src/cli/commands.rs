//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("sidefx")
        .about("Flags discarded expressions that have no side effects")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(dump_command())
}

/// Analyze a module and report diagnostics.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Check a module for discarded values without side effects")
        .override_usage(
            "\
  sidefx check <FILE>
  sidefx check -w <FILE>
  cat <FILE> | sidefx check",
        )
        .after_help(
            r#"EXAMPLES:
  sidefx check app.d                 # report errors and warnings
  sidefx check app.d -w              # warnings fail the check
  sidefx check app.d --no-warnings   # errors only
  sidefx check app.d --json          # diagnostics as JSON"#,
        )
        .arg(source_path_arg())
        .arg(warnings_as_errors_arg())
        .arg(no_warnings_arg())
        .arg(json_arg())
        .arg(color_arg())
}

/// Print the effect tree of every discarded expression.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the effect classification of every statement")
        .override_usage("  sidefx dump <FILE>")
        .after_help(
            r#"EXAMPLES:
  sidefx dump app.d                  # one tree per statement
  sidefx dump app.d --color always   # keep colors when piping"#,
        )
        .arg(source_path_arg())
        .arg(color_arg())
}
