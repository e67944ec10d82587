//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use sidefx_compiler::WarningMode;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;

pub struct CheckParams {
    pub source_path: PathBuf,
    pub warnings: WarningMode,
    pub json: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let warnings = if m.get_flag("warnings_as_errors") {
            WarningMode::AsErrors
        } else if m.get_flag("no_warnings") {
            WarningMode::Off
        } else {
            WarningMode::Informational
        };

        Self {
            source_path: parse_source_path(m),
            warnings,
            json: m.get_flag("json"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            source_path: p.source_path,
            warnings: p.warnings,
            json: p.json,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub source_path: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: parse_source_path(m),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            source_path: p.source_path,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_source_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("source_path")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("-"))
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
