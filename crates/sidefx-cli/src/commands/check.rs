use std::path::PathBuf;

use sidefx_compiler::{ModuleBuilder, WarningMode};

use super::source_loader::{display_name, load_source};

pub struct CheckArgs {
    pub source_path: PathBuf,
    pub warnings: WarningMode,
    pub json: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let source = match load_source(&args.source_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let module = match ModuleBuilder::new(&source)
        .with_warnings(args.warnings)
        .parse()
    {
        Ok(parsed) => parsed.analyze(),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let diagnostics = module.diagnostics();
    if args.json {
        match serde_json::to_string_pretty(diagnostics.as_slice()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to serialize diagnostics: {}", e);
                std::process::exit(1);
            }
        }
    } else if !diagnostics.is_empty() {
        let path = display_name(&args.source_path);
        eprintln!(
            "{}",
            diagnostics
                .printer()
                .source(&source)
                .path(&path)
                .colored(args.color)
                .render()
        );
    }

    tracing::debug!(
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "check finished"
    );

    if !module.is_valid() {
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
