use std::path::PathBuf;

use sidefx_compiler::ModuleBuilder;
use sidefx_core::Colors;

use super::source_loader::{display_name, load_source};

pub struct DumpArgs {
    pub source_path: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let source = match load_source(&args.source_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let module = match ModuleBuilder::new(&source).parse() {
        Ok(parsed) => parsed.analyze(),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    // The tree is printed for invalid modules too; diagnostics follow on stderr.
    print!("{}", module.dump_with_colors(Colors::new(args.color)));

    let diagnostics = module.diagnostics();
    if !diagnostics.is_empty() {
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
}
