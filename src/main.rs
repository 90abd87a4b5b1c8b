//! cwalk CLI: run a C source file

use clap::Parser;
use cwalk::console::StdConsole;
use cwalk::interpreter::{Config, Interpreter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cwalk", version, about = "Tree-walking interpreter for a minimal C subset")]
struct Cli {
    /// C source file to run
    file: PathBuf,

    /// Capacity of the simulated heap in bytes
    #[arg(long = "heap-size", value_name = "BYTES", default_value_t = Config::default().heap_capacity)]
    heap_size: usize,

    /// Maximum nesting of user function calls
    #[arg(long = "max-call-depth", value_name = "N", default_value_t = Config::default().max_call_depth)]
    max_call_depth: usize,

    /// Abort on unsupported constructs instead of reporting them
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {e}", cli.file.display());
            return ExitCode::FAILURE;
        }
    };

    let program = match cwalk::parser::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    debug!(
        decls = program.decls.len(),
        exprs = program.exprs.len(),
        stmts = program.stmts.len(),
        "parsed {}",
        cli.file.display()
    );

    let config = Config {
        heap_capacity: cli.heap_size,
        strict: cli.strict,
        max_call_depth: cli.max_call_depth,
    };
    let mut interpreter = Interpreter::new(&program, config, StdConsole::new());

    match interpreter.run() {
        Ok(status) => {
            debug!(
                return_value = status.return_value,
                reported = interpreter.diagnostics().len(),
                "finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Runtime error: {e}");
            ExitCode::FAILURE
        }
    }
}
