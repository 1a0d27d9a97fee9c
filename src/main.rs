use clap::{Parser, Subcommand};
use serde::Serialize;

mod commands;
mod output;

use commands::{clean, compile};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "texbuild")]
#[command(version = VERSION)]
#[command(about = "Compile LaTeX documents and clean up generated artifacts")]
struct Cli {
    /// Emit a JSON result envelope instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a document, optionally with the full BibTeX workflow
    Compile(compile::CompileArgs),
    /// Remove generated auxiliary files
    Clean(clean::CleanArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let announce = !cli.json;

    match cli.command {
        Commands::Compile(args) => finish(compile::run(args, announce), cli.json),
        Commands::Clean(args) => finish(clean::run(args, announce), cli.json),
    }
}

fn finish<T: Serialize>(result: texbuild::Result<T>, json: bool) -> std::process::ExitCode {
    if json {
        output::print_result(&result);
    } else if let Err(err) = &result {
        eprintln!("Error: {}", err);
        for hint in &err.hints {
            eprintln!("  hint: {}", hint.message);
        }
    }

    match result {
        Ok(_) => std::process::ExitCode::SUCCESS,
        Err(_) => std::process::ExitCode::from(1),
    }
}
