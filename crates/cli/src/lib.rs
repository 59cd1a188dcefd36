pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "clientes",
    about = "Clientes operator CLI",
    long_about = "Inspect configuration, validate national ids, load demo customers, and run \
                  the customer lifecycle smoke check against an in-memory repository.",
    after_help = "Examples:\n  clientes check-id 11144477735\n  clientes check-id 111444777 --complete\n  clientes doctor --json\n  clientes smoke"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate an 11-digit national id, or complete a 9-digit base")]
    CheckId {
        #[arg(help = "National id (11 digits) or base (9 digits with --complete)")]
        value: String,
        #[arg(long, help = "Compute the two check digits for a 9-digit base")]
        complete: bool,
    },
    #[command(about = "Load the demo customers into a fresh repository and report their ids")]
    Seed,
    #[command(about = "Run the create/read/update/delete lifecycle with per-step timing")]
    Smoke,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, listen address and the national id checksum")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::CheckId { value, complete } => commands::check_id::run(&value, complete),
        Command::Seed => commands::seed::run(),
        Command::Smoke => commands::smoke::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
