pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "tawqit",
    about = "Consultation SLA tracker CLI",
    long_about = "Evaluate consultation ticket SLAs, check escalation eligibility, and inspect configuration.",
    after_help = "Examples:\n  tawqit status --created-at 2024-01-01T00:00:00Z --sla-hours 24\n  tawqit escalate --ticket-id CONS-1 --action escalate-breach --created-at 1704067200000 --sla-hours 24\n  tawqit config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute the SLA status, countdown label, and escalations for a ticket")]
    Status(commands::status::StatusArgs),
    #[command(about = "Check whether an escalation action is currently permitted for a ticket")]
    Escalate(commands::escalate::EscalateArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    logging::init_logging(&logging::resolve_logging_config());

    let result = match cli.command {
        Command::Status(args) => commands::status::run(&args),
        Command::Escalate(args) => commands::escalate::run(&args),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
