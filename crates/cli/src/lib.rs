pub mod commands;

use clap::{Parser, Subcommand};
use hotdeal_core::config::{AppConfig, LoadOptions};
use std::process::ExitCode;

use commands::deal::{AddDealArgs, DeleteDealArgs, SearchDealArgs, UpdateDealArgs};
use commands::notice::{DeleteNoticeArgs, EditNoticeArgs, ListNoticeArgs, PostNoticeArgs};
use commands::simulate::SimulateArgs;

#[derive(Debug, Parser)]
#[command(
    name = "hotdeal",
    about = "Hot deal pricing and comparison CLI",
    long_about = "Register hot deals, search them, and judge proposed prices against past deals.",
    after_help = "Examples:\n  hotdeal amount 1,234,567원\n  \
                  hotdeal simulate --name 버즈3 --final-price 179000\n  \
                  hotdeal deal search --term 삼성 --sort final_price --order asc"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, admin password readiness, and DB connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Normalize free-form amount text and render it in won units")]
    Amount {
        #[arg(help = "Amount text, e.g. `1,234,567원`")]
        raw: String,
    },
    #[command(about = "Suggest standard model names similar to a product name")]
    Suggest {
        #[arg(long, help = "Product name as typed")]
        product: String,
    },
    #[command(about = "Compare a proposed price pair against the historical minimum")]
    Simulate(SimulateArgs),
    #[command(about = "Register, search, and maintain hot deals")]
    Deal {
        #[command(subcommand)]
        command: DealCommand,
    },
    #[command(about = "Post and browse the notice board")]
    Notice {
        #[command(subcommand)]
        command: NoticeCommand,
    },
}

#[derive(Debug, Subcommand)]
enum DealCommand {
    #[command(about = "Register a deal; final price is computed from the discounts")]
    Add(AddDealArgs),
    #[command(about = "Search deals by name fragment and platform")]
    Search(SearchDealArgs),
    #[command(about = "List every stored deal in registration order")]
    List,
    #[command(about = "Edit fields of a stored deal")]
    Update(UpdateDealArgs),
    #[command(about = "Delete a stored deal")]
    Delete(DeleteDealArgs),
}

#[derive(Debug, Subcommand)]
enum NoticeCommand {
    #[command(about = "Post a notice or update entry")]
    Post(PostNoticeArgs),
    #[command(about = "Show the newest entries of each kind")]
    List(ListNoticeArgs),
    #[command(about = "Edit a posted entry")]
    Edit(EditNoticeArgs),
    #[command(about = "Delete a posted entry")]
    Delete(DeleteNoticeArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Commands report config failures themselves; logging just falls back to defaults.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Migrate => commands::migrate::run(),
        Command::Amount { raw } => commands::amount::run(&raw),
        Command::Suggest { product } => commands::suggest::run(&product),
        Command::Simulate(args) => commands::simulate::run(args),
        Command::Deal { command } => match command {
            DealCommand::Add(args) => commands::deal::add(args),
            DealCommand::Search(args) => commands::deal::search(args),
            DealCommand::List => commands::deal::list(),
            DealCommand::Update(args) => commands::deal::update(args),
            DealCommand::Delete(args) => commands::deal::delete(args),
        },
        Command::Notice { command } => match command {
            NoticeCommand::Post(args) => commands::notice::post(args),
            NoticeCommand::List(args) => commands::notice::list(args),
            NoticeCommand::Edit(args) => commands::notice::edit(args),
            NoticeCommand::Delete(args) => commands::notice::delete(args),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(config: &AppConfig) {
    use hotdeal_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(log_level);

    // stdout carries the command payload; a second install is ignored.
    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}
