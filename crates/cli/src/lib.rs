pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use deskflow_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "deskflow",
    about = "IT laptop-request workflow CLI",
    long_about = "Submit laptop requests, browse your queues, and approve or reject \
                  requests assigned to you on the workflow engine.",
    after_help = "Examples:\n  deskflow submit --subject \"Need a laptop for fieldwork\" --model Latitude-E5580\n  deskflow queue\n  deskflow decide T1 --reject --remarks \"duplicate request\""
)]
pub struct Cli {
    /// Path to a deskflow.toml config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Emit machine-readable JSON output.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Submit a new laptop request")]
    Submit {
        #[arg(long, help = "Free-text subject/description of the request")]
        subject: String,
        #[arg(long, help = "Catalog model name (see `deskflow models`)")]
        model: String,
        #[arg(long, help = "Employee number to request for (defaults to yourself)")]
        for_emp: Option<String>,
        #[arg(long, requires = "for_emp", help = "Display name of the recipient")]
        for_name: Option<String>,
        #[arg(long, requires = "for_emp", help = "Email of the recipient")]
        for_email: Option<String>,
    },
    #[command(about = "List requests you created")]
    CreatedBy {
        #[arg(long, help = "Employee number (defaults to the configured identity)")]
        emp: Option<String>,
    },
    #[command(about = "List requests created for you")]
    CreatedFor {
        #[arg(long, help = "Employee number (defaults to the configured identity)")]
        emp: Option<String>,
    },
    #[command(about = "List requests awaiting your decision")]
    Queue {
        #[arg(long, help = "Employee number (defaults to the configured identity)")]
        emp: Option<String>,
    },
    #[command(about = "Approve or reject a request assigned to you")]
    Decide {
        #[arg(help = "Task id from `deskflow queue`")]
        task_id: String,
        #[arg(long, conflicts_with = "reject")]
        approve: bool,
        #[arg(long, conflicts_with = "approve")]
        reject: bool,
        #[arg(long, default_value = "", help = "Decision remarks (required for --reject)")]
        remarks: String,
    },
    #[command(about = "List the supported laptop model catalog")]
    Models,
    #[command(about = "Inspect effective configuration with secrets redacted")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        ..Default::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::from(2);
        }
    };

    init_logging(&config);

    match commands::dispatch(cli, config).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
