//! Tally CLI - Expense tracker
//!
//! Usage:
//!   tally summary --period month      Headline figures
//!   tally insights                    Spending insights
//!   tally notifications --state FILE  Alerts with read/cleared state
//!   tally extract receipt.jpg         Receipt to transaction

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let today = commands::resolve_today(cli.today);

    match cli.command {
        Commands::Summary { period } => commands::cmd_summary(&cli.data, period, today, cli.json),
        Commands::Patterns { period, group_by } => {
            commands::cmd_patterns(&cli.data, period, group_by, today, cli.json)
        }
        Commands::Insights => commands::cmd_insights(&cli.data, &config, today, cli.json),
        Commands::Notifications {
            state,
            mark_read,
            mark_all_read,
            clear,
            recompute,
        } => {
            let actions = commands::InboxActions {
                mark_read,
                mark_all_read,
                clear,
            };
            commands::cmd_notifications(
                &cli.data,
                &config,
                state.as_deref(),
                &actions,
                recompute,
                commands::resolve_now(cli.today),
                cli.json,
            )
        }
        Commands::Budgets { recompute } => {
            commands::cmd_budgets(&cli.data, recompute, today, cli.json)
        }
        Commands::Classify {
            vendor,
            description,
        } => commands::cmd_classify(&config, &vendor, &description),
        Commands::Extract {
            file,
            mock,
            timeout,
            save,
        } => {
            let options = commands::ExtractOptions {
                mock,
                timeout,
                save,
            };
            commands::cmd_extract(&cli.data, &config, &file, &options, today, cli.json).await
        }
        Commands::Config => commands::cmd_config(&config),
    }
}
