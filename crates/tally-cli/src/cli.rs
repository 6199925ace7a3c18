//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tally_core::{GroupBy, Period};

/// Tally - Expense tracking with spending insights
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Expense tracker: spending patterns, insights, alerts and receipt scanning", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Snapshot file with transactions and budgets (JSON)
    #[arg(long, default_value = "tally.json", global = true)]
    pub data: PathBuf,

    /// Config file (defaults to ~/.config/tally/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headline figures for a period
    Summary {
        /// Period: week, month, year, all
        #[arg(short, long, default_value = "month")]
        period: Period,
    },

    /// Spending grouped by category, vendor or payment method
    Patterns {
        /// Period: week, month, year, all
        #[arg(short, long, default_value = "month")]
        period: Period,

        /// Grouping: category, vendor, payment_method
        #[arg(short, long, default_value = "category")]
        group_by: GroupBy,
    },

    /// Rule-based spending insights
    Insights,

    /// Budget and large-purchase notifications
    Notifications {
        /// Inbox state file; read and cleared ids persist across runs
        #[arg(long)]
        state: Option<PathBuf>,

        /// Mark a notification as read
        #[arg(long)]
        mark_read: Option<String>,

        /// Mark every notification as read
        #[arg(long)]
        mark_all_read: bool,

        /// Clear (dismiss) a notification
        #[arg(long)]
        clear: Option<String>,

        /// Recompute budget spend from transactions first
        #[arg(long)]
        recompute: bool,
    },

    /// Budget usage and overall health
    Budgets {
        /// Recompute budget spend from transactions for the current period
        #[arg(long)]
        recompute: bool,
    },

    /// Suggest a category for a vendor and description
    Classify {
        /// Vendor name
        vendor: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Extract a transaction from a receipt image
    Extract {
        /// Receipt image (jpeg, png, webp, heic, pdf)
        file: PathBuf,

        /// Use the offline mock backend
        #[arg(long)]
        mock: bool,

        /// Request timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Append the extracted transaction to the snapshot file
        #[arg(long)]
        save: bool,
    },

    /// Print the effective configuration
    Config,
}
