//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (snapshot, config, dates) plus classify and config
//! - `insights` - Rule-based insight listing
//! - `notifications` - Notification derivation and the persisted inbox
//! - `receipts` - Receipt extraction
//! - `reports` - Summary, grouped patterns and budget health

pub mod core;
pub mod insights;
pub mod notifications;
pub mod receipts;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use insights::*;
pub use notifications::*;
pub use receipts::*;
pub use reports::*;
