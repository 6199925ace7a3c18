//! Notification command implementation
//!
//! Notifications are derived fresh on every run. The inbox state file keeps
//! read and cleared ids so they survive recomputation.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tally_core::{derive_with_preferences, recompute_spent, Config, NotificationInbox, Priority};
use tracing::warn;

use super::{load_snapshot, print_json};

/// Inbox changes requested on the command line
#[derive(Debug, Default, Clone)]
pub struct InboxActions {
    pub mark_read: Option<String>,
    pub mark_all_read: bool,
    pub clear: Option<String>,
}

/// Load the inbox state, or an empty inbox when there is none yet
pub fn load_inbox(path: Option<&Path>) -> Result<NotificationInbox> {
    match path {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read inbox {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid inbox {}", path.display()))
        }
        _ => Ok(NotificationInbox::new()),
    }
}

pub fn save_inbox(path: &Path, inbox: &NotificationInbox) -> Result<()> {
    let content = serde_json::to_string_pretty(inbox)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write inbox {}", path.display()))
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🔵",
    }
}

pub fn cmd_notifications(
    data: &Path,
    config: &Config,
    state: Option<&Path>,
    actions: &InboxActions,
    recompute: bool,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(data)?;
    let budgets = if recompute {
        recompute_spent(&snapshot.budgets, &snapshot.transactions, now.date_naive())
    } else {
        snapshot.budgets
    };

    let derived =
        derive_with_preferences(&snapshot.transactions, &budgets, now, &config.notifications);

    let mut inbox = load_inbox(state)?;
    inbox.refresh(derived);

    if let Some(id) = &actions.mark_read {
        if !inbox.mark_as_read(id) {
            warn!(id = %id, "No such notification to mark as read");
        }
    }
    if actions.mark_all_read {
        inbox.mark_all_as_read();
    }
    if let Some(id) = &actions.clear {
        if !inbox.clear(id) {
            warn!(id = %id, "No such notification to clear");
        }
    }

    if let Some(path) = state {
        save_inbox(path, &inbox)?;
    }

    if json {
        return print_json(inbox.notifications());
    }

    println!();
    println!("🔔 Notifications ({} unread)", inbox.unread_count());
    println!("   ─────────────────────────────────────────────────────────────");

    if inbox.notifications().is_empty() {
        println!("   Nothing to report.");
        return Ok(());
    }

    for notification in inbox.notifications() {
        let unread = if notification.read { " " } else { "•" };
        println!(
            "   {} {} {}",
            unread,
            priority_marker(notification.priority),
            notification.title
        );
        println!("        {}", notification.message);
        println!("        id: {}", notification.id);
    }

    Ok(())
}
