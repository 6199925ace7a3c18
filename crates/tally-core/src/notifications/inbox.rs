//! Notification inbox
//!
//! Derivation is stateless, so read and dismissed state lives here and is
//! re-applied every time a fresh derivation comes in.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::types::Notification;

/// Read and cleared ids remembered per set; the oldest are forgotten first
pub const REMEMBERED_IDS_LIMIT: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationInbox {
    notifications: Vec<Notification>,
    /// Oldest first
    #[serde(default)]
    read: VecDeque<String>,
    /// Oldest first
    #[serde(default)]
    cleared: VecDeque<String>,
}

fn remember(ids: &mut VecDeque<String>, id: &str) {
    ids.retain(|known| known != id);
    ids.push_back(id.to_string());
    while ids.len() > REMEMBERED_IDS_LIMIT {
        ids.pop_front();
    }
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current set with a fresh derivation
    ///
    /// Previously read ids stay read and cleared ids stay hidden, including
    /// ids that drop out of one derivation (past the cap, or a family turned
    /// off) and come back later.
    pub fn refresh(&mut self, derived: Vec<Notification>) {
        let read: HashSet<&str> = self.read.iter().map(String::as_str).collect();
        let cleared: HashSet<&str> = self.cleared.iter().map(String::as_str).collect();

        let notifications: Vec<Notification> = derived
            .into_iter()
            .filter(|n| !cleared.contains(n.id.as_str()))
            .map(|mut n| {
                if read.contains(n.id.as_str()) {
                    n.read = true;
                }
                n
            })
            .collect();
        self.notifications = notifications;

        tracing::debug!(
            visible = self.notifications.len(),
            unread = self.unread_count(),
            remembered_read = self.read.len(),
            remembered_cleared = self.cleared.len(),
            "Inbox refreshed"
        );
    }

    /// Mark one notification read; false if it isn't in the inbox
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                remember(&mut self.read, id);
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
            remember(&mut self.read, &n.id);
        }
    }

    /// Dismiss a notification so later refreshes keep it hidden
    pub fn clear(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        if self.notifications.len() == before {
            return false;
        }
        remember(&mut self.cleared, id);
        self.read.retain(|known| known != id);
        true
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}
