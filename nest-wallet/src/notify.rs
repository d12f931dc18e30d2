//! User-facing notifications
//!
//! Emitting is fire-and-forget: a notifier never fails and never blocks a
//! state transition.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Notification severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A notification as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Sink for user notifications
pub trait Notifier: Send + Sync {
    fn emit(&self, title: &str, body: &str, severity: Severity);
}

/// Writes notifications to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn emit(&self, title: &str, body: &str, severity: Severity) {
        match severity {
            Severity::Info => info!(title, body, "notification"),
            Severity::Warning => warn!(title, body, "notification"),
            Severity::Error => error!(title, body, "notification"),
        }
    }
}

/// Keeps notifications in memory for a UI to poll
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications emitted so far, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Titles of all notifications emitted so far, oldest first
    pub fn titles(&self) -> Vec<String> {
        self.notifications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    /// Remove and return everything emitted so far
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.write().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for InMemoryNotifier {
    fn emit(&self, title: &str, body: &str, severity: Severity) {
        self.notifications
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                title: title.to_string(),
                body: body.to_string(),
                severity,
                created_at: Utc::now(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_notifier() {
        let notifier = InMemoryNotifier::new();
        notifier.emit("Wallet Created", "Your wallet has been created successfully!", Severity::Info);
        notifier.emit("Balance Refresh Failed", "node unreachable", Severity::Error);

        assert_eq!(notifier.titles(), ["Wallet Created", "Balance Refresh Failed"]);
        assert_eq!(notifier.notifications()[1].severity, Severity::Error);

        assert_eq!(notifier.drain().len(), 2);
        assert!(notifier.notifications().is_empty());
    }
}
