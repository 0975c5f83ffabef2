//! Notification system for the TUI.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Success => "SUCCESS",
            NotificationKind::Error => "ERROR",
            NotificationKind::Info => "INFO",
            NotificationKind::Warning => "WARN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self::at(kind, message, Utc::now())
    }

    pub fn at(kind: NotificationKind, message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at >= ttl
    }
}

/// Fire-and-forget sink for user-facing messages.
pub trait Notifier {
    fn notify(&mut self, kind: NotificationKind, message: String);
}

/// Live notifications, dropped once older than the configured TTL.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Most recent live notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn expire(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.items.retain(|n| !n.is_expired(now, ttl));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.push(Notification::new(kind, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_drops_only_old_notifications() {
        let now = Utc::now();
        let mut center = NotificationCenter::new(Duration::seconds(4));
        center.push(Notification::at(
            NotificationKind::Info,
            "old",
            now - Duration::seconds(5),
        ));
        center.push(Notification::at(NotificationKind::Success, "fresh", now));
        center.expire(now);
        assert_eq!(center.len(), 1);
        assert_eq!(center.latest().map(|n| n.message.as_str()), Some("fresh"));
    }

    #[test]
    fn notifier_appends_latest() {
        let mut center = NotificationCenter::new(Duration::seconds(4));
        center.notify(NotificationKind::Error, "first".to_string());
        center.notify(NotificationKind::Warning, "second".to_string());
        let latest = center.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Warning);
        assert_eq!(latest.message, "second");
    }

    #[test]
    fn notification_expires_exactly_at_ttl() {
        let now = Utc::now();
        let note = Notification::at(NotificationKind::Info, "x", now);
        assert!(!note.is_expired(now + Duration::milliseconds(999), Duration::seconds(1)));
        assert!(note.is_expired(now + Duration::seconds(1), Duration::seconds(1)));
    }
}
