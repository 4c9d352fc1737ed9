//! Duplicate suppression for outbound notifications.
//!
//! The single idempotence boundary of the system: repeated cycles that
//! observe the same condition must not spam the channel.

/// A candidate outbound message.
///
/// Status reports and failure reports dedup independently, so a failure
/// text can never suppress a status text or the reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Status(String),
    Failure(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Status(text) | Notice::Failure(text) => text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Notice::Status(_) => "status",
            Notice::Failure(_) => "failure",
        }
    }
}

/// Remembers the last notice of each class that reached a delivery
/// attempt and suppresses exact repeats. Equality is plain string
/// equality, no semantic diffing.
#[derive(Debug, Default)]
pub struct NotificationGate {
    last_status: Option<String>,
    last_failure: Option<String>,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the notice differs from the last recorded one of its
    /// class.
    pub fn should_deliver(&self, notice: &Notice) -> bool {
        let last = match notice {
            Notice::Status(_) => &self.last_status,
            Notice::Failure(_) => &self.last_failure,
        };
        last.as_deref() != Some(notice.text())
    }

    /// Record a notice once its delivery has been attempted.
    ///
    /// Recording does not depend on the attempt's outcome: content that
    /// failed to send stays suppressed on repeat, keeping delivery
    /// at-most-once per distinct content.
    pub fn record_attempt(&mut self, notice: &Notice) {
        match notice {
            Notice::Status(text) => self.last_status = Some(text.clone()),
            Notice::Failure(text) => self.last_failure = Some(text.clone()),
        }
    }
}
