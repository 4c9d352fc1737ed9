//! The poll loop: fetch, validate, interpret, gate, deliver, sleep.
//!
//! Failure containment lives here. No error from a single cycle may
//! escape the loop; every failure becomes a candidate notification and
//! the loop proceeds to the next cycle after the fixed sleep.

use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::api::StatusSource;
use crate::envelope;
use crate::error::WatchError;
use crate::gate::{Notice, NotificationGate};
use crate::notify::Messenger;
use crate::verdict;

/// What a single poll cycle did, for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A notice was delivered to the channel.
    Sent(Notice),
    /// A notice passed the gate but the delivery attempt failed.
    SendFailed(Notice),
    /// The candidate notice matched the last one of its class.
    Suppressed(Notice),
    /// Nothing to report this cycle.
    Quiet,
}

/// Drives the watch loop over a status source and a messenger.
///
/// Owns the only two pieces of mutable state in the system: the fetch
/// cursor and the notification gate.
pub struct Watcher<S, M> {
    source: S,
    messenger: M,
    chat_id: String,
    cursor: i64,
    gate: NotificationGate,
}

impl<S: StatusSource, M: Messenger> Watcher<S, M> {
    pub fn new(source: S, messenger: M, chat_id: &str, start_cursor: i64) -> Self {
        Self {
            source,
            messenger,
            chat_id: chat_id.to_string(),
            cursor: start_cursor,
            gate: NotificationGate::new(),
        }
    }

    /// The cursor the next fetch will use.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Run cycles forever with a fixed sleep between them.
    ///
    /// A failed cycle waits the same fixed period as a successful one;
    /// there is no backoff. Only process termination stops the loop.
    pub fn run(&mut self, poll_interval: Duration) -> ! {
        info!(
            "watch loop started, polling every {}s",
            poll_interval.as_secs()
        );
        loop {
            self.run_cycle();
            thread::sleep(poll_interval);
        }
    }

    /// Execute one fetch-to-delivery cycle.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        match self.observe() {
            Ok(Some(message)) => self.dispatch(Notice::Status(message)),
            Ok(None) => {
                debug!("review status unchanged");
                CycleOutcome::Quiet
            }
            Err(err) => {
                warn!("poll cycle failed: {err}");
                self.dispatch(Notice::Failure(failure_notice(&err)))
            }
        }
    }

    /// Fetch and validate one window, then interpret the newest work
    /// item if one is present.
    fn observe(&mut self) -> Result<Option<String>, WatchError> {
        let payload = self.source.fetch_since(self.cursor)?;
        let envelope = envelope::validate(&payload)?;

        // The cursor follows every validated response, even when
        // interpretation or delivery below fails.
        self.cursor = envelope.current_date;

        match envelope.homeworks.first() {
            Some(item) => verdict::interpret(item).map(Some),
            None => Ok(None),
        }
    }

    /// Gate a notice and attempt delivery if it passes.
    fn dispatch(&mut self, notice: Notice) -> CycleOutcome {
        if !self.gate.should_deliver(&notice) {
            debug!("suppressing duplicate {} notice", notice.label());
            return CycleOutcome::Suppressed(notice);
        }

        let result = self.messenger.deliver(&self.chat_id, notice.text());
        self.gate.record_attempt(&notice);

        match result {
            Ok(()) => {
                debug!("delivered {} notice: {}", notice.label(), notice.text());
                CycleOutcome::Sent(notice)
            }
            Err(err) => {
                error!("failed to deliver {} notice: {err:#}", notice.label());
                CycleOutcome::SendFailed(notice)
            }
        }
    }
}

/// Render any cycle failure as notification text.
///
/// The single mapping point from the failure taxonomy to operator-facing
/// words; the per-kind wording lives on [`WatchError`] itself.
pub fn failure_notice(err: &WatchError) -> String {
    format!("Polling cycle failed: {err}")
}
