//! End-to-end tests for the watch loop.
//!
//! Cycles are driven through a scripted status source and a recording
//! messenger, covering the delivery, suppression, and cursor rules
//! across multi-cycle stories.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::{json, Value};
use vigil::api::StatusSource;
use vigil::error::WatchError;
use vigil::gate::Notice;
use vigil::notify::Messenger;
use vigil::watcher::{failure_notice, CycleOutcome, Watcher};

/// Replays a scripted sequence of fetch results and records the cursor
/// each fetch was asked for.
#[derive(Clone)]
struct ScriptedSource {
    responses: Rc<RefCell<VecDeque<Result<Value, WatchError>>>>,
    cursors_seen: Rc<RefCell<Vec<i64>>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<Value, WatchError>>) -> Self {
        Self {
            responses: Rc::new(RefCell::new(responses.into())),
            cursors_seen: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn cursors_seen(&self) -> Vec<i64> {
        self.cursors_seen.borrow().clone()
    }
}

impl StatusSource for ScriptedSource {
    fn fetch_since(&self, cursor: i64) -> Result<Value, WatchError> {
        self.cursors_seen.borrow_mut().push(cursor);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(WatchError::Transport("script exhausted".to_string())))
    }
}

/// Accepts every delivery and records it as `(chat_id, text)`.
#[derive(Clone, Default)]
struct RecordingMessenger {
    sent: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingMessenger {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }

    fn texts(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(_, text)| text.clone()).collect()
    }
}

impl Messenger for RecordingMessenger {
    fn deliver(&self, chat_id: &str, text: &str) -> anyhow::Result<()> {
        self.sent
            .borrow_mut()
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Fails every delivery attempt.
struct FailingMessenger;

impl Messenger for FailingMessenger {
    fn deliver(&self, _chat_id: &str, _text: &str) -> anyhow::Result<()> {
        anyhow::bail!("chat unreachable")
    }
}

fn envelope(items: Vec<Value>, cursor: i64) -> Value {
    json!({ "homeworks": items, "current_date": cursor })
}

fn reviewing_item(name: &str) -> Value {
    json!({ "homework_name": name, "status": "reviewing" })
}

fn approved_item(name: &str) -> Value {
    json!({ "homework_name": name, "status": "approved" })
}

fn transport_failure() -> WatchError {
    WatchError::Transport("connection refused".to_string())
}

#[test]
fn test_first_observation_delivers_the_verdict() {
    let source = ScriptedSource::new(vec![Ok(envelope(
        vec![reviewing_item("essay-1")],
        1_700_000_100,
    ))]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source.clone(), messenger.clone(), "chat-1", 1_700_000_000);

    let outcome = watcher.run_cycle();

    assert!(matches!(outcome, CycleOutcome::Sent(Notice::Status(_))));
    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "chat-1");
    assert!(sent[0].1.contains("essay-1"));
    assert!(sent[0].1.contains("picked up for review"));
    assert_eq!(source.cursors_seen(), vec![1_700_000_000]);
    assert_eq!(watcher.cursor(), 1_700_000_100);
}

#[test]
fn test_unchanged_status_is_suppressed() {
    let source = ScriptedSource::new(vec![
        Ok(envelope(vec![reviewing_item("essay-1")], 110)),
        Ok(envelope(vec![reviewing_item("essay-1")], 120)),
    ]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source.clone(), messenger.clone(), "chat-1", 100);

    assert!(matches!(watcher.run_cycle(), CycleOutcome::Sent(_)));
    assert!(matches!(
        watcher.run_cycle(),
        CycleOutcome::Suppressed(Notice::Status(_))
    ));

    assert_eq!(messenger.sent().len(), 1);
    // The fetch window still moved both times.
    assert_eq!(source.cursors_seen(), vec![100, 110]);
    assert_eq!(watcher.cursor(), 120);
}

#[test]
fn test_status_change_is_delivered_again() {
    let source = ScriptedSource::new(vec![
        Ok(envelope(vec![reviewing_item("essay-1")], 110)),
        Ok(envelope(vec![approved_item("essay-1")], 120)),
    ]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 100);

    watcher.run_cycle();
    watcher.run_cycle();

    let texts = messenger.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("picked up for review"));
    assert!(texts[1].contains("Hooray!"));
}

#[test]
fn test_transport_failure_becomes_one_notification() {
    let source = ScriptedSource::new(vec![Err(transport_failure())]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 500);

    let outcome = watcher.run_cycle();

    assert!(matches!(outcome, CycleOutcome::Sent(Notice::Failure(_))));
    let texts = messenger.texts();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0], failure_notice(&transport_failure()));
    // A failed fetch never advances the cursor.
    assert_eq!(watcher.cursor(), 500);
}

#[test]
fn test_repeated_failure_is_suppressed() {
    let source = ScriptedSource::new(vec![Err(transport_failure()), Err(transport_failure())]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 500);

    assert!(matches!(watcher.run_cycle(), CycleOutcome::Sent(_)));
    assert!(matches!(
        watcher.run_cycle(),
        CycleOutcome::Suppressed(Notice::Failure(_))
    ));
    assert_eq!(messenger.sent().len(), 1);
}

#[test]
fn test_empty_window_is_quiet_but_advances_the_cursor() {
    let source = ScriptedSource::new(vec![Ok(envelope(vec![], 900))]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 100);

    let outcome = watcher.run_cycle();

    assert_eq!(outcome, CycleOutcome::Quiet);
    assert!(messenger.sent().is_empty());
    assert_eq!(watcher.cursor(), 900);
}

#[test]
fn test_invalid_envelope_becomes_a_failure_notice() {
    let source = ScriptedSource::new(vec![Ok(json!({ "current_date": 900 }))]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 100);

    let outcome = watcher.run_cycle();

    assert!(matches!(outcome, CycleOutcome::Sent(Notice::Failure(_))));
    let texts = messenger.texts();
    assert!(texts[0].contains("homeworks"));
    // The envelope never validated, so the cursor stays put.
    assert_eq!(watcher.cursor(), 100);
}

#[test]
fn test_unknown_status_notifies_and_still_advances_the_cursor() {
    let item = json!({ "homework_name": "essay-1", "status": "on_hold" });
    let source = ScriptedSource::new(vec![Ok(envelope(vec![item], 900))]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 100);

    let outcome = watcher.run_cycle();

    assert!(matches!(outcome, CycleOutcome::Sent(Notice::Failure(_))));
    assert!(messenger.texts()[0].contains("on_hold"));
    // The envelope validated before interpretation failed.
    assert_eq!(watcher.cursor(), 900);
}

#[test]
fn test_delivery_failure_never_stalls_the_loop() {
    let source = ScriptedSource::new(vec![
        Ok(envelope(vec![reviewing_item("essay-1")], 110)),
        Ok(envelope(vec![reviewing_item("essay-1")], 120)),
    ]);
    let mut watcher = Watcher::new(source.clone(), FailingMessenger, "chat-1", 100);

    let first = watcher.run_cycle();
    let second = watcher.run_cycle();

    // The failed attempt still counts as the last seen content, so the
    // repeat stays suppressed rather than retried.
    assert!(matches!(first, CycleOutcome::SendFailed(Notice::Status(_))));
    assert!(matches!(second, CycleOutcome::Suppressed(_)));
    assert_eq!(source.cursors_seen(), vec![100, 110]);
    assert_eq!(watcher.cursor(), 120);
}

#[test]
fn test_failure_slot_survives_intervening_status_delivery() {
    let source = ScriptedSource::new(vec![
        Err(transport_failure()),
        Ok(envelope(vec![reviewing_item("essay-1")], 110)),
        Err(transport_failure()),
    ]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 100);

    assert!(matches!(watcher.run_cycle(), CycleOutcome::Sent(Notice::Failure(_))));
    assert!(matches!(watcher.run_cycle(), CycleOutcome::Sent(Notice::Status(_))));
    // Same failure text as cycle 1: still a duplicate in its own class.
    assert!(matches!(
        watcher.run_cycle(),
        CycleOutcome::Suppressed(Notice::Failure(_))
    ));
    assert_eq!(messenger.sent().len(), 2);
}

#[test]
fn test_full_story_across_six_cycles() {
    let source = ScriptedSource::new(vec![
        Ok(envelope(vec![reviewing_item("essay-1")], 110)),
        Ok(envelope(vec![reviewing_item("essay-1")], 120)),
        Err(transport_failure()),
        Err(transport_failure()),
        Ok(envelope(vec![], 130)),
        Ok(envelope(vec![approved_item("essay-1")], 140)),
    ]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source.clone(), messenger.clone(), "chat-1", 100);

    let outcomes: Vec<CycleOutcome> = (0..6).map(|_| watcher.run_cycle()).collect();

    assert!(matches!(outcomes[0], CycleOutcome::Sent(Notice::Status(_))));
    assert!(matches!(outcomes[1], CycleOutcome::Suppressed(_)));
    assert!(matches!(outcomes[2], CycleOutcome::Sent(Notice::Failure(_))));
    assert!(matches!(outcomes[3], CycleOutcome::Suppressed(_)));
    assert_eq!(outcomes[4], CycleOutcome::Quiet);
    assert!(matches!(outcomes[5], CycleOutcome::Sent(Notice::Status(_))));

    let texts = messenger.texts();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].contains("picked up for review"));
    assert!(texts[1].starts_with("Polling cycle failed"));
    assert!(texts[2].contains("Hooray!"));

    // Failed fetches reuse the last validated cursor; validated ones
    // advance it.
    assert_eq!(source.cursors_seen(), vec![100, 110, 120, 120, 120, 130]);
    assert_eq!(watcher.cursor(), 140);
}

#[test]
fn test_only_the_newest_item_is_interpreted() {
    let items = vec![approved_item("essay-2"), reviewing_item("essay-1")];
    let source = ScriptedSource::new(vec![Ok(envelope(items, 110))]);
    let messenger = RecordingMessenger::default();
    let mut watcher = Watcher::new(source, messenger.clone(), "chat-1", 100);

    watcher.run_cycle();

    let texts = messenger.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("essay-2"));
    assert!(texts[0].contains("Hooray!"));
}
