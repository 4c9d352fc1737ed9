//! Interpretation of review statuses into notification text.

use serde_json::Value;

use crate::error::WatchError;

const NAME_KEY: &str = "homework_name";
const STATUS_KEY: &str = "status";

/// The review states the API is allowed to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    /// Parse a wire status code; `None` for anything outside the
    /// vocabulary.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(ReviewStatus::Approved),
            "reviewing" => Some(ReviewStatus::Reviewing),
            "rejected" => Some(ReviewStatus::Rejected),
            _ => None,
        }
    }

    /// The wire form of this status.
    pub fn code(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approved",
            ReviewStatus::Reviewing => "reviewing",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict text for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => {
                "Review finished: the reviewer liked everything. Hooray!"
            }
            ReviewStatus::Reviewing => "The work was picked up for review.",
            ReviewStatus::Rejected => "Review finished: the reviewer left remarks.",
        }
    }
}

/// Build the notification text for a single work item.
///
/// Pure: carries no memory of earlier items. Whether the message is a
/// repeat is the notification gate's call, not this one's.
///
/// # Returns
/// The framed message, or `Schema` when a required field is absent, or
/// `UnknownStatus` when the status code is outside the vocabulary.
pub fn interpret(item: &Value) -> Result<String, WatchError> {
    let name = string_field(item, NAME_KEY)?;
    let code = string_field(item, STATUS_KEY)?;

    let status = ReviewStatus::from_code(code)
        .ok_or_else(|| WatchError::UnknownStatus(code.to_string()))?;

    Ok(format!(
        "Review status changed for \"{name}\". {}",
        status.verdict()
    ))
}

fn string_field<'a>(item: &'a Value, key: &str) -> Result<&'a str, WatchError> {
    item.get(key)
        .ok_or_else(|| WatchError::Schema(format!("work item is missing key \"{key}\"")))?
        .as_str()
        .ok_or_else(|| WatchError::Schema(format!("work item key \"{key}\" is not a string")))
}
