//! Session record data model
//!
//! Two record shapes are stored:
//!
//! - [`SessionRecord`]: the event-trail record used by the reservation-log
//!   and history-log tracks, with its append-only [`LogEntry`] list.
//! - [`ReservationSession`]: the reservation-flow record that carries the
//!   draft and the results of later booking steps.
//!
//! Both keep unknown fields in `extra`, so a shallow-merge update can add
//! fields without losing them on the next write.

use super::timestamp;
use crate::reservation::ReservationDraft;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// What a session is tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Reservation,
    History,
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The user is still in this session
    Active,
    /// Superseded by a newer session before completing
    Incomplete,
    /// Finished normally
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Incomplete => "incomplete",
            SessionStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Kind of user interaction recorded in a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Navigate,
    Submit,
}

/// One recorded interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Page that originated the event
    pub page: String,
    pub event: EventKind,
    /// Stable identifier of the control that fired
    pub target_id: String,
    /// Free-form category ("button", "tile", "system", ...)
    pub tag: String,
    pub text: String,
    /// Path current when the event fired
    pub url: String,
    /// Always whole seconds
    #[serde(with = "timestamp::log_time")]
    pub timestamp: DateTime<Utc>,
}

/// Caller-supplied part of a log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInput {
    pub page: String,
    pub event: EventKind,
    pub target_id: String,
    pub tag: String,
    pub text: String,
    /// Falls back to the manager's current path when `None`
    pub url: Option<String>,
}

impl LogInput {
    pub fn new(
        page: impl Into<String>,
        event: EventKind,
        target_id: impl Into<String>,
        tag: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            page: page.into(),
            event,
            target_id: target_id.into(),
            tag: tag.into(),
            text: text.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub(crate) fn into_entry(self, default_url: &str, at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            page: self.page,
            event: self.event,
            target_id: self.target_id,
            tag: self.tag,
            text: self.text,
            url: self.url.unwrap_or_else(|| default_url.to_string()),
            timestamp: timestamp::normalize_log_time(at),
        }
    }
}

/// Event-trail record for the reservation-log and history-log tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub purpose: Purpose,
    pub status: SessionStatus,
    /// Page or view the session is currently associated with
    pub location: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub last_interaction: DateTime<Utc>,
    /// Derived from `logs`; see [`SessionRecord::refresh_previous_pages`]
    #[serde(default)]
    pub previous_pages: Vec<String>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub end_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionRecord {
    /// Fresh active record with no logs
    pub fn new(
        session_id: impl Into<String>,
        purpose: Purpose,
        location: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            purpose,
            status: SessionStatus::Active,
            location: location.into(),
            start_time: now,
            last_interaction: now,
            previous_pages: Vec::new(),
            logs: Vec::new(),
            end_reason: None,
            extra: Map::new(),
        }
    }

    /// Append an entry and recompute `previous_pages`
    pub fn push_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
        self.refresh_previous_pages();
    }

    /// Rebuild `previous_pages` from `logs` in first-seen order
    ///
    /// History sessions leave entries with an empty page out of the list.
    pub fn refresh_previous_pages(&mut self) {
        let skip_blank = self.purpose == Purpose::History;
        let mut seen = HashSet::new();
        self.previous_pages = self
            .logs
            .iter()
            .filter(|log| !(skip_blank && log.page.is_empty()))
            .filter(|log| seen.insert(log.page.as_str()))
            .map(|log| log.page.clone())
            .collect();
    }

    /// Whether an entry matching `page`, `event` and `target_id` was logged
    pub fn has_logged(&self, page: &str, event: EventKind, target_id: &str) -> bool {
        self.logs
            .iter()
            .any(|log| log.page == page && log.event == event && log.target_id == target_id)
    }
}

/// Reservation-flow record
///
/// Keyed by a numeric `id` rather than `sessionId`. Later booking steps
/// fill `trainInfo`, `selectedSeats` and `paymentInfo`; their contents are
/// opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSession {
    pub id: i64,
    #[serde(default)]
    pub reservation_data: Option<ReservationDraft>,
    #[serde(default)]
    pub train_info: Option<Value>,
    #[serde(default)]
    pub selected_seats: Option<Value>,
    #[serde(default)]
    pub payment_info: Option<Value>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReservationSession {
    pub fn new(id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            reservation_data: None,
            train_info: None,
            selected_seats: None,
            payment_info: None,
            created_at: now,
            completed: false,
            extra: Map::new(),
        }
    }
}

/// Behaviour the session manager needs from a stored record type
pub(crate) trait TrackedRecord: Serialize + DeserializeOwned {
    /// Field that identifies the record inside its history list
    const KEY_FIELD: &'static str;

    /// JSON value of [`Self::KEY_FIELD`]
    fn key_value(&self) -> Value;

    /// Numeric form of the key, used to keep new ids increasing
    fn key_number(entry: &Value) -> Option<i64> {
        match entry.get(Self::KEY_FIELD)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Whether a raw history-list entry is this record
    fn matches(&self, entry: &Value) -> bool {
        entry.get(Self::KEY_FIELD) == Some(&self.key_value())
    }

    /// Fields merged in by `complete`
    fn completion_fields() -> Map<String, Value>;

    /// Bookkeeping after a shallow-merge update
    fn after_update(&mut self, now: DateTime<Utc>);
}

impl TrackedRecord for SessionRecord {
    const KEY_FIELD: &'static str = "sessionId";

    fn key_value(&self) -> Value {
        Value::String(self.session_id.clone())
    }

    fn completion_fields() -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("status".to_string(), Value::from("completed"));
        fields
    }

    fn after_update(&mut self, now: DateTime<Utc>) {
        self.refresh_previous_pages();
        self.last_interaction = now;
    }
}

impl TrackedRecord for ReservationSession {
    const KEY_FIELD: &'static str = "id";

    fn key_value(&self) -> Value {
        Value::from(self.id)
    }

    fn completion_fields() -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("completed".to_string(), Value::Bool(true));
        fields
    }

    // The reservation-flow track keeps no interaction timestamp.
    fn after_update(&mut self, _now: DateTime<Utc>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, secs).unwrap()
    }

    fn entry(page: &str) -> LogEntry {
        LogInput::new(page, EventKind::Click, "btn", "button", "text").into_entry("/", at(0))
    }

    #[test]
    fn test_previous_pages_first_seen_order() {
        let mut record = SessionRecord::new("1", Purpose::History, "Start", at(0));
        for page in ["Start", "Reservation", "Start", "TrainList", "Reservation"] {
            record.push_log(entry(page));
        }
        assert_eq!(
            record.previous_pages,
            vec!["Start", "Reservation", "TrainList"]
        );
    }

    #[test]
    fn test_blank_pages_skipped_on_history_only() {
        let mut history = SessionRecord::new("1", Purpose::History, "Start", at(0));
        let mut reservation = SessionRecord::new("2", Purpose::Reservation, "Reservation", at(0));
        for page in ["", "History", ""] {
            history.push_log(entry(page));
            reservation.push_log(entry(page));
        }

        assert_eq!(history.previous_pages, vec!["History"]);
        assert_eq!(history.logs.len(), 3);
        assert_eq!(reservation.previous_pages, vec!["", "History"]);
    }

    #[test]
    fn test_refresh_discards_stale_pages() {
        let mut record = SessionRecord::new("1", Purpose::History, "Start", at(0));
        record.previous_pages = vec!["Bogus".to_string()];
        record.push_log(entry("Reservation"));
        assert_eq!(record.previous_pages, vec!["Reservation"]);
    }

    #[test]
    fn test_log_entry_timestamp_ends_with_zero_millis() {
        let entry = LogInput::new("Reservation", EventKind::Navigate, "page-load", "system", "x")
            .into_entry("/reservation", at(5) + chrono::Duration::milliseconds(456));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["timestamp"], "2026-10-18T09:00:05.000Z");
        assert_eq!(value["url"], "/reservation");
        assert_eq!(value["event"], "navigate");
    }

    #[test]
    fn test_explicit_url_wins() {
        let entry = LogInput::new("Reservation", EventKind::Click, "b", "button", "x")
            .with_url("/elsewhere")
            .into_entry("/reservation", at(0));
        assert_eq!(entry.url, "/elsewhere");
    }

    #[test]
    fn test_session_record_wire_shape() {
        let record = SessionRecord::new("1760778000000", Purpose::History, "Start", at(0));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sessionId"], "1760778000000");
        assert_eq!(value["purpose"], "history");
        assert_eq!(value["status"], "active");
        assert_eq!(value["start_time"], "2026-10-18T09:00:00.000Z");
        assert_eq!(value["end_reason"], Value::Null);
        assert_eq!(value["logs"], json!([]));
    }

    #[test]
    fn test_session_record_keeps_unknown_fields() {
        let raw = json!({
            "sessionId": "42",
            "purpose": "reservation",
            "status": "active",
            "location": "Reservation",
            "start_time": "2026-10-18T09:00:00.000Z",
            "last_interaction": "2026-10-18T09:00:01.250Z",
            "trainNo": 101
        });
        let record: SessionRecord = serde_json::from_value(raw).unwrap();
        assert!(record.logs.is_empty());
        assert_eq!(record.extra.get("trainNo"), Some(&json!(101)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["trainNo"], 101);
        assert_eq!(back["last_interaction"], "2026-10-18T09:00:01.250Z");
    }

    #[test]
    fn test_reservation_session_wire_shape() {
        let session = ReservationSession::new(1760778000000, at(0));
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["id"], 1760778000000i64);
        assert_eq!(value["reservationData"], Value::Null);
        assert_eq!(value["completed"], false);
        assert_eq!(value["createdAt"], "2026-10-18T09:00:00.000Z");
    }

    #[test]
    fn test_tracked_record_matching() {
        let record = SessionRecord::new("77", Purpose::History, "Start", at(0));
        assert!(record.matches(&json!({"sessionId": "77"})));
        assert!(!record.matches(&json!({"sessionId": 77})));
        assert!(!record.matches(&json!({"id": "77"})));

        let flow = ReservationSession::new(77, at(0));
        assert!(flow.matches(&json!({"id": 77})));
        assert!(!flow.matches(&json!({"sessionId": "77"})));
    }

    #[test]
    fn test_key_number_reads_both_shapes() {
        assert_eq!(
            SessionRecord::key_number(&json!({"sessionId": "123"})),
            Some(123)
        );
        assert_eq!(ReservationSession::key_number(&json!({"id": 9})), Some(9));
        assert_eq!(SessionRecord::key_number(&json!({})), None);
    }
}
