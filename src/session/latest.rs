//! Cross-track lookup of the most recently used event-trail session
//!
//! The result is the hand-off payload for downstream consumers (analytics,
//! language-model assistants) that want to know what the user was just doing.

use super::record::{LogEntry, Purpose, SessionRecord};
use serde::{Deserialize, Serialize};

/// Hand-off view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub purpose: Purpose,
    pub location: String,
    pub logs: Vec<LogEntry>,
}

impl From<&SessionRecord> for LatestSession {
    fn from(record: &SessionRecord) -> Self {
        Self {
            session_id: record.session_id.clone(),
            purpose: record.purpose,
            location: record.location.clone(),
            logs: record.logs.clone(),
        }
    }
}

/// Choose between the current reservation-log and history sessions
///
/// With both present the later `last_interaction` wins; on a tie the history
/// session is returned.
pub fn pick_latest(
    reservation_log: Option<&SessionRecord>,
    history: Option<&SessionRecord>,
) -> Option<LatestSession> {
    let chosen = match (reservation_log, history) {
        (Some(r), Some(h)) if r.last_interaction > h.last_interaction => r,
        (_, Some(h)) => h,
        (Some(r), None) => r,
        (None, None) => return None,
    };
    Some(chosen.into())
}
