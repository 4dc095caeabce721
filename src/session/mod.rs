//! Session tracking for the reservation front end
//!
//! Three independent tracks are kept, each with a "current" slot holding the
//! live record and a list slot accumulating copies of every record:
//!
//! - `reservation`: the booking flow itself ([`ReservationSession`])
//! - `reservation-log`: the interaction trail of the reservation form
//! - `history`: the interaction trail of the history pages
//!
//! All mutation goes through [`SessionManager`].

use crate::storage::StorageKey;
use std::fmt;

pub mod clock;
pub mod latest;
pub mod manager;
pub mod record;
pub mod timestamp;

pub use clock::{Clock, ManualClock, SystemClock};
pub use latest::LatestSession;
pub use manager::SessionManager;
pub use record::{
    EventKind, LogEntry, LogInput, Purpose, ReservationSession, SessionRecord, SessionStatus,
};

/// A session track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Track {
    /// Reservation flow (draft and booking results)
    Reservation,
    /// Reservation form interaction log
    ReservationLog,
    /// History page interaction log
    History,
}

impl Track {
    /// Slot holding the live record
    pub fn current_key(self) -> StorageKey {
        match self {
            Track::Reservation => StorageKey::CurrentReservation,
            Track::ReservationLog => StorageKey::CurrentReservationLog,
            Track::History => StorageKey::CurrentHistory,
        }
    }

    /// Slot holding the list of record copies
    pub fn list_key(self) -> StorageKey {
        match self {
            Track::Reservation => StorageKey::ReservationList,
            Track::ReservationLog => StorageKey::ReservationLogList,
            Track::History => StorageKey::HistoryList,
        }
    }

    /// Whether records on this track carry an event log
    pub fn has_event_log(self) -> bool {
        !matches!(self, Track::Reservation)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Track::Reservation => "reservation",
            Track::ReservationLog => "reservation-log",
            Track::History => "history",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a session mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The change was written
    Applied,
    /// Nothing was written
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Outcome::Applied => None,
            Outcome::Skipped(reason) => Some(reason),
        }
    }
}

/// Why a session mutation was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The track has no current record
    NoCurrentSession,
    /// The caller holds an id from a session that has since been replaced
    SessionMismatch { current: String, supplied: String },
    /// Log entries were sent to the reservation-flow track
    TrackHasNoLog,
    /// The merged fields no longer form a valid record
    RejectedPatch(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoCurrentSession => write!(f, "no current session"),
            SkipReason::SessionMismatch { current, supplied } => write!(
                f,
                "session {} is not the current session ({})",
                supplied, current
            ),
            SkipReason::TrackHasNoLog => write!(f, "track does not keep an event log"),
            SkipReason::RejectedPatch(reason) => write!(f, "rejected update: {}", reason),
        }
    }
}
