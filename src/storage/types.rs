use std::fmt;

/// Named storage slots, one JSON document each
///
/// The string names match the keys used by the browser front end so stored
/// data can be exchanged with it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The reservation form draft
    ReservationDraft,
    /// Current reservation-flow session
    CurrentReservation,
    /// History of reservation-flow sessions
    ReservationList,
    /// Current reservation-log session
    CurrentReservationLog,
    /// History of reservation-log sessions
    ReservationLogList,
    /// Current history-log session
    CurrentHistory,
    /// History of history-log sessions
    HistoryList,
}

impl StorageKey {
    /// All slots, in declaration order
    pub const ALL: [StorageKey; 7] = [
        StorageKey::ReservationDraft,
        StorageKey::CurrentReservation,
        StorageKey::ReservationList,
        StorageKey::CurrentReservationLog,
        StorageKey::ReservationLogList,
        StorageKey::CurrentHistory,
        StorageKey::HistoryList,
    ];

    /// The raw key string
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::ReservationDraft => "reservationData",
            StorageKey::CurrentReservation => "currentReservationSession",
            StorageKey::ReservationList => "reservationSessions",
            StorageKey::CurrentReservationLog => "currentReservationLogSession",
            StorageKey::ReservationLogList => "reservationLogSessions",
            StorageKey::CurrentHistory => "currentHistorySession",
            StorageKey::HistoryList => "historySessions",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
