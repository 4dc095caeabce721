//! Session manager: start, log, update and complete sessions per track
//!
//! Every operation reads the track's current slot, applies its change, and
//! writes both the current slot and the matching entry of the track's list
//! slot. Operations that find nothing to act on return
//! [`Outcome::Skipped`] rather than an error, so callers wired to UI events
//! can fire them unconditionally.

use super::clock::{Clock, SystemClock};
use super::latest::{pick_latest, LatestSession};
use super::record::{
    LogInput, Purpose, ReservationSession, SessionRecord, SessionStatus, TrackedRecord,
};
use super::{Outcome, SkipReason, Track};
use crate::error::{RailtrailError, Result};
use crate::storage::{JsonStore, KeyValueStore, StorageKey};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Path recorded on log entries that do not name one
pub const DEFAULT_PATH: &str = "/reservation";

/// Session bookkeeping over an injected key-value store
pub struct SessionManager<S, C = SystemClock> {
    store: JsonStore<S>,
    clock: C,
    current_path: String,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Manager using the wall clock
    ///
    /// # Examples
    ///
    /// ```
    /// use railtrail::session::{EventKind, LogInput, SessionManager, Track};
    /// use railtrail::storage::MemoryStore;
    ///
    /// # fn main() -> railtrail::error::Result<()> {
    /// let manager = SessionManager::new(MemoryStore::new());
    /// let id = manager.start(Track::History)?;
    /// let outcome = manager.add_log(
    ///     Track::History,
    ///     &id,
    ///     LogInput::new("History", EventKind::Click, "open-detail", "button", "상세"),
    /// )?;
    /// assert!(outcome.is_applied());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> SessionManager<S, C> {
    /// Manager using a custom time source
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store: JsonStore::new(store),
            clock,
            current_path: DEFAULT_PATH.to_string(),
        }
    }

    /// Set the path recorded on log entries without an explicit URL
    pub fn with_current_path(mut self, path: impl Into<String>) -> Self {
        self.current_path = path.into();
        self
    }

    pub fn set_current_path(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn store(&self) -> &JsonStore<S> {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begin a new session on `track` and return its id
    ///
    /// A still-active history session is marked `incomplete` and archived
    /// before the new one replaces it.
    pub fn start(&self, track: Track) -> Result<String> {
        let now = self.clock.now();
        let id = self.next_id(track, now)?;

        match track {
            Track::Reservation => {
                let record = ReservationSession::new(id, now);
                self.upsert(track.list_key(), &record)?;
                self.store.write(track.current_key(), &record)?;
            }
            Track::ReservationLog => {
                let record =
                    SessionRecord::new(id.to_string(), Purpose::Reservation, "Reservation", now);
                self.store.write(track.current_key(), &record)?;
                self.upsert(track.list_key(), &record)?;
            }
            Track::History => {
                self.retire_active_history()?;
                let record = SessionRecord::new(id.to_string(), Purpose::History, "Start", now);
                self.store.write(track.current_key(), &record)?;
            }
        }

        tracing::info!(track = %track, session_id = id, "Started session");
        Ok(id.to_string())
    }

    /// Append an interaction to the current session of `track`
    ///
    /// Skipped when there is no current session or when `session_id` is not
    /// the current one; nothing is written in either case.
    pub fn add_log(&self, track: Track, session_id: &str, input: LogInput) -> Result<Outcome> {
        if !track.has_event_log() {
            return Ok(self.skip(track, SkipReason::TrackHasNoLog));
        }

        let Some(mut session) = self.store.read::<SessionRecord>(track.current_key())? else {
            return Ok(self.skip(track, SkipReason::NoCurrentSession));
        };

        if session.session_id != session_id {
            return Ok(self.skip(
                track,
                SkipReason::SessionMismatch {
                    current: session.session_id,
                    supplied: session_id.to_string(),
                },
            ));
        }

        let now = self.clock.now();
        session.push_log(input.into_entry(&self.current_path, now));
        session.last_interaction = now;

        self.store.write(track.current_key(), &session)?;
        self.upsert(track.list_key(), &session)?;

        tracing::debug!(
            track = %track,
            session_id,
            entries = session.logs.len(),
            "Appended log entry"
        );
        Ok(Outcome::Applied)
    }

    /// Shallow-merge `fields` into the current session of `track`
    ///
    /// Log tracks refresh `last_interaction` and `previous_pages` after the
    /// merge and match their list entry by `sessionId`. The reservation
    /// track touches no timestamp and matches by `id`.
    pub fn update(&self, track: Track, fields: &Map<String, Value>) -> Result<Outcome> {
        match track {
            Track::Reservation => self.merge_current::<ReservationSession>(track, fields),
            Track::ReservationLog | Track::History => {
                self.merge_current::<SessionRecord>(track, fields)
            }
        }
    }

    /// Mark the current session of `track` finished and clear the slot
    pub fn complete(&self, track: Track) -> Result<Outcome> {
        let fields = match track {
            Track::Reservation => ReservationSession::completion_fields(),
            Track::ReservationLog | Track::History => SessionRecord::completion_fields(),
        };

        let outcome = self.update(track, &fields)?;
        if outcome.is_applied() {
            self.store.remove(track.current_key())?;
            tracing::info!(track = %track, "Completed session");
        }
        Ok(outcome)
    }

    /// Most recently used of the reservation-log and history sessions
    pub fn latest(&self) -> Result<Option<LatestSession>> {
        let reservation_log = self.current_log_session(Track::ReservationLog)?;
        let history = self.current_log_session(Track::History)?;
        Ok(pick_latest(reservation_log.as_ref(), history.as_ref()))
    }

    /// Current event-trail session; always `None` for the reservation track
    pub fn current_log_session(&self, track: Track) -> Result<Option<SessionRecord>> {
        if !track.has_event_log() {
            return Ok(None);
        }
        self.store.read(track.current_key())
    }

    /// Current reservation-flow session
    pub fn current_reservation(&self) -> Result<Option<ReservationSession>> {
        self.store.read(Track::Reservation.current_key())
    }

    /// Current record of any track as raw JSON
    pub fn current_raw(&self, track: Track) -> Result<Option<Value>> {
        self.store.read(track.current_key())
    }

    /// Archived copies for an event-trail track
    pub fn log_history(&self, track: Track) -> Result<Vec<SessionRecord>> {
        if !track.has_event_log() {
            return Ok(Vec::new());
        }
        self.typed_list(track.list_key())
    }

    /// Archived copies for the reservation track
    pub fn reservation_history(&self) -> Result<Vec<ReservationSession>> {
        self.typed_list(Track::Reservation.list_key())
    }

    fn merge_current<T: TrackedRecord>(
        &self,
        track: Track,
        fields: &Map<String, Value>,
    ) -> Result<Outcome> {
        let Some(current) = self.store.read::<T>(track.current_key())? else {
            return Ok(self.skip(track, SkipReason::NoCurrentSession));
        };

        let Value::Object(mut merged) = serde_json::to_value(&current)? else {
            return Err(RailtrailError::Session(format!(
                "{} record did not encode as a JSON object",
                track
            ))
            .into());
        };
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }

        let mut updated: T = match serde_json::from_value(Value::Object(merged)) {
            Ok(record) => record,
            Err(e) => return Ok(self.skip(track, SkipReason::RejectedPatch(e.to_string()))),
        };
        updated.after_update(self.clock.now());

        self.store.write(track.current_key(), &updated)?;
        self.upsert(track.list_key(), &updated)?;

        tracing::debug!(track = %track, fields = fields.len(), "Updated session");
        Ok(Outcome::Applied)
    }

    fn retire_active_history(&self) -> Result<()> {
        let Some(mut previous) = self
            .store
            .read::<SessionRecord>(Track::History.current_key())?
        else {
            return Ok(());
        };
        if previous.status != SessionStatus::Active {
            return Ok(());
        }

        previous.status = SessionStatus::Incomplete;
        self.upsert(Track::History.list_key(), &previous)?;
        tracing::info!(
            session_id = %previous.session_id,
            "Marked superseded history session incomplete"
        );
        Ok(())
    }

    // Replace the list entry with the same key, or append.
    fn upsert<T: TrackedRecord>(&self, list_key: StorageKey, record: &T) -> Result<()> {
        let mut entries: Vec<Value> = self.store.read_list(list_key)?;
        let encoded = serde_json::to_value(record)?;

        match entries.iter().position(|entry| record.matches(entry)) {
            Some(index) => entries[index] = encoded,
            None => entries.push(encoded),
        }
        self.store.write(list_key, &entries)
    }

    // Millisecond timestamp, bumped past any id already used on the track.
    fn next_id(&self, track: Track, now: DateTime<Utc>) -> Result<i64> {
        let key_number = |entry: &Value| match track {
            Track::Reservation => ReservationSession::key_number(entry),
            Track::ReservationLog | Track::History => SessionRecord::key_number(entry),
        };

        let listed = self
            .store
            .read_list::<Value>(track.list_key())?
            .iter()
            .filter_map(key_number)
            .max();
        let current = self
            .store
            .read::<Value>(track.current_key())?
            .as_ref()
            .and_then(key_number);

        let candidate = now.timestamp_millis();
        Ok(match listed.max(current) {
            Some(previous) if previous >= candidate => match previous.checked_add(1) {
                Some(next) => next,
                None => {
                    tracing::warn!(
                        track = %track,
                        previous,
                        "Stored session id cannot be bumped, using clock id"
                    );
                    candidate
                }
            },
            _ => candidate,
        })
    }

    fn typed_list<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Vec<T>> {
        let entries: Vec<Value> = self.store.read_list(key)?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping malformed list entry");
                    None
                }
            })
            .collect())
    }

    fn skip(&self, track: Track, reason: SkipReason) -> Outcome {
        tracing::debug!(track = %track, reason = %reason, "Skipped session operation");
        Outcome::Skipped(reason)
    }
}
