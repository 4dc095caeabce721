//! Reservation form controller
//!
//! Applies user actions to the [`ReservationDraft`], persists the draft after
//! every change, and records each action on the reservation-log track. When
//! no reservation-log session is running the actions still apply; only the
//! logging is skipped.

use super::draft::{CountChange, DraftViolation, PassengerKind, ReservationDraft, StationSide};
use crate::error::Result;
use crate::session::{
    Clock, EventKind, LogInput, Outcome, SessionManager, SkipReason, SystemClock, Track,
};
use crate::storage::{KeyValueStore, StorageKey};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// Page name recorded on every log entry from this form
pub const PAGE: &str = "Reservation";
/// Route of the next booking step
pub const NEXT_ROUTE: &str = "/reservation/train-list";
/// Route the back button leads to
pub const HOME_ROUTE: &str = "/";

const PAGE_LOAD_TARGET: &str = "page-load";
const SEARCH_TARGET: &str = "reservation-to-trainlist";
const BACK_TARGET: &str = "reservation-to-home";
const CALENDAR_TARGET: &str = "calendar-tile";

/// Navigation to the next step, carrying the accepted draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    pub route: &'static str,
    pub draft: ReservationDraft,
}

/// Result of pressing search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Accepted(Handoff),
    Rejected(DraftViolation),
}

/// Controller for the reservation search form
pub struct ReservationForm<S, C = SystemClock> {
    sessions: SessionManager<S, C>,
    draft: ReservationDraft,
}

impl<S: KeyValueStore, C: Clock> ReservationForm<S, C> {
    /// Load the stored draft without recording a page visit
    pub fn load(sessions: SessionManager<S, C>) -> Result<Self> {
        let draft = sessions
            .store()
            .read::<ReservationDraft>(StorageKey::ReservationDraft)?
            .unwrap_or_default()
            .normalized();
        Ok(Self { sessions, draft })
    }

    /// Arrive on the form page
    ///
    /// With `reset` the stored draft is discarded first. Arrival moves the
    /// reservation-log session to this page and records a single
    /// `page-load` navigation per session.
    pub fn open(sessions: SessionManager<S, C>, reset: bool) -> Result<Self> {
        if reset {
            sessions.store().remove(StorageKey::ReservationDraft)?;
        }
        let form = Self::load(sessions)?;
        form.persist()?;
        form.record_arrival()?;
        Ok(form)
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    pub fn sessions(&self) -> &SessionManager<S, C> {
        &self.sessions
    }

    pub fn into_sessions(self) -> SessionManager<S, C> {
        self.sessions
    }

    /// Pick the departure or arrival station
    pub fn select_station(&mut self, side: StationSide, station: &str) -> Result<()> {
        self.log_click(
            side.target_id(),
            "button",
            format!("{} 선택: {}", side.label(), station),
        )?;
        self.draft.set_station(side, station);
        self.persist()
    }

    /// Pick the travel date
    pub fn select_date(&mut self, date: NaiveDate) -> Result<()> {
        self.log_click(
            CALENDAR_TARGET,
            "tile",
            format!("날짜 선택: {}", date.format("%Y. %-m. %-d.")),
        )?;
        self.draft.departure_date = Some(date);
        self.persist()
    }

    /// Press a passenger counter button; returns the new count
    pub fn change_count(&mut self, kind: PassengerKind, change: CountChange) -> Result<u32> {
        self.log_click(&change.target_id(kind), "button", change.text(kind))?;
        let count = self.draft.change_count(kind, change);
        self.persist()?;
        Ok(count)
    }

    /// Press search
    ///
    /// The click is always logged. A valid draft is attached to the current
    /// reservation-flow session and handed to the next step; an invalid one
    /// is reported with the first rule it breaks and nothing else changes.
    pub fn search(&mut self) -> Result<SearchResult> {
        self.log_click(SEARCH_TARGET, "button", "조회")?;

        if let Err(violation) = self.draft.validate() {
            tracing::info!(reason = %violation, "Reservation search rejected");
            return Ok(SearchResult::Rejected(violation));
        }

        let mut fields = Map::new();
        fields.insert(
            "reservationData".to_string(),
            serde_json::to_value(&self.draft)?,
        );
        if let Outcome::Skipped(reason) = self.sessions.update(Track::Reservation, &fields)? {
            tracing::debug!(reason = %reason, "Draft not attached to a reservation session");
        }

        Ok(SearchResult::Accepted(Handoff {
            route: NEXT_ROUTE,
            draft: self.draft.clone(),
        }))
    }

    /// Press back; returns the route to navigate to
    pub fn back(&self) -> Result<&'static str> {
        self.log_click(BACK_TARGET, "button", "이전")?;
        Ok(HOME_ROUTE)
    }

    /// Discard the draft
    pub fn reset(&mut self) -> Result<()> {
        self.draft = ReservationDraft::default();
        self.sessions.store().remove(StorageKey::ReservationDraft)
    }

    fn persist(&self) -> Result<()> {
        self.sessions
            .store()
            .write(StorageKey::ReservationDraft, &self.draft)
    }

    fn record_arrival(&self) -> Result<()> {
        let Some(session) = self.sessions.current_log_session(Track::ReservationLog)? else {
            return Ok(());
        };

        let mut fields = Map::new();
        fields.insert("location".to_string(), Value::from(PAGE));
        self.sessions.update(Track::ReservationLog, &fields)?;

        if !session.has_logged(PAGE, EventKind::Navigate, PAGE_LOAD_TARGET) {
            self.sessions.add_log(
                Track::ReservationLog,
                &session.session_id,
                LogInput::new(
                    PAGE,
                    EventKind::Navigate,
                    PAGE_LOAD_TARGET,
                    "system",
                    "Reservation 페이지 도착",
                ),
            )?;
        }
        Ok(())
    }

    fn log_click(&self, target_id: &str, tag: &str, text: impl Into<String>) -> Result<Outcome> {
        let Some(session) = self.sessions.current_log_session(Track::ReservationLog)? else {
            return Ok(Outcome::Skipped(SkipReason::NoCurrentSession));
        };
        self.sessions.add_log(
            Track::ReservationLog,
            &session.session_id,
            LogInput::new(PAGE, EventKind::Click, target_id, tag, text),
        )
    }
}
