//! Reservation search form
//!
//! - `draft`: the persisted form state and its validation rules
//! - `form`: the controller that applies user actions to the draft and
//!   records each one on the reservation-log session track
//! - `stations`: the station catalogue

pub mod draft;
pub mod form;
pub mod stations;

pub use draft::{CountChange, DraftViolation, PassengerKind, ReservationDraft, StationSide};
pub use form::{Handoff, ReservationForm, SearchResult};
pub use stations::{is_known_station, STATIONS};
