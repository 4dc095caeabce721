//! The reservation form draft and its submit-time validation

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which end of the journey a station applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationSide {
    Departure,
    Arrival,
}

impl StationSide {
    /// Control identifier logged when this side's station is picked
    pub fn target_id(self) -> &'static str {
        match self {
            StationSide::Departure => "select-departure-station",
            StationSide::Arrival => "select-arrival-station",
        }
    }

    /// Label shown next to the picker
    pub fn label(self) -> &'static str {
        match self {
            StationSide::Departure => "출발역",
            StationSide::Arrival => "도착역",
        }
    }
}

/// Passenger categories counted by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PassengerKind {
    /// 19 and over
    Adult,
    /// 65 and over
    Senior,
    /// 13 to 18
    Teen,
}

impl PassengerKind {
    /// Fragment used in counter control identifiers (`increase-adult`)
    pub fn id_fragment(self) -> &'static str {
        match self {
            PassengerKind::Adult => "adult",
            PassengerKind::Senior => "senior",
            PassengerKind::Teen => "teen",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PassengerKind::Adult => "성인",
            PassengerKind::Senior => "노약자",
            PassengerKind::Teen => "청소년",
        }
    }
}

/// Direction of a passenger counter change
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CountChange {
    Increase,
    Decrease,
}

impl CountChange {
    fn id_prefix(self) -> &'static str {
        match self {
            CountChange::Increase => "increase",
            CountChange::Decrease => "decrease",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CountChange::Increase => "증가",
            CountChange::Decrease => "감소",
        }
    }

    /// Control identifier for `kind`; independent of the resulting count
    pub fn target_id(self, kind: PassengerKind) -> String {
        format!("{}-{}", self.id_prefix(), kind.id_fragment())
    }

    /// Human-readable log text for `kind`
    pub fn text(self, kind: PassengerKind) -> String {
        format!("{} 수 {}", kind.label(), self.label())
    }
}

/// The in-progress reservation search
///
/// Stored in its own slot, independent of any session record. Field names
/// match the browser front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    #[serde(default)]
    pub departure_station: Option<String>,
    #[serde(default)]
    pub destination_station: Option<String>,
    #[serde(default, deserialize_with = "deserialize_departure_date")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default)]
    pub adult_count: u32,
    #[serde(default)]
    pub senior_count: u32,
    #[serde(default)]
    pub teen_count: u32,
}

impl ReservationDraft {
    /// Station currently chosen for `side`
    pub fn station(&self, side: StationSide) -> Option<&str> {
        match side {
            StationSide::Departure => self.departure_station.as_deref(),
            StationSide::Arrival => self.destination_station.as_deref(),
        }
    }

    pub fn set_station(&mut self, side: StationSide, station: impl Into<String>) {
        let slot = match side {
            StationSide::Departure => &mut self.departure_station,
            StationSide::Arrival => &mut self.destination_station,
        };
        *slot = Some(station.into());
    }

    pub fn count(&self, kind: PassengerKind) -> u32 {
        match kind {
            PassengerKind::Adult => self.adult_count,
            PassengerKind::Senior => self.senior_count,
            PassengerKind::Teen => self.teen_count,
        }
    }

    /// Apply a ±1 counter change, clamping at zero
    pub fn change_count(&mut self, kind: PassengerKind, change: CountChange) -> u32 {
        let slot = match kind {
            PassengerKind::Adult => &mut self.adult_count,
            PassengerKind::Senior => &mut self.senior_count,
            PassengerKind::Teen => &mut self.teen_count,
        };
        *slot = match change {
            CountChange::Increase => slot.saturating_add(1),
            CountChange::Decrease => slot.saturating_sub(1),
        };
        *slot
    }

    pub fn total_passengers(&self) -> u32 {
        self.adult_count
            .saturating_add(self.senior_count)
            .saturating_add(self.teen_count)
    }

    /// Treat blank station names as unset
    pub fn normalized(mut self) -> Self {
        for station in [&mut self.departure_station, &mut self.destination_station] {
            if station.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *station = None;
            }
        }
        self
    }

    /// Check the draft is ready to search
    ///
    /// Rules are checked in a fixed order and the first violation wins.
    pub fn validate(&self) -> Result<(), DraftViolation> {
        let departure = self
            .departure_station
            .as_deref()
            .ok_or(DraftViolation::MissingDeparture)?;
        let arrival = self
            .destination_station
            .as_deref()
            .ok_or(DraftViolation::MissingArrival)?;
        if self.departure_date.is_none() {
            return Err(DraftViolation::MissingDate);
        }
        if departure == arrival {
            return Err(DraftViolation::SameStation);
        }
        if self.total_passengers() < 1 {
            return Err(DraftViolation::NoPassengers);
        }
        Ok(())
    }
}

/// First rule a draft breaks on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftViolation {
    MissingDeparture,
    MissingArrival,
    MissingDate,
    SameStation,
    NoPassengers,
}

impl fmt::Display for DraftViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DraftViolation::MissingDeparture => "A departure station is required.",
            DraftViolation::MissingArrival => "An arrival station is required.",
            DraftViolation::MissingDate => "A departure date is required.",
            DraftViolation::SameStation => "Departure and arrival stations must differ.",
            DraftViolation::NoPassengers => "At least one passenger is required.",
        };
        f.write_str(message)
    }
}

impl std::error::Error for DraftViolation {}

// Accepts `null`, a plain `YYYY-MM-DD`, or a full ISO-8601 datetime as the
// browser serializes `Date` values. Datetimes are read in the local zone,
// which is where the calendar picked them. Anything else reads as no date so
// the rest of the draft still loads.
fn deserialize_departure_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(raw)) => raw,
        Some(other) => {
            tracing::warn!(value = %other, "Ignoring non-string departure date");
            return Ok(None);
        }
    };
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    match chrono::DateTime::parse_from_rfc3339(&raw) {
        Ok(dt) => Ok(Some(dt.with_timezone(&chrono::Local).date_naive())),
        Err(_) => {
            tracing::warn!(value = %raw, "Ignoring unparseable departure date");
            Ok(None)
        }
    }
}
