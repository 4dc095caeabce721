use super::open_manager;
use crate::cli::DraftCommand;
use crate::config::Config;
use crate::error::{RailtrailError, Result};
use crate::reservation::{
    is_known_station, PassengerKind, ReservationDraft, ReservationForm, SearchResult,
    StationSide, STATIONS,
};
use crate::session::SessionManager;
use crate::storage::SledStore;
use colored::Colorize;

/// Handle draft commands
///
/// Every action except `show` and `open` acts on a form loaded from the
/// stored draft, so the page-load event is only recorded by `open`.
pub fn handle_draft(config: &Config, command: DraftCommand) -> Result<()> {
    let sessions = open_manager(config)?;

    match command {
        DraftCommand::Show => {
            let form = ReservationForm::load(sessions)?;
            print_draft(form.draft());
        }
        DraftCommand::Open { reset } => {
            let form = ReservationForm::open(sessions, reset)?;
            println!("{}", "Reservation form opened".green());
            print_draft(form.draft());
        }
        DraftCommand::Departure { station } => {
            select_station(sessions, StationSide::Departure, &station)?;
        }
        DraftCommand::Arrival { station } => {
            select_station(sessions, StationSide::Arrival, &station)?;
        }
        DraftCommand::Date { date } => {
            let mut form = ReservationForm::load(sessions)?;
            form.select_date(date)?;
            println!("{} {}", "Departure date:".green(), date);
        }
        DraftCommand::Count { kind, change } => {
            let mut form = ReservationForm::load(sessions)?;
            let count = form.change_count(kind, change)?;
            println!("{} {}", format!("{}:", kind.label()).green(), count);
        }
        DraftCommand::Search => {
            let mut form = ReservationForm::load(sessions)?;
            match form.search()? {
                SearchResult::Accepted(handoff) => {
                    println!("{} {}", "Search accepted, continue to".green(), handoff.route);
                    println!("{}", serde_json::to_string_pretty(&handoff)?);
                }
                SearchResult::Rejected(violation) => {
                    println!("{} {}", "Search rejected:".red(), violation);
                }
            }
        }
        DraftCommand::Back => {
            let form = ReservationForm::load(sessions)?;
            let route = form.back()?;
            println!("{} {}", "Back to".green(), route);
        }
        DraftCommand::Reset => {
            let mut form = ReservationForm::load(sessions)?;
            form.reset()?;
            println!("{}", "Draft cleared".green());
        }
    }

    Ok(())
}

/// Print the stations offered by the station picker
pub fn handle_stations() -> Result<()> {
    for station in STATIONS {
        println!("{}", station);
    }
    Ok(())
}

fn select_station(
    sessions: SessionManager<SledStore>,
    side: StationSide,
    station: &str,
) -> Result<()> {
    if !is_known_station(station) {
        return Err(RailtrailError::Validation(format!(
            "Unknown station: {} (run `railtrail stations` for the list)",
            station
        ))
        .into());
    }

    let mut form = ReservationForm::load(sessions)?;
    form.select_station(side, station)?;
    println!("{} {}", format!("{}:", side.label()).green(), station);
    Ok(())
}

fn print_draft(draft: &ReservationDraft) {
    let or_dash = |s: Option<&str>| s.unwrap_or("-").to_string();
    println!(
        "{} {}",
        "Departure:".bold(),
        or_dash(draft.station(StationSide::Departure))
    );
    println!(
        "{} {}",
        "Arrival:  ".bold(),
        or_dash(draft.station(StationSide::Arrival))
    );
    println!(
        "{} {}",
        "Date:     ".bold(),
        draft
            .departure_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    for kind in [
        PassengerKind::Adult,
        PassengerKind::Senior,
        PassengerKind::Teen,
    ] {
        println!("{} {}", format!("{}:", kind.label()).bold(), draft.count(kind));
    }
}
