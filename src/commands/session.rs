use super::{open_manager, report_outcome};
use crate::cli::SessionCommand;
use crate::config::Config;
use crate::error::{RailtrailError, Result};
use crate::session::timestamp::format_millis;
use crate::session::{LogInput, ReservationSession, SessionRecord, Track};
use colored::Colorize;
use prettytable::{format, Table};
use serde_json::{Map, Value};

/// Handle session commands
pub fn handle_session(config: &Config, command: SessionCommand) -> Result<()> {
    let manager = open_manager(config)?;

    match command {
        SessionCommand::Start { track } => {
            let id = manager.start(track)?;
            println!("{}", id);
        }
        SessionCommand::Log {
            track,
            session_id,
            page,
            event,
            target_id,
            tag,
            text,
            url,
        } => {
            let mut input = LogInput::new(page, event, target_id, tag, text);
            if let Some(url) = url {
                input = input.with_url(url);
            }
            let outcome = manager.add_log(track, &session_id, input)?;
            report_outcome(&outcome, "Logged");
        }
        SessionCommand::Update { track, set } => {
            let fields = parse_assignments(&set)?;
            let outcome = manager.update(track, &fields)?;
            report_outcome(&outcome, "Updated");
        }
        SessionCommand::Complete { track } => {
            let outcome = manager.complete(track)?;
            report_outcome(&outcome, &format!("Completed {} session", track));
        }
        SessionCommand::Show { track } => match manager.current_raw(track)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("{}", format!("No current {} session.", track).yellow()),
        },
        SessionCommand::List { track, json } => match track {
            Track::Reservation => {
                let sessions = manager.reservation_history()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&sessions)?);
                } else {
                    print_reservation_table(&sessions);
                }
            }
            Track::ReservationLog | Track::History => {
                let sessions = manager.log_history(track)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&sessions)?);
                } else {
                    print_log_table(track, &sessions);
                }
            }
        },
        SessionCommand::Latest { json } => match manager.latest()? {
            Some(latest) if json => println!("{}", serde_json::to_string_pretty(&latest)?),
            Some(latest) => {
                println!(
                    "{} {} ({:?}) at {}, {} log entries",
                    "Latest session:".bold(),
                    latest.session_id.cyan(),
                    latest.purpose,
                    latest.location,
                    latest.logs.len()
                );
            }
            None if json => println!("null"),
            None => println!("{}", "No active log session.".yellow()),
        },
    }

    Ok(())
}

/// Parse `KEY=VALUE` assignments into a JSON object
///
/// Values that parse as JSON keep their type (`2`, `true`, `null`,
/// `["a"]`); anything else is stored as a string.
pub fn parse_assignments(assignments: &[String]) -> Result<Map<String, Value>> {
    let mut fields = Map::new();
    for assignment in assignments {
        let (key, raw) = assignment.split_once('=').ok_or_else(|| {
            RailtrailError::Session(format!("Expected KEY=VALUE, got: {}", assignment))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(
                RailtrailError::Session(format!("Missing field name in: {}", assignment)).into(),
            );
        }
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(key.to_string(), value);
    }
    Ok(fields)
}

fn print_log_table(track: Track, sessions: &[SessionRecord]) {
    if sessions.is_empty() {
        println!("{}", format!("No {} sessions found.", track).yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Status".bold(),
        "Location".bold(),
        "Pages".bold(),
        "Events".bold(),
        "Last Interaction".bold()
    ]);

    for session in sessions {
        table.add_row(prettytable::row![
            session.session_id.cyan(),
            session.status,
            session.location,
            session.previous_pages.join(" > "),
            session.logs.len(),
            format_millis(&session.last_interaction)
        ]);
    }

    println!("\n{} sessions:", track);
    table.printstd();
    println!();
}

fn print_reservation_table(sessions: &[ReservationSession]) {
    if sessions.is_empty() {
        println!("{}", "No reservation sessions found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Route".bold(),
        "Date".bold(),
        "Passengers".bold(),
        "Completed".bold(),
        "Created".bold()
    ]);

    for session in sessions {
        let (route, date, passengers) = match &session.reservation_data {
            Some(draft) => (
                format!(
                    "{} → {}",
                    draft.departure_station.as_deref().unwrap_or("-"),
                    draft.destination_station.as_deref().unwrap_or("-")
                ),
                draft
                    .departure_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                draft.total_passengers().to_string(),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        table.add_row(prettytable::row![
            session.id.to_string().cyan(),
            route,
            date,
            passengers,
            session.completed,
            format_millis(&session.created_at)
        ]);
    }

    println!("\nreservation sessions:");
    table.printstd();
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_assignments_keeps_json_types() {
        let fields = parse_assignments(&strings(&[
            "step=2",
            "done=true",
            "end_reason=null",
            "pages=[\"Start\"]",
        ]))
        .unwrap();
        assert_eq!(fields["step"], json!(2));
        assert_eq!(fields["done"], json!(true));
        assert_eq!(fields["end_reason"], Value::Null);
        assert_eq!(fields["pages"], json!(["Start"]));
    }

    #[test]
    fn test_parse_assignments_falls_back_to_text() {
        let fields = parse_assignments(&strings(&["location=TrainList", "note=a=b"])).unwrap();
        assert_eq!(fields["location"], json!("TrainList"));
        assert_eq!(fields["note"], json!("a=b"));
    }

    #[test]
    fn test_parse_assignments_rejects_missing_separator() {
        assert!(parse_assignments(&strings(&["location"])).is_err());
        assert!(parse_assignments(&strings(&["=value"])).is_err());
    }
}
