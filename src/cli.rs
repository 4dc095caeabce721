//! Command-line interface definition for Railtrail
//!
//! This module defines the CLI structure using clap's derive API. The
//! commands stand in for the reservation web front end: each one performs a
//! single user action against the persistent store.

use crate::reservation::{CountChange, PassengerKind};
use crate::session::{EventKind, Track};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Railtrail - train reservation drafts with session trail logging
#[derive(Parser, Debug, Clone)]
#[command(name = "railtrail")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Session store directory (overrides config and RAILTRAIL_STORE_PATH)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Railtrail
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage session records
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Drive the reservation form draft
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// List the stations offered by the station picker
    Stations,
}

/// Session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// Start a new session on a track and print its id
    Start { track: Track },

    /// Append a log entry to the current session of a track
    Log {
        track: Track,

        /// Id of the session the event belongs to
        #[arg(long)]
        session_id: String,

        /// Page that originated the event
        #[arg(long)]
        page: String,

        /// Event kind
        #[arg(long, value_enum, default_value = "click")]
        event: EventKind,

        /// Identifier of the control that fired
        #[arg(long)]
        target_id: String,

        /// Event category
        #[arg(long, default_value = "button")]
        tag: String,

        /// Human-readable description
        #[arg(long, default_value = "")]
        text: String,

        /// Path at the time of the event (defaults to session.default_url)
        #[arg(long)]
        url: Option<String>,
    },

    /// Merge fields into the current session of a track
    Update {
        track: Track,

        /// Field assignment; the value is parsed as JSON, else taken as text
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Mark the current session of a track completed
    Complete { track: Track },

    /// Print the current session of a track
    Show { track: Track },

    /// List archived sessions of a track
    List {
        track: Track,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the most recently used log session
    Latest {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

/// Reservation draft subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DraftCommand {
    /// Print the stored draft
    Show,

    /// Arrive on the reservation page
    Open {
        /// Discard the stored draft first
        #[arg(long)]
        reset: bool,
    },

    /// Pick the departure station
    Departure { station: String },

    /// Pick the arrival station
    Arrival { station: String },

    /// Pick the departure date (YYYY-MM-DD)
    Date { date: NaiveDate },

    /// Press a passenger counter button
    Count {
        #[arg(value_enum)]
        kind: PassengerKind,
        #[arg(value_enum)]
        change: CountChange,
    },

    /// Validate the draft and hand it to the next step
    Search,

    /// Leave the reservation page
    Back,

    /// Discard the stored draft
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            store: None,
            verbose: false,
            command: Commands::Stations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.store.is_none());
        assert!(matches!(cli.command, Commands::Stations));
    }

    #[test]
    fn test_cli_parse_session_start() {
        let cli = Cli::try_parse_from(["railtrail", "session", "start", "reservation-log"]).unwrap();
        if let Commands::Session {
            command: SessionCommand::Start { track },
        } = cli.command
        {
            assert_eq!(track, Track::ReservationLog);
        } else {
            panic!("Expected session start command");
        }
    }

    #[test]
    fn test_cli_rejects_unknown_track() {
        let cli = Cli::try_parse_from(["railtrail", "session", "start", "payments"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_session_log() {
        let cli = Cli::try_parse_from([
            "railtrail",
            "session",
            "log",
            "history",
            "--session-id",
            "1760778000000",
            "--page",
            "History",
            "--event",
            "navigate",
            "--target-id",
            "page-load",
        ])
        .unwrap();

        if let Commands::Session {
            command:
                SessionCommand::Log {
                    track,
                    session_id,
                    event,
                    tag,
                    url,
                    ..
                },
        } = cli.command
        {
            assert_eq!(track, Track::History);
            assert_eq!(session_id, "1760778000000");
            assert_eq!(event, EventKind::Navigate);
            assert_eq!(tag, "button");
            assert!(url.is_none());
        } else {
            panic!("Expected session log command");
        }
    }

    #[test]
    fn test_cli_update_requires_assignment() {
        let cli = Cli::try_parse_from(["railtrail", "session", "update", "history"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from([
            "railtrail",
            "session",
            "update",
            "history",
            "--set",
            "location=History",
            "--set",
            "end_reason=null",
        ])
        .unwrap();
        if let Commands::Session {
            command: SessionCommand::Update { set, .. },
        } = cli.command
        {
            assert_eq!(set.len(), 2);
        } else {
            panic!("Expected session update command");
        }
    }

    #[test]
    fn test_cli_parse_draft_count() {
        let cli = Cli::try_parse_from(["railtrail", "draft", "count", "adult", "increase"]).unwrap();
        if let Commands::Draft {
            command: DraftCommand::Count { kind, change },
        } = cli.command
        {
            assert_eq!(kind, PassengerKind::Adult);
            assert_eq!(change, CountChange::Increase);
        } else {
            panic!("Expected draft count command");
        }
    }

    #[test]
    fn test_cli_parse_draft_date() {
        let cli = Cli::try_parse_from(["railtrail", "draft", "date", "2026-11-02"]).unwrap();
        if let Commands::Draft {
            command: DraftCommand::Date { date },
        } = cli.command
        {
            assert_eq!(date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
        } else {
            panic!("Expected draft date command");
        }

        assert!(Cli::try_parse_from(["railtrail", "draft", "date", "next week"]).is_err());
    }

    #[test]
    fn test_cli_global_store_flag() {
        let cli = Cli::try_parse_from(["railtrail", "draft", "show", "--store", "/tmp/s"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s")));
    }
}
