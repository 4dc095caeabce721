//! Railtrail - train reservation drafts with session trail logging
//!
//! This library provides the state layer behind a train reservation front
//! end: the search-form draft with its validation rules, and the session
//! bookkeeping that records where the user has been and what they clicked.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Key-value store abstraction, JSON layer, memory and sled backends
//! - `session`: Session tracks, records, the session manager and latest-session lookup
//! - `reservation`: The reservation draft, validation and the form controller
//! - `config`: Configuration management and validation
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use railtrail::{MemoryStore, SessionManager, Track};
//! use railtrail::session::{EventKind, LogInput};
//!
//! fn main() -> anyhow::Result<()> {
//!     let sessions = SessionManager::new(MemoryStore::new());
//!     let id = sessions.start(Track::History)?;
//!
//!     let input = LogInput::new("History", EventKind::Navigate, "page-load", "system", "");
//!     assert!(sessions.add_log(Track::History, &id, input)?.is_applied());
//!
//!     let latest = sessions.latest()?.expect("a history session is active");
//!     assert_eq!(latest.session_id, id);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod reservation;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{RailtrailError, Result};
pub use reservation::{ReservationDraft, ReservationForm, SearchResult};
pub use session::{LatestSession, Outcome, SessionManager, SkipReason, Track};
pub use storage::{JsonStore, KeyValueStore, MemoryStore, SledStore, StorageKey};
