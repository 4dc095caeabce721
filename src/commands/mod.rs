/*!
Command handlers for the CLI

- `session`: start, log, update, complete and inspect session records
- `draft`: drive the reservation form against the stored draft

Handlers open the sled store named by the configuration and build a
[`SessionManager`] over it.
*/

use crate::config::Config;
use crate::error::Result;
use crate::session::{Outcome, SessionManager};
use crate::storage::SledStore;
use anyhow::Context;
use colored::Colorize;

pub mod draft;
pub mod session;

/// Open the configured store and wrap it in a session manager
pub fn open_manager(config: &Config) -> Result<SessionManager<SledStore>> {
    let path = config.store_path()?;
    let store = SledStore::open(&path)
        .with_context(|| format!("Failed to open session store at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Using session store");
    Ok(SessionManager::new(store).with_current_path(config.session.default_url.clone()))
}

/// Print the result of a session mutation
pub(crate) fn report_outcome(outcome: &Outcome, applied: &str) {
    match outcome {
        Outcome::Applied => println!("{}", applied.green()),
        Outcome::Skipped(reason) => println!("{} {}", "Skipped:".yellow(), reason),
    }
}
