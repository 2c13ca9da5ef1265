use anyhow::Result;
use log::debug;

use crate::db::PathFrecency;
use crate::outcome::Outcome;

/// Record a visit to `dir`. Called by the shell hooks on every directory
/// change, so it must stay quiet on stdout.
#[tracing::instrument(skip(db))]
pub fn visit(db: &mut PathFrecency, dir: &str) -> Result<Outcome> {
    debug!("visiting {}", dir);
    db.visit(dir.to_string());
    Ok(Outcome::Success)
}
