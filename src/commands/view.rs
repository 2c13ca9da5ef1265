use anyhow::Result;
use std::io::Write;

use crate::db::PathFrecency;
use crate::outcome::Outcome;

/// Print the ranked database, score column first.
pub fn view<W: Write>(db: &PathFrecency, mut out: W) -> Result<Outcome> {
    for (path, score) in db.items_with_normalized_frecency() {
        // Scores are normalized to [0, 1]; scale to a 0-100 range and
        // right-align so columns line up.
        writeln!(out, "{:>7.3}\t{}", score * 100.0, path)?;
    }
    Ok(Outcome::Success)
}
