use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::db::PathFrecency;
use crate::interactive;
use crate::outcome::Outcome;
use crate::pipe;
use crate::runtime::Runtime;

#[derive(Debug, Default)]
pub struct JumpOpts {
    pub query: Option<String>,
    pub interactive: bool,
    pub pipe: Option<String>,
}

/// Find the directory to jump to and print it to stdout.
///
/// Non-interactively, the best match wins; without a query this falls back
/// to listing the database like `view`. With `-i` the candidates are
/// offered on stderr and the choice read from stdin so stdout carries only
/// the selected path; `--pipe` delegates the choice to an external filter
/// program instead.
#[tracing::instrument(skip(runtime, db, out))]
pub fn jump<R: Runtime, W: Write>(
    runtime: &R,
    db: &mut PathFrecency,
    opts: &JumpOpts,
    mut out: W,
) -> Result<Outcome> {
    let mut candidates = match &opts.query {
        Some(query) => {
            if let Ok(cwd) = runtime.current_dir() {
                db.maybe_add_relative_to(runtime, &cwd, query);
            }
            db.directory_matches(runtime, query)
        }
        None => {
            if !opts.interactive && opts.pipe.is_none() {
                return crate::commands::view(db, out);
            }
            db.items_with_normalized_frecency()
        }
    };
    debug!("{} candidate(s)", candidates.len());
    if candidates.is_empty() {
        // Nothing to offer; don't prompt or spawn a filter over an empty
        // list.
        return Ok(Outcome::Error);
    }

    let selection = if opts.interactive {
        let stdin = std::io::stdin();
        match interactive::select(&candidates, stdin.lock(), std::io::stderr())? {
            Some(sel) => sel,
            None => return Ok(Outcome::ErrorNoInput),
        }
    } else if let Some(filter) = &opts.pipe {
        match pipe::select(&candidates, filter)? {
            Some(sel) => sel,
            None => return Ok(Outcome::ErrorNoInput),
        }
    } else {
        // Non-empty by the check above; the best match leads the list.
        candidates.swap_remove(0).0
    };

    write!(out, "{}", selection)?;
    Ok(Outcome::SuccessDirectory)
}
