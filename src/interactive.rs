//! Interactive candidate selection.
//!
//! The menu is written to one stream (stderr in practice, so stdout stays
//! clean for the selected path the shell function captures) and the
//! selection is read from another (stdin). Candidates are numbered in
//! descending rank so the best match sits next to the prompt.

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

/// Present `candidates` as a numbered menu and return the chosen path.
/// `Ok(None)` means the user declined to choose (empty input).
pub fn select<I, W>(candidates: &[(String, f64)], input: I, mut menu: W) -> Result<Option<String>>
where
    I: BufRead,
    W: Write,
{
    for (i, (path, score)) in candidates.iter().enumerate().rev() {
        writeln!(menu, "{}\t{:.3}\t{}", i + 1, score, path)?;
    }
    write!(menu, "> ")?;
    menu.flush()?;

    let mut line = String::new();
    input
        .take(64)
        .read_line(&mut line)
        .context("unable to read selection")?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let index: usize = line
        .parse()
        .with_context(|| format!("could not parse selection '{}'", line))?;
    if index == 0 || index > candidates.len() {
        bail!("selection {} is out of bounds", index);
    }
    Ok(Some(candidates[index - 1].0.clone()))
}
