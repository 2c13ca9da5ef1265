//! Candidate selection through an external filter program (fzf, fzy, ...).
//!
//! Candidates are written to the program's stdin in the same numbered
//! format the interactive menu uses; whatever line the program prints back
//! is parsed for its path column.

use anyhow::{Context, Result, bail};
use log::debug;
use std::io::{Read, Write};
use std::process::{Command, Stdio};

/// Run `command_line` as a filter over the candidate list. `Ok(None)` means
/// the filter selected nothing (it printed no output, e.g. fzf aborted).
pub fn select(candidates: &[(String, f64)], command_line: &str) -> Result<Option<String>> {
    let mut parts = command_line.split_whitespace();
    let program = match parts.next() {
        Some(p) => p,
        None => bail!("invalid pipe program: empty"),
    };

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("could not spawn pipe program '{}'", program))?;

    {
        let mut stdin = child
            .stdin
            .take()
            .context("pipe program has no stdin handle")?;
        for (i, (path, score)) in candidates.iter().enumerate().rev() {
            match writeln!(stdin, "{}\t{:.3}\t{}", i + 1, score, path) {
                // The filter may exit before reading everything.
                Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => break,
                other => other?,
            }
        }
    }

    let mut output = String::new();
    child
        .stdout
        .take()
        .context("pipe program has no stdout handle")?
        .read_to_string(&mut output)?;
    let status = child.wait()?;
    debug!("pipe program exited with {}", status);

    let line = match output.lines().next() {
        Some(l) if !l.trim().is_empty() => l,
        _ => return Ok(None),
    };

    // The selected line is in the format we printed: number, score, path.
    match line.splitn(3, '\t').nth(2) {
        Some(path) => Ok(Some(path.to_string())),
        None => bail!("pipe program did not select a line from its input"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<(String, f64)> {
        vec![("/best".to_string(), 0.9), ("/second".to_string(), 0.5)]
    }

    #[test]
    fn test_pipe_through_head_selects_worst_line() {
        // The list is written worst-first, so `head -n1` picks /second.
        let sel = select(&candidates(), "head -n1").unwrap();
        assert_eq!(sel, Some("/second".to_string()));
    }

    #[test]
    fn test_pipe_through_tail_selects_best_line() {
        let sel = select(&candidates(), "tail -n1").unwrap();
        assert_eq!(sel, Some("/best".to_string()));
    }

    #[test]
    fn test_pipe_with_no_output_is_no_selection() {
        let sel = select(&candidates(), "true").unwrap();
        assert_eq!(sel, None);
    }

    #[test]
    fn test_empty_pipe_command_is_an_error() {
        assert!(select(&candidates(), "").is_err());
    }

    #[test]
    fn test_missing_pipe_program_is_an_error() {
        assert!(select(&candidates(), "/nonexistent/filter-program").is_err());
    }

    #[test]
    fn test_pipe_output_without_tabs_is_an_error() {
        assert!(select(&candidates(), "echo no-tabs-here").is_err());
    }
}
