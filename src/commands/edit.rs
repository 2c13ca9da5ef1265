use anyhow::{Context, Result, bail};
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

use crate::db::{Diff, PathFrecency};
use crate::outcome::Outcome;
use crate::runtime::Runtime;

/// Open the database in the user's editor and apply whatever they changed.
#[tracing::instrument(skip(runtime, db))]
pub fn edit<R: Runtime>(runtime: &R, db: &mut PathFrecency) -> Result<Outcome> {
    let entries = db.items_with_frecency();
    let diff = edit_in_editor(runtime, &entries)?;
    if diff.is_empty() {
        debug!("no changes made");
        return Ok(Outcome::Success);
    }
    db.apply_diff(diff);
    Ok(Outcome::Success)
}

fn edit_in_editor<R: Runtime>(runtime: &R, entries: &[(String, f64)]) -> Result<Diff> {
    let (editor, mut args) = find_editor(runtime)?;

    let tmpf = tempfile::Builder::new()
        .prefix("jmp-edit")
        .suffix(".txt")
        .tempfile()
        .context("could not create edit buffer")?;
    let original = serialize(entries);
    std::fs::write(tmpf.path(), &original)
        .context("could not write edit buffer")?;
    debug!("edit buffer at {}", tmpf.path().display());

    args.push(tmpf.path().to_string_lossy().into_owned());
    let status = Command::new(&editor)
        .args(&args)
        .status()
        .with_context(|| format!("could not run editor {}", editor.display()))?;
    if !status.success() {
        bail!("editor exited with {}", status);
    }

    // Re-read by path: some editors replace the file rather than write in
    // place, so the original handle may see stale content.
    let edited = std::fs::read_to_string(tmpf.path())
        .context("could not read edited buffer")?;
    if edited.trim() == original.trim() {
        return Ok(Diff::default());
    }
    diff_against(entries, &deserialize(&edited)?)
}

/// The editor to use, with any arguments baked into the variable.
/// `JMP_EDITOR` wins over `EDITOR` and `VISUAL`; without any of those,
/// fall back to the first of a few common editors found on PATH.
fn find_editor<R: Runtime>(runtime: &R) -> Result<(PathBuf, Vec<String>)> {
    let configured = runtime
        .env_var("JMP_EDITOR")
        .or_else(|_| runtime.env_var("EDITOR"))
        .or_else(|_| runtime.env_var("VISUAL"));

    if let Ok(editor) = configured {
        // Support 'EDITOR=bin args' by splitting on whitespace. Editors
        // with spaces in their path won't work, matching what most other
        // tools do with these variables.
        let mut parts = editor.split_whitespace();
        let bin = parts.next().filter(|b| !b.is_empty());
        match bin {
            Some(bin) => {
                return Ok((
                    PathBuf::from(bin),
                    parts.map(|s| s.to_string()).collect(),
                ));
            }
            None => bail!("configured editor is empty"),
        }
    }

    for fallback in ["editor", "nano", "vim", "vi"] {
        if let Ok(path) = which::which(fallback) {
            return Ok((path, Vec::new()));
        }
    }
    bail!("no editor found: set JMP_EDITOR or EDITOR")
}

fn serialize(entries: &[(String, f64)]) -> String {
    format!(
        r#"# Edit your frecency fearlessly!
#
# Lines starting with '#' are comments. sh-esque quoting and escapes may be
# used in paths. Columns are whitespace separated: score first, then path.
# Saved changes are applied back to the database immediately.
{}
"#,
        entries
            .iter()
            .map(|(path, score)| format!("{}\t{}", score, snailquote::escape(path)))
            .collect::<Vec<String>>()
            .join("\n")
    )
}

fn deserialize(s: &str) -> Result<HashMap<String, f64>> {
    let mut res = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((score_part, path_part)) = line.split_once(char::is_whitespace) else {
            bail!("line '{}' has no whitespace to split on", line);
        };
        let score: f64 = score_part
            .parse()
            .with_context(|| format!("could not parse '{}' as a score", score_part))?;
        let path = snailquote::unescape(path_part.trim())
            .map_err(|e| anyhow::anyhow!("could not unescape '{}': {}", path_part, e))?;
        res.insert(path, score);
    }
    Ok(res)
}

fn diff_against(entries: &[(String, f64)], edited: &HashMap<String, f64>) -> Result<Diff> {
    let mut edited = edited.clone();
    let mut diff = Diff::default();

    for (path, score) in entries {
        match edited.remove(path) {
            Some(new_score) => {
                if new_score != *score {
                    // A changed weight is a remove plus a weighted add.
                    diff.removals.push(path.clone());
                    diff.additions.push((path.clone(), new_score));
                }
            }
            None => diff.removals.push(path.clone()),
        }
    }
    // Whatever wasn't in the original set is an addition.
    for (path, score) in edited {
        diff.additions.push((path, score));
    }
    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::env::VarError;

    fn entries() -> Vec<(String, f64)> {
        vec![
            ("/home/user/src".to_string(), 450.0),
            ("/with space".to_string(), 12.5),
        ]
    }

    #[test]
    fn test_serialize_deserialize_round_trip() {
        let text = serialize(&entries());
        let map = deserialize(&text).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["/home/user/src"], 450.0);
        assert_eq!(map["/with space"], 12.5);
    }

    #[test]
    fn test_deserialize_skips_comments_and_blanks() {
        let map = deserialize("# comment\n\n  \n1.5\t/a\n").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["/a"], 1.5);
    }

    #[test]
    fn test_deserialize_rejects_scoreless_line() {
        assert!(deserialize("justonepath\n").is_err());
        assert!(deserialize("abc\t/a\n").is_err());
    }

    #[test]
    fn test_diff_detects_removal_and_weight_change() {
        let mut edited = HashMap::new();
        edited.insert("/home/user/src".to_string(), 99.0);
        // "/with space" deleted by the user.

        let diff = diff_against(&entries(), &edited).unwrap();
        assert!(diff.removals.contains(&"/home/user/src".to_string()));
        assert!(diff.removals.contains(&"/with space".to_string()));
        assert_eq!(diff.additions, vec![("/home/user/src".to_string(), 99.0)]);
    }

    #[test]
    fn test_diff_detects_addition() {
        let mut edited = HashMap::new();
        edited.insert("/home/user/src".to_string(), 450.0);
        edited.insert("/with space".to_string(), 12.5);
        edited.insert("/brand/new".to_string(), 7.0);

        let diff = diff_against(&entries(), &edited).unwrap();
        assert!(diff.removals.is_empty());
        assert_eq!(diff.additions, vec![("/brand/new".to_string(), 7.0)]);
    }

    #[test]
    fn test_diff_unchanged_is_empty() {
        let mut edited = HashMap::new();
        edited.insert("/home/user/src".to_string(), 450.0);
        edited.insert("/with space".to_string(), 12.5);
        assert!(diff_against(&entries(), &edited).unwrap().is_empty());
    }

    #[test]
    fn test_find_editor_prefers_jmp_editor() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("JMP_EDITOR"))
            .returning(|_| Ok("myeditor --wait".to_string()));

        let (bin, args) = find_editor(&runtime).unwrap();
        assert_eq!(bin, PathBuf::from("myeditor"));
        assert_eq!(args, vec!["--wait".to_string()]);
    }

    #[test]
    fn test_find_editor_falls_through_to_editor_var() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("JMP_EDITOR"))
            .returning(|_| Err(VarError::NotPresent));
        runtime
            .expect_env_var()
            .with(eq("EDITOR"))
            .returning(|_| Ok("vi".to_string()));

        let (bin, args) = find_editor(&runtime).unwrap();
        assert_eq!(bin, PathBuf::from("vi"));
        assert!(args.is_empty());
    }

    #[test]
    fn test_find_editor_empty_value_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("JMP_EDITOR"))
            .returning(|_| Ok("   ".to_string()));
        assert!(find_editor(&runtime).is_err());
    }

    #[test]
    fn test_edit_with_touch_editor_changes_nothing() {
        // `touch` leaves the buffer untouched, so the diff is empty and the
        // database keeps its entries.
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("JMP_EDITOR"))
            .returning(|_| Ok("touch".to_string()));
        runtime.expect_exists().returning(|_| false);

        let mut db =
            PathFrecency::load(&runtime, std::path::Path::new("/data/jmp_dirs.json")).unwrap();
        db.visit("/old/path".to_string());

        assert_eq!(edit(&runtime, &mut db).unwrap(), Outcome::Success);
        assert_eq!(db.items_with_frecency().len(), 1);
    }
}
