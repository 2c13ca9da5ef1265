//! The persisted directory database: a frecency index specialized for
//! paths, stored as a JSON document in the user's data directory.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::frecency::Frecency;
use crate::matcher::{
    CaseInsensitiveMatcher, ExactMatcher, Matcher, PathComponentMatcher, SubstringMatcher,
};
use crate::runtime::Runtime;

pub const DB_FILE_NAME: &str = "jmp_dirs.json";

// Remember 500 directories total.
const MAX_TRACKED_DIRS: usize = 500;

pub struct PathFrecency {
    frecency: Frecency<String>,
    path: PathBuf,
}

/// A set of edits to apply to the database, produced by `jmp edit`.
#[derive(Debug, Default, PartialEq)]
pub struct Diff {
    pub additions: Vec<(String, f64)>,
    pub removals: Vec<String>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

impl PathFrecency {
    /// Load the database at `path`, treating a missing file as empty.
    #[tracing::instrument(skip(runtime, path))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let frecency = if runtime.exists(path) {
            let content = runtime
                .read_to_string(path)
                .with_context(|| format!("could not read database at {}", path.display()))?;
            if content.trim().is_empty() {
                Frecency::new(MAX_TRACKED_DIRS)
            } else {
                serde_json::from_str(&content).with_context(|| {
                    format!("database at {} is not valid JSON", path.display())
                })?
            }
        } else {
            Frecency::new(MAX_TRACKED_DIRS)
        };

        Ok(PathFrecency {
            frecency,
            path: path.to_path_buf(),
        })
    }

    /// Persist the database atomically: serialize to a pid-suffixed sibling
    /// file, then rename it over the database path.
    pub fn save<R: Runtime>(&self, runtime: &R) -> Result<()> {
        let fname = self
            .path
            .file_name()
            .context("database path has no file name component")?;
        let dir = self
            .path
            .parent()
            .context("database path has no parent directory")?;
        let tmp_path = dir.join(format!(
            ".{}.{}",
            fname.to_string_lossy(),
            std::process::id()
        ));

        let serialized = serde_json::to_string(&self.frecency)
            .context("could not serialize database")?;
        runtime
            .write(&tmp_path, serialized.as_bytes())
            .with_context(|| format!("could not write {}", tmp_path.display()))?;
        runtime
            .rename(&tmp_path, &self.path)
            .with_context(|| format!("could not atomically replace {}", self.path.display()))
    }

    pub fn visit(&mut self, dir: String) {
        self.frecency.visit(dir);
    }

    pub fn remove(&mut self, dir: &str) -> bool {
        self.frecency.remove(&dir.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.frecency.is_empty()
    }

    /// If the query names a directory that actually exists (relative to
    /// `cwd`, or absolute), record a visit to its canonical form. This makes
    /// `z some/subdir` behave like `cd` for real paths that were never
    /// jumped to before.
    pub fn maybe_add_relative_to<R: Runtime>(&mut self, runtime: &R, cwd: &Path, query: &str) {
        let candidate = if Path::new(query).is_absolute() {
            PathBuf::from(query)
        } else {
            cwd.join(query)
        };
        if runtime.is_dir(&candidate) {
            let resolved = runtime
                .canonicalize(&candidate)
                .unwrap_or_else(|_| candidate.clone());
            debug!("adding existing directory {}", resolved.display());
            self.visit(resolved.to_string_lossy().into_owned());
        }
    }

    /// Raw entries ordered by descending score.
    pub fn items_with_frecency(&self) -> Vec<(String, f64)> {
        self.frecency
            .items_with_scores()
            .into_iter()
            .map(|(k, s)| (k.clone(), s))
            .collect()
    }

    /// Entries ordered by descending score, normalized into [0, 1].
    pub fn items_with_normalized_frecency(&self) -> Vec<(String, f64)> {
        self.frecency
            .normalized_items()
            .into_iter()
            .map(|(k, s)| (k.clone(), s))
            .collect()
    }

    /// Rank stored directories against a search term.
    ///
    /// Matchers form a priority stack: every path matched by a
    /// higher-priority matcher outranks every path first matched by a lower
    /// one, so an exact match always wins regardless of frecency. Within a
    /// tier, the matcher score is blended with normalized frecency so that
    /// frequently used directories come first among equally good matches.
    /// Stored paths that no longer exist as directories are dropped from
    /// the result and removed from the database.
    pub fn directory_matches<R: Runtime>(&mut self, runtime: &R, query: &str) -> Vec<(String, f64)> {
        let exact = ExactMatcher;
        let substring = SubstringMatcher;
        let ci_exact = CaseInsensitiveMatcher::new(&exact);
        let component = PathComponentMatcher::new(&substring);
        let ci_substring = CaseInsensitiveMatcher::new(&substring);
        let matchers: [&dyn Matcher; 5] =
            [&exact, &ci_exact, &component, &substring, &ci_substring];

        let mut dead = Vec::new();
        let mut matches = Vec::new();
        for (path, norm) in self.items_with_normalized_frecency() {
            let hit = matchers
                .iter()
                .enumerate()
                .find_map(|(tier, m)| m.matches(&path, query).map(|v| (tier, v)));
            let Some((tier, score)) = hit else { continue };
            if !runtime.is_dir(Path::new(&path)) {
                debug!("dropping dead directory {}", path);
                dead.push(path);
                continue;
            }
            matches.push((tier, path, score * (0.5 + 0.5 * norm)));
        }
        for path in dead {
            self.frecency.remove(&path);
        }

        // Deterministic order: tier, then blended score descending, then path.
        matches.sort_unstable_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.2.total_cmp(&a.2))
                .then_with(|| a.1.cmp(&b.1))
        });
        matches.into_iter().map(|(_, path, score)| (path, score)).collect()
    }

    /// Apply an edit diff: removals first, then weighted additions.
    pub fn apply_diff(&mut self, diff: Diff) {
        for removal in diff.removals {
            debug!("edit: removing {}", removal);
            self.frecency.remove(&removal);
        }
        for (path, weight) in diff.additions {
            debug!("edit: setting {} to {}", path, weight);
            self.frecency.set_score(path, weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn db_at(path: &str) -> PathFrecency {
        PathFrecency {
            frecency: Frecency::new(MAX_TRACKED_DIRS),
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let db = PathFrecency::load(&runtime, Path::new("/data/jmp/jmp_dirs.json")).unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("{not json".to_string()));

        let res = PathFrecency::load(&runtime, Path::new("/data/jmp/jmp_dirs.json"));
        assert!(res.is_err());
    }

    #[test]
    fn test_load_round_trips_saved_content() {
        let mut db = db_at("/data/jmp/jmp_dirs.json");
        db.visit("/home/user/src".to_string());
        let serialized = serde_json::to_string(&db.frecency).unwrap();

        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(serialized.clone()));

        let loaded = PathFrecency::load(&runtime, Path::new("/data/jmp/jmp_dirs.json")).unwrap();
        assert_eq!(
            loaded.items_with_frecency()[0].0,
            "/home/user/src".to_string()
        );
    }

    #[test]
    fn test_save_writes_temp_then_renames() {
        let db = db_at("/data/jmp/jmp_dirs.json");
        let tmp = PathBuf::from(format!("/data/jmp/.jmp_dirs.json.{}", std::process::id()));

        let mut runtime = MockRuntime::new();
        runtime
            .expect_write()
            .with(eq(tmp.clone()), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .with(eq(tmp), eq(PathBuf::from("/data/jmp/jmp_dirs.json")))
            .times(1)
            .returning(|_, _| Ok(()));

        db.save(&runtime).unwrap();
    }

    #[test]
    fn test_directory_matches_prefers_exact() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| true);

        let mut db = db_at("/data/jmp/jmp_dirs.json");
        // "/tmp/proj" is visited often; the literal query "proj" rarely.
        db.visit("/tmp/proj".to_string());
        db.visit("/tmp/proj".to_string());
        db.visit("/tmp/proj".to_string());
        db.visit("proj".to_string());

        let matches = db.directory_matches(&runtime, "proj");
        assert_eq!(matches[0].0, "proj");
    }

    #[test]
    fn test_directory_matches_frecency_breaks_ties() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| true);

        let mut db = db_at("/data/jmp/jmp_dirs.json");
        db.visit("/a/proj".to_string());
        db.visit("/b/proj".to_string());
        db.visit("/b/proj".to_string());

        let matches = db.directory_matches(&runtime, "proj");
        assert_eq!(matches[0].0, "/b/proj");
        assert_eq!(matches[1].0, "/a/proj");
    }

    #[test_log::test]
    fn test_directory_matches_drops_dead_directories() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_dir()
            .returning(|p| p != Path::new("/gone/proj"));

        let mut db = db_at("/data/jmp/jmp_dirs.json");
        db.visit("/gone/proj".to_string());
        db.visit("/here/proj".to_string());

        let matches = db.directory_matches(&runtime, "proj");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0, "/here/proj");
        // The dead entry is removed from the database itself.
        assert_eq!(db.items_with_frecency().len(), 1);
    }

    #[test]
    fn test_directory_matches_no_match() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| true);

        let mut db = db_at("/data/jmp/jmp_dirs.json");
        db.visit("/home/user/src".to_string());

        assert!(db.directory_matches(&runtime, "zzz").is_empty());
    }

    #[test]
    fn test_maybe_add_relative_to_existing_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_dir()
            .with(eq(PathBuf::from("/home/user/sub")))
            .returning(|_| true);
        runtime
            .expect_canonicalize()
            .returning(|p| Ok(p.to_path_buf()));

        let mut db = db_at("/data/jmp/jmp_dirs.json");
        db.maybe_add_relative_to(&runtime, Path::new("/home/user"), "sub");
        assert_eq!(db.items_with_frecency()[0].0, "/home/user/sub");
    }

    #[test]
    fn test_maybe_add_relative_to_missing_dir() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| false);

        let mut db = db_at("/data/jmp/jmp_dirs.json");
        db.maybe_add_relative_to(&runtime, Path::new("/home/user"), "nope");
        assert!(db.is_empty());
    }

    #[test]
    fn test_apply_diff() {
        let mut db = db_at("/data/jmp/jmp_dirs.json");
        db.visit("/old".to_string());
        db.visit("/kept".to_string());

        db.apply_diff(Diff {
            additions: vec![("/new".to_string(), 42.0)],
            removals: vec!["/old".to_string()],
        });

        let items: Vec<String> = db.items_with_frecency().into_iter().map(|(p, _)| p).collect();
        assert!(items.contains(&"/new".to_string()));
        assert!(items.contains(&"/kept".to_string()));
        assert!(!items.contains(&"/old".to_string()));
    }
}
