use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::db::PathFrecency;
use crate::outcome::Outcome;
use crate::runtime::Runtime;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub considered: u64,
    pub visited: u64,
}

/// Import history from another autojump program. Only fasd is supported.
#[tracing::instrument(skip(runtime, db))]
pub fn import<R: Runtime>(runtime: &R, db: &mut PathFrecency, source: &str) -> Result<Outcome> {
    match source {
        "fasd" => {
            let stats = import_fasd(runtime, db)?;
            println!(
                "imported {} directories from fasd (out of {} entries in its db)",
                stats.visited, stats.considered
            );
            Ok(Outcome::Success)
        }
        other => bail!("unsupported import source '{}': only fasd is supported", other),
    }
}

/// Read fasd's data file and visit every entry that still is a directory.
fn import_fasd<R: Runtime>(runtime: &R, db: &mut PathFrecency) -> Result<ImportStats> {
    let data_path = match runtime.env_var("_FASD_DATA") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => runtime
            .home_dir()
            .context("could not find home directory")?
            .join(".fasd"),
    };

    let content = runtime
        .read_to_string(&data_path)
        .with_context(|| format!("could not open {} for import", data_path.display()))?;

    let mut stats = ImportStats::default();
    for line in content.lines() {
        // fasd lines look like: /some/path|rank|timestamp
        let Some(path) = line.split('|').next().filter(|p| !p.is_empty()) else {
            warn!("skipping malformed fasd line: {}", line);
            continue;
        };
        stats.considered += 1;

        if runtime.is_dir(Path::new(path)) {
            debug!("visiting {}", path);
            db.visit(path.to_string());
            stats.visited += 1;
        }
    }
    Ok(stats)
}
