use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::outcome::Outcome;
use crate::pkg::{Descriptor, default_prefix};
use crate::runtime::Runtime;

/// Validate a descriptor file, optionally against the descriptor it
/// supersedes.
#[tracing::instrument(skip(runtime, file, against))]
pub fn pkg_check<R: Runtime>(
    runtime: &R,
    file: &Path,
    against: Option<&Path>,
) -> Result<Outcome> {
    let descriptor = Descriptor::load(runtime, file)?;
    descriptor.validate()?;
    if let Some(previous_path) = against {
        let previous = Descriptor::load(runtime, previous_path)?;
        descriptor.validate_succession(&previous)?;
    }
    println!(
        "{} {} ok: {}",
        descriptor.package.name,
        descriptor.source.version,
        descriptor.archive_url()
    );
    Ok(Outcome::Success)
}

/// Run a descriptor's install command against a prefix.
#[tracing::instrument(skip(runtime, file, prefix, source_dir))]
pub fn pkg_install<R: Runtime>(
    runtime: &R,
    file: &Path,
    prefix: Option<PathBuf>,
    source_dir: &Path,
) -> Result<Outcome> {
    let descriptor = Descriptor::load(runtime, file)?;
    let prefix = match prefix {
        Some(p) => p,
        None => default_prefix(runtime)?,
    };
    descriptor.install(&prefix, source_dir)?;
    Ok(Outcome::Success)
}
