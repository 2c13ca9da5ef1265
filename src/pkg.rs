//! The packaging descriptor: a declarative record telling a package
//! manager how to fetch, verify, and build/install this tool.
//!
//! The repository ships its own descriptor under `dist/jmp.toml`. This
//! module validates descriptors and can run their install step; fetching
//! the source archive and verifying the fetched bytes against the declared
//! checksum are the consuming package manager's job, not ours.

use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::runtime::Runtime;

/// Placeholder in the install command replaced by the destination prefix.
pub const PREFIX_VAR: &str = "{prefix}";
/// Placeholder in the archive URL replaced by the package version.
pub const VERSION_VAR: &str = "{version}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub package: PackageSection,
    pub source: SourceSection,
    pub build: BuildSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSection {
    /// Unique within the package repository.
    pub name: String,
    pub description: String,
    pub homepage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSection {
    pub version: String,
    /// Versioned source-archive URL; may reference `{version}`.
    pub archive: String,
    /// Hex sha256 digest of the archive bytes at `archive`.
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSection {
    /// Tools required only at build time, resolved by the host before the
    /// install command runs.
    #[serde(default)]
    pub depends: Vec<String>,
    /// The single install command; arguments may reference `{prefix}`.
    pub command: Vec<String>,
}

impl Descriptor {
    #[tracing::instrument(skip(runtime, path))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("could not read descriptor at {}", path.display()))?;
        let descriptor: Descriptor = toml::from_str(&content)
            .with_context(|| format!("descriptor at {} is not valid TOML", path.display()))?;
        Ok(descriptor)
    }

    /// The archive URL with the version substituted in.
    pub fn archive_url(&self) -> String {
        self.source.archive.replace(VERSION_VAR, &self.source.version)
    }

    /// Structural validation of a single descriptor.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.package.name.is_empty() {
            problems.push("package.name is empty".to_string());
        } else if !self
            .package
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            problems.push(format!(
                "package.name '{}' may only contain [a-z0-9_-]",
                self.package.name
            ));
        }

        if self.package.description.is_empty() {
            problems.push("package.description is empty".to_string());
        }
        if !is_http_url(&self.package.homepage) {
            problems.push(format!(
                "package.homepage '{}' is not an http(s) URL",
                self.package.homepage
            ));
        }

        if self.source.version.is_empty() {
            problems.push("source.version is empty".to_string());
        }
        let url = self.archive_url();
        if !is_http_url(&url) {
            problems.push(format!("source.archive '{}' is not an http(s) URL", url));
        } else if !self.source.version.is_empty() && !url.contains(&self.source.version) {
            // The URL must be versioned so a release bump can't silently
            // point at the old archive.
            problems.push(format!(
                "source.archive '{}' does not contain version '{}'",
                url, self.source.version
            ));
        }

        if self.source.sha256.len() != 64
            || !self
                .source
                .sha256
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            problems.push("source.sha256 is not a lowercase 64-digit hex sha256".to_string());
        }

        if self.build.command.is_empty() {
            problems.push("build.command is empty".to_string());
        } else if !self.build.command.iter().any(|arg| arg.contains(PREFIX_VAR)) {
            problems.push(format!(
                "build.command never references {}; the install prefix could not take effect",
                PREFIX_VAR
            ));
        }
        if self.build.depends.iter().any(|d| d.is_empty()) {
            problems.push("build.depends contains an empty entry".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            bail!("invalid descriptor:\n  - {}", problems.join("\n  - "))
        }
    }

    /// Validate this descriptor as the successor of `previous`. A version
    /// change must come with a checksum change and vice versa; violations
    /// are rejected here, before any fetch would happen.
    pub fn validate_succession(&self, previous: &Descriptor) -> Result<()> {
        if self.package.name != previous.package.name {
            bail!(
                "descriptor renames the package from '{}' to '{}'",
                previous.package.name,
                self.package.name
            );
        }
        let version_changed = self.source.version != previous.source.version;
        let checksum_changed = self.source.sha256 != previous.source.sha256;
        if version_changed && !checksum_changed {
            bail!(
                "version changed ({} -> {}) but sha256 did not",
                previous.source.version,
                self.source.version
            );
        }
        if checksum_changed && !version_changed {
            bail!("sha256 changed but version '{}' did not", self.source.version);
        }
        Ok(())
    }

    /// The install command with `{prefix}` substituted.
    pub fn install_command(&self, prefix: &Path) -> Result<(String, Vec<String>)> {
        let prefix = prefix
            .to_str()
            .context("install prefix is not valid UTF-8")?;
        let mut argv = self
            .build
            .command
            .iter()
            .map(|arg| arg.replace(PREFIX_VAR, prefix));
        let program = argv.next().context("build.command is empty")?;
        Ok((program, argv.collect()))
    }

    /// Run the install command in `source_dir`, installing under `prefix`.
    /// Success or failure is whatever the underlying command reports;
    /// nothing here retries or interprets build output.
    #[tracing::instrument(skip(self, prefix, source_dir))]
    pub fn install(&self, prefix: &Path, source_dir: &Path) -> Result<()> {
        self.validate()?;
        let (program, args) = self.install_command(prefix)?;
        info!(
            "installing {} {} into {}",
            self.package.name,
            self.source.version,
            prefix.display()
        );
        debug!("running {} {:?} in {}", program, args, source_dir.display());

        let status = Command::new(&program)
            .args(&args)
            .current_dir(source_dir)
            .status()
            .with_context(|| format!("could not run build command '{}'", program))?;
        if !status.success() {
            bail!("build command '{}' failed: {}", program, status);
        }
        Ok(())
    }
}

/// Default install prefix when none is given: system-wide for root,
/// under the home directory otherwise.
pub fn default_prefix<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if runtime.is_privileged() {
        Ok(PathBuf::from("/usr/local"))
    } else {
        let home = runtime.home_dir().context("could not find home directory")?;
        Ok(home.join(".local"))
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
