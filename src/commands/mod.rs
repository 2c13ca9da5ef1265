//! One function per CLI operation. Each is generic over [`Runtime`] and
//! returns the [`Outcome`] the exit-code protocol needs.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::db::DB_FILE_NAME;
use crate::runtime::Runtime;

mod edit;
mod import;
mod init;
mod jump;
mod pkg;
mod view;
mod visit;

pub use edit::edit;
pub use import::import;
pub use init::init;
pub use jump::{JumpOpts, jump};
pub use pkg::{pkg_check, pkg_install};
pub use view::view;
pub use visit::visit;

/// Resolve the database path, creating the containing directory. An
/// explicit data dir (flag or `JMP_HOME`) wins over the platform default.
pub fn database_path<R: Runtime>(runtime: &R, data_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => runtime
            .data_dir()
            .context("could not determine a data directory")?
            .join("jmp"),
    };
    runtime
        .create_dir_all(&dir)
        .with_context(|| format!("could not create data directory {}", dir.display()))?;
    Ok(dir.join(DB_FILE_NAME))
}
