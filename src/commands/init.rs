use anyhow::{Result, bail};

use crate::outcome::Outcome;
use crate::shells::{SUPPORTED_SHELLS, from_name};

/// Print the init script for `shell` to stdout.
pub fn init(shell: &str) -> Result<Outcome> {
    match from_name(shell) {
        Some(s) => {
            println!("{}", s.init_script());
            Ok(Outcome::Success)
        }
        None => bail!(
            "unsupported shell '{}': expected one of {}",
            shell,
            SUPPORTED_SHELLS.join(", ")
        ),
    }
}
