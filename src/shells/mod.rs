//! Shell init scripts.
//!
//! `jmp init <shell>` prints a script the user evals from their rc file. It
//! wires a cd-hook that records visited directories and defines a `jmp_cd`
//! function (aliased to `z`) that interprets the extended exit codes.

mod bash;
mod fish;
mod zsh;

use bash::Bash;
use fish::Fish;
use zsh::Zsh;

use crate::outcome::{
    EXIT_ERROR, EXIT_ERROR_NO_INPUT, EXIT_SUCCESS, EXIT_SUCCESS_DIR, EXTENDED_EXITCODES_ENV,
};

pub const SUPPORTED_SHELLS: [&str; 3] = ["bash", "zsh", "fish"];

pub fn from_name(name: &str) -> Option<&'static dyn Shell> {
    match name {
        "bash" => Some(&Bash),
        "zsh" => Some(&Zsh),
        "fish" => Some(&Fish),
        _ => None,
    }
}

pub trait Shell: Sync {
    /// The init script template, with `%...%` placeholders for the exit
    /// code protocol.
    fn template(&self) -> &'static str;

    fn init_script(&self) -> String {
        self.template()
            .replace("%EXT_ENV%", EXTENDED_EXITCODES_ENV)
            .replace("%SUCCESS%", &EXIT_SUCCESS.to_string())
            .replace("%SUCCESS_DIR%", &EXIT_SUCCESS_DIR.to_string())
            .replace("%ERROR%", &EXIT_ERROR.to_string())
            .replace("%ERROR_NO_INPUT%", &EXIT_ERROR_NO_INPUT.to_string())
    }
}
