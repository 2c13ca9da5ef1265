//! Exit-code protocol shared between the binary and the shell functions
//! emitted by `jmp init`.
//!
//! The plain codes (0/1) are what a human sees when running `jmp` directly.
//! When the wrapping shell function sets [`EXTENDED_EXITCODES_ENV`], the
//! extended codes let it distinguish "print this output" from "cd to this
//! output" without parsing anything.

/// Environment variable that switches the process to extended exit codes.
pub const EXTENDED_EXITCODES_ENV: &str = "__JMP_EXTENDED_EXITCODES";

// Arbitrarily chosen, high enough to stay clear of codes the delegated
// commands (editors, filter programs) are likely to return.
pub const EXIT_SUCCESS: i32 = 90;
pub const EXIT_SUCCESS_DIR: i32 = 91;
pub const EXIT_ERROR: i32 = 92;
pub const EXIT_ERROR_NO_INPUT: i32 = 93;

/// What a command invocation amounted to, from the shell function's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Informational output was printed; the shell should echo it.
    Success,
    /// A directory was printed; the shell should cd to it.
    SuccessDirectory,
    /// Something went wrong and output (if any) should be shown.
    Error,
    /// The user selected nothing; fail quietly.
    ErrorNoInput,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success | Outcome::SuccessDirectory => 0,
            Outcome::Error | Outcome::ErrorNoInput => 1,
        }
    }

    pub fn extended_exit_code(self) -> i32 {
        match self {
            Outcome::Success => EXIT_SUCCESS,
            Outcome::SuccessDirectory => EXIT_SUCCESS_DIR,
            Outcome::Error => EXIT_ERROR,
            Outcome::ErrorNoInput => EXIT_ERROR_NO_INPUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_exit_codes_collapse() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::SuccessDirectory.exit_code(), 0);
        assert_eq!(Outcome::Error.exit_code(), 1);
        assert_eq!(Outcome::ErrorNoInput.exit_code(), 1);
    }

    #[test]
    fn test_extended_exit_codes_are_distinct() {
        let codes = [
            Outcome::Success.extended_exit_code(),
            Outcome::SuccessDirectory.extended_exit_code(),
            Outcome::Error.extended_exit_code(),
            Outcome::ErrorNoInput.extended_exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
