//! Process exit codes
//!
//! Usage errors (exit code 2) are reported by clap before any command runs.

/// Exit status of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation completed
    Success = 0,
    /// Operation failed or credentials could not be resolved
    Failure = 1,
}

impl ExitCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_u8())
    }
}
