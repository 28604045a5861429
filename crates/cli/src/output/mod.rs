//! Output formatting for human-readable terminal output

mod formatter;

pub use formatter::Formatter;

/// Output configuration derived from global CLI flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
    /// Suppress everything except errors
    pub quiet: bool,
}
