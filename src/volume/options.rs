//! Export configuration

/// Switches that shape an export run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Print the directory dump of page 0 to stdout before copying
    pub verbose_dump: bool,
    /// Show a per-page progress bar on stderr
    pub show_progress: bool,
}

impl ExportOptions {
    pub fn new(verbose_dump: bool, show_progress: bool) -> Self {
        ExportOptions { verbose_dump, show_progress }
    }
}
