//! Map configuration.

/// Settings threaded through a [`CaveMap`](crate::CaveMap) and its parser.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    /// Emit per-line and per-station diagnostics (at `debug` level).
    ///
    /// Summaries and warnings are logged regardless.
    pub debug: bool,
}
