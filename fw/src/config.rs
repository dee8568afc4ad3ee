//! Controller timing constants.

/// Watchdog service tick period.
pub const WATCHDOG_TICK_US: u64 = 100_000;

/// Tachometer edge-count window.
pub const TACHO_WINDOW_US: u64 = 1_000_000;

/// Build version reported over the link.
pub const VERSION: &str = concat!("boardlink-fw ", env!("CARGO_PKG_VERSION"));

/// Button press-duration thresholds.
///
/// A release before `bounce_us` is treated as switch bounce and
/// ignored. A release at or past `hard_reset_us` resets the host
/// immediately; anything between requests a graceful shutdown.
#[derive(Debug, Clone, Copy)]
pub struct ButtonThresholds {
    pub bounce_us: u64,
    pub hard_reset_us: u64,
}

impl Default for ButtonThresholds {
    fn default() -> Self {
        Self {
            bounce_us: 250_000,
            hard_reset_us: 3_000_000,
        }
    }
}
