//! Fan tachometer.
//!
//! The tach line toggles once per revolution; edges are counted from
//! the pin interrupt and folded into an RPM figure when the one-second
//! window timer elapses.

pub struct Tachometer {
    edges: u16,
    rpm: u16,
}

impl Tachometer {
    pub const fn new() -> Self {
        Self { edges: 0, rpm: 0 }
    }

    /// Count one tach edge. Interrupt context.
    pub fn on_edge(&mut self) {
        self.edges = self.edges.saturating_add(1);
    }

    /// Close the current window and start the next one.
    pub fn on_window_elapsed(&mut self) -> u16 {
        self.rpm = self.edges.saturating_mul(60);
        self.edges = 0;
        self.rpm
    }

    /// RPM from the most recently closed window.
    pub fn rpm(&self) -> u16 {
        self.rpm
    }
}

impl Default for Tachometer {
    fn default() -> Self {
        Self::new()
    }
}
