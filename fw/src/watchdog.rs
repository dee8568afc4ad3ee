//! Host dead-man watchdog.
//!
//! Armed by a watchdog write from the host; every frame received over
//! the link afterwards pushes the deadline out. When the deadline
//! passes the watchdog requests a host reset, burning one retry per
//! firing. With no retries left it disarms itself rather than reset
//! the host forever.
//!
//! The watchdog never fires while a graceful-shutdown notification is
//! awaiting its acknowledgement; a host that is busy powering itself
//! off stops talking on the link and must not be reset for it.

use boardlink::watchdog::WatchdogPacket;

const US_PER_S: u64 = 1_000_000;

pub struct Watchdog {
    enabled: bool,
    timeout_s: u16,
    max_retries: u16,
    retries_left: u16,
    deadline_us: u64,
}

impl Watchdog {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            timeout_s: 0,
            max_retries: 0,
            retries_left: 0,
            deadline_us: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.enabled
    }

    fn arm(&mut self, now_us: u64) {
        self.deadline_us = now_us.saturating_add(self.timeout_s as u64 * US_PER_S);
    }

    /// Push the deadline out. Called for every frame the host sends.
    pub fn note_host_message(&mut self, now_us: u64) {
        if self.enabled {
            self.arm(now_us);
        }
    }

    /// Apply a watchdog request and produce the response.
    ///
    /// Reads report the current configuration untouched. Writes replace
    /// it wholesale and refill the retry budget; arming with a zero
    /// timeout is refused since it could never be fed in time.
    pub fn handle_request(&mut self, req: &WatchdogPacket, now_us: u64) -> WatchdogPacket {
        let mut success = true;
        if req.write {
            if req.enable && req.timeout_s == 0 {
                success = false;
            } else {
                self.timeout_s = req.timeout_s;
                self.max_retries = req.max_retries;
                self.retries_left = req.max_retries;
                self.enabled = req.enable;
                if self.enabled {
                    self.arm(now_us);
                }
            }
        }
        WatchdogPacket {
            write: req.write,
            enable: self.enabled,
            success,
            timeout_s: self.timeout_s,
            max_retries: self.max_retries,
        }
    }

    /// Service the watchdog from the periodic tick. Returns true when
    /// the host should be reset.
    ///
    /// Each firing either burns a retry and re-arms for a full period,
    /// or, with the budget exhausted, disarms the watchdog. Either way
    /// a missed deadline produces exactly one reset request.
    pub fn tick(&mut self, now_us: u64, suppress: bool) -> bool {
        if !self.enabled || suppress || now_us < self.deadline_us {
            return false;
        }
        if self.retries_left > 0 {
            self.retries_left -= 1;
            self.arm(now_us);
        } else {
            self.enabled = false;
        }
        true
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}
