//! Main controller loop.
//!
//! [`Controller`] is driven from two sides. Interrupt handlers call
//! the `on_*` methods: they assemble received bytes into frames, mark
//! deferred actions in atomic flags and count tach edges, but never
//! write to the link or touch power control. The main loop calls
//! [`Controller::poll`], which drains the deferred flags and then
//! handles at most one received frame, sending any response through
//! the supplied [`FrameTx`].

use core::sync::atomic::{AtomicBool, Ordering};

use boardlink::{fan_pwm, frame, ping, shutdown, temperature, version, Frame, Tag, FRAME_LEN};

use crate::board::{Board, FrameTx};
use crate::button::{ButtonClassifier, PressAction};
use crate::config::ButtonThresholds;
use crate::fan::Tachometer;
use crate::rx::FrameAssembler;
use crate::watchdog::Watchdog;

/// Work noted in interrupt context, performed in `poll`.
struct Deferred {
    shutdown_notify: AtomicBool,
    hard_reset: AtomicBool,
}

pub struct Controller<B: Board> {
    board: B,
    version: &'static str,
    assembler: FrameAssembler,
    ready: Option<Frame>,
    watchdog: Watchdog,
    button: ButtonClassifier,
    tacho: Tachometer,
    deferred: Deferred,
    /// A graceful-shutdown notification has been sent and the host has
    /// not yet acknowledged it.
    shutdown_pending: bool,
    version_offset: usize,
}

impl<B: Board> Controller<B> {
    pub fn new(board: B, version: &'static str, thresholds: ButtonThresholds) -> Self {
        Self {
            board,
            version,
            assembler: FrameAssembler::new(),
            ready: None,
            watchdog: Watchdog::new(),
            button: ButtonClassifier::new(thresholds),
            tacho: Tachometer::new(),
            deferred: Deferred {
                shutdown_notify: AtomicBool::new(false),
                hard_reset: AtomicBool::new(false),
            },
            shutdown_pending: false,
            version_offset: 0,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    /// UART receive interrupt: one byte off the wire.
    pub fn on_rx_byte(&mut self, byte: u8) {
        if let Some(f) = self.assembler.push(byte) {
            if self.ready.replace(f).is_some() {
                log::warn!("frame arrived before the previous one was handled, overwriting");
            }
        }
    }

    /// Button pin interrupt. `pressed` is the new level.
    ///
    /// A press while the host is off re-powers it instead of starting
    /// duration classification.
    pub fn on_button_edge(&mut self, pressed: bool, now_us: u64) {
        if pressed {
            if !self.board.is_host_on() {
                log::info!("button pressed with host off, powering host");
                self.board.power_host_on();
                return;
            }
            self.button.press(now_us);
        } else {
            match self.button.release(now_us) {
                PressAction::Bounce => {}
                PressAction::GracefulShutdown => {
                    self.deferred.shutdown_notify.store(true, Ordering::Relaxed);
                }
                PressAction::HardReset => {
                    self.deferred.hard_reset.store(true, Ordering::Relaxed);
                }
            }
        }
    }

    /// Fan tachometer pin interrupt.
    pub fn on_tach_edge(&mut self) {
        self.tacho.on_edge();
    }

    /// One-second tachometer window timer.
    pub fn on_tach_window(&mut self) {
        self.tacho.on_window_elapsed();
    }

    /// 100 ms watchdog service timer.
    pub fn on_watchdog_tick(&mut self, now_us: u64) {
        if self.watchdog.tick(now_us, self.shutdown_pending) {
            log::warn!("watchdog expired, scheduling host reset");
            self.deferred.hard_reset.store(true, Ordering::Relaxed);
        }
    }

    /// Main-loop service: deferred actions first, then at most one
    /// received frame.
    pub fn poll<T: FrameTx>(&mut self, now_us: u64, tx: &mut T) {
        if self.deferred.hard_reset.swap(false, Ordering::Relaxed) {
            log::warn!("resetting host");
            self.board.pulse_host_reset();
        }
        if self.deferred.shutdown_notify.swap(false, Ordering::Relaxed) {
            log::info!("requesting graceful host shutdown");
            let mut buf: Frame = [0u8; FRAME_LEN];
            shutdown::resp_pack(&mut buf, true);
            tx.send(&buf);
            self.shutdown_pending = true;
        }

        let Some(req) = self.ready.take() else {
            return;
        };
        // Any fully framed packet counts as a sign of life from the
        // host, registered tag or not.
        self.watchdog.note_host_message(now_us);
        let Some(tag) = frame::tag_of(&req) else {
            log::warn!("unrecognized tag 0x{:02x}, discarding frame", req[0]);
            return;
        };

        let mut resp: Frame = [0u8; FRAME_LEN];
        match tag {
            Tag::Ping => {
                ping::resp_pack(&mut resp, &req, true);
                tx.send(&resp);
            }
            Tag::Temperature => {
                let mut readings = temperature::Readings::default();
                let mut success = true;
                for ch in 0..temperature::NUM_EXTERNAL_SENSORS {
                    match self.board.ntc_celsius(ch) {
                        Some(t) => readings.external[ch] = t,
                        None => success = false,
                    }
                }
                readings.controller = self.board.mcu_celsius();
                readings.fan1_rpm = self.tacho.rpm();
                temperature::resp_pack(&mut resp, &readings, success);
                tx.send(&resp);
            }
            Tag::FanPwm => {
                let msg = fan_pwm::unpack(&req);
                // Only fan 1 is populated on this board.
                let mut success = msg.fan_id == 1;
                if success && msg.write {
                    success = self.board.set_fan_duty(msg.duty);
                }
                let duty = self.board.fan_duty();
                fan_pwm::resp_pack(&mut resp, msg.fan_id.max(1), msg.write, duty, success);
                tx.send(&resp);
            }
            Tag::Watchdog => {
                let pkt = boardlink::watchdog::unpack(&req);
                let reply = self.watchdog.handle_request(&pkt, now_us);
                boardlink::watchdog::resp_pack(&mut resp, &reply);
                tx.send(&resp);
            }
            Tag::Shutdown => {
                // Host acknowledgement; no reply.
                if self.shutdown_pending {
                    log::info!("host acknowledged shutdown, powering down rails");
                    self.shutdown_pending = false;
                    self.board.power_down_rails();
                }
            }
            Tag::Version => {
                let next = version::resp_pack(&mut resp, self.version.as_bytes(), self.version_offset);
                self.version_offset = if next >= self.version.len() { 0 } else { next };
                tx.send(&resp);
            }
        }
    }
}
