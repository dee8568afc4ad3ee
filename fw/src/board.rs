//! Hardware access traits.
//!
//! The dispatch loop never touches a peripheral directly; it goes
//! through [`Board`] for sensors and power control and [`FrameTx`] for
//! the UART transmit path. Firmware implements these over its HAL,
//! tests implement them over plain structs.

use boardlink::Frame;

/// Carrier-board peripherals as seen by the dispatch loop.
pub trait Board {
    /// Read one external NTC channel in degrees Celsius. `None` when
    /// the conversion failed or the channel is unpopulated.
    fn ntc_celsius(&mut self, channel: usize) -> Option<f32>;

    /// Read the controller's own die temperature.
    fn mcu_celsius(&mut self) -> f32;

    /// Current fan 1 PWM duty as a 0.0..=1.0 fraction.
    fn fan_duty(&self) -> f32;

    /// Apply a new fan 1 PWM duty. Returns false when the hardware
    /// rejected the value.
    fn set_fan_duty(&mut self, duty: f32) -> bool;

    /// Sample the host's run-control line.
    fn is_host_on(&self) -> bool;

    /// Power the host back up after it was shut down.
    fn power_host_on(&mut self);

    /// Pulse the host's reset line.
    fn pulse_host_reset(&mut self);

    /// Cut the host power rails for a graceful power-down.
    fn power_down_rails(&mut self);
}

/// Outgoing frame path back to the host.
pub trait FrameTx {
    fn send(&mut self, frame: &Frame);
}
