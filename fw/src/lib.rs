//! Controller-side engine for the carrier-board link.
//!
//! Everything here is hardware-independent: pin and peripheral access
//! goes through the [`board::Board`] trait, frames leave through
//! [`board::FrameTx`], and time arrives as microsecond arguments. A
//! firmware image wires its HAL into those traits and drives
//! [`dispatch::Controller`] from its interrupt handlers and main loop.
//!
//! The split mirrors the interrupt model of the target: receive bytes,
//! button edges, tach edges and timer ticks are fed from interrupt
//! context and only touch small state (the frame assembler, atomic
//! deferred-action flags, counters); all responses and side effects
//! happen in [`dispatch::Controller::poll`] on the main loop.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod button;
pub mod config;
pub mod dispatch;
pub mod fan;
pub mod rx;
pub mod watchdog;
