//! Infrared remote-control signal engine for the Raspberry Pi Pico.
//!
//! Capture raw, interrupt-timed pulses from a digital IR receiver, decode
//! and encode the NEC consumer protocol, and drive a 38 kHz carrier for
//! transmission. The pulse/train value types and the NEC codec are pure and
//! host-testable; the capture and transmit device abstractions require the
//! `pico1` or `pico2` feature.
#![no_std]

pub mod capture;
mod error;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod ir_capture;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod ir_transmit;
pub mod nec;
pub mod pulse;
pub mod transmit;

// Re-export commonly used items
pub use capture::{CaptureState, EdgeReport, IDLE_FLUSH_MICROS};
pub use error::{Error, Result};
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use ir_capture::{IrCapture, IrCaptureStatic};
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use ir_transmit::IrTransmitter;
pub use nec::NecMessage;
pub use pulse::{FlushReason, Pulse, PulseTrain};
pub use transmit::snap_pulse_lengths;
