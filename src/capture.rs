//! The pulse capture state machine: buffer, glitch clamp, and flush policy.
//!
//! [`CaptureState`] is the lock-guarded core of the capture engine. It is
//! deliberately hardware-free (callers pass in timestamps) so the flush and
//! clamp behavior can be exercised on the host; the embassy wiring lives in
//! `IrCapture` (`pico1`/`pico2` builds).

use core::mem;

use heapless::Vec;

use crate::pulse::{FlushReason, PULSE_TRAIN_CAPACITY, Pulse, PulseTrain};

/// Quiet time on the line, in µs, after which a non-empty buffer is flushed.
///
/// This is a batching boundary, not a failure: NEC frames are separated by
/// far more than 5 ms of silence.
pub const IDLE_FLUSH_MICROS: u64 = 5_000;

/// What a single edge produced: at most one pulse, and at most one flushed
/// train when that pulse filled the buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeReport {
    pub pulse: Option<Pulse>,
    pub flushed: Option<(PulseTrain, FlushReason)>,
}

/// Capture-engine state shared between the edge path and the idle checker.
///
/// All methods are O(buffer length) or better and never wait; the caller
/// holds the one capture lock exactly for the duration of a call.
#[derive(Debug)]
pub struct CaptureState {
    buffer: Vec<Pulse, PULSE_TRAIN_CAPACITY>,
    last_edge_micros: u64,
    active_low: bool,
}

impl CaptureState {
    /// A fresh, empty engine state.
    ///
    /// `active_low` flips the reported pulse level for receivers that pull
    /// the line low while detecting carrier.
    #[must_use]
    pub const fn new(active_low: bool) -> Self {
        Self {
            buffer: Vec::new(),
            last_edge_micros: 0,
            active_low,
        }
    }

    /// Record one level transition at `now_micros`.
    ///
    /// The duration is the elapsed time since the previous edge, clamped by
    /// [`Pulse::new`]; recording also restarts the edge timer, which doubles
    /// as the idle-flush deadline. The pulse level is the level that just
    /// *ended*, XORed with the active-low flag.
    ///
    /// A pulse clamped to the ceiling is inter-frame silence: it is not
    /// buffered and not reported. The first edge after construction falls
    /// out this way naturally.
    pub fn on_edge(&mut self, now_micros: u64, ended_level_high: bool) -> EdgeReport {
        let elapsed = now_micros.saturating_sub(self.last_edge_micros);
        self.last_edge_micros = now_micros;

        let pulse = Pulse::new(ended_level_high ^ self.active_low, elapsed);
        if pulse.is_frame_gap() {
            return EdgeReport::default();
        }

        // The buffer cannot already be full: it is flushed the moment it
        // reaches capacity, below.
        let _ = self.buffer.push(pulse);
        let flushed = self
            .buffer
            .is_full()
            .then(|| (self.take_train(), FlushReason::Overflow));
        EdgeReport {
            pulse: Some(pulse),
            flushed,
        }
    }

    /// Periodic idle check: flush when the buffer is non-empty and the line
    /// has been quiet for at least [`IDLE_FLUSH_MICROS`].
    pub fn on_idle_tick(&mut self, now_micros: u64) -> Option<(PulseTrain, FlushReason)> {
        if self.buffer.is_empty() {
            return None;
        }
        let quiet = now_micros.saturating_sub(self.last_edge_micros);
        (quiet >= IDLE_FLUSH_MICROS).then(|| (self.take_train(), FlushReason::Idle))
    }

    /// Number of buffered-but-unflushed pulses.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    // Atomic snapshot-and-clear, under the caller's lock.
    fn take_train(&mut self) -> PulseTrain {
        PulseTrain::from(mem::take(&mut self.buffer))
    }
}
