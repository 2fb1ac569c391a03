//! Pulse and pulse-train value types shared by the capture, codec, and
//! transmit modules.

use heapless::Vec;

use crate::{Error, Result};

/// Shortest duration ever stored in a [`Pulse`], in microseconds.
///
/// Anything the hardware reports below this is treated as a glitch and
/// rounded up.
pub const MIN_PULSE_MICROS: u32 = 50;

/// Longest duration ever stored in a [`Pulse`], in microseconds.
///
/// A pulse clamped to this value is inter-frame silence, not signal; see
/// [`Pulse::is_frame_gap`].
pub const MAX_PULSE_MICROS: u32 = 250_000;

/// Maximum number of pulses in a [`PulseTrain`] and in the capture buffer.
pub const PULSE_TRAIN_CAPACITY: usize = 128;

/// A single level interval on the IR line: mark (carrier on) or space
/// (carrier off), with its duration in microseconds.
///
/// Durations are clamped to `[MIN_PULSE_MICROS, MAX_PULSE_MICROS]` at
/// construction; the raw hardware reading is never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    is_mark: bool,
    micros: u32,
}

impl Pulse {
    /// Create a pulse from a raw duration reading, clamping it.
    #[must_use]
    pub fn new(is_mark: bool, raw_micros: u64) -> Self {
        let micros = raw_micros.clamp(u64::from(MIN_PULSE_MICROS), u64::from(MAX_PULSE_MICROS));
        Self {
            is_mark,
            micros: u32::try_from(micros).unwrap_or(MAX_PULSE_MICROS),
        }
    }

    /// A mark (carrier on) of the given raw duration.
    #[must_use]
    pub fn mark(raw_micros: u64) -> Self {
        Self::new(true, raw_micros)
    }

    /// A space (carrier off) of the given raw duration.
    #[must_use]
    pub fn space(raw_micros: u64) -> Self {
        Self::new(false, raw_micros)
    }

    #[must_use]
    pub const fn is_mark(self) -> bool {
        self.is_mark
    }

    #[must_use]
    pub const fn is_space(self) -> bool {
        !self.is_mark
    }

    /// Clamped duration in microseconds.
    #[must_use]
    pub const fn micros(self) -> u32 {
        self.micros
    }

    /// True when the duration hit the clamp ceiling, meaning the line was
    /// quiet between frames rather than carrying signal.
    #[must_use]
    pub const fn is_frame_gap(self) -> bool {
        self.micros == MAX_PULSE_MICROS
    }
}

/// Why a [`PulseTrain`] was cut where it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushReason {
    /// The line went quiet for at least the idle gap.
    Idle,
    /// The capture buffer filled; the train may be a partial frame.
    Overflow,
}

/// An ordered snapshot of pulses, taken atomically from the capture buffer
/// at flush time or built by the encoder. Never mutated after it is emitted.
///
/// # Examples
/// ```
/// use ir_kit::pulse::{Pulse, PulseTrain};
///
/// let mut train = PulseTrain::new();
/// train.push(Pulse::mark(9_000))?;
/// train.push(Pulse::space(4_500))?;
/// assert_eq!(train.len(), 2);
/// assert_eq!(train.total_micros(), 13_500);
/// # Ok::<(), ir_kit::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTrain {
    pulses: Vec<Pulse, PULSE_TRAIN_CAPACITY>,
}

impl PulseTrain {
    #[must_use]
    pub const fn new() -> Self {
        Self { pulses: Vec::new() }
    }

    /// Build a train from a slice of pulses.
    ///
    /// # Errors
    /// Returns [`Error::PulseTrainFull`] if the slice holds more than
    /// [`PULSE_TRAIN_CAPACITY`] pulses.
    pub fn from_slice(pulses: &[Pulse]) -> Result<Self> {
        let mut train = Self::new();
        for pulse in pulses {
            train.push(*pulse)?;
        }
        Ok(train)
    }

    /// Append a pulse.
    ///
    /// # Errors
    /// Returns [`Error::PulseTrainFull`] when the train is at capacity.
    pub fn push(&mut self, pulse: Pulse) -> Result<()> {
        self.pulses.push(pulse).map_err(|_| Error::PulseTrainFull)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.pulses.is_full()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Pulse> {
        self.pulses.get(index).copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<Pulse> {
        self.pulses.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pulse> + '_ {
        self.pulses.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Sum of every pulse duration in the train, in microseconds.
    #[must_use]
    pub fn total_micros(&self) -> u64 {
        self.pulses.iter().map(|p| u64::from(p.micros())).sum()
    }
}

impl From<Vec<Pulse, PULSE_TRAIN_CAPACITY>> for PulseTrain {
    fn from(pulses: Vec<Pulse, PULSE_TRAIN_CAPACITY>) -> Self {
        Self { pulses }
    }
}

impl<'a> IntoIterator for &'a PulseTrain {
    type Item = Pulse;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, Pulse>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pulses.iter().copied()
    }
}
