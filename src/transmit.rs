//! Pulse-length normalization for retransmission and comparison.

use crate::pulse::{Pulse, PulseTrain};

/// Rewrite every pulse duration to the nearest value in `canonical_micros`.
///
/// Useful for cleaning hardware jitter out of a captured train before
/// re-transmitting it or comparing it against an expected protocol frame.
/// Ties go to the earlier canonical entry; an empty canonical set returns
/// the train unchanged.
///
/// # Examples
/// ```
/// use ir_kit::nec::NEC_CANONICAL_MICROS;
/// use ir_kit::pulse::{Pulse, PulseTrain};
/// use ir_kit::transmit::snap_pulse_lengths;
///
/// let noisy = PulseTrain::from_slice(&[Pulse::mark(8_950), Pulse::space(4_531)])?;
/// let clean = snap_pulse_lengths(&noisy, &NEC_CANONICAL_MICROS);
/// assert_eq!(
///     clean.as_slice(),
///     &[Pulse::mark(9_000), Pulse::space(4_500)]
/// );
/// # Ok::<(), ir_kit::Error>(())
/// ```
#[must_use]
pub fn snap_pulse_lengths(train: &PulseTrain, canonical_micros: &[u32]) -> PulseTrain {
    if canonical_micros.is_empty() {
        return train.clone();
    }
    let mut snapped = PulseTrain::new();
    for pulse in train {
        let nearest = canonical_micros
            .iter()
            .copied()
            .min_by_key(|c| c.abs_diff(pulse.micros()))
            .unwrap_or(pulse.micros());
        // Same length as the input train: push cannot fail.
        let _ = snapped.push(Pulse::new(pulse.is_mark(), u64::from(nearest)));
    }
    snapped
}
