//! Host-level tests for pulse-length normalization.

use ir_kit::nec::{self, NEC_CANONICAL_MICROS};
use ir_kit::pulse::{Pulse, PulseTrain};
use ir_kit::transmit::snap_pulse_lengths;

#[test]
fn snaps_each_duration_to_nearest_canonical() {
    let train = PulseTrain::from_slice(&[
        Pulse::mark(8_800),
        Pulse::space(4_601),
        Pulse::mark(555),
        Pulse::space(1_700),
    ])
    .expect("4 pulses fit");

    let snapped = snap_pulse_lengths(&train, &NEC_CANONICAL_MICROS);
    assert_eq!(
        snapped.as_slice(),
        &[
            Pulse::mark(9_000),
            Pulse::space(4_500),
            Pulse::mark(562),
            Pulse::space(1_687),
        ]
    );
}

#[test]
fn snapping_preserves_levels_and_length() {
    let train = nec::encode([0x5A, 0xA5, 0x0F, 0xF0]);
    let snapped = snap_pulse_lengths(&train, &[600, 1_700, 4_400, 9_100]);
    assert_eq!(snapped.len(), train.len());
    for (original, rewritten) in train.iter().zip(snapped.iter()) {
        assert_eq!(original.is_mark(), rewritten.is_mark());
    }
}

#[test]
fn ties_go_to_the_earlier_canonical_entry() {
    let train = PulseTrain::from_slice(&[Pulse::mark(600)]).expect("1 pulse fits");
    let snapped = snap_pulse_lengths(&train, &[500, 700]);
    assert_eq!(snapped.get(0), Some(Pulse::mark(500)));
}

#[test]
fn empty_canonical_set_returns_train_unchanged() {
    let train = nec::encode([0x01, 0xFE, 0x02, 0xFD]);
    let snapped = snap_pulse_lengths(&train, &[]);
    assert_eq!(snapped, train);
}

#[test]
fn empty_train_stays_empty() {
    let snapped = snap_pulse_lengths(&PulseTrain::new(), &NEC_CANONICAL_MICROS);
    assert!(snapped.is_empty());
}

#[test]
fn jittered_capture_normalizes_back_to_the_clean_encoding() {
    let payload = [0x00, 0xFF, 0x16, 0xE9];
    let clean = nec::encode(payload);

    // Deterministic jitter well inside every window boundary.
    let jitter = [-130_i64, 47, 99, -12, 135];
    let noisy: Vec<Pulse> = clean
        .iter()
        .enumerate()
        .map(|(index, pulse)| {
            let wobble = jitter[index % jitter.len()];
            let micros = i64::from(pulse.micros()) + wobble;
            Pulse::new(pulse.is_mark(), u64::try_from(micros).expect("positive"))
        })
        .collect();
    let noisy = PulseTrain::from_slice(&noisy).expect("67 pulses fit");

    // The noisy train still decodes, and snapping restores it exactly.
    assert_eq!(nec::decode(&noisy), Some(payload));
    assert_eq!(snap_pulse_lengths(&noisy, &NEC_CANONICAL_MICROS), clean);
}
