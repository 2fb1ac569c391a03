//! Host-level tests for the NEC codec.

use ir_kit::nec::{self, NecMessage};
use ir_kit::pulse::{Pulse, PulseTrain};

/// The canonical captured repeat frame: inter-frame gap, leader burst,
/// repeat space, stop burst.
fn repeat_train() -> PulseTrain {
    PulseTrain::from_slice(&[
        Pulse::space(40_000),
        Pulse::mark(9_000),
        Pulse::space(2_250),
        Pulse::mark(562),
    ])
    .expect("4 pulses fit")
}

fn rebuild_with(train: &PulseTrain, index: usize, replacement: Pulse) -> PulseTrain {
    let mut pulses: Vec<Pulse> = train.iter().collect();
    pulses[index] = replacement;
    PulseTrain::from_slice(&pulses).expect("same length")
}

#[test]
fn encode_concrete_scenario() {
    let train = nec::encode([0x00, 0xFF, 0xFF, 0x00]);
    assert_eq!(train.len(), 67);
    assert_eq!(train.get(0), Some(Pulse::mark(9_000)));
    assert_eq!(train.get(1), Some(Pulse::space(4_500)));
    assert_eq!(train.last(), Some(Pulse::mark(562)));
    assert_eq!(nec::decode(&train), Some([0x00, 0xFF, 0xFF, 0x00]));
}

#[test]
fn encode_alternates_marks_and_spaces() {
    let train = nec::encode([0x12, 0x34, 0x56, 0x78]);
    assert_eq!(train.len(), 67);
    for (index, pulse) in train.iter().enumerate() {
        // Even positions are marks, odd positions spaces.
        assert_eq!(pulse.is_mark(), index % 2 == 0, "pulse {index}");
    }
}

#[test]
fn roundtrip_structured_payloads() {
    for byte in [0x00, 0x01, 0x55, 0x80, 0xAA, 0xF7, 0xFF] {
        for payload in [
            [byte, 0, 0, 0],
            [0, byte, 0, 0],
            [0, 0, byte, 0],
            [0, 0, 0, byte],
            [byte, !byte, byte, !byte],
            [byte; 4],
        ] {
            assert_eq!(nec::decode(&nec::encode(payload)), Some(payload), "{payload:02X?}");
        }
    }
}

#[test]
fn roundtrip_pseudo_random_sweep() {
    // Deterministic LCG sweep standing in for "every possible payload".
    let mut state: u32 = 0x2026_0805;
    for _ in 0..2_000 {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let payload = state.to_be_bytes();
        assert_eq!(nec::decode(&nec::encode(payload)), Some(payload), "{payload:02X?}");
    }
}

#[test]
fn leader_out_of_tolerance_is_rejected() {
    let train = nec::encode([0x00, 0xFF, 0xFF, 0x00]);
    // 12000µs burst: outside [7200, 10800], and no later pulse qualifies.
    let wide = rebuild_with(&train, 0, Pulse::mark(12_000));
    assert_eq!(nec::decode(&wide), None);

    let narrow = rebuild_with(&train, 0, Pulse::mark(7_000));
    assert_eq!(nec::decode(&narrow), None);
}

#[test]
fn leader_is_found_past_leading_noise() {
    // A leading gap space (as capture produces) must not confuse the scan.
    let encoded = nec::encode([0xA5, 0x5A, 0x0F, 0xF0]);
    let mut pulses = vec![Pulse::space(45_000)];
    pulses.extend(encoded.iter());
    let train = PulseTrain::from_slice(&pulses).expect("68 pulses fit");
    assert_eq!(nec::decode(&train), Some([0xA5, 0x5A, 0x0F, 0xF0]));
}

#[test]
fn missing_header_space_is_rejected() {
    let train = nec::encode([0x00, 0xFF, 0xFF, 0x00]);
    let broken = rebuild_with(&train, 1, Pulse::space(2_000));
    assert_eq!(nec::decode(&broken), None);
}

#[test]
fn truncated_frames_are_rejected() {
    // Fewer than 32 decodable bits must fail, never partially decode.
    let full = nec::encode([0xC3, 0x3C, 0x99, 0x66]);
    for keep in [0, 1, 2, 10, 30, 50, 65, 66] {
        let pulses: Vec<Pulse> = full.iter().take(keep).collect();
        let train = PulseTrain::from_slice(&pulses).expect("subset fits");
        assert_eq!(nec::decode(&train), None, "{keep} pulses");
    }
}

#[test]
fn bad_bit_space_aborts_decode() {
    let train = nec::encode([0x00, 0x00, 0x00, 0x00]);
    // Pulse 5 is the space of the second bit; 3500µs is in no bit window.
    let broken = rebuild_with(&train, 5, Pulse::space(3_500));
    assert_eq!(nec::decode(&broken), None);
}

#[test]
fn stop_bit_must_be_short_mark() {
    let train = nec::encode([0x01, 0x02, 0x03, 0x04]);

    // Dropping the stop bit loses the frame.
    let pulses: Vec<Pulse> = train.iter().take(train.len() - 1).collect();
    let missing = PulseTrain::from_slice(&pulses).expect("subset fits");
    assert_eq!(nec::decode(&missing), None);

    // The stop bit is the final carrier burst; a space there is malformed.
    let inverted = rebuild_with(&train, 66, Pulse::space(562));
    assert_eq!(nec::decode(&inverted), None);

    // A burst of the wrong length is malformed too.
    let long = rebuild_with(&train, 66, Pulse::mark(1_500));
    assert_eq!(nec::decode(&long), None);
}

#[test]
fn empty_train_is_rejected() {
    assert_eq!(nec::decode(&PulseTrain::new()), None);
    assert!(!nec::is_repeat(&PulseTrain::new()));
}

#[test]
fn canonical_repeat_is_detected() {
    assert!(nec::is_repeat(&repeat_train()));
}

#[test]
fn repeat_requires_exactly_four_pulses() {
    let three = PulseTrain::from_slice(&[Pulse::mark(9_000), Pulse::space(2_250), Pulse::mark(562)])
        .expect("3 pulses fit");
    assert!(!nec::is_repeat(&three));

    let mut pulses: Vec<Pulse> = repeat_train().iter().collect();
    pulses.push(Pulse::space(562));
    let five = PulseTrain::from_slice(&pulses).expect("5 pulses fit");
    assert!(!nec::is_repeat(&five));

    // A full data frame is never a repeat.
    assert!(!nec::is_repeat(&nec::encode([0x00, 0xFF, 0xFF, 0x00])));
}

#[test]
fn repeat_timing_windows_are_enforced() {
    let canonical = repeat_train();

    let slow_leader = rebuild_with(&canonical, 1, Pulse::mark(11_000));
    assert!(!nec::is_repeat(&slow_leader));

    let wide_space = rebuild_with(&canonical, 2, Pulse::space(3_200));
    assert!(!nec::is_repeat(&wide_space));

    let long_stop = rebuild_with(&canonical, 3, Pulse::mark(900));
    assert!(!nec::is_repeat(&long_stop));

    // Same shape, but the total duration is below the 12ms floor.
    let compressed = rebuild_with(&canonical, 0, Pulse::space(100));
    assert_eq!(compressed.total_micros(), 11_912);
    assert!(!nec::is_repeat(&compressed));
}

#[test]
fn repeat_frame_does_not_decode() {
    assert_eq!(nec::decode(&repeat_train()), None);
}

/// The per-bit long-space window (1687µs ±25%) and the repeat-space window
/// (2500µs ±500) overlap on [2000, 2108] without agreeing: a 2050µs space
/// reads as a 1 bit *and* as a repeat space, while the nominal 2250µs
/// repeat space is in neither bit window. Kept as the protocol tables give
/// it rather than reconciled.
#[test]
fn bit_and_repeat_space_windows_overlap() {
    // 2050µs as the space of the first bit of an otherwise all-zero frame:
    // that bit decodes as 1.
    let train = nec::encode([0x00, 0x00, 0x00, 0x00]);
    let overlapping = rebuild_with(&train, 3, Pulse::space(2_050));
    assert_eq!(nec::decode(&overlapping), Some([0x80, 0x00, 0x00, 0x00]));

    // The same duration is also a valid repeat space.
    let repeat = rebuild_with(&repeat_train(), 2, Pulse::space(2_050));
    assert!(nec::is_repeat(&repeat));

    // The nominal repeat space is not a valid bit space.
    let nominal = rebuild_with(&train, 3, Pulse::space(2_250));
    assert_eq!(nec::decode(&nominal), None);
}

#[test]
fn message_standard_nec() {
    let message = NecMessage::from_payload([0x00, 0xFF, 0x44, 0xBB]).expect("valid frame");
    assert_eq!(message, NecMessage { addr: 0x0000, cmd: 0x44 });
    assert_eq!(message.to_payload(), [0x00, 0xFF, 0x44, 0xBB]);
}

#[test]
fn message_extended_nec() {
    // Address bytes that are not complements carry a 16-bit address.
    let message = NecMessage::from_payload([0x34, 0x12, 0x16, 0xE9]).expect("valid frame");
    assert_eq!(message, NecMessage { addr: 0x1234, cmd: 0x16 });
    assert_eq!(message.to_payload(), [0x34, 0x12, 0x16, 0xE9]);
}

#[test]
fn message_bad_command_complement() {
    assert_eq!(NecMessage::from_payload([0x00, 0xFF, 0x44, 0x44]), None);
    assert_eq!(NecMessage::from_payload([0x12, 0x34, 0x00, 0x00]), None);
}

#[test]
fn message_roundtrips_through_codec() {
    let message = NecMessage { addr: 0x00, cmd: 0x19 };
    let train = nec::encode(message.to_payload());
    let payload = nec::decode(&train).expect("clean frame");
    assert_eq!(NecMessage::from_payload(payload), Some(message));
}
