//! Pure NEC protocol codec: pulse train to bytes and back.
//!
//! [`decode`], [`is_repeat`], and [`encode`] are stateless and synchronous;
//! they may be called concurrently from any task for any number of trains.
//! Feed them trains flushed by the capture engine or built by hand.

use itertools::Itertools;

use crate::pulse::{Pulse, PulseTrain};

// Nominal NEC timings emitted by `encode`, in µs.
pub const LEADER_MARK_MICROS: u32 = 9_000;
pub const HEADER_SPACE_MICROS: u32 = 4_500;
pub const BIT_MARK_MICROS: u32 = 562;
pub const BIT0_SPACE_MICROS: u32 = 562;
pub const BIT1_SPACE_MICROS: u32 = 1_687;

/// Every duration a clean NEC frame contains, for
/// [`snap_pulse_lengths`](crate::transmit::snap_pulse_lengths).
pub const NEC_CANONICAL_MICROS: [u32; 4] = [
    BIT_MARK_MICROS,
    BIT1_SPACE_MICROS,
    HEADER_SPACE_MICROS,
    LEADER_MARK_MICROS,
];

// µs acceptance windows, inclusive on both ends. The repeat-space window and
// the long-space window overlap on [2000, 2108] but do not coincide; each is
// kept exactly as the protocol tables give it (see DESIGN.md).
const LEADER_MARK: (u32, u32) = (7_200, 10_800); // 9000 ±1800
const HEADER_SPACE: (u32, u32) = (3_900, 5_100); // 4500 ±600
const SHORT_PULSE: (u32, u32) = (400, 700); // one burst period, 562.5 nominal
const LONG_SPACE: (u32, u32) = (1_266, 2_108); // 1687 ±25%
const REPEAT_SPACE: (u32, u32) = (2_000, 3_000); // 2500 ±500
const REPEAT_TOTAL: (u64, u64) = (12_000, 120_000);

const PAYLOAD_BITS: u32 = 32;

#[inline]
fn inr(x: u32, r: (u32, u32)) -> bool {
    x >= r.0 && x <= r.1
}

fn short_mark(p: Pulse) -> bool {
    p.is_mark() && inr(p.micros(), SHORT_PULSE)
}

/// Decode a full 32-bit NEC frame from a captured pulse train.
///
/// Returns the four payload bytes, each packed most-significant bit first,
/// or `None` when the train is not a clean NEC frame. There is no partial
/// decode: any pulse outside its window aborts.
///
/// # Examples
/// ```
/// use ir_kit::nec;
///
/// let train = nec::encode([0x00, 0xFF, 0x16, 0xE9]);
/// assert_eq!(nec::decode(&train), Some([0x00, 0xFF, 0x16, 0xE9]));
/// ```
#[must_use]
pub fn decode(train: &PulseTrain) -> Option<[u8; 4]> {
    let pulses = train.as_slice();

    // Leader burst, then the header space somewhere after it.
    let leader = pulses
        .iter()
        .position(|p| p.is_mark() && inr(p.micros(), LEADER_MARK))?;
    let after_leader = pulses.get(leader + 1..)?;
    let header = after_leader
        .iter()
        .position(|p| p.is_space() && inr(p.micros(), HEADER_SPACE))?;

    // Stop bit: the frame must end in one final short burst.
    if !short_mark(train.last()?) {
        return None;
    }

    // Data bits ride in mark/space pairs after the header space.
    let mut value: u32 = 0;
    let mut count: u32 = 0;
    for (mark, space) in after_leader.get(header + 1..)?.iter().tuples() {
        if count == PAYLOAD_BITS {
            break;
        }
        if !short_mark(*mark) || !space.is_space() {
            return None;
        }
        let bit = if inr(space.micros(), LONG_SPACE) {
            1
        } else if inr(space.micros(), SHORT_PULSE) {
            0
        } else {
            return None;
        };
        value = (value << 1) | bit;
        count += 1;
    }
    (count == PAYLOAD_BITS).then(|| value.to_be_bytes())
}

/// True exactly for the NEC repeat frame: four pulses whose total duration
/// is plausible for a repeat, containing leader burst, repeat space, and a
/// final short burst.
///
/// The leading fourth pulse is the inter-frame gap, which arrives as an
/// ordinary space because it is shorter than the capture clamp ceiling.
#[must_use]
pub fn is_repeat(train: &PulseTrain) -> bool {
    if train.len() != 4 {
        return false;
    }
    let total = train.total_micros();
    if total < REPEAT_TOTAL.0 || total > REPEAT_TOTAL.1 {
        return false;
    }
    let pulses = train.as_slice();
    let Some(leader) = pulses
        .iter()
        .position(|p| p.is_mark() && inr(p.micros(), LEADER_MARK))
    else {
        return false;
    };
    let mut rest = pulses.iter().skip(leader + 1);
    let (Some(space), Some(mark)) = (rest.next(), rest.next()) else {
        return false;
    };
    space.is_space() && inr(space.micros(), REPEAT_SPACE) && short_mark(*mark)
}

/// Encode four payload bytes as a 67-pulse NEC frame: leader mark and
/// header space, 32 mark/space bit pairs (most-significant bit of each byte
/// first), and the trailing stop mark.
///
/// [`decode`] is the exact inverse: `decode(&encode(p)) == Some(p)` for
/// every payload `p`.
#[must_use]
pub fn encode(payload: [u8; 4]) -> PulseTrain {
    let mut train = PulseTrain::new();
    // 67 pulses, well under PULSE_TRAIN_CAPACITY: pushes cannot fail.
    let mut push = |p: Pulse| {
        let _ = train.push(p);
    };

    push(Pulse::mark(u64::from(LEADER_MARK_MICROS)));
    push(Pulse::space(u64::from(HEADER_SPACE_MICROS)));
    for byte in payload {
        for shift in (0..8).rev() {
            push(Pulse::mark(u64::from(BIT_MARK_MICROS)));
            let space = if (byte >> shift) & 1 == 1 {
                BIT1_SPACE_MICROS
            } else {
                BIT0_SPACE_MICROS
            };
            push(Pulse::space(u64::from(space)));
        }
    }
    push(Pulse::mark(u64::from(BIT_MARK_MICROS)));
    train
}

/// A validated NEC address/command, extracted from a decoded payload.
///
/// Standard NEC carries an 8-bit address and its complement; extended NEC
/// spends both address bytes on a 16-bit address. The command byte must be
/// followed by its complement in either variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NecMessage {
    pub addr: u16,
    pub cmd: u8,
}

impl NecMessage {
    /// Validate a decoded payload and extract address and command.
    #[must_use]
    pub fn from_payload(payload: [u8; 4]) -> Option<Self> {
        let [b0, b1, b2, b3] = payload;

        // Command complement is required in both variants.
        if b2 ^ b3 != 0xFF {
            return None;
        }

        // Standard NEC: second byte is the inverse of the first.
        if b0 ^ b1 == 0xFF {
            return Some(Self {
                addr: u16::from(b0),
                cmd: b2,
            });
        }

        // Extended NEC: two address bytes, low byte first.
        let addr = (u16::from(b1) << 8) | u16::from(b0);
        Some(Self { addr, cmd: b2 })
    }

    /// The payload that [`from_payload`](Self::from_payload) would accept
    /// back: standard NEC for 8-bit addresses, extended otherwise.
    #[must_use]
    pub fn to_payload(self) -> [u8; 4] {
        let lo = (self.addr & 0xFF) as u8;
        let hi = (self.addr >> 8) as u8;
        if hi == 0 {
            [lo, !lo, self.cmd, !self.cmd]
        } else {
            [lo, hi, self.cmd, !self.cmd]
        }
    }
}
