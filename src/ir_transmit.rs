//! Hardware-PWM infrared transmitter for RP2040 (Pico / Pico W) using Embassy.
//! - 38 kHz NEC carrier, derived from clk_sys
//! - Marks gate the carrier on at ~1/3 duty; spaces force it off
//! - Updates duty WITHOUT reconfiguring the slice

use defmt::info;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use embassy_time::Timer;

use crate::pulse::PulseTrain;

/// NEC modulation frequency.
pub const CARRIER_HZ: u32 = 38_000;

pub struct IrTransmitter<'d> {
    pwm: Pwm<'d>,
    cfg: Config, // Store config to avoid recreating default (which resets top)
    mark_compare: u16,
}

impl<'d> IrTransmitter<'d> {
    /// Create on a PWM output channel, accepting pre-configured Pwm.
    /// e.g.: IrTransmitter::new(Pwm::new_output_a(p.PWM_SLICE0, p.PIN_0, Config::default()))
    pub fn new(mut pwm: Pwm<'d>) -> Self {
        // One PWM frame = one carrier cycle.
        let clk = clk_sys_freq();
        let top = u16::try_from((clk / CARRIER_HZ).saturating_sub(1)).unwrap_or(u16::MAX);
        let mark_compare = top / 3; // ~33% duty keeps the IR LED within ratings

        let mut cfg = Config::default();
        cfg.top = top;
        cfg.phase_correct = false;
        cfg.compare_a = 0; // carrier off until the first mark
        cfg.enable = true;
        pwm.set_config(&cfg);

        info!(
            "IR transmit clk={}Hz top={} mark_compare={}",
            clk, top, mark_compare
        );

        Self {
            pwm,
            cfg,
            mark_compare,
        }
    }

    /// Send one pulse train: carrier on while a pulse is a mark, off while
    /// a space, each for exactly the pulse's duration. The carrier is
    /// forced off after the train completes, even for an empty train.
    pub async fn send(&mut self, train: &PulseTrain) {
        for pulse in train {
            let compare = if pulse.is_mark() { self.mark_compare } else { 0 };
            self.set_compare(compare);
            Timer::after_micros(u64::from(pulse.micros())).await;
        }
        self.set_compare(0);
    }

    /// Stop the slice entirely (carrier off, counter halted).
    pub fn disable(&mut self) {
        self.cfg.compare_a = 0;
        self.cfg.enable = false;
        self.pwm.set_config(&self.cfg);
    }

    /// NOTE: only update the *compare* register; do not reconfigure the slice.
    fn set_compare(&mut self, compare: u16) {
        self.cfg.compare_a = compare;
        self.pwm.set_config(&self.cfg);
    }
}
