#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::pwm::{Config, Pwm};
use embassy_time::Timer;
use ir_kit::ir_transmit::IrTransmitter;
use ir_kit::nec::{self, NecMessage};
use panic_probe as _;

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let p = embassy_rp::init(Default::default());

    info!("IR transmit example starting...");

    // IR LED (through a driver transistor) on GP0 = PWM slice 0, channel A
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_0, Config::default());
    let mut tx = IrTransmitter::new(pwm);

    // Kepler remote, "play/pause" button
    let message = NecMessage { addr: 0x0000, cmd: 0x44 };
    let train = nec::encode(message.to_payload());

    loop {
        info!("sending addr=0x{:04X} cmd=0x{:02X}", message.addr, message.cmd);
        tx.send(&train).await;
        Timer::after_millis(2_000).await;
    }
}
