#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use ir_kit::ir_capture::{IrCapture, IrCaptureStatic};
use ir_kit::nec::{self, NecMessage};
use panic_probe as _;

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let p = embassy_rp::init(Default::default());

    info!("IR capture example starting...");

    static IR_STATIC: IrCaptureStatic = IrCapture::new_static();

    // GP15, active-low receiver module (idles HIGH, pulls LOW on carrier)
    let ir = IrCapture::new(p.PIN_15, true, &IR_STATIC, spawner)
        .expect("Failed to initialize IR capture");

    info!("IR receiver initialized on GP15");

    loop {
        match select(ir.next_pulse(), ir.next_train()).await {
            Either::First(pulse) => {
                info!(
                    "pulse: {}µs {}",
                    pulse.micros(),
                    if pulse.is_mark() { "mark" } else { "space" }
                );
            }
            Either::Second((train, reason)) => {
                info!("train: {} pulses ({:?})", train.len(), reason);
                if nec::is_repeat(&train) {
                    info!("NEC repeat");
                } else if let Some(payload) = nec::decode(&train) {
                    match NecMessage::from_payload(payload) {
                        Some(message) => {
                            info!("NEC press: addr=0x{:04X} cmd=0x{:02X}", message.addr, message.cmd);
                        }
                        None => info!("NEC frame with bad complements: {:?}", payload),
                    }
                }
            }
        }
    }
}
