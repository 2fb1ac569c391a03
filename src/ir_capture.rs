//! A device abstraction for raw infrared pulse capture.
//!
//! See [`IrCapture`] for usage examples.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::Peri;
use embassy_rp::gpio::{AnyPin, Input, Pin, Pull};
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel as EmbassyChannel;
use embassy_time::{Duration, Instant, Ticker};

use crate::capture::CaptureState;
use crate::pulse::{FlushReason, Pulse, PulseTrain};
use crate::{Error, Result};

/// How often the idle checker looks for a quiet line.
const IDLE_CHECK_INTERVAL: Duration = Duration::from_millis(32);

const PULSE_CHANNEL_DEPTH: usize = 16;
const TRAIN_CHANNEL_DEPTH: usize = 4;

/// Static state for the [`IrCapture`] device abstraction: the one capture
/// lock plus the bounded notification channels.
///
/// See [`IrCapture`] for usage examples.
pub struct IrCaptureStatic {
    state: BlockingMutex<CriticalSectionRawMutex, RefCell<CaptureState>>,
    pulses: EmbassyChannel<CriticalSectionRawMutex, Pulse, PULSE_CHANNEL_DEPTH>,
    trains: EmbassyChannel<CriticalSectionRawMutex, (PulseTrain, FlushReason), TRAIN_CHANNEL_DEPTH>,
    in_edge: AtomicBool,
    stopped: AtomicBool,
}

/// A device abstraction for a digital IR receiver: timestamps every level
/// transition and batches the resulting pulses into trains.
///
/// The receiver pin is configured as input with pull-up and watched for
/// both edges. Each pulse is published as it arrives; trains are flushed
/// either when the line goes idle for 5 ms or when the buffer fills, and
/// are tagged with the [`FlushReason`]. Feed flushed trains to
/// [`nec::decode`](crate::nec::decode) or
/// [`nec::is_repeat`](crate::nec::is_repeat).
///
/// # Examples
/// ```no_run
/// # #![no_std]
/// # #![no_main]
/// # use panic_probe as _;
/// # use defmt::info;
/// # use embassy_executor::Spawner;
/// # use ir_kit::ir_capture::{IrCapture, IrCaptureStatic};
/// # async fn example(p: embassy_rp::Peripherals, spawner: Spawner) -> ir_kit::Result<()> {
/// static IR_STATIC: IrCaptureStatic = IrCapture::new_static();
/// let ir = IrCapture::new(p.PIN_15, true, &IR_STATIC, spawner)?;
///
/// loop {
///     let (train, reason) = ir.next_train().await;
///     info!("train: {} pulses ({:?})", train.len(), reason);
/// }
/// # }
/// ```
pub struct IrCapture<'a> {
    statics: &'a IrCaptureStatic,
}

impl IrCapture<'_> {
    /// Create static resources for the capture engine.
    ///
    /// See [`IrCapture`] for usage examples.
    #[must_use]
    pub const fn new_static() -> IrCaptureStatic {
        IrCaptureStatic {
            state: BlockingMutex::new(RefCell::new(CaptureState::new(false))),
            pulses: EmbassyChannel::new(),
            trains: EmbassyChannel::new(),
            in_edge: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Create a new capture engine on the specified receiver pin.
    ///
    /// `active_low` should be true for the usual demodulating receiver
    /// modules that idle HIGH and pull the line LOW while they see carrier.
    ///
    /// See [`IrCapture`] for usage examples.
    ///
    /// # Errors
    /// Returns an error if either background task cannot be spawned; the
    /// engine cannot exist without its edge watcher and idle checker.
    pub fn new<P: Pin>(
        pin: Peri<'static, P>,
        active_low: bool,
        statics: &'static IrCaptureStatic,
        spawner: Spawner,
    ) -> Result<Self> {
        // Type erase to Peri<'static, AnyPin> (keep the Peri wrapper!)
        let any: Peri<'static, AnyPin> = pin.into();
        let input = Input::new(any, Pull::Up);

        statics.stopped.store(false, Ordering::Release);
        // Reset also discards anything a previous, stopped engine left buffered.
        statics
            .state
            .lock(|cell| *cell.borrow_mut() = CaptureState::new(active_low));

        spawner
            .spawn(edge_task(input, statics))
            .map_err(Error::TaskSpawn)?;
        spawner
            .spawn(idle_task(statics))
            .map_err(Error::TaskSpawn)?;
        info!("IR capture started (active_low={})", active_low);
        Ok(Self { statics })
    }

    /// Wait for the next captured pulse.
    pub async fn next_pulse(&self) -> Pulse {
        self.statics.pulses.receive().await
    }

    /// Wait for the next flushed train and the reason it was cut.
    pub async fn next_train(&self) -> (PulseTrain, FlushReason) {
        self.statics.trains.receive().await
    }

    /// Request teardown. Best-effort and asynchronous: an edge already in
    /// flight finishes, both tasks exit at their next wakeup, and any
    /// buffered-but-unflushed pulses are discarded.
    pub fn stop(&self) {
        self.statics.stopped.store(true, Ordering::Release);
    }
}

#[embassy_executor::task]
async fn edge_task(mut pin: Input<'static>, statics: &'static IrCaptureStatic) {
    let mut level_high = pin.is_high();
    info!("IR edge task started");
    loop {
        pin.wait_for_any_edge().await;
        if statics.stopped.load(Ordering::Acquire) {
            break;
        }
        statics.in_edge.store(true, Ordering::Release);

        let now_micros = Instant::now().as_micros();

        // Toggle instead of reading the pin, then verify; a mismatch means
        // an edge was missed.
        let ended_level_high = level_high;
        level_high = !level_high;
        let actual_level_high = pin.is_high();
        if level_high != actual_level_high {
            warn!("IR: pin level mismatch, resyncing (missed edge?)");
            level_high = actual_level_high;
        }

        // Lock held for the append/snapshot only; dispatch happens after.
        let report = statics
            .state
            .lock(|cell| cell.borrow_mut().on_edge(now_micros, ended_level_high));

        if let Some(pulse) = report.pulse
            && statics.pulses.try_send(pulse).is_err()
        {
            warn!("IR: pulse subscriber lagging, pulse dropped");
        }
        if let Some((train, reason)) = report.flushed
            && statics.trains.try_send((train, reason)).is_err()
        {
            warn!("IR: train subscriber lagging, {:?} train dropped", reason);
        }

        statics.in_edge.store(false, Ordering::Release);
    }
    info!("IR edge task stopped");
}

#[embassy_executor::task]
async fn idle_task(statics: &'static IrCaptureStatic) {
    let mut ticker = Ticker::every(IDLE_CHECK_INTERVAL);
    info!("IR idle-check task started");
    loop {
        ticker.next().await;
        if statics.stopped.load(Ordering::Acquire) {
            break;
        }
        // Stay out of the edge path's way; the next tick will catch up.
        if statics.in_edge.load(Ordering::Acquire) {
            continue;
        }

        let flushed = statics
            .state
            .lock(|cell| cell.borrow_mut().on_idle_tick(Instant::now().as_micros()));

        if let Some((train, reason)) = flushed
            && statics.trains.try_send((train, reason)).is_err()
        {
            warn!("IR: train subscriber lagging, {:?} train dropped", reason);
        }
    }
    info!("IR idle-check task stopped");
}
