#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::pwm::Pwm;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Timer;
use lin_core::{ClockProfile, Decoder, LinShared, PinBus, Strobe};
use lin_repeater_rp2040::{
    bit_timer_config, enable_tick_interrupt, report_errors, report_frame, LinBoard,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

/// Bus speed of the vehicle network being tapped.
const BAUD: u16 = 19_200;

/// Consumer poll period when no frame is pending.
const POLL_MS: u64 = 1;

/// Frames and errors handed from the tick interrupt to the consumer.
static LIN: LinShared = LinShared::new();

/// State owned by the tick interrupt.
struct Tick {
    decoder: Decoder,
    board: LinBoard,
}

static TICK: Mutex<CriticalSectionRawMutex, RefCell<Option<Tick>>> =
    Mutex::new(RefCell::new(None));

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("LIN repeater starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Must run before the tick interrupt is enabled.
    let mut decoder = match Decoder::setup(BAUD, &ClockProfile::RP2040, &LIN) {
        Ok(decoder) => decoder,
        Err(e) => {
            error!("LIN timing does not fit the hardware: {:?}", e);
            return;
        }
    };

    // --- Pins ---
    let pins = PinBus::new(
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Output::new(p.PIN_3, Level::High),
        Output::new(p.PIN_5, Level::High),
    )
    .with_strobe(Strobe::Break, Output::new(p.PIN_10, Level::Low))
    .with_strobe(Strobe::Sample, Output::new(p.PIN_11, Level::Low))
    .with_strobe(Strobe::Error, Output::new(p.PIN_12, Level::Low))
    .with_strobe(Strobe::Handler, Output::new(p.PIN_13, Level::Low));

    // --- Bit timer ---
    let timer = Pwm::new_free(p.PWM_SLICE0, bit_timer_config(decoder.config()));

    let mut board = LinBoard::new(pins, timer);
    decoder.start(&mut board);

    TICK.lock(|cell| {
        cell.replace(Some(Tick { decoder, board }));
    });
    enable_tick_interrupt();

    // On-board LED for frame activity
    let led = Output::new(p.PIN_25, Level::Low);

    match consumer_task(led) {
        Ok(token) => spawner.spawn(token),
        Err(e) => {
            error!("failed to spawn consumer task: {:?}", e);
            return;
        }
    }

    info!("LIN repeater running at {=u16} baud", BAUD);
}

/// Bit timer wrap: one decoder step per bit time.
#[interrupt]
fn PWM_IRQ_WRAP() {
    TICK.lock(|cell| {
        if let Some(tick) = cell.borrow_mut().as_mut() {
            tick.board.acknowledge_tick();
            tick.decoder.on_tick(&mut tick.board, &LIN);
        }
    });
}

/// Consumer task - drains decoded frames and errors and reports them.
#[embassy_executor::task]
async fn consumer_task(mut led: Output<'static>) {
    loop {
        while let Some(frame) = LIN.read_next_frame() {
            led.toggle();
            report_frame(&frame);
        }
        report_errors(LIN.take_errors());
        Timer::after_millis(POLL_MS).await;
    }
}
