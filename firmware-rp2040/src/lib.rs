//! LIN bus decoder and master/slave repeater for RP2040.
//!
//! This crate provides the board glue that runs the [`lin_core`] decoder
//! on a Raspberry Pi Pico, sitting between a LIN master and a LIN slave
//! (each through its own transceiver).
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Samples both LIN channels in the middle of every bit from a PWM wrap interrupt
//! 2. Repeats every sampled bit onto the other channel, half a bit later
//! 3. Queues decoded frames and error flags for a consumer task
//! 4. Validates and logs frames over defmt/RTT
//!
//! # Hardware Configuration
//!
//! | Function        | GPIO | Description |
//! |-----------------|------|-------------|
//! | Master RX       | 2    | From the master-side transceiver |
//! | Master TX       | 3    | Repeats the slave onto the master wire |
//! | Slave RX        | 4    | From the slave-side transceiver |
//! | Slave TX        | 5    | Repeats the master onto the slave wire |
//! | Break strobe    | 10   | Debug: high while waiting for the end of a break |
//! | Sample strobe   | 11   | Debug: pulse at each data sample |
//! | Error strobe    | 12   | Debug: pulse at each raised error |
//! | Handler strobe  | 13   | Debug: high during the tick handler |
//! | LED             | 25   | On-board LED (toggles per frame) |
//!
//! # Architecture
//!
//! - **Tick interrupt** (`PWM_IRQ_WRAP`, slice 0): owns the
//!   [`Decoder`](lin_core::Decoder) and the [`LinBoard`]; never logs.
//! - **Consumer task**: drains frames and errors from the shared
//!   [`LinShared`](lin_core::LinShared) and reports them.
//!
//! The PWM slice counter is the resettable bit timer. The 1 MHz system
//! timer (also used by `embassy-time`) is read as the free-running clock.
//!
//! # Modules
//!
//! - [`board`]: Pin map, bit timer and free-running clock ([`LinBoard`])
//! - [`report`]: Frame validation and logging ([`report_frame`], [`report_errors`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`checksum-classic`**: Accept only classic (LIN 1.x) checksums
//! - **`checksum-enhanced`**: Accept only enhanced (LIN 2.x) checksums

#![no_std]

// Ensure mutually exclusive checksum features
#[cfg(all(feature = "checksum-classic", feature = "checksum-enhanced"))]
compile_error!("Cannot enable both `checksum-classic` and `checksum-enhanced` features - pick one, or neither to accept both");

pub mod board;
pub mod report;

pub use board::{bit_timer_config, enable_tick_interrupt, LinBoard, LinPins, TICK_SLICE};
pub use report::{check_frame, report_errors, report_frame, EXPECTED_MODEL};
