//! Platform-agnostic LIN bit decoder and two-channel repeater.
//!
//! Decodes LIN traffic from timed pin samples taken in a periodic timer
//! interrupt, with no UART assist, while re-driving every sampled bit onto
//! the opposite channel half a bit later. The device sits between a LIN
//! master and a LIN slave and stays transparent to both.
//!
//! # Overview
//!
//! - [`timing`]: Baud rate to timer counts and clock ticks ([`TimingConfig`])
//! - [`hal`]: Hardware capability traits ([`LinBus`], [`BitTimer`], [`TickClock`])
//! - [`pin_bus`]: [`LinBus`] over `embedded-hal` pins ([`PinBus`])
//! - [`wait`]: Bounded busy-waits against the free-running clock
//! - [`ring`]: Fixed-capacity frame queue ([`FrameRing`])
//! - [`errors`]: Sticky error accumulator ([`ErrorRegister`])
//! - [`shared`]: State shared between handler and consumer ([`LinShared`])
//! - [`decoder`]: Break detection and data read state machine ([`Decoder`])
//!
//! # Contexts
//!
//! Two execution contexts touch the decoder:
//!
//! - the **tick handler**, a run-to-completion timer interrupt that owns the
//!   [`Decoder`] and is the only caller of [`Decoder::on_tick`];
//! - the **consumer**, a main loop or task that only calls
//!   [`LinShared::read_next_frame`] and [`LinShared::take_errors`].
//!
//! # Example
//!
//! ```ignore
//! static LIN: LinShared = LinShared::new();
//!
//! // Before enabling interrupts
//! let mut decoder = Decoder::setup(19_200, &ClockProfile::RP2040, &LIN)?;
//!
//! // Timer interrupt
//! decoder.on_tick(&mut board, &LIN);
//!
//! // Consumer
//! while let Some(frame) = LIN.read_next_frame() {
//!     // validate and report
//! }
//! let errors = LIN.take_errors();
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and setup logging
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default, uses no heap allocations and no
//! recursion. Every buffer is statically sized.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod decoder;
pub mod errors;
pub mod hal;
pub mod pin_bus;
pub mod ring;
pub mod shared;
pub mod timing;
pub mod wait;

#[cfg(test)]
mod sim;

// Re-export main types at crate root
pub use decoder::{BitOutcome, BreakOutcome, DetectBreak, Decoder, ReadData, State, BREAK_BITS};
pub use errors::ErrorRegister;
pub use hal::{BitTimer, Channel, LinBus, LinHardware, Strobe, TickClock};
pub use pin_bus::PinBus;
pub use ring::{FrameRing, MAX_FRAME_BUFFERS};
pub use shared::LinShared;
pub use timing::{ClockProfile, ConfigError, Prescaler, TimingConfig};

pub use lin_proto::{ErrorFlags, LinFrame, MAX_BYTES, MIN_BYTES, SYNC_BYTE};
