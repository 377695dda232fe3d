//! Board glue: pins, PWM bit timer and free-running clock.
//!
//! # Pins
//!
//! See the crate documentation for the pin map. All inputs use pull-ups
//! so an unconnected channel reads as an idle (recessive) bus.

use embassy_rp::gpio::{Input, Output};
use embassy_rp::interrupt::{self, InterruptExt, Priority};
use embassy_rp::pac;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::traits::ToFixed;
use lin_core::{BitTimer, Channel, LinBus, PinBus, Strobe, TickClock, TimingConfig};

/// PWM slice used as the bit timer.
pub const TICK_SLICE: usize = 0;

/// Receive, repeater and strobe pins.
pub type LinPins = PinBus<Input<'static>, Output<'static>>;

/// Everything the tick handler touches.
pub struct LinBoard {
    pins: LinPins,
    timer: Pwm<'static>,
}

impl LinBoard {
    /// Create the board from its pins and a free-running PWM slice.
    ///
    /// Configure the slice with [`bit_timer_config`] first.
    #[must_use]
    pub fn new(pins: LinPins, timer: Pwm<'static>) -> Self {
        Self { pins, timer }
    }

    /// Clear the wrap flag that raised the current interrupt.
    #[inline]
    pub fn acknowledge_tick(&mut self) {
        self.timer.clear_wrapped();
    }
}

impl LinBus for LinBoard {
    #[inline]
    fn is_high(&mut self, channel: Channel) -> bool {
        self.pins.is_high(channel)
    }

    #[inline]
    fn drive(&mut self, channel: Channel, high: bool) {
        self.pins.drive(channel, high);
    }

    #[inline]
    fn strobe(&mut self, strobe: Strobe, high: bool) {
        self.pins.strobe(strobe, high);
    }
}

impl BitTimer for LinBoard {
    #[inline]
    fn restart(&mut self) {
        self.timer.set_counter(0);
    }

    #[inline]
    fn set_count(&mut self, count: u16) {
        self.timer.set_counter(count);
    }
}

impl TickClock for LinBoard {
    /// Low half of the 1 MHz system timer, truncated to 16 bits.
    #[inline]
    fn now(&mut self) -> u16 {
        pac::TIMER.timerawl().read() as u16
    }
}

/// PWM slice settings for one wrap per bit.
#[must_use]
pub fn bit_timer_config(config: &TimingConfig) -> PwmConfig {
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = config.counts_per_bit() - 1;
    pwm_config.divider = config.prescaler().divisor().to_fixed();
    pwm_config.compare_a = 0;
    pwm_config.compare_b = 0;
    pwm_config
}

/// Unmask the bit timer wrap interrupt at the highest priority.
///
/// Call once the tick handler's state is in place.
pub fn enable_tick_interrupt() {
    pac::PWM.inte().modify(|w| w.set_ch(TICK_SLICE, true));
    interrupt::PWM_IRQ_WRAP.set_priority(Priority::P0);
    interrupt::PWM_IRQ_WRAP.unpend();
    // SAFETY: the handler only touches state initialised before this call.
    unsafe { interrupt::PWM_IRQ_WRAP.enable() };
}
