//! Host-side bus simulator driving [`Decoder`] from synthetic waveforms.
//!
//! One simulated time unit is one microsecond. The bit timer and the
//! free-running clock both count once per unit, and every clock read
//! advances time, so busy-waits make progress.

extern crate std;

use std::vec::Vec;

use crate::decoder::Decoder;
use crate::hal::{BitTimer, Channel, LinBus, TickClock};
use crate::shared::LinShared;
use crate::timing::{ClockProfile, TimingConfig};

/// Bit time in simulated microseconds at the test baud rate.
pub const BIT: usize = 100;

/// 10 kBaud on an 8 MHz timer with a 1 MHz clock: 100 counts and
/// 100 ticks per bit.
pub fn test_config() -> TimingConfig {
    let profile = ClockProfile {
        timer_hz: 8_000_000,
        clock_ticks_per_milli: 1_000,
    };
    TimingConfig::new(10_000, &profile).unwrap()
}

/// Level of one wire over time, one entry per microsecond.
#[derive(Debug, Default, Clone)]
pub struct Wave {
    levels: Vec<bool>,
}

impl Wave {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Level at `t`; the bus idles high past the end.
    pub fn level(&self, t: usize) -> bool {
        self.levels.get(t).copied().unwrap_or(true)
    }

    fn hold(&mut self, high: bool, us: usize) -> &mut Self {
        self.levels.extend(core::iter::repeat(high).take(us));
        self
    }

    pub fn idle(&mut self, bits: usize) -> &mut Self {
        self.hold(true, bits * BIT)
    }

    pub fn low(&mut self, bits: usize) -> &mut Self {
        self.hold(false, bits * BIT)
    }

    pub fn idle_until(&mut self, t: usize) -> &mut Self {
        let pad = t.saturating_sub(self.len());
        self.hold(true, pad)
    }

    /// A short low pulse, then high for the rest of one bit.
    pub fn glitch(&mut self, us: usize) -> &mut Self {
        self.hold(false, us).hold(true, BIT - us)
    }

    /// 8N1, LSB first.
    pub fn byte(&mut self, value: u8) -> &mut Self {
        self.byte_with_stop(value, true)
    }

    pub fn byte_with_stop(&mut self, value: u8, stop: bool) -> &mut Self {
        self.hold(false, BIT);
        for i in 0..8 {
            self.hold(value & (1 << i) != 0, BIT);
        }
        self.hold(stop, BIT)
    }
}

/// Changes of one repeater output, as `(time, level)`.
#[derive(Debug, Default)]
pub struct TxLog {
    level: bool,
    changes: Vec<(usize, bool)>,
}

impl TxLog {
    fn new() -> Self {
        Self {
            level: true,
            changes: Vec::new(),
        }
    }

    fn set(&mut self, t: usize, high: bool) {
        if high != self.level {
            self.level = high;
            self.changes.push((t, high));
        }
    }

    pub fn level_at(&self, t: usize) -> bool {
        self.changes
            .iter()
            .rev()
            .find(|(at, _)| *at <= t)
            .map_or(true, |(_, high)| *high)
    }

    fn first_after(&self, t: usize, high: bool) -> Option<usize> {
        self.changes
            .iter()
            .find(|(at, level)| *at >= t && *level == high)
            .map(|(at, _)| *at)
    }

    pub fn first_low_after(&self, t: usize) -> Option<usize> {
        self.first_after(t, false)
    }

    pub fn first_high_after(&self, t: usize) -> Option<usize> {
        self.first_after(t, true)
    }
}

/// Both channels with wired-AND lines: each input sees its wave pulled
/// low by the repeater output driving that wire.
pub struct SimBus {
    master: Wave,
    slave: Wave,
    pub master_tx: TxLog,
    pub slave_tx: TxLog,
    t: usize,
    timer_base: usize,
    period: usize,
}

impl SimBus {
    pub fn new(master: Wave, slave: Wave) -> Self {
        Self {
            master,
            slave,
            master_tx: TxLog::new(),
            slave_tx: TxLog::new(),
            t: 0,
            timer_base: 0,
            period: usize::from(test_config().counts_per_bit()),
        }
    }

    /// Play both waves through a fresh decoder and return what it queued.
    pub fn run(&mut self) -> LinShared {
        let shared = LinShared::new();
        let mut decoder = Decoder::new(test_config());
        decoder.start(self);

        let end = self.master.len().max(self.slave.len()) + 10 * BIT;
        while self.t < end {
            if self.t - self.timer_base >= self.period {
                self.timer_base += self.period;
                decoder.on_tick(self, &shared);
            } else {
                self.t += 1;
            }
        }
        shared
    }
}

impl LinBus for SimBus {
    fn is_high(&mut self, channel: Channel) -> bool {
        match channel {
            Channel::Master => self.master.level(self.t) && self.master_tx.level,
            Channel::Slave => self.slave.level(self.t) && self.slave_tx.level,
        }
    }

    fn drive(&mut self, channel: Channel, high: bool) {
        let t = self.t;
        match channel {
            Channel::Master => self.master_tx.set(t, high),
            Channel::Slave => self.slave_tx.set(t, high),
        }
    }
}

impl BitTimer for SimBus {
    fn restart(&mut self) {
        self.timer_base = self.t;
    }

    fn set_count(&mut self, count: u16) {
        self.timer_base = self.t.saturating_sub(usize::from(count));
    }
}

impl TickClock for SimBus {
    fn now(&mut self) -> u16 {
        let now = self.t as u16;
        self.t += 1;
        now
    }
}
