//! [`LinBus`] over `embedded-hal` digital pins.
//!
//! Pin errors cannot be reported from the tick handler. A failed read
//! counts as high (idle bus) and a failed write is dropped.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::hal::{Channel, LinBus, Strobe};

/// Two receive pins, two repeater transmit pins and optional strobe pins.
pub struct PinBus<I, O> {
    master_rx: I,
    slave_rx: I,
    /// Drives the master's wire (repeats the slave).
    master_tx: O,
    /// Drives the slave's wire (repeats the master).
    slave_tx: O,
    strobes: [Option<O>; Strobe::COUNT],
}

impl<I: InputPin, O: OutputPin> PinBus<I, O> {
    /// Build the bus and release both repeater outputs.
    pub fn new(master_rx: I, slave_rx: I, master_tx: O, slave_tx: O) -> Self {
        let mut bus = Self {
            master_rx,
            slave_rx,
            master_tx,
            slave_tx,
            strobes: [None, None, None, None],
        };
        bus.drive(Channel::Master, true);
        bus.drive(Channel::Slave, true);
        bus
    }

    /// Attach a debug strobe pin, driven low initially.
    #[must_use]
    pub fn with_strobe(mut self, strobe: Strobe, mut pin: O) -> Self {
        let _ = pin.set_low();
        self.strobes[strobe.index()] = Some(pin);
        self
    }
}

impl<I: InputPin, O: OutputPin> LinBus for PinBus<I, O> {
    #[inline]
    fn is_high(&mut self, channel: Channel) -> bool {
        let pin = match channel {
            Channel::Master => &mut self.master_rx,
            Channel::Slave => &mut self.slave_rx,
        };
        pin.is_high().unwrap_or(true)
    }

    #[inline]
    fn drive(&mut self, channel: Channel, high: bool) {
        let pin = match channel {
            Channel::Master => &mut self.master_tx,
            Channel::Slave => &mut self.slave_tx,
        };
        let _ = pin.set_state(PinState::from(high));
    }

    #[inline]
    fn strobe(&mut self, strobe: Strobe, high: bool) {
        if let Some(pin) = self.strobes[strobe.index()].as_mut() {
            let _ = pin.set_state(PinState::from(high));
        }
    }
}
