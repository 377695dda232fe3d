//! Hardware capability traits used by the tick handler.
//!
//! The decoder never touches registers directly. A board provides three
//! small capabilities and gets [`LinHardware`] for free:
//!
//! - [`LinBus`]: read the two input channels, drive the two repeater outputs
//! - [`BitTimer`]: the resettable periodic timer raising the tick
//! - [`TickClock`]: a free-running 16-bit counter bounding busy-waits
//!
//! All methods are infallible and must be callable from interrupt context.

/// One side of the repeater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Line towards the LIN master.
    Master,
    /// Line towards the LIN slave.
    Slave,
}

impl Channel {
    /// The channel a level read on `self` is repeated onto.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Channel::Master => Channel::Slave,
            Channel::Slave => Channel::Master,
        }
    }
}

/// Debug-only timing markers for a logic analyser.
///
/// Strobes carry no protocol meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Strobe {
    /// High while a confirmed break is being tracked.
    Break,
    /// Pulsed around each data-bit sample.
    Sample,
    /// Pulsed when an error is raised.
    Error,
    /// High for the duration of each tick handler invocation.
    Handler,
}

impl Strobe {
    pub(crate) const COUNT: usize = 4;

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Strobe::Break => 0,
            Strobe::Sample => 1,
            Strobe::Error => 2,
            Strobe::Handler => 3,
        }
    }
}

/// Input and repeater output pins of both channels.
pub trait LinBus {
    /// Current level of the input of `channel`.
    fn is_high(&mut self, channel: Channel) -> bool;

    /// Set the repeater output that drives `channel`'s wire.
    ///
    /// `high` releases the line (recessive), `false` pulls it low.
    fn drive(&mut self, channel: Channel, high: bool);

    /// Set a debug strobe. Boards without strobe pins keep the default.
    #[inline]
    fn strobe(&mut self, _strobe: Strobe, _high: bool) {}
}

/// The periodic bit timer.
///
/// Fires one tick every `counts_per_bit` counts while free-running.
pub trait BitTimer {
    /// Start a fresh bit period from zero.
    fn restart(&mut self);

    /// Load the counter so the next tick fires after `period - count` counts.
    ///
    /// Writing the half-bit count at a start edge lands the next tick
    /// in the middle of the start bit.
    fn set_count(&mut self, count: u16);
}

/// Free-running 16-bit clock, compared with wrapping subtraction.
pub trait TickClock {
    fn now(&mut self) -> u16;
}

/// Everything the tick handler needs from a board.
pub trait LinHardware: LinBus + BitTimer + TickClock {}

impl<T> LinHardware for T where T: LinBus + BitTimer + TickClock {}
