//! Break detection and data read state machine.
//!
//! The decoder is owned by the tick handler and advanced once per tick by
//! [`Decoder::on_tick`]. Per-bit bookkeeping lives in [`DetectBreak`] and
//! [`ReadData`], whose `sample` methods are pure and hardware free. The
//! handler wraps them with pin access, bounded waits and timer alignment.
//!
//! ```text
//!             confirmed break
//!  DetectBreak ─────────────────▶ ReadData
//!       ▲                            │
//!       └────────────────────────────┘
//!        frame end, timeout or any error
//! ```

use lin_proto::{ErrorFlags, LinFrame, MIN_BYTES, SYNC_BYTE};

use crate::hal::{Channel, LinHardware, Strobe};
use crate::shared::LinShared;
use crate::timing::{ClockProfile, ConfigError, TimingConfig};
use crate::wait::{delay, wait_for_falling_edge_any, wait_for_level};

/// Consecutive low samples that make a break.
pub const BREAK_BITS: u8 = 10;

/// Result of one sample while looking for a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BreakOutcome {
    /// Line high, counter cleared.
    Idle,
    /// Line low, not long enough yet.
    Low,
    /// [`BREAK_BITS`] low samples in a row.
    Confirmed,
}

/// Break detection working data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectBreak {
    low_bits: u8,
}

impl DetectBreak {
    #[must_use]
    pub const fn new() -> Self {
        Self { low_bits: 0 }
    }

    #[inline]
    #[must_use]
    pub const fn low_bits(&self) -> u8 {
        self.low_bits
    }

    /// Feed one master sample.
    pub fn sample(&mut self, high: bool) -> BreakOutcome {
        if high {
            self.low_bits = 0;
            return BreakOutcome::Idle;
        }
        self.low_bits = self.low_bits.saturating_add(1);
        if self.low_bits >= BREAK_BITS {
            BreakOutcome::Confirmed
        } else {
            BreakOutcome::Low
        }
    }
}

/// Result of one mid-bit sample while reading a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOutcome {
    /// Inside a byte.
    Pending,
    /// A byte completed with a valid stop bit. The sync byte is reported
    /// but not stored.
    Byte(u8),
    /// Framing error; the frame is abandoned.
    Fault(ErrorFlags),
}

/// Frame read working data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadData {
    channel: Channel,
    /// Completed bytes including the sync byte.
    bytes_read: u8,
    /// 0 = start bit, 1..=8 = data bits, 9 = stop bit.
    bits_in_byte: u8,
    byte: u8,
    frame: LinFrame,
}

impl ReadData {
    /// Fresh frame, reading from the master.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            channel: Channel::Master,
            bytes_read: 0,
            bits_in_byte: 0,
            byte: 0,
            frame: LinFrame::new(),
        }
    }

    /// Channel currently sampled.
    #[inline]
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    #[inline]
    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    #[inline]
    #[must_use]
    pub const fn bytes_read(&self) -> u8 {
        self.bytes_read
    }

    /// Bytes stored so far (sync excluded).
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> &LinFrame {
        &self.frame
    }

    /// Feed one mid-bit sample, LSB first framing.
    pub fn sample(&mut self, high: bool) -> BitOutcome {
        let first_byte = self.bytes_read == 0;
        match self.bits_in_byte {
            0 => {
                if high {
                    return BitOutcome::Fault(if first_byte {
                        ErrorFlags::SYNC_BYTE
                    } else {
                        ErrorFlags::START_BIT
                    });
                }
                self.byte = 0;
                self.bits_in_byte = 1;
                BitOutcome::Pending
            }
            n @ 1..=8 => {
                if high {
                    self.byte |= 1 << (n - 1);
                }
                self.bits_in_byte += 1;
                BitOutcome::Pending
            }
            _ => {
                self.bits_in_byte = 0;
                if !high {
                    return BitOutcome::Fault(if first_byte {
                        ErrorFlags::SYNC_BYTE
                    } else {
                        ErrorFlags::STOP_BIT
                    });
                }
                self.bytes_read = self.bytes_read.saturating_add(1);
                if first_byte {
                    if self.byte != SYNC_BYTE {
                        return BitOutcome::Fault(ErrorFlags::SYNC_BYTE);
                    }
                } else if self.frame.push(self.byte).is_err() {
                    return BitOutcome::Fault(ErrorFlags::FRAME_TOO_LONG);
                }
                BitOutcome::Byte(self.byte)
            }
        }
    }
}

impl Default for ReadData {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder state. Each variant carries only its own working data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    DetectBreak(DetectBreak),
    ReadData(ReadData),
}

/// The tick handler's decoder.
///
/// Exactly one instance exists, owned by the tick interrupt.
#[derive(Debug)]
pub struct Decoder {
    config: TimingConfig,
    state: State,
}

impl Decoder {
    /// Derive timing for `baud`, clear `shared` and start in break detection.
    ///
    /// Call before the tick interrupt is enabled, then arm the bit timer
    /// with [`config`](Self::config) and call [`start`](Self::start).
    pub fn setup(
        baud: u16,
        profile: &ClockProfile,
        shared: &LinShared,
    ) -> Result<Self, ConfigError> {
        let config = TimingConfig::new(baud, profile)?;
        if config.baud_substituted() {
            warn!(
                "LIN: requested baud {=u16} out of range, using {=u16}",
                baud,
                config.baud()
            );
        }
        info!(
            "LIN: baud={=u16} prescaler={} counts/bit={=u16} counts/half={=u16} ticks/bit={=u16} ticks/half={=u16} ticks/space={=u16}",
            config.baud(),
            config.prescaler(),
            config.counts_per_bit(),
            config.counts_per_half_bit(),
            config.clock_ticks_per_bit(),
            config.clock_ticks_per_half_bit(),
            config.clock_ticks_until_start_bit()
        );
        shared.reset();
        Ok(Self::new(config))
    }

    #[must_use]
    pub const fn new(config: TimingConfig) -> Self {
        Self {
            config,
            state: State::DetectBreak(DetectBreak::new()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TimingConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Release both repeater outputs, restart the bit timer and look for
    /// a break.
    pub fn start<H: LinHardware + ?Sized>(&mut self, hw: &mut H) {
        self.state = enter_detect_break(hw);
        hw.restart();
    }

    /// Advance the decoder by one tick. Call from the bit timer interrupt only.
    pub fn on_tick<H: LinHardware + ?Sized>(&mut self, hw: &mut H, shared: &LinShared) {
        hw.strobe(Strobe::Handler, true);
        let config = &self.config;
        let next = match &mut self.state {
            State::DetectBreak(detect) => detect_break_tick(config, detect, hw, shared),
            State::ReadData(data) => read_data_tick(config, data, hw, shared),
        };
        if let Some(next) = next {
            self.state = next;
        }
        hw.strobe(Strobe::Handler, false);
        shared.mark_handler_done();
    }
}

fn enter_detect_break<H: LinHardware + ?Sized>(hw: &mut H) -> State {
    hw.drive(Channel::Slave, true);
    hw.drive(Channel::Master, true);
    State::DetectBreak(DetectBreak::new())
}

fn fail<H: LinHardware + ?Sized>(hw: &mut H, shared: &LinShared, flags: ErrorFlags) -> State {
    hw.strobe(Strobe::Error, true);
    shared.raise(flags);
    hw.strobe(Strobe::Error, false);
    enter_detect_break(hw)
}

/// Called half a bit after the end of the break, with the slave released.
fn enter_read_data<H: LinHardware + ?Sized>(
    config: &TimingConfig,
    hw: &mut H,
    shared: &LinShared,
) -> State {
    if !wait_for_level(hw, Channel::Master, false, config.clock_ticks_until_start_bit()) {
        return fail(hw, shared, ErrorFlags::SYNC_BYTE);
    }
    hw.set_count(config.counts_per_half_bit());
    State::ReadData(ReadData::new())
}

fn detect_break_tick<H: LinHardware + ?Sized>(
    config: &TimingConfig,
    detect: &mut DetectBreak,
    hw: &mut H,
    shared: &LinShared,
) -> Option<State> {
    let high = hw.is_high(Channel::Master);
    // The break is repeated to the slave as it happens.
    hw.drive(Channel::Slave, high);
    if detect.sample(high) != BreakOutcome::Confirmed {
        return None;
    }

    hw.strobe(Strobe::Break, true);
    let ended = wait_for_level(hw, Channel::Master, true, config.clock_ticks_until_break_end());
    hw.strobe(Strobe::Break, false);
    if !ended {
        return Some(fail(hw, shared, ErrorFlags::OTHER));
    }

    // The repeated signal runs half a bit late.
    delay(hw, config.clock_ticks_per_half_bit());
    hw.drive(Channel::Slave, true);
    Some(enter_read_data(config, hw, shared))
}

fn read_data_tick<H: LinHardware + ?Sized>(
    config: &TimingConfig,
    data: &mut ReadData,
    hw: &mut H,
    shared: &LinShared,
) -> Option<State> {
    hw.strobe(Strobe::Sample, true);
    let channel = data.channel();
    let high = hw.is_high(channel);
    hw.drive(channel.opposite(), high);
    hw.strobe(Strobe::Sample, false);

    match data.sample(high) {
        BitOutcome::Pending => None,
        BitOutcome::Fault(flags) => Some(fail(hw, shared, flags)),
        BitOutcome::Byte(_) => after_byte(config, data, hw, shared),
    }
}

/// Wait for the next start bit, or close the frame.
fn after_byte<H: LinHardware + ?Sized>(
    config: &TimingConfig,
    data: &mut ReadData,
    hw: &mut H,
    shared: &LinShared,
) -> Option<State> {
    let timeout = config.clock_ticks_until_start_bit();
    let more = if data.bytes_read() == 2 {
        // After sync and PID the response may come from either side.
        match wait_for_falling_edge_any(hw, timeout) {
            Some(channel) => {
                data.set_channel(channel);
                true
            }
            None => false,
        }
    } else {
        wait_for_level(hw, data.channel(), false, timeout)
    };

    if !more {
        if data.frame().len() < MIN_BYTES {
            return Some(fail(hw, shared, ErrorFlags::FRAME_TOO_SHORT));
        }
        shared.commit_frame(data.frame());
        return Some(enter_detect_break(hw));
    }

    if data.frame().is_full() {
        return Some(fail(hw, shared, ErrorFlags::FRAME_TOO_LONG));
    }

    hw.set_count(config.counts_per_half_bit());
    None
}
