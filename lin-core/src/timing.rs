//! Baud rate to timer counts and clock ticks.
//!
//! Two time bases are involved:
//!
//! - **timer counts**: the resettable bit timer that raises the tick
//!   interrupt, clocked from the timer input through a prescaler;
//! - **clock ticks**: a free-running 16-bit counter used to bound the
//!   busy-waits inside the handler.

/// Lowest supported baud rate.
pub const MIN_BAUD: u16 = 1_000;

/// Highest supported baud rate.
pub const MAX_BAUD: u16 = 20_000;

/// Baud rate used when the requested one is out of range.
pub const DEFAULT_BAUD: u16 = 9_600;

/// Below this baud rate the x64 prescaler is used, x8 otherwise.
pub const PRESCALER_SWITCH_BAUD: u16 = 8_000;

/// Idle bits tolerated between a stop bit and the next start bit.
pub const MAX_SPACE_BITS: u16 = 6;

/// Bits a confirmed break may stay low before the bus counts as stuck.
///
/// Measured from the sample that confirms the break, so breaks of up to
/// about 30 bits are accepted.
pub const MAX_BREAK_END_BITS: u16 = 20;

/// Timer counts added to the half bit to cover handler latency between
/// detecting a start edge and writing the timer.
pub const HALF_BIT_LATENCY_COUNTS: u16 = 2;

/// Bit timer prescaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    X8,
    X64,
}

impl Prescaler {
    /// Select the prescaler for a baud rate.
    #[inline]
    #[must_use]
    pub const fn for_baud(baud: u16) -> Self {
        if baud < PRESCALER_SWITCH_BAUD {
            Prescaler::X64
        } else {
            Prescaler::X8
        }
    }

    #[inline]
    #[must_use]
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::X8 => 8,
            Prescaler::X64 => 64,
        }
    }
}

/// Clock rates of the target hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockProfile {
    /// Input frequency of the bit timer before prescaling, in Hz.
    pub timer_hz: u32,
    /// Free-running clock ticks per millisecond.
    pub clock_ticks_per_milli: u32,
}

impl ClockProfile {
    /// RP2040: PWM slice on the 125 MHz system clock, 1 MHz system timer.
    pub const RP2040: Self = Self {
        timer_hz: 125_000_000,
        clock_ticks_per_milli: 1_000,
    };
}

/// Derived counts do not fit the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Counts per bit are zero or above the 16-bit bit timer.
    TimerRange,
    /// Clock ticks per half bit are zero, or the break-end timeout does
    /// not fit half of the 16-bit free-running clock.
    ClockRange,
}

/// Timing derived from a baud rate, computed once and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    requested_baud: u16,
    baud: u16,
    prescaler: Prescaler,
    counts_per_bit: u16,
    counts_per_half_bit: u16,
    clock_ticks_per_bit: u16,
    clock_ticks_per_half_bit: u16,
    clock_ticks_until_start_bit: u16,
    clock_ticks_until_break_end: u16,
}

impl TimingConfig {
    /// Derive the timing for `baud` on the given hardware.
    ///
    /// An out of range baud is replaced by [`DEFAULT_BAUD`];
    /// [`baud_substituted`](Self::baud_substituted) reports it.
    pub fn new(baud: u16, profile: &ClockProfile) -> Result<Self, ConfigError> {
        let requested_baud = baud;
        let baud = if (MIN_BAUD..=MAX_BAUD).contains(&baud) {
            baud
        } else {
            DEFAULT_BAUD
        };

        let prescaler = Prescaler::for_baud(baud);
        let counts_per_bit = profile.timer_hz / prescaler.divisor() / u32::from(baud);
        if counts_per_bit < 2 || counts_per_bit > u32::from(u16::MAX) {
            return Err(ConfigError::TimerRange);
        }
        let counts_per_half_bit = counts_per_bit / 2 + u32::from(HALF_BIT_LATENCY_COUNTS);

        let clock_ticks_per_bit = profile.clock_ticks_per_milli * 1_000 / u32::from(baud);
        let clock_ticks_per_half_bit = clock_ticks_per_bit / 2;
        let clock_ticks_until_start_bit = clock_ticks_per_bit * u32::from(MAX_SPACE_BITS);
        let clock_ticks_until_break_end = clock_ticks_per_bit * u32::from(MAX_BREAK_END_BITS);
        // Wrapping differences are only unambiguous within half the range.
        if clock_ticks_per_half_bit == 0 || clock_ticks_until_break_end > u32::from(u16::MAX / 2)
        {
            return Err(ConfigError::ClockRange);
        }

        Ok(Self {
            requested_baud,
            baud,
            prescaler,
            counts_per_bit: counts_per_bit as u16,
            counts_per_half_bit: counts_per_half_bit as u16,
            clock_ticks_per_bit: clock_ticks_per_bit as u16,
            clock_ticks_per_half_bit: clock_ticks_per_half_bit as u16,
            clock_ticks_until_start_bit: clock_ticks_until_start_bit as u16,
            clock_ticks_until_break_end: clock_ticks_until_break_end as u16,
        })
    }

    /// The baud rate in effect.
    #[inline]
    #[must_use]
    pub const fn baud(&self) -> u16 {
        self.baud
    }

    /// True if the requested baud was out of range and replaced.
    #[inline]
    #[must_use]
    pub const fn baud_substituted(&self) -> bool {
        self.requested_baud != self.baud
    }

    #[inline]
    #[must_use]
    pub const fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    /// Bit timer period, in timer counts.
    #[inline]
    #[must_use]
    pub const fn counts_per_bit(&self) -> u16 {
        self.counts_per_bit
    }

    /// Timer value written at a start edge so the next tick lands mid bit.
    #[inline]
    #[must_use]
    pub const fn counts_per_half_bit(&self) -> u16 {
        self.counts_per_half_bit
    }

    #[inline]
    #[must_use]
    pub const fn clock_ticks_per_bit(&self) -> u16 {
        self.clock_ticks_per_bit
    }

    #[inline]
    #[must_use]
    pub const fn clock_ticks_per_half_bit(&self) -> u16 {
        self.clock_ticks_per_half_bit
    }

    /// Longest wait for the next start bit, in clock ticks.
    #[inline]
    #[must_use]
    pub const fn clock_ticks_until_start_bit(&self) -> u16 {
        self.clock_ticks_until_start_bit
    }

    /// Longest wait for the line to rise after a confirmed break, in clock
    /// ticks.
    #[inline]
    #[must_use]
    pub const fn clock_ticks_until_break_end(&self) -> u16 {
        self.clock_ticks_until_break_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_valid_bauds_positive_and_ordered() {
        for baud in MIN_BAUD..=MAX_BAUD {
            let config = TimingConfig::new(baud, &ClockProfile::RP2040).unwrap();
            assert_eq!(config.baud(), baud);
            assert!(!config.baud_substituted());
            assert!(config.counts_per_bit() > 0);
            assert!(config.counts_per_half_bit() > 0);
            assert!(config.counts_per_half_bit() <= config.counts_per_bit());
            assert!(config.clock_ticks_per_half_bit() > 0);
            assert!(config.clock_ticks_per_half_bit() <= config.clock_ticks_per_bit());
            assert!(config.clock_ticks_until_start_bit() > config.clock_ticks_per_bit());
            assert!(config.clock_ticks_until_break_end() > config.clock_ticks_until_start_bit());
            assert!(config.clock_ticks_until_break_end() <= u16::MAX / 2);
        }
    }

    #[test]
    fn test_rp2040_19200() {
        let config = TimingConfig::new(19_200, &ClockProfile::RP2040).unwrap();
        assert_eq!(config.prescaler(), Prescaler::X8);
        // 125 MHz / 8 / 19200
        assert_eq!(config.counts_per_bit(), 813);
        assert_eq!(config.counts_per_half_bit(), 408);
        assert_eq!(config.clock_ticks_per_bit(), 52);
        assert_eq!(config.clock_ticks_per_half_bit(), 26);
        assert_eq!(config.clock_ticks_until_start_bit(), 312);
        assert_eq!(config.clock_ticks_until_break_end(), 1_040);
    }

    #[test]
    fn test_prescaler_switch() {
        assert_eq!(Prescaler::for_baud(7_999), Prescaler::X64);
        assert_eq!(Prescaler::for_baud(8_000), Prescaler::X8);
    }

    #[test]
    fn test_out_of_range_uses_default() {
        for baud in [0, 999, 20_001, u16::MAX] {
            let config = TimingConfig::new(baud, &ClockProfile::RP2040).unwrap();
            assert_eq!(config.baud(), DEFAULT_BAUD);
            assert!(config.baud_substituted());
        }
    }

    #[test]
    fn test_avr_style_profile() {
        // 16 MHz timer, 4 us clock ticks
        let profile = ClockProfile {
            timer_hz: 16_000_000,
            clock_ticks_per_milli: 250,
        };
        let config = TimingConfig::new(9_600, &profile).unwrap();
        assert_eq!(config.counts_per_bit(), 208);
        assert_eq!(config.counts_per_half_bit(), 106);
        assert_eq!(config.clock_ticks_per_bit(), 26);
        assert_eq!(config.clock_ticks_until_start_bit(), 156);
        assert_eq!(config.clock_ticks_until_break_end(), 520);
    }

    #[test]
    fn test_timer_overflow_rejected() {
        let profile = ClockProfile {
            timer_hz: u32::MAX,
            clock_ticks_per_milli: 1_000,
        };
        assert_eq!(
            TimingConfig::new(1_000, &profile),
            Err(ConfigError::TimerRange)
        );
    }

    #[test]
    fn test_break_end_must_fit_clock_window() {
        // 2000 ticks per bit at 1000 baud: 40000 ticks for the break end.
        let profile = ClockProfile {
            timer_hz: 16_000_000,
            clock_ticks_per_milli: 2_000,
        };
        assert_eq!(
            TimingConfig::new(1_000, &profile),
            Err(ConfigError::ClockRange)
        );
        assert!(TimingConfig::new(2_000, &profile).is_ok());
    }

    #[test]
    fn test_clock_too_slow_rejected() {
        let profile = ClockProfile {
            timer_hz: 16_000_000,
            clock_ticks_per_milli: 10,
        };
        assert_eq!(
            TimingConfig::new(20_000, &profile),
            Err(ConfigError::ClockRange)
        );
    }
}
