//! Bounded busy-waits for the tick handler.
//!
//! Every wait measures elapsed time against [`TickClock`] with wrapping
//! 16-bit subtraction and gives up after `max_ticks`. The bit timer is
//! restarted on every poll so no tick fires while the handler is busy.

use crate::hal::{Channel, LinHardware};

/// Poll `probe` until it yields a value or `max_ticks` clock ticks elapse.
///
/// `probe` runs at least once, so a condition already true on entry is
/// reported even with `max_ticks == 0`.
#[inline]
pub fn poll_until<H, T>(
    hw: &mut H,
    max_ticks: u16,
    mut probe: impl FnMut(&mut H) -> Option<T>,
) -> Option<T>
where
    H: LinHardware + ?Sized,
{
    let base = hw.now();
    loop {
        hw.restart();
        if let Some(value) = probe(&mut *hw) {
            return Some(value);
        }
        if hw.now().wrapping_sub(base) >= max_ticks {
            return None;
        }
    }
}

/// Spin for `ticks` clock ticks.
#[inline]
pub fn delay<H: LinHardware + ?Sized>(hw: &mut H, ticks: u16) {
    let _ = poll_until(hw, ticks, |_| None::<()>);
}

/// Wait until `channel` reads `high`. Returns false on timeout.
#[inline]
pub fn wait_for_level<H: LinHardware + ?Sized>(
    hw: &mut H,
    channel: Channel,
    high: bool,
    max_ticks: u16,
) -> bool {
    poll_until(hw, max_ticks, |hw| (hw.is_high(channel) == high).then_some(())).is_some()
}

/// Wait for a high to low transition on either channel.
///
/// Returns the channel that fell first, or `None` on timeout. A line that
/// is already low on entry does not count until it has been seen high.
/// When both fall between two polls the master wins.
pub fn wait_for_falling_edge_any<H: LinHardware + ?Sized>(
    hw: &mut H,
    max_ticks: u16,
) -> Option<Channel> {
    let mut master_was_high = hw.is_high(Channel::Master);
    let mut slave_was_high = hw.is_high(Channel::Slave);
    poll_until(hw, max_ticks, |hw| {
        let master_high = hw.is_high(Channel::Master);
        if master_was_high && !master_high {
            return Some(Channel::Master);
        }
        master_was_high = master_high;

        let slave_high = hw.is_high(Channel::Slave);
        if slave_was_high && !slave_high {
            return Some(Channel::Slave);
        }
        slave_was_high = slave_high;
        None
    })
}
