// src/timer/tick.rs

use super::{TimerHandle, TimerMode, TimerToken};
use crate::common::hal_traits::TimerBackend;
use heapless::Vec;

/// Error from [`TickTimers`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    #[error("All {0} tick timer slots in use")]
    SlotsExhausted(usize),
}

#[derive(Debug, Copy, Clone)]
struct Slot {
    token: TimerToken,
    deadline: u64,
    period: Option<u32>,
}

/// Software timer backend driven by an external tick count.
///
/// Call [`advance`](TickTimers::advance) from the tick interrupt (or a test)
/// and feed the returned tokens to
/// [`TimerRegistry::expire`](super::TimerRegistry::expire).
#[derive(Debug, Default)]
pub struct TickTimers<const N: usize> {
    now: u64,
    slots: Vec<Slot, N>,
}

impl<const N: usize> TickTimers<N> {
    pub const fn new() -> Self {
        TickTimers {
            now: 0,
            slots: Vec::new(),
        }
    }

    /// Ticks elapsed since construction.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.slots.len()
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.slots.iter().any(|slot| slot.token.handle() == handle)
    }

    /// Ticks until the earliest armed timer runs out.
    pub fn next_expiry(&self) -> Option<u64> {
        self.slots
            .iter()
            .map(|slot| slot.deadline.saturating_sub(self.now))
            .min()
    }

    /// Moves time forward and returns every timer that ran out, earliest first.
    ///
    /// One-shot timers are dropped. A repeated timer is reported once per call
    /// even if several of its periods elapsed, and is rescheduled on its
    /// period grid.
    pub fn advance(&mut self, ticks: u32) -> Vec<TimerToken, N> {
        self.now += u64::from(ticks);
        let now = self.now;

        let mut due: Vec<(u64, TimerToken), N> = Vec::new();
        for slot in self.slots.iter().filter(|slot| slot.deadline <= now) {
            // Both vectors share the capacity N, so this cannot overflow.
            let _ = due.push((slot.deadline, slot.token));
        }
        due.sort_unstable();

        self.slots.retain(|slot| slot.deadline > now || slot.period.is_some());
        for slot in self.slots.iter_mut().filter(|slot| slot.deadline <= now) {
            if let Some(period) = slot.period {
                let period = u64::from(period);
                let missed = (now - slot.deadline) / period;
                slot.deadline += (missed + 1) * period;
            }
        }

        due.into_iter().map(|(_, token)| token).collect()
    }
}

impl<const N: usize> TimerBackend for TickTimers<N> {
    type Error = TickError;

    fn arm(&mut self, token: TimerToken, ticks: u32, mode: TimerMode) -> Result<(), Self::Error> {
        self.slots.retain(|slot| slot.token.handle() != token.handle());

        let ticks = ticks.max(1);
        let period = match mode {
            TimerMode::OneShot => None,
            TimerMode::Repeated => Some(ticks),
        };
        self.slots
            .push(Slot {
                token,
                deadline: self.now + u64::from(ticks),
                period,
            })
            .map_err(|_| TickError::SlotsExhausted(N))
    }

    fn disarm(&mut self, handle: TimerHandle) -> Result<(), Self::Error> {
        self.slots.retain(|slot| slot.token.handle() != handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: TimerToken = TimerToken::new(TimerHandle::new(10), 1);
    const B: TimerToken = TimerToken::new(TimerHandle::new(20), 1);

    #[test]
    fn test_one_shot_expires_once() {
        let mut timers = TickTimers::<2>::new();
        timers.arm(A, 5, TimerMode::OneShot).unwrap();
        assert_eq!(timers.next_expiry(), Some(5));

        assert!(timers.advance(4).is_empty());
        assert_eq!(timers.advance(1).as_slice(), &[A]);
        assert!(timers.advance(100).is_empty());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_expiries_ordered_by_deadline() {
        let mut timers = TickTimers::<2>::new();
        timers.arm(B, 8, TimerMode::OneShot).unwrap();
        timers.arm(A, 3, TimerMode::OneShot).unwrap();
        assert_eq!(timers.advance(10).as_slice(), &[A, B]);
    }

    #[test]
    fn test_repeated_reschedules_on_grid() {
        let mut timers = TickTimers::<2>::new();
        timers.arm(A, 10, TimerMode::Repeated).unwrap();

        assert_eq!(timers.advance(10).as_slice(), &[A]);
        assert_eq!(timers.next_expiry(), Some(10));
        // Two and a half periods late: reported once, next deadline stays on the grid.
        assert_eq!(timers.advance(25).as_slice(), &[A]);
        assert_eq!(timers.now(), 35);
        assert_eq!(timers.next_expiry(), Some(5));
        assert!(timers.is_armed(A.handle()));
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut timers = TickTimers::<2>::new();
        timers.arm(A, 5, TimerMode::OneShot).unwrap();
        timers.advance(4);
        let rearmed = TimerToken::new(A.handle(), 2);
        timers.arm(rearmed, 5, TimerMode::OneShot).unwrap();
        assert_eq!(timers.pending(), 1);
        assert!(timers.advance(4).is_empty());
        assert_eq!(timers.advance(1).as_slice(), &[rearmed]);
    }

    #[test]
    fn test_disarm_and_exhaustion() {
        let mut timers = TickTimers::<1>::new();
        timers.arm(A, 5, TimerMode::OneShot).unwrap();
        assert_eq!(timers.arm(B, 5, TimerMode::OneShot), Err(TickError::SlotsExhausted(1)));

        timers.disarm(A.handle()).unwrap();
        assert!(timers.advance(10).is_empty());
        assert!(timers.arm(B, 5, TimerMode::OneShot).is_ok());
    }
}
