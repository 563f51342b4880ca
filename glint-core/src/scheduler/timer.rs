//! Fixed-capacity periodic timers

use heapless::Vec;

/// Handle returned by [`TimerService::start_periodic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(pub u8);

/// Timer registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Period of zero microseconds
    ZeroPeriod,
    /// Service already holds its maximum number of timers
    Full,
}

/// One registered periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTimer {
    pub id: TimerId,
    /// Name reported with each firing for logging
    pub name: &'static str,
    pub period_us: u32,
    /// Absolute deadline of the next firing
    pub next_due_us: u64,
}

/// A timer firing reported by [`TimerService::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fired {
    pub id: TimerId,
    pub name: &'static str,
    /// Deadlines that passed without a firing of their own
    pub skipped: u32,
}

/// Periodic timer list
///
/// Timers fire in registration order. A timer that fell behind by several
/// periods fires once; the missed deadlines are reported in
/// [`Fired::skipped`] and not replayed.
#[derive(Debug)]
pub struct TimerService<const N: usize> {
    timers: Vec<PeriodicTimer, N>,
}

impl<const N: usize> Default for TimerService<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TimerService<N> {
    pub const fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Register a timer whose first firing is at `now_us + period_us`
    pub fn start_periodic(
        &mut self,
        name: &'static str,
        period_us: u32,
        now_us: u64,
    ) -> Result<TimerId, TimerError> {
        if period_us == 0 {
            return Err(TimerError::ZeroPeriod);
        }
        let id = TimerId(self.timers.len() as u8);
        self.timers
            .push(PeriodicTimer {
                id,
                name,
                period_us,
                next_due_us: now_us + period_us as u64,
            })
            .map_err(|_| TimerError::Full)?;
        Ok(id)
    }

    pub fn get(&self, id: TimerId) -> Option<&PeriodicTimer> {
        self.timers.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.next_due_us).min()
    }

    /// Fire every timer due at `now_us`
    ///
    /// Each due timer is rescheduled to its first deadline strictly after
    /// `now_us`. Returns the number of timers fired.
    pub fn poll(&mut self, now_us: u64, mut on_fire: impl FnMut(Fired)) -> usize {
        let mut fired = 0;
        for timer in self.timers.iter_mut() {
            if now_us < timer.next_due_us {
                continue;
            }
            let period = timer.period_us as u64;
            let missed = (now_us - timer.next_due_us) / period;
            timer.next_due_us += period * (missed + 1);
            fired += 1;
            on_fire(Fired {
                id: timer.id,
                name: timer.name,
                skipped: missed.min(u32::MAX as u64) as u32,
            });
        }
        fired
    }
}
