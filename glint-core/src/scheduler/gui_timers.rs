//! Tick and render timers for the graphics runtime

use super::timer::{TimerError, TimerId, TimerService};
use crate::config::TimerConfig;
use crate::traits::{GuiHooks, RenderOutcome};

/// What one [`GuiTimers::poll`] call dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollSummary<E> {
    /// Tick timer firings
    pub ticks: u32,
    /// Render timer firings
    pub renders: u32,
    /// Deadlines coalesced across both timers
    pub skipped: u32,
    /// Name of the last timer that skipped deadlines
    pub late: Option<&'static str>,
    /// Outcome of the last successful render pass
    pub outcome: Option<RenderOutcome>,
    /// Error of the last failed render pass
    pub error: Option<E>,
}

impl<E> Default for PollSummary<E> {
    fn default() -> Self {
        Self {
            ticks: 0,
            renders: 0,
            skipped: 0,
            late: None,
            outcome: None,
            error: None,
        }
    }
}

/// The two periodic timers that drive the graphics runtime
///
/// The tick timer advances the millisecond counter by the elapsed tick
/// period; the render timer runs one render pass. Both are started once
/// and never stopped.
#[derive(Debug)]
pub struct GuiTimers {
    service: TimerService<2>,
    tick: TimerId,
    render: TimerId,
    tick_period_us: u32,
    // Sub-millisecond remainder of tick periods
    carry_us: u32,
}

impl GuiTimers {
    pub fn start(config: &TimerConfig, now_us: u64) -> Result<Self, TimerError> {
        let mut service = TimerService::new();
        let tick = service.start_periodic("tick", config.tick_period_us, now_us)?;
        let render = service.start_periodic("render", config.render_period_us, now_us)?;
        Ok(Self {
            service,
            tick,
            render,
            tick_period_us: config.tick_period_us,
            carry_us: 0,
        })
    }

    pub fn service(&self) -> &TimerService<2> {
        &self.service
    }

    /// Fire due timers into `hooks`
    ///
    /// A tick firing counts one period even if deadlines were skipped, so
    /// the millisecond counter lags wall time after a late poll.
    pub fn poll<H: GuiHooks>(&mut self, now_us: u64, hooks: &mut H) -> PollSummary<H::Error> {
        let mut summary = PollSummary::default();
        let (tick, render, period) = (self.tick, self.render, self.tick_period_us);
        let carry = &mut self.carry_us;

        self.service.poll(now_us, |fired| {
            summary.skipped = summary.skipped.saturating_add(fired.skipped);
            if fired.skipped > 0 {
                summary.late = Some(fired.name);
            }
            if fired.id == tick {
                // Carry stays below 1000, so the sum fits easily in u64
                let total = *carry as u64 + period as u64;
                *carry = (total % 1000) as u32;
                let ms = (total / 1000) as u32;
                if ms > 0 {
                    hooks.tick(ms);
                }
                summary.ticks += 1;
            } else if fired.id == render {
                summary.renders += 1;
                match hooks.render_step() {
                    Ok(outcome) => summary.outcome = Some(outcome),
                    Err(e) => summary.error = Some(e),
                }
            }
        });
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Records what the timers call
    #[derive(Default)]
    struct MockHooks {
        ms: u32,
        renders: u32,
        ms_at_render: Option<u32>,
        fail: bool,
    }

    impl GuiHooks for MockHooks {
        type Error = ();

        fn tick(&mut self, elapsed_ms: u32) {
            self.ms += elapsed_ms;
        }

        fn render_step(&mut self) -> Result<RenderOutcome, ()> {
            self.renders += 1;
            self.ms_at_render = Some(self.ms);
            if self.fail {
                Err(())
            } else {
                Ok(RenderOutcome::Idle)
            }
        }
    }

    #[test]
    fn test_five_ms_of_polling() {
        let mut timers = GuiTimers::start(&TimerConfig::default(), 0).unwrap();
        let mut hooks = MockHooks::default();

        for t in (0..=5000).step_by(1000) {
            let summary = timers.poll(t, &mut hooks);
            assert_eq!(summary.skipped, 0);
            assert!(summary.error.is_none());
        }

        assert_eq!(hooks.ms, 5);
        assert_eq!(hooks.renders, 1);
        // Tick is registered first, so the render at 5 ms sees all five ticks
        assert_eq!(hooks.ms_at_render, Some(5));
    }

    #[test]
    fn test_late_poll_reports_skipped() {
        let mut timers = GuiTimers::start(&TimerConfig::default(), 0).unwrap();
        let mut hooks = MockHooks::default();

        let summary = timers.poll(12_500, &mut hooks);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.renders, 1);
        // Tick missed 1..=11 ms (11 skipped), render missed 5 ms (1 skipped)
        assert_eq!(summary.skipped, 12);
        assert_eq!(summary.late, Some("render"));
        assert_eq!(hooks.ms, 1);
        assert_eq!(summary.outcome, Some(RenderOutcome::Idle));
    }

    #[test]
    fn test_render_error_surfaces() {
        let mut timers = GuiTimers::start(&TimerConfig::default(), 0).unwrap();
        let mut hooks = MockHooks {
            fail: true,
            ..Default::default()
        };

        let summary = timers.poll(5000, &mut hooks);
        assert_eq!(summary.renders, 1);
        assert_eq!(summary.error, Some(()));
        assert_eq!(summary.outcome, None);
    }

    #[test]
    fn test_sub_millisecond_ticks_accumulate() {
        let config = TimerConfig {
            tick_period_us: 500,
            render_period_us: 5000,
        };
        let mut timers = GuiTimers::start(&config, 0).unwrap();
        let mut hooks = MockHooks::default();

        for t in (500..=3000).step_by(500) {
            timers.poll(t, &mut hooks);
        }
        assert_eq!(hooks.ms, 3);
    }

    #[test]
    fn test_longest_tick_period_keeps_carry() {
        let config = TimerConfig {
            tick_period_us: u32::MAX,
            render_period_us: u32::MAX,
        };
        let mut timers = GuiTimers::start(&config, 0).unwrap();
        let mut hooks = MockHooks::default();
        let period = u32::MAX as u64;

        let first = timers.poll(period, &mut hooks);
        assert_eq!(first.ticks, 1);
        assert_eq!(hooks.ms, 4_294_967);

        // 295 us carried from the first firing plus a full period
        let second = timers.poll(2 * period, &mut hooks);
        assert_eq!(second.ticks, 1);
        assert_eq!(second.skipped, 0);
        assert_eq!(hooks.ms, 2 * 4_294_967);
        assert_eq!(timers.carry_us, 590);
    }

    #[test]
    fn test_on_time_poll_reports_no_late_timer() {
        let mut timers = GuiTimers::start(&TimerConfig::default(), 0).unwrap();
        let mut hooks = MockHooks::default();
        assert_eq!(timers.poll(1000, &mut hooks).late, None);
        assert_eq!(timers.poll(3500, &mut hooks).late, Some("tick"));
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = TimerConfig {
            tick_period_us: 1000,
            render_period_us: 0,
        };
        assert_eq!(
            GuiTimers::start(&config, 0).err(),
            Some(TimerError::ZeroPeriod)
        );
    }
}
