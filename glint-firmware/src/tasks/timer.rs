//! GUI timer task
//!
//! Polls the tick and render timers against the embassy monotonic clock.
//! The ticker runs at the tick period, so under normal load every tick
//! deadline gets its own firing.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};
use glint_core::scheduler::GuiTimers;
use glint_core::traits::RenderOutcome;

use crate::board::{Gui, BOARD};

/// GUI timer task - dispatches tick and render firings into the runtime
#[embassy_executor::task]
pub async fn gui_timer_task(gui: &'static mut Gui, mut timers: GuiTimers) {
    info!("GUI timer task started");

    let mut ticker = Ticker::every(Duration::from_micros(BOARD.timers.tick_period_us as u64));
    let mut first_frame = true;

    loop {
        ticker.next().await;

        let summary = timers.poll(Instant::now().as_micros(), gui);

        if summary.skipped > 0 {
            warn!(
                "GUI timers late: {} deadlines skipped ({} timer)",
                summary.skipped,
                summary.late.unwrap_or("?")
            );
        }
        if let Some(e) = summary.error {
            error!("Render pass failed: {}", e);
        }
        if let Some(e) = gui.display_mut().flush_callback_mut().take_error() {
            error!("Flush to panel failed: {}", Debug2Format(&e));
        }

        if first_frame && summary.outcome == Some(RenderOutcome::Flushed) {
            first_frame = false;
            info!("First frame flushed at {} ms", gui.ticks().get());
        }
    }
}
