//! Graphics runtime
//!
//! Owns the display surface and the active screen and reads the shared
//! tick counter. The render timer calls [`Runtime::timer_handler`]; the
//! tick timer calls [`GuiHooks::tick`].

use super::{Display, DisplayError, FlushCallback, PanelFlush, Screen, TickCounter};
use crate::traits::{GuiHooks, RenderOutcome};

/// Runtime bound to a panel-backed flush callback
///
/// This is the single device context built at startup: panel, display
/// surface, buffers and screen all live behind it.
pub type DeviceContext<'a, P> = Runtime<'a, PanelFlush<P>>;

pub struct Runtime<'a, F> {
    display: Display<'a, F>,
    screen: Screen,
    ticks: &'a TickCounter,
    last_pass_ms: u32,
    passes: u32,
}

impl<'a, F: FlushCallback> Runtime<'a, F> {
    pub fn new(display: Display<'a, F>, ticks: &'a TickCounter) -> Self {
        Self {
            display,
            screen: Screen::new(),
            ticks,
            last_pass_ms: ticks.get(),
            passes: 0,
        }
    }

    pub fn display(&self) -> &Display<'a, F> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<'a, F> {
        &mut self.display
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn ticks(&self) -> &TickCounter {
        self.ticks
    }

    /// Render passes run so far (wrapping)
    pub fn render_passes(&self) -> u32 {
        self.passes
    }

    /// Tick count seen by the most recent render pass
    pub fn last_pass_ms(&self) -> u32 {
        self.last_pass_ms
    }

    /// Run one render pass
    ///
    /// No input devices are registered and no animations run, so the
    /// pass samples the tick counter and repaints if the screen changed.
    pub fn timer_handler(&mut self) -> Result<RenderOutcome, DisplayError> {
        self.passes = self.passes.wrapping_add(1);
        self.last_pass_ms = self.ticks.get();

        if self.screen.take_dirty() {
            self.display.invalidate();
        }

        let screen = &self.screen;
        self.display.refresh(|fb| {
            screen.draw(fb).ok();
        })
    }
}

impl<F: FlushCallback> GuiHooks for Runtime<'_, F> {
    type Error = DisplayError;

    fn tick(&mut self, elapsed_ms: u32) {
        self.ticks.inc(elapsed_ms);
    }

    fn render_step(&mut self) -> Result<RenderOutcome, Self::Error> {
        self.timer_handler()
    }
}
