//! Hooks the periodic timers call into the graphics runtime

/// Result of one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOutcome {
    /// Nothing was invalidated
    Idle,
    /// A frame was rendered and handed to the flush callback
    Flushed,
    /// The previous flush has not signaled completion yet
    Busy,
}

/// Entry points the timer service drives
///
/// Both hooks must return quickly; they run from the timer dispatch
/// context shared with every other periodic timer.
pub trait GuiHooks {
    /// Error type for a render pass
    type Error;

    /// Advance the millisecond tick counter
    fn tick(&mut self, elapsed_ms: u32);

    /// One synchronous pass: pending input, animations, repaint of dirty regions
    fn render_step(&mut self) -> Result<RenderOutcome, Self::Error>;
}
