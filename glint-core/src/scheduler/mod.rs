//! Periodic timer scheduling
//!
//! [`TimerService`] is a small fixed-capacity periodic timer list polled
//! against a microsecond clock. [`GuiTimers`] registers the two timers
//! that drive the graphics runtime and routes their firings to
//! [`GuiHooks`](crate::traits::GuiHooks).

pub mod gui_timers;
pub mod timer;

pub use gui_timers::{GuiTimers, PollSummary};
pub use timer::{Fired, PeriodicTimer, TimerError, TimerId, TimerService};
