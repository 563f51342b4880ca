//! Hardware and runtime abstraction traits
//!
//! These traits define the interface between the application logic
//! and the panel driver / graphics runtime implementations.

pub mod gui;
pub mod panel;

pub use gui::{GuiHooks, RenderOutcome};
pub use panel::Panel;
