//! Embassy async tasks

pub mod timer;

pub use timer::gui_timer_task;
