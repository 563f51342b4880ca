//! Graphics runtime
//!
//! A small retained-mode layer over embedded-graphics:
//!
//! - [`Display`]: fixed-size surface with full-frame draw buffers and a flush callback
//! - [`FrameBuffer`]: RGB565 draw target over a caller-owned byte region
//! - [`PanelFlush`]: flush callback that writes frames to a [`Panel`](crate::traits::Panel)
//! - [`TickCounter`]: millisecond counter advanced by the tick timer
//! - [`Screen`] / [`Label`]: the scene that gets rendered
//! - [`Runtime`]: ties the above together behind [`GuiHooks`](crate::traits::GuiHooks)

mod area;
mod buffer;
mod display;
mod flush;
mod runtime;
mod scene;
mod tick;

pub use area::Area;
pub use buffer::FrameBuffer;
pub use display::{Display, DisplayError, FlushCallback, FlushReady};
pub use flush::{flush_to_panel, PanelFlush};
pub use runtime::{DeviceContext, Runtime};
pub use scene::{
    color_hex, mix, setup_hello, Align, Label, LabelId, Opacity, SceneError, Screen, HELLO_TEXT,
    MAX_LABELS, MAX_LABEL_TEXT,
};
pub use tick::TickCounter;
