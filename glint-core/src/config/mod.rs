//! Configuration types
//!
//! Board-level configuration shared by the build-time validator and
//! the firmware. All types are `Copy` so a board description can live
//! in a `const`.

mod board;

pub use board::{
    BoardConfig, ColorOrder, ConfigError, PanelConfig, TimerConfig, BYTES_PER_PIXEL,
    CONTROLLER_RAM_HEIGHT, CONTROLLER_RAM_WIDTH,
};
