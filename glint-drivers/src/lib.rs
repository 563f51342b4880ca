//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in glint-core and glint-hal on top of embedded-hal 1.0:
//!
//! - ST7789 panel controller ([`st7789`])
//! - SPI panel transport with a data/command pin ([`spi_io`])
//! - GPIO backlight ([`backlight`])

#![no_std]
#![deny(unsafe_code)]

pub mod backlight;
pub mod spi_io;
pub mod st7789;

pub use backlight::Backlight;
pub use spi_io::{SpiIoError, SpiPanelIo};
pub use st7789::{NoPin, PanelDevConfig, PanelError, St7789};
