//! Glint Hardware Abstraction Layer
//!
//! This crate defines the bus and transport contracts shared by the
//! board-agnostic core, the panel drivers and the chip-specific firmware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (glint-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  glint-core   │       │ glint-drivers │
//! └───────────────┘       └───────────────┘
//!         │                       │
//!         └───────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  glint-hal (this crate - contracts)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`spi::BusConfig`], [`spi::Mode`] - SPI bus configuration
//! - [`panel_io::PanelIo`] - command/parameter/pixel transport to a panel controller
//! - [`panel_io::PanelIoConfig`] - transport configuration

#![no_std]
#![deny(unsafe_code)]

pub mod panel_io;
pub mod spi;

// Re-export key types at crate root for convenience
pub use panel_io::{PanelIo, PanelIoConfig, PanelIoConfigError};
pub use spi::{BusConfig, BusConfigError, DmaChannel, Mode, Phase, Polarity};
