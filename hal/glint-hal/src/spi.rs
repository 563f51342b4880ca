//! SPI bus abstractions
//!
//! Describes how a serial peripheral bus is configured before a panel
//! transport is layered on top of it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

/// DMA channel selection for bus transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DmaChannel {
    /// Let the platform pick the first free channel
    #[default]
    Auto,
    /// Use a specific channel number
    Fixed(u8),
    /// CPU-driven transfers only
    Disabled,
}

/// Bus configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusConfigError {
    /// Clock and data-out must be different pins
    PinConflict(u8),
    /// Maximum transfer size is zero
    ZeroTransferSize,
}

/// SPI bus configuration
///
/// Pins are plain GPIO numbers. The bus is write-only when `miso` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Clock pin
    pub sclk: u8,
    /// Data-out pin
    pub mosi: u8,
    /// Data-in pin (unused for display-only buses)
    #[cfg_attr(feature = "serde", serde(default))]
    pub miso: Option<u8>,
    /// Largest single transfer in bytes
    pub max_transfer_bytes: usize,
    /// DMA channel selection
    #[cfg_attr(feature = "serde", serde(default))]
    pub dma: DmaChannel,
}

impl BusConfig {
    /// Create a write-only bus config with automatic DMA channel selection
    pub const fn write_only(sclk: u8, mosi: u8, max_transfer_bytes: usize) -> Self {
        Self {
            sclk,
            mosi,
            miso: None,
            max_transfer_bytes,
            dma: DmaChannel::Auto,
        }
    }

    /// Check pin assignment and transfer size
    pub fn validate(&self) -> Result<(), BusConfigError> {
        if self.sclk == self.mosi {
            return Err(BusConfigError::PinConflict(self.sclk));
        }
        if let Some(miso) = self.miso {
            if miso == self.sclk || miso == self.mosi {
                return Err(BusConfigError::PinConflict(miso));
            }
        }
        if self.max_transfer_bytes == 0 {
            return Err(BusConfigError::ZeroTransferSize);
        }
        Ok(())
    }
}
