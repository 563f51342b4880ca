//! Panel I/O transport
//!
//! A panel controller is driven with framed transactions: one command
//! word followed by either parameter bytes or a bulk pixel payload.
//! Implementations own the bus device, the data/command select pin and
//! chip select.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::spi::Mode;

/// Transport to a panel controller
pub trait PanelIo {
    /// Error type for transport operations
    type Error;

    /// Send a command followed by its (possibly empty) parameter bytes
    fn tx_param(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error>;

    /// Send a command followed by packed pixel data
    ///
    /// The transport may split `pixels` into several bus transfers but
    /// must deliver them in order under a single command.
    fn tx_color(&mut self, cmd: u8, pixels: &[u8]) -> Result<(), Self::Error>;
}

impl<T: PanelIo> PanelIo for &mut T {
    type Error = T::Error;

    fn tx_param(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error> {
        T::tx_param(self, cmd, params)
    }

    fn tx_color(&mut self, cmd: u8, pixels: &[u8]) -> Result<(), Self::Error> {
        T::tx_color(self, cmd, pixels)
    }
}

/// Panel I/O configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelIoConfigError {
    /// Data/command and chip-select share a pin
    PinConflict(u8),
    /// Pixel clock is zero
    ZeroClock,
    /// Transaction queue must hold at least one entry
    ZeroQueueDepth,
    /// Command or parameter width other than 8 or 16 bits
    UnsupportedWidth(u8),
}

/// Panel I/O transport configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelIoConfig {
    /// Data/command select pin
    pub dc: u8,
    /// Chip select pin
    pub cs: u8,
    /// Pixel clock in Hz
    pub pclk_hz: u32,
    /// SPI mode
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: Mode,
    /// Outstanding transactions allowed before the caller blocks
    pub trans_queue_depth: u8,
    /// Command word width in bits
    pub cmd_bits: u8,
    /// Parameter word width in bits
    pub param_bits: u8,
}

impl PanelIoConfig {
    /// Default transport for MIPI-DBI style SPI panels (8-bit commands and params)
    pub const fn spi(dc: u8, cs: u8, pclk_hz: u32) -> Self {
        Self {
            dc,
            cs,
            pclk_hz,
            mode: Mode::Mode0,
            trans_queue_depth: 10,
            cmd_bits: 8,
            param_bits: 8,
        }
    }

    /// Check the configuration for values the transport cannot honor
    pub fn validate(&self) -> Result<(), PanelIoConfigError> {
        if self.dc == self.cs {
            return Err(PanelIoConfigError::PinConflict(self.dc));
        }
        if self.pclk_hz == 0 {
            return Err(PanelIoConfigError::ZeroClock);
        }
        if self.trans_queue_depth == 0 {
            return Err(PanelIoConfigError::ZeroQueueDepth);
        }
        for bits in [self.cmd_bits, self.param_bits] {
            if bits != 8 && bits != 16 {
                return Err(PanelIoConfigError::UnsupportedWidth(bits));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spi_defaults() {
        let cfg = PanelIoConfig::spi(8, 9, 40_000_000);
        assert_eq!(cfg.mode, Mode::Mode0);
        assert_eq!(cfg.trans_queue_depth, 10);
        assert_eq!(cfg.cmd_bits, 8);
        assert_eq!(cfg.param_bits, 8);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_queue() {
        let mut cfg = PanelIoConfig::spi(8, 9, 40_000_000);
        cfg.trans_queue_depth = 0;
        assert_eq!(cfg.validate(), Err(PanelIoConfigError::ZeroQueueDepth));
    }

    #[test]
    fn test_rejects_odd_width() {
        let mut cfg = PanelIoConfig::spi(8, 9, 40_000_000);
        cfg.param_bits = 9;
        assert_eq!(cfg.validate(), Err(PanelIoConfigError::UnsupportedWidth(9)));
    }

    #[test]
    fn test_rejects_shared_pin() {
        let cfg = PanelIoConfig::spi(8, 8, 40_000_000);
        assert_eq!(cfg.validate(), Err(PanelIoConfigError::PinConflict(8)));
    }
}
