//! SPI panel transport
//!
//! MIPI-DBI type C framing over a 4-wire SPI bus, provided by mipidsi's
//! [`SpiInterface`]: the data/command pin is held low while the command
//! byte is clocked out and high for the parameters or pixel payload.
//! Pixels are copied through a caller-supplied batch buffer, one SPI write
//! per filled batch. Chip select belongs to the [`SpiDevice`].

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use glint_core::config::ConfigError;
use glint_hal::{BusConfig, PanelIo, PanelIoConfig, PanelIoConfigError};
use mipidsi::interface::{Interface, SpiError, SpiInterface};

/// Transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiIoError<S, P> {
    /// Bus transfer failed
    Spi(S),
    /// Data/command pin failed
    Pin(P),
}

impl<S, P> From<SpiError<S, P>> for SpiIoError<S, P> {
    fn from(e: SpiError<S, P>) -> Self {
        match e {
            SpiError::Spi(e) => SpiIoError::Spi(e),
            SpiError::Dc(e) => SpiIoError::Pin(e),
        }
    }
}

/// [`PanelIo`] over an embedded-hal [`SpiDevice`] and a D/C pin
pub struct SpiPanelIo<'a, SPI, DC> {
    di: SpiInterface<'a, SPI, DC>,
    batch_bytes: usize,
}

impl<'a, SPI, DC> SpiPanelIo<'a, SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create the transport after validating both configurations
    ///
    /// The batch buffer is cut to the bus transfer limit and to whole
    /// pixels. The interface frames 8-bit commands and parameters only.
    pub fn new(
        spi: SPI,
        dc: DC,
        buffer: &'a mut [u8],
        io: &PanelIoConfig,
        bus: &BusConfig,
    ) -> Result<Self, ConfigError> {
        io.validate()?;
        bus.validate()?;
        for bits in [io.cmd_bits, io.param_bits] {
            if bits != 8 {
                return Err(PanelIoConfigError::UnsupportedWidth(bits).into());
            }
        }

        let batch_bytes = buffer.len().min(bus.max_transfer_bytes) & !1;
        if batch_bytes == 0 {
            return Err(ConfigError::TransferTooSmall);
        }
        let (batch, _) = buffer.split_at_mut(batch_bytes);

        Ok(Self {
            di: SpiInterface::new(spi, dc, batch),
            batch_bytes,
        })
    }

    /// Largest pixel write issued on the bus
    pub fn batch_bytes(&self) -> usize {
        self.batch_bytes
    }
}

impl<SPI, DC> PanelIo for SpiPanelIo<'_, SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = SpiIoError<SPI::Error, DC::Error>;

    fn tx_param(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.di.send_command(cmd, params)?;
        Ok(())
    }

    fn tx_color(&mut self, cmd: u8, pixels: &[u8]) -> Result<(), Self::Error> {
        self.di.send_command(cmd, &[])?;
        if pixels.is_empty() {
            return Ok(());
        }
        // RGB565, already in wire byte order
        self.di
            .send_pixels(pixels.chunks_exact(2).map(|p| [p[0], p[1]]))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::{ErrorKind, ErrorType, Operation};
    use glint_core::config::BoardConfig;
    use heapless::Vec;
    use proptest::prelude::*;

    #[derive(Debug, PartialEq)]
    struct Write {
        dc_high: bool,
        len: usize,
        head: Vec<u8, 4>,
    }

    /// Shared wire state: D/C level and every non-empty write
    #[derive(Default)]
    struct Wire {
        dc_high: Cell<bool>,
        writes: RefCell<Vec<Write, 64>>,
        fail: Cell<bool>,
    }

    struct MockSpi<'a>(&'a Wire);

    impl ErrorType for MockSpi<'_> {
        type Error = ErrorKind;
    }

    impl SpiDevice for MockSpi<'_> {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
            if self.0.fail.get() {
                return Err(ErrorKind::Other);
            }
            for op in operations.iter() {
                if let Operation::Write(buf) = op {
                    if buf.is_empty() {
                        continue;
                    }
                    let n = buf.len().min(4);
                    self.0
                        .writes
                        .borrow_mut()
                        .push(Write {
                            dc_high: self.0.dc_high.get(),
                            len: buf.len(),
                            head: Vec::from_slice(&buf[..n]).unwrap(),
                        })
                        .unwrap();
                }
            }
            Ok(())
        }
    }

    struct MockDc<'a>(&'a Wire);

    impl PinErrorType for MockDc<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockDc<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.dc_high.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.dc_high.set(true);
            Ok(())
        }
    }

    fn transport<'a>(
        wire: &'a Wire,
        buffer: &'a mut [u8],
    ) -> SpiPanelIo<'a, MockSpi<'a>, MockDc<'a>> {
        let board = BoardConfig::pico_lcd_1_14();
        SpiPanelIo::new(MockSpi(wire), MockDc(wire), buffer, &board.io, &board.bus).unwrap()
    }

    #[test]
    fn test_command_then_params() {
        let wire = Wire::default();
        let mut buffer = [0u8; 64];
        let mut io = transport(&wire, &mut buffer);
        io.tx_param(0x2A, &[0x00, 0x28, 0x01, 0x17]).unwrap();

        let writes = wire.writes.borrow();
        assert_eq!(writes.len(), 2);
        assert!(!writes[0].dc_high);
        assert_eq!(writes[0].head.as_slice(), &[0x2A]);
        assert!(writes[1].dc_high);
        assert_eq!(writes[1].head.as_slice(), &[0x00, 0x28, 0x01, 0x17]);
    }

    #[test]
    fn test_command_without_params() {
        let wire = Wire::default();
        let mut buffer = [0u8; 64];
        let mut io = transport(&wire, &mut buffer);
        io.tx_param(0x29, &[]).unwrap();

        let writes = wire.writes.borrow();
        assert_eq!(writes.len(), 1);
        assert!(!writes[0].dc_high);
    }

    #[test]
    fn test_pixels_follow_command_as_data() {
        let wire = Wire::default();
        let mut buffer = [0u8; 512];
        let mut io = transport(&wire, &mut buffer);
        let pixels = [0xF8, 0x00, 0xFF, 0xFF];
        io.tx_color(0x2C, &pixels).unwrap();

        let writes = wire.writes.borrow();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].head.as_slice(), &[0x2C]);
        assert!(!writes[0].dc_high);
        assert!(writes[1].dc_high);
        assert_eq!(writes[1].head.as_slice(), &pixels);
    }

    #[test]
    fn test_batch_cut_to_transfer_limit() {
        let wire = Wire::default();
        let board = BoardConfig::pico_lcd_1_14();
        let mut bus = board.bus;
        bus.max_transfer_bytes = 101;
        let mut buffer = [0u8; 512];
        let io = SpiPanelIo::new(MockSpi(&wire), MockDc(&wire), &mut buffer, &board.io, &bus)
            .unwrap();
        assert_eq!(io.batch_bytes(), 100);
    }

    #[test]
    fn test_sixteen_bit_words_rejected() {
        let wire = Wire::default();
        let board = BoardConfig::pico_lcd_1_14();
        let mut io = board.io;
        io.cmd_bits = 16;
        let mut buffer = [0u8; 64];
        assert_eq!(
            SpiPanelIo::new(MockSpi(&wire), MockDc(&wire), &mut buffer, &io, &board.bus).err(),
            Some(ConfigError::PanelIo(PanelIoConfigError::UnsupportedWidth(16)))
        );
    }

    #[test]
    fn test_batch_smaller_than_pixel_rejected() {
        let wire = Wire::default();
        let board = BoardConfig::pico_lcd_1_14();
        let mut buffer = [0u8; 1];
        assert_eq!(
            SpiPanelIo::new(MockSpi(&wire), MockDc(&wire), &mut buffer, &board.io, &board.bus)
                .err(),
            Some(ConfigError::TransferTooSmall)
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let wire = Wire::default();
        let board = BoardConfig::pico_lcd_1_14();
        let mut io = board.io;
        io.trans_queue_depth = 0;
        let mut buffer = [0u8; 64];
        assert!(
            SpiPanelIo::new(MockSpi(&wire), MockDc(&wire), &mut buffer, &io, &board.bus).is_err()
        );
    }

    #[test]
    fn test_bus_error_propagates() {
        let wire = Wire::default();
        let mut buffer = [0u8; 64];
        let mut io = transport(&wire, &mut buffer);
        wire.fail.set(true);
        assert_eq!(
            io.tx_param(0x11, &[]),
            Err(SpiIoError::Spi(ErrorKind::Other))
        );
    }

    proptest! {
        #[test]
        fn prop_pixels_batched(half_len in 1usize..1000, half_batch in 20usize..256) {
            let (len, batch) = (half_len * 2, half_batch * 2);
            let wire = Wire::default();
            let mut buffer = [0u8; 512];
            let mut io = transport(&wire, &mut buffer[..batch]);
            let pixels = [0u8; 2000];
            io.tx_color(0x2C, &pixels[..len]).unwrap();

            let writes = wire.writes.borrow();
            let data = &writes[1..];
            prop_assert_eq!(data.len(), len.div_ceil(batch));
            prop_assert!(data.iter().all(|w| w.dc_high && w.len <= batch));
            prop_assert_eq!(data.iter().map(|w| w.len).sum::<usize>(), len);
        }
    }
}
