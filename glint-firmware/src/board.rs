//! Board description and GPIO allocation
//!
//! `BOARD` is generated by build.rs from board.toml after validation.
//! Panel control pins are taken from a [`PinBank`] by number; the SPI
//! clock and data pins are fixed to SPI1's GPIO10/GPIO11 routing.

use embassy_rp::gpio::{AnyPin, Output};
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_rp::Peri;
use embassy_time::Delay;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use glint_core::config::{BoardConfig, ColorOrder, PanelConfig, TimerConfig};
use glint_core::gui::DeviceContext;
use glint_drivers::{SpiPanelIo, St7789};
use glint_hal::{BusConfig, DmaChannel, Mode, PanelIoConfig, Phase, Polarity};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// Bytes in one full-frame draw buffer
pub const FRAME_BYTES: usize = BOARD.buffer_bytes();

/// Pixel batch of the SPI transport: sixteen panel rows
pub const PIXEL_BATCH_BYTES: usize = BOARD.panel.width as usize * 2 * 16;

const _: () = assert!(
    BOARD.bus.sclk == 10 && BOARD.bus.mosi == 11,
    "board.toml: SPI1 is wired to sclk = 10, mosi = 11"
);

pub type LcdSpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, NoDelay>;
pub type LcdIo = SpiPanelIo<'static, LcdSpi, Output<'static>>;
pub type LcdPanel = St7789<LcdIo, Output<'static>, Delay>;
pub type Gui = DeviceContext<'static, LcdPanel>;

/// SPI1 configuration from the panel transport settings
pub fn spi_config(io: &PanelIoConfig) -> spi::Config {
    let (polarity, phase): (Polarity, Phase) = io.mode.into();
    let mut config = spi::Config::default();
    config.frequency = io.pclk_hz;
    config.polarity = match polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    config.phase = match phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    config
}

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken or reserved for the SPI bus
    Unavailable(u8),
}

/// GPIO pins available for board-configured functions
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; 30],
}

impl PinBank {
    pub fn new(pins: [Option<Peri<'static, AnyPin>>; 30]) -> Self {
        Self { pins }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin(pin_num))?
            .take()
            .ok_or(PinError::Unavailable(pin_num))
    }
}

/// Build a [`PinBank`] from every GPIO except the SPI1 pins
///
/// Moves the pins out of `$p` field by field, so `$p.SPI1`, `$p.PIN_10`
/// and `$p.PIN_11` stay usable afterwards.
macro_rules! gpio_bank {
    ($p:ident) => {
        $crate::board::PinBank::new({
            use embassy_rp::gpio::AnyPin;
            use embassy_rp::Peri;
            let mut pins: [Option<Peri<'static, AnyPin>>; 30] = core::array::from_fn(|_| None);
            pins[0] = Some($p.PIN_0.into());
            pins[1] = Some($p.PIN_1.into());
            pins[2] = Some($p.PIN_2.into());
            pins[3] = Some($p.PIN_3.into());
            pins[4] = Some($p.PIN_4.into());
            pins[5] = Some($p.PIN_5.into());
            pins[6] = Some($p.PIN_6.into());
            pins[7] = Some($p.PIN_7.into());
            pins[8] = Some($p.PIN_8.into());
            pins[9] = Some($p.PIN_9.into());
            pins[12] = Some($p.PIN_12.into());
            pins[13] = Some($p.PIN_13.into());
            pins[14] = Some($p.PIN_14.into());
            pins[15] = Some($p.PIN_15.into());
            pins[16] = Some($p.PIN_16.into());
            pins[17] = Some($p.PIN_17.into());
            pins[18] = Some($p.PIN_18.into());
            pins[19] = Some($p.PIN_19.into());
            pins[20] = Some($p.PIN_20.into());
            pins[21] = Some($p.PIN_21.into());
            pins[22] = Some($p.PIN_22.into());
            pins[23] = Some($p.PIN_23.into());
            pins[24] = Some($p.PIN_24.into());
            pins[25] = Some($p.PIN_25.into());
            pins[26] = Some($p.PIN_26.into());
            pins[27] = Some($p.PIN_27.into());
            pins[28] = Some($p.PIN_28.into());
            pins[29] = Some($p.PIN_29.into());
            pins
        })
    };
}

pub(crate) use gpio_bank;

/// DMA selection as seen by the blocking SPI transport
pub fn dma_mode(dma: DmaChannel) -> &'static str {
    match dma {
        DmaChannel::Auto => "auto (none claimed, blocking transfers)",
        DmaChannel::Fixed(_) => "fixed (ignored, blocking transfers)",
        DmaChannel::Disabled => "disabled",
    }
}
