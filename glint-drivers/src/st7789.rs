//! ST7789 panel controller driver
//!
//! Drives an ST7789 over any [`PanelIo`] transport. The controller has
//! 240x320 pixels of frame memory; smaller panels sit at an offset inside
//! it, which [`Panel::set_gap`] compensates for on every draw window.
//!
//! Orientation is a single MADCTL register. Each orientation setter
//! updates the cached value and writes the whole register.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use glint_core::config::{ColorOrder, PanelConfig, BYTES_PER_PIXEL};
use glint_core::traits::Panel;
use glint_hal::PanelIo;

/// ST7789 commands
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// MADCTL bits
mod madctl {
    pub const MY: u8 = 0x80;
    pub const MX: u8 = 0x40;
    pub const MV: u8 = 0x20;
    pub const BGR: u8 = 0x08;
}

/// COLMOD value for 16 bits per pixel (RGB565 on both interfaces)
const COLMOD_16BPP: u8 = 0x55;

const HW_RESET_PULSE_MS: u32 = 10;
const HW_RESET_SETTLE_MS: u32 = 10;
const SW_RESET_SETTLE_MS: u32 = 20;
const SLEEP_OUT_MS: u32 = 100;

/// Panel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<IoE, PinE> {
    /// Transport failure
    Io(IoE),
    /// Reset pin failure
    Pin(PinE),
    /// Only 16 bits per pixel is supported
    UnsupportedBpp(u8),
    /// Operation called before the bring-up step it depends on
    OutOfOrder,
    /// Empty or unrepresentable draw window
    InvalidWindow,
    /// Pixel payload does not cover the draw window
    PixelLength { expected: usize, actual: usize },
}

/// Device-level settings fixed when the driver is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelDevConfig {
    pub color_order: ColorOrder,
    pub bits_per_pixel: u8,
}

impl PanelDevConfig {
    pub const fn from_panel(panel: &PanelConfig) -> Self {
        Self {
            color_order: panel.color_order,
            bits_per_pixel: panel.bits_per_pixel,
        }
    }
}

impl Default for PanelDevConfig {
    fn default() -> Self {
        Self {
            color_order: ColorOrder::Rgb,
            bits_per_pixel: 16,
        }
    }
}

/// Placeholder for a panel without a reset line
///
/// `St7789<IO, NoPin, D>` always resets through the software command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Bring-up progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    Created,
    Reset,
    Initialized,
    Running,
}

/// ST7789 driver
pub struct St7789<IO, RST, D> {
    io: IO,
    rst: Option<RST>,
    delay: D,
    madctl: u8,
    x_gap: u16,
    y_gap: u16,
    state: State,
    display_on: bool,
}

type DriverError<IO, RST> = PanelError<<IO as PanelIo>::Error, <RST as ErrorType>::Error>;

impl<IO, RST, D> St7789<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    /// Bind a driver to its transport
    ///
    /// No bus traffic happens until [`Panel::reset`].
    pub fn new(
        io: IO,
        rst: Option<RST>,
        delay: D,
        config: PanelDevConfig,
    ) -> Result<Self, DriverError<IO, RST>> {
        if config.bits_per_pixel != 16 {
            return Err(PanelError::UnsupportedBpp(config.bits_per_pixel));
        }
        let madctl = match config.color_order {
            ColorOrder::Rgb => 0,
            ColorOrder::Bgr => madctl::BGR,
        };
        Ok(Self {
            io,
            rst,
            delay,
            madctl,
            x_gap: 0,
            y_gap: 0,
            state: State::Created,
            display_on: false,
        })
    }

    /// Current MADCTL register value
    pub fn madctl(&self) -> u8 {
        self.madctl
    }

    pub fn gap(&self) -> (u16, u16) {
        (self.x_gap, self.y_gap)
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Give back the transport, reset pin and delay
    pub fn release(self) -> (IO, Option<RST>, D) {
        (self.io, self.rst, self.delay)
    }

    fn require(&self, state: State) -> Result<(), DriverError<IO, RST>> {
        if self.state < state {
            return Err(PanelError::OutOfOrder);
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), DriverError<IO, RST>> {
        self.io.tx_param(cmd, params).map_err(PanelError::Io)
    }

    fn write_madctl(&mut self) -> Result<(), DriverError<IO, RST>> {
        let value = self.madctl;
        self.command(cmd::MADCTL, &[value])
    }

    fn set_madctl_bit(&mut self, bit: u8, on: bool) {
        if on {
            self.madctl |= bit;
        } else {
            self.madctl &= !bit;
        }
    }
}

fn coords(start: u16, end_inclusive: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end_inclusive.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

impl<IO, RST, D> Panel for St7789<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    type Error = DriverError<IO, RST>;

    fn reset(&mut self) -> Result<(), Self::Error> {
        match self.rst.as_mut() {
            Some(rst) => {
                rst.set_low().map_err(PanelError::Pin)?;
                self.delay.delay_ms(HW_RESET_PULSE_MS);
                rst.set_high().map_err(PanelError::Pin)?;
                self.delay.delay_ms(HW_RESET_SETTLE_MS);
            }
            None => {
                self.command(cmd::SWRESET, &[])?;
                self.delay.delay_ms(SW_RESET_SETTLE_MS);
            }
        }
        self.state = State::Reset;
        self.display_on = false;
        Ok(())
    }

    fn init(&mut self) -> Result<(), Self::Error> {
        self.require(State::Reset)?;
        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(SLEEP_OUT_MS);
        self.write_madctl()?;
        self.command(cmd::COLMOD, &[COLMOD_16BPP])?;
        if self.state < State::Initialized {
            self.state = State::Initialized;
        }
        Ok(())
    }

    fn invert_color(&mut self, invert: bool) -> Result<(), Self::Error> {
        self.require(State::Initialized)?;
        self.command(if invert { cmd::INVON } else { cmd::INVOFF }, &[])
    }

    fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), Self::Error> {
        self.require(State::Initialized)?;
        self.set_madctl_bit(madctl::MX, mirror_x);
        self.set_madctl_bit(madctl::MY, mirror_y);
        self.write_madctl()
    }

    fn swap_xy(&mut self, swap: bool) -> Result<(), Self::Error> {
        self.require(State::Initialized)?;
        self.set_madctl_bit(madctl::MV, swap);
        self.write_madctl()
    }

    fn set_gap(&mut self, x_gap: u16, y_gap: u16) -> Result<(), Self::Error> {
        self.require(State::Initialized)?;
        self.x_gap = x_gap;
        self.y_gap = y_gap;
        Ok(())
    }

    fn disp_on_off(&mut self, on: bool) -> Result<(), Self::Error> {
        self.require(State::Initialized)?;
        self.command(if on { cmd::DISPON } else { cmd::DISPOFF }, &[])?;
        self.display_on = on;
        if on {
            self.state = State::Running;
        }
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
        pixels: &[u8],
    ) -> Result<(), Self::Error> {
        self.require(State::Running)?;
        if x_start >= x_end || y_start >= y_end {
            return Err(PanelError::InvalidWindow);
        }
        let expected =
            (x_end - x_start) as usize * (y_end - y_start) as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(PanelError::PixelLength {
                expected,
                actual: pixels.len(),
            });
        }

        let shift = |start: u16, end: u16, gap: u16| -> Option<(u16, u16)> {
            Some((start.checked_add(gap)?, (end - 1).checked_add(gap)?))
        };
        let (xs, xe) = shift(x_start, x_end, self.x_gap).ok_or(PanelError::InvalidWindow)?;
        let (ys, ye) = shift(y_start, y_end, self.y_gap).ok_or(PanelError::InvalidWindow)?;

        self.command(cmd::CASET, &coords(xs, xe))?;
        self.command(cmd::RASET, &coords(ys, ye))?;
        self.io
            .tx_color(cmd::RAMWR, pixels)
            .map_err(PanelError::Io)
    }
}
