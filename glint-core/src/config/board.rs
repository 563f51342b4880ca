//! Board configuration types
//!
//! These types describe one display board: which GPIOs drive the
//! backlight and panel, how the SPI bus and panel transport are set up,
//! the panel geometry and orientation, and the timer periods that drive
//! the graphics runtime.

use glint_hal::{BusConfig, BusConfigError, PanelIoConfig, PanelIoConfigError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bytes per pixel in the only supported pixel format (RGB565)
pub const BYTES_PER_PIXEL: usize = 2;

/// ST7789 frame memory is 240 columns by 320 rows
pub const CONTROLLER_RAM_WIDTH: u16 = 240;
pub const CONTROLLER_RAM_HEIGHT: u16 = 320;

/// Subpixel order the controller expects on the wire
///
/// The nominal order of a panel is not reliable; some 240x135 modules
/// declared as RGB render as BGR. Treat this as a calibration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Panel geometry and controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Visible width in pixels (after axis swap)
    pub width: u16,
    /// Visible height in pixels (after axis swap)
    pub height: u16,
    /// Column offset of the visible window in controller RAM
    pub x_gap: u16,
    /// Row offset of the visible window in controller RAM
    pub y_gap: u16,
    /// Bits per pixel (16 only)
    pub bits_per_pixel: u8,
    /// Subpixel order
    #[cfg_attr(feature = "serde", serde(default))]
    pub color_order: ColorOrder,
    /// Color inversion (true gives black background / white foreground on IPS panels)
    pub invert_colors: bool,
    /// Mirror along the x axis
    pub mirror_x: bool,
    /// Mirror along the y axis
    pub mirror_y: bool,
    /// Swap x and y axes (landscape on a portrait controller)
    pub swap_xy: bool,
    /// Hardware reset pin (software reset when absent)
    #[cfg_attr(feature = "serde", serde(default))]
    pub reset_pin: Option<u8>,
}

impl PanelConfig {
    /// Bytes needed for one full frame
    pub const fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

/// Periods of the two GUI timers, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerConfig {
    /// Tick timer period (advances the millisecond counter by one per firing)
    pub tick_period_us: u32,
    /// Render timer period (one render pass per firing)
    pub render_period_us: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_period_us: 1_000,
            render_period_us: 5_000,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SPI bus configuration rejected
    Bus(BusConfigError),
    /// Panel transport configuration rejected
    PanelIo(PanelIoConfigError),
    /// Width or height is zero
    ZeroGeometry,
    /// Visible window plus gap does not fit in controller RAM
    OutOfControllerRam,
    /// Pixel depth other than 16 bits
    UnsupportedBpp(u8),
    /// Same GPIO assigned twice
    PinConflict(u8),
    /// Timer period is zero
    ZeroTimerPeriod,
    /// Draw buffer must cover the full frame
    BufferRows { expected: u16, actual: u16 },
    /// Bus transfer limit (or transport batch) too small for the payload
    TransferTooSmall,
}

impl From<BusConfigError> for ConfigError {
    fn from(e: BusConfigError) -> Self {
        ConfigError::Bus(e)
    }
}

impl From<PanelIoConfigError> for ConfigError {
    fn from(e: PanelIoConfigError) -> Self {
        ConfigError::PanelIo(e)
    }
}

/// Complete board description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Backlight enable pin (active high)
    pub backlight_pin: u8,
    /// SPI bus
    pub bus: BusConfig,
    /// Panel transport
    pub io: PanelIoConfig,
    /// Panel geometry and flags
    pub panel: PanelConfig,
    /// Rows per draw buffer (full-frame rendering needs the panel height)
    pub buffer_rows: u16,
    /// GUI timer periods
    #[cfg_attr(feature = "serde", serde(default))]
    pub timers: TimerConfig,
}

impl BoardConfig {
    /// Waveshare Pico-LCD-1.14 (ST7789, 240x135) on an RP2040
    pub const fn pico_lcd_1_14() -> Self {
        let panel = PanelConfig {
            width: 240,
            height: 135,
            x_gap: 40,
            y_gap: 53,
            bits_per_pixel: 16,
            color_order: ColorOrder::Rgb,
            invert_colors: true,
            mirror_x: true,
            mirror_y: false,
            swap_xy: true,
            reset_pin: Some(12),
        };

        Self {
            backlight_pin: 13,
            bus: BusConfig::write_only(10, 11, panel.frame_bytes()),
            io: PanelIoConfig::spi(8, 9, 40_000_000),
            panel,
            buffer_rows: 135,
            timers: TimerConfig {
                tick_period_us: 1_000,
                render_period_us: 5_000,
            },
        }
    }

    /// Bytes per draw buffer
    pub const fn buffer_bytes(&self) -> usize {
        self.panel.width as usize * self.buffer_rows as usize * BYTES_PER_PIXEL
    }

    /// Check the whole board description
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bus.validate()?;
        self.io.validate()?;

        let panel = &self.panel;
        if panel.width == 0 || panel.height == 0 {
            return Err(ConfigError::ZeroGeometry);
        }
        if panel.bits_per_pixel != 16 {
            return Err(ConfigError::UnsupportedBpp(panel.bits_per_pixel));
        }

        // With the axes swapped, x runs along the controller's 320-row side
        let (ram_x, ram_y) = if panel.swap_xy {
            (CONTROLLER_RAM_HEIGHT, CONTROLLER_RAM_WIDTH)
        } else {
            (CONTROLLER_RAM_WIDTH, CONTROLLER_RAM_HEIGHT)
        };
        if panel.width as u32 + panel.x_gap as u32 > ram_x as u32
            || panel.height as u32 + panel.y_gap as u32 > ram_y as u32
        {
            return Err(ConfigError::OutOfControllerRam);
        }

        if self.buffer_rows != panel.height {
            return Err(ConfigError::BufferRows {
                expected: panel.height,
                actual: self.buffer_rows,
            });
        }
        if self.bus.max_transfer_bytes < panel.width as usize * BYTES_PER_PIXEL {
            return Err(ConfigError::TransferTooSmall);
        }

        if self.timers.tick_period_us == 0 || self.timers.render_period_us == 0 {
            return Err(ConfigError::ZeroTimerPeriod);
        }

        self.check_pins()
    }

    fn check_pins(&self) -> Result<(), ConfigError> {
        let pins = [
            Some(self.backlight_pin),
            Some(self.bus.sclk),
            Some(self.bus.mosi),
            self.bus.miso,
            Some(self.io.dc),
            Some(self.io.cs),
            self.panel.reset_pin,
        ];

        for (i, a) in pins.iter().enumerate() {
            let Some(a) = a else { continue };
            if pins[i + 1..].iter().flatten().any(|b| b == a) {
                return Err(ConfigError::PinConflict(*a));
            }
        }
        Ok(())
    }
}
