//! GPIO backlight
//!
//! The panel backlight is a single GPIO driving the LED enable (directly
//! or through a transistor). Active-high by default.

use embedded_hal::digital::OutputPin;

/// Backlight on a push-pull GPIO
pub struct Backlight<P> {
    pin: P,
    /// If true, backlight ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> Backlight<P> {
    /// Wrap a pin without driving it
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            on: false,
        }
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    pub fn on(&mut self) -> Result<(), P::Error> {
        self.set(true)
    }

    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    /// Last level successfully applied
    pub fn is_on(&self) -> bool {
        self.on
    }

    fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on != self.inverted {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }
}
