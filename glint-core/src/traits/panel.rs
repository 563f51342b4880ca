//! Panel controller operations

/// Operations on an initialized panel controller session
///
/// Bring-up calls must happen in this order: [`reset`](Panel::reset),
/// [`init`](Panel::init), any of the orientation/inversion/gap setters,
/// then [`disp_on_off`](Panel::disp_on_off).
///
/// Implementations reject `init` before `reset`, setters before `init`,
/// and drawing before the display is on. The setters themselves are
/// optional: turning the display on straight after `init` keeps the
/// controller defaults. The full stage sequence is fixed by
/// [`bring_up_panel`](crate::bringup::bring_up_panel), not by the driver.
pub trait Panel {
    /// Error type for panel operations
    type Error;

    /// Reset the controller (hardware pin or software command)
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Run the controller's initialization command sequence
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Enable or disable color inversion
    fn invert_color(&mut self, invert: bool) -> Result<(), Self::Error>;

    /// Mirror the x and/or y axis
    fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), Self::Error>;

    /// Swap the x and y axes
    fn swap_xy(&mut self, swap: bool) -> Result<(), Self::Error>;

    /// Offset every draw window by `(x_gap, y_gap)` in controller RAM
    fn set_gap(&mut self, x_gap: u16, y_gap: u16) -> Result<(), Self::Error>;

    /// Turn display output on or off
    fn disp_on_off(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Write a rectangle of packed pixels
    ///
    /// `x_end` and `y_end` are exclusive.
    fn draw_bitmap(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
        pixels: &[u8],
    ) -> Result<(), Self::Error>;
}
