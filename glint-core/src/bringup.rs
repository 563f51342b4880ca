//! Staged hardware bring-up
//!
//! Every initialization call either succeeds or fails fatally. Instead of
//! aborting at each call site, each step's error is tagged with the
//! [`Stage`] it happened in and the chain short-circuits with `?`. The
//! caller gets one success path and one failure path naming the stage.

use crate::config::PanelConfig;
use crate::traits::Panel;

/// Bring-up stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Board configuration validation
    Config,
    /// Backlight GPIO
    Backlight,
    /// SPI bus
    Bus,
    /// Panel I/O transport
    PanelIo,
    /// Panel driver instantiation
    PanelNew,
    /// Controller reset
    Reset,
    /// Controller init sequence
    Init,
    /// Color inversion
    InvertColor,
    /// Axis mirroring
    Mirror,
    /// Axis swap
    SwapXy,
    /// Window offsets
    SetGap,
    /// Display output on
    DisplayOn,
    /// Draw buffer registration
    Buffer,
    /// Initial screen content
    Scene,
    /// GUI timers
    Timers,
}

/// A failed bring-up step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUpError<E> {
    /// Stage that failed
    pub stage: Stage,
    /// Underlying error
    pub error: E,
}

impl<E> BringUpError<E> {
    /// Tag an error with the stage it happened in
    pub fn new(stage: Stage, error: E) -> Self {
        Self { stage, error }
    }
}

/// Extension for tagging results with a bring-up stage
pub trait StageExt<T, E> {
    /// Map the error into a [`BringUpError`] for `stage`
    fn stage(self, stage: Stage) -> Result<T, BringUpError<E>>;
}

impl<T, E> StageExt<T, E> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, BringUpError<E>> {
        self.map_err(|e| BringUpError::new(stage, e))
    }
}

/// Run the panel bring-up sequence
///
/// Reset, init, inversion, mirror, axis swap, gap, display on. Each step
/// assumes the previous one succeeded; the first failure is returned.
pub fn bring_up_panel<P: Panel>(
    panel: &mut P,
    config: &PanelConfig,
) -> Result<(), BringUpError<P::Error>> {
    panel.reset().stage(Stage::Reset)?;
    panel.init().stage(Stage::Init)?;
    panel
        .invert_color(config.invert_colors)
        .stage(Stage::InvertColor)?;
    panel
        .mirror(config.mirror_x, config.mirror_y)
        .stage(Stage::Mirror)?;
    panel.swap_xy(config.swap_xy).stage(Stage::SwapXy)?;
    panel
        .set_gap(config.x_gap, config.y_gap)
        .stage(Stage::SetGap)?;
    panel.disp_on_off(true).stage(Stage::DisplayOn)?;
    Ok(())
}
