//! Glint - SPI LCD bring-up firmware
//!
//! Brings up an ST7789 panel on an RP2040 board, registers a full-frame
//! graphics surface over it, shows a single centered label and keeps the
//! graphics runtime ticking from one timer task.
//!
//! Every bring-up step is fatal on failure: the failing stage and error
//! are logged over RTT and the core halts.

#![no_std]
#![no_main]

use core::fmt::Debug;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::Spi;
use embassy_time::{Delay, Instant};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use glint_core::bringup::{bring_up_panel, BringUpError, Stage, StageExt};
use glint_core::gui::{setup_hello, Display, PanelFlush, Runtime, TickCounter, HELLO_TEXT};
use glint_core::scheduler::GuiTimers;
use glint_drivers::{Backlight, PanelDevConfig, SpiPanelIo, St7789};

use crate::board::{Gui, BOARD, FRAME_BYTES, PIXEL_BATCH_BYTES};

mod board;
mod tasks;

/// Millisecond counter advanced by the tick timer
static TICKS: TickCounter = TickCounter::new();

// Full-frame draw buffer, placed in .bss
static FRAME: ConstStaticCell<[u8; FRAME_BYTES]> = ConstStaticCell::new([0; FRAME_BYTES]);

// Staging buffer the SPI transport copies pixels through
static PIXEL_BATCH: ConstStaticCell<[u8; PIXEL_BATCH_BYTES]> =
    ConstStaticCell::new([0; PIXEL_BATCH_BYTES]);

// Static cells for state that must outlive main
static BACKLIGHT: StaticCell<Backlight<Output<'static>>> = StaticCell::new();
static GUI: StaticCell<Gui> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Glint firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    checked(BOARD.validate().stage(Stage::Config));
    info!(
        "Board: {}x{} panel, gap ({}, {}), {} Hz SPI",
        BOARD.panel.width, BOARD.panel.height, BOARD.panel.x_gap, BOARD.panel.y_gap, BOARD.io.pclk_hz
    );

    let mut pins = board::gpio_bank!(p);

    // Backlight before the bus
    let bl_pin = checked(pins.take(BOARD.backlight_pin).stage(Stage::Backlight));
    let backlight = BACKLIGHT.init(Backlight::new_active_high(Output::new(bl_pin, Level::Low)));
    checked(backlight.on().stage(Stage::Backlight));
    info!("Backlight on (GPIO{})", BOARD.backlight_pin);

    // SPI bus
    checked(BOARD.bus.validate().stage(Stage::Bus));
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, board::spi_config(&BOARD.io));
    info!("SPI1 initialized, DMA: {}", board::dma_mode(BOARD.bus.dma));

    // Panel I/O transport
    let dc = Output::new(checked(pins.take(BOARD.io.dc).stage(Stage::PanelIo)), Level::High);
    let cs = Output::new(checked(pins.take(BOARD.io.cs).stage(Stage::PanelIo)), Level::High);
    let device = checked(ExclusiveDevice::new_no_delay(spi, cs).stage(Stage::PanelIo));
    let io = checked(
        SpiPanelIo::new(device, dc, PIXEL_BATCH.take(), &BOARD.io, &BOARD.bus)
            .stage(Stage::PanelIo),
    );
    info!(
        "Panel I/O ready (DC=GPIO{}, CS=GPIO{}, {} byte batches)",
        BOARD.io.dc,
        BOARD.io.cs,
        io.batch_bytes()
    );

    // Panel driver
    let rst = checked(
        BOARD
            .panel
            .reset_pin
            .map(|n| pins.take(n))
            .transpose()
            .stage(Stage::PanelNew),
    )
    .map(|pin| Output::new(pin, Level::High));
    let mut panel = checked(
        St7789::new(io, rst, Delay, PanelDevConfig::from_panel(&BOARD.panel)).stage(Stage::PanelNew),
    );

    checked(bring_up_panel(&mut panel, &BOARD.panel));
    info!("Panel on");

    // Graphics runtime
    let frame = FRAME.take();
    let mut display = checked(
        Display::new(BOARD.panel.width, BOARD.panel.height, PanelFlush::new(panel))
            .stage(Stage::Buffer),
    );
    checked(display.set_buffers(frame, None).stage(Stage::Buffer));
    info!("Display registered ({} byte buffer)", FRAME_BYTES);

    let gui = GUI.init(Runtime::new(display, &TICKS));
    checked(setup_hello(gui.screen_mut()).stage(Stage::Scene));
    info!("Scene ready: \"{}\"", HELLO_TEXT);

    let timers = checked(
        GuiTimers::start(&BOARD.timers, Instant::now().as_micros()).stage(Stage::Timers),
    );
    info!(
        "Timers started: tick {} us, render {} us",
        BOARD.timers.tick_period_us, BOARD.timers.render_period_us
    );

    spawner.spawn(tasks::gui_timer_task(gui, timers)).unwrap();

    info!("Bring-up complete, firmware running");
}

/// Unwrap a bring-up step or halt naming the failed stage
fn checked<T, E: Debug>(result: Result<T, BringUpError<E>>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!("Bring-up failed at {}: {}", e.stage, Debug2Format(&e.error));
            defmt::panic!("fatal bring-up error");
        }
    }
}
