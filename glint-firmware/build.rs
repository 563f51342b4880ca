//! Build script for glint-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` with the validated board as a `const`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use glint_core::config::{BoardConfig, ConfigError};
use glint_hal::{BusConfigError, DmaChannel, PanelIoConfigError};

fn main() {
    setup_linker();
    let board = load_board();
    generate_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate board.toml
fn load_board() -> BoardConfig {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");
    if !config_path.exists() {
        fail(
            "board.toml not found!",
            &[
                "The firmware requires a board.toml configuration file.",
                "Please create one in the glint-firmware directory.",
            ],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string().as_str()]),
    };

    let board: BoardConfig = match toml::from_str(&content) {
        Ok(board) => board,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid board.toml", &lines)
        }
    };

    if let Err(e) = board.validate() {
        fail("board.toml failed validation", &[describe(&e).as_str()]);
    }

    println!("cargo:warning=board.toml validated successfully");
    board
}

/// Human-readable validation error
fn describe(e: &ConfigError) -> String {
    match e {
        ConfigError::Bus(BusConfigError::PinConflict(pin)) => {
            format!("[bus] sclk and mosi/miso share GPIO {pin}")
        }
        ConfigError::Bus(BusConfigError::ZeroTransferSize) => {
            "[bus] max_transfer_bytes must be greater than 0".to_string()
        }
        ConfigError::PanelIo(PanelIoConfigError::PinConflict(pin)) => {
            format!("[io] dc and cs share GPIO {pin}")
        }
        ConfigError::PanelIo(PanelIoConfigError::ZeroClock) => {
            "[io] pclk_hz must be greater than 0".to_string()
        }
        ConfigError::PanelIo(PanelIoConfigError::ZeroQueueDepth) => {
            "[io] trans_queue_depth must be at least 1".to_string()
        }
        ConfigError::PanelIo(PanelIoConfigError::UnsupportedWidth(bits)) => {
            format!("[io] cmd_bits/param_bits must be 8 or 16, got {bits}")
        }
        ConfigError::ZeroGeometry => "[panel] width and height must be non-zero".to_string(),
        ConfigError::OutOfControllerRam => {
            "[panel] size plus gap exceeds the 240x320 controller RAM".to_string()
        }
        ConfigError::UnsupportedBpp(bpp) => {
            format!("[panel] bits_per_pixel must be 16, got {bpp}")
        }
        ConfigError::PinConflict(pin) => format!("GPIO {pin} is assigned more than once"),
        ConfigError::ZeroTimerPeriod => "[timers] periods must be non-zero".to_string(),
        ConfigError::BufferRows { expected, actual } => {
            format!("buffer_rows must equal the panel height ({expected}), got {actual}")
        }
        ConfigError::TransferTooSmall => {
            "[bus] max_transfer_bytes is smaller than one pixel row".to_string()
        }
    }
}

/// Write the validated board as Rust source into OUT_DIR
fn generate_config(board: &BoardConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();
    f.write_all(render(board).as_bytes()).unwrap();
}

fn render(board: &BoardConfig) -> String {
    let dma = match board.bus.dma {
        DmaChannel::Auto => "DmaChannel::Auto".to_string(),
        DmaChannel::Fixed(ch) => format!("DmaChannel::Fixed({ch})"),
        DmaChannel::Disabled => "DmaChannel::Disabled".to_string(),
    };
    let (bus, io, panel, timers) = (&board.bus, &board.io, &board.panel, &board.timers);

    format!(
        "// Generated by build.rs from board.toml
pub const BOARD: BoardConfig = BoardConfig {{
    backlight_pin: {backlight},
    bus: BusConfig {{
        sclk: {sclk},
        mosi: {mosi},
        miso: {miso:?},
        max_transfer_bytes: {max_transfer},
        dma: {dma},
    }},
    io: PanelIoConfig {{
        dc: {dc},
        cs: {cs},
        pclk_hz: {pclk},
        mode: Mode::{mode:?},
        trans_queue_depth: {depth},
        cmd_bits: {cmd_bits},
        param_bits: {param_bits},
    }},
    panel: PanelConfig {{
        width: {width},
        height: {height},
        x_gap: {x_gap},
        y_gap: {y_gap},
        bits_per_pixel: {bpp},
        color_order: ColorOrder::{order:?},
        invert_colors: {invert},
        mirror_x: {mirror_x},
        mirror_y: {mirror_y},
        swap_xy: {swap},
        reset_pin: {reset:?},
    }},
    buffer_rows: {rows},
    timers: TimerConfig {{
        tick_period_us: {tick},
        render_period_us: {render},
    }},
}};
",
        backlight = board.backlight_pin,
        sclk = bus.sclk,
        mosi = bus.mosi,
        miso = bus.miso,
        max_transfer = bus.max_transfer_bytes,
        dc = io.dc,
        cs = io.cs,
        pclk = io.pclk_hz,
        mode = io.mode,
        depth = io.trans_queue_depth,
        cmd_bits = io.cmd_bits,
        param_bits = io.param_bits,
        width = panel.width,
        height = panel.height,
        x_gap = panel.x_gap,
        y_gap = panel.y_gap,
        bpp = panel.bits_per_pixel,
        order = panel.color_order,
        invert = panel.invert_colors,
        mirror_x = panel.mirror_x,
        mirror_y = panel.mirror_y,
        swap = panel.swap_xy,
        reset = panel.reset_pin,
        rows = board.buffer_rows,
        tick = timers.tick_period_us,
        render = timers.render_period_us,
    )
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<58} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
