//! Screen and label widgets
//!
//! The active screen owns a background style and a small fixed set of
//! text labels. Any style or text change marks the screen dirty; the
//! render pass repaints the whole frame from this description.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};

/// Maximum labels on one screen
pub const MAX_LABELS: usize = 4;

/// Maximum label text length in bytes
pub const MAX_LABEL_TEXT: usize = 64;

/// Text shown by the startup scene
pub const HELLO_TEXT: &str = "Hello LVGL 9.3!";

/// Scene errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneError {
    /// Screen already holds `MAX_LABELS` labels
    TooManyLabels,
    /// Text longer than `MAX_LABEL_TEXT` bytes
    TextTooLong,
    /// Label id does not exist on this screen
    UnknownLabel,
}

/// Opacity, 0 (transparent) to 255 (opaque)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Opacity(pub u8);

impl Opacity {
    pub const TRANSP: Self = Self(0);
    pub const COVER: Self = Self(255);
}

/// Build a color from a 24-bit `0xRRGGBB` value
pub fn color_hex(rgb: u32) -> Rgb565 {
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Blend `fg` over `bg`
pub fn mix(fg: Rgb565, bg: Rgb565, opa: Opacity) -> Rgb565 {
    match opa.0 {
        255 => fg,
        0 => bg,
        a => {
            let a = a as u16;
            let ch = |f: u8, b: u8| ((f as u16 * a + b as u16 * (255 - a)) / 255) as u8;
            Rgb565::new(ch(fg.r(), bg.r()), ch(fg.g(), bg.g()), ch(fg.b(), bg.b()))
        }
    }
}

/// Anchor of a widget inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    #[default]
    TopLeft,
    TopMid,
    TopRight,
    LeftMid,
    Center,
    RightMid,
    BottomLeft,
    BottomMid,
    BottomRight,
}

impl Align {
    /// Top-left corner of a `size` box anchored inside `outer`
    fn place(self, outer: &Rectangle, size: Size) -> Point {
        let free_w = outer.size.width as i32 - size.width as i32;
        let free_h = outer.size.height as i32 - size.height as i32;

        let x = match self {
            Align::TopLeft | Align::LeftMid | Align::BottomLeft => 0,
            Align::TopMid | Align::Center | Align::BottomMid => free_w / 2,
            Align::TopRight | Align::RightMid | Align::BottomRight => free_w,
        };
        let y = match self {
            Align::TopLeft | Align::TopMid | Align::TopRight => 0,
            Align::LeftMid | Align::Center | Align::RightMid => free_h / 2,
            Align::BottomLeft | Align::BottomMid | Align::BottomRight => free_h,
        };
        outer.top_left + Point::new(x, y)
    }
}

/// Handle to a label on a [`Screen`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LabelId(u8);

/// Single-line text label
pub struct Label {
    text: String<MAX_LABEL_TEXT>,
    font: &'static MonoFont<'static>,
    text_color: Rgb565,
    text_opa: Opacity,
    bg_color: Rgb565,
    bg_opa: Opacity,
    align: Align,
    offset: Point,
}

impl Label {
    fn new() -> Self {
        Self {
            text: String::new(),
            font: &FONT_10X20,
            text_color: Rgb565::BLACK,
            text_opa: Opacity::COVER,
            bg_color: Rgb565::WHITE,
            bg_opa: Opacity::TRANSP,
            align: Align::TopLeft,
            offset: Point::zero(),
        }
    }

    /// Replace the label text
    ///
    /// On error the previous text is kept.
    pub fn set_text(&mut self, text: &str) -> Result<(), SceneError> {
        if text.len() > MAX_LABEL_TEXT {
            return Err(SceneError::TextTooLong);
        }
        self.text.clear();
        self.text
            .push_str(text)
            .map_err(|_| SceneError::TextTooLong)
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn set_font(&mut self, font: &'static MonoFont<'static>) {
        self.font = font;
    }

    pub fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
    }

    pub fn set_text_opa(&mut self, opa: Opacity) {
        self.text_opa = opa;
    }

    pub fn set_bg_color(&mut self, color: Rgb565) {
        self.bg_color = color;
    }

    pub fn set_bg_opa(&mut self, opa: Opacity) {
        self.bg_opa = opa;
    }

    /// Anchor the label inside the screen, shifted by `(x_ofs, y_ofs)`
    pub fn align(&mut self, align: Align, x_ofs: i32, y_ofs: i32) {
        self.align = align;
        self.offset = Point::new(x_ofs, y_ofs);
    }

    fn style(&self, color: Rgb565) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyle::new(self.font, color)
    }

    /// Bounding box of the label inside `outer`
    pub fn bounds(&self, outer: &Rectangle) -> Rectangle {
        let size = Text::with_baseline(
            self.text.as_str(),
            Point::zero(),
            self.style(self.text_color),
            Baseline::Top,
        )
        .bounding_box()
        .size;
        Rectangle::new(self.align.place(outer, size) + self.offset, size)
    }

    fn draw<D>(&self, target: &mut D, beneath: Rgb565) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let bounds = self.bounds(&target.bounding_box());

        let mut under_text = beneath;
        if self.bg_opa != Opacity::TRANSP {
            under_text = mix(self.bg_color, beneath, self.bg_opa);
            bounds
                .into_styled(PrimitiveStyle::with_fill(under_text))
                .draw(target)?;
        }

        if self.text_opa == Opacity::TRANSP || self.text.is_empty() {
            return Ok(());
        }
        let color = mix(self.text_color, under_text, self.text_opa);
        Text::with_baseline(
            self.text.as_str(),
            bounds.top_left,
            self.style(color),
            Baseline::Top,
        )
        .draw(target)?;
        Ok(())
    }
}

/// The active screen
pub struct Screen {
    bg_color: Rgb565,
    bg_opa: Opacity,
    labels: Vec<Label, MAX_LABELS>,
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Empty white screen
    pub fn new() -> Self {
        Self {
            bg_color: Rgb565::WHITE,
            bg_opa: Opacity::COVER,
            labels: Vec::new(),
            dirty: true,
        }
    }

    pub fn set_bg_color(&mut self, color: Rgb565) {
        self.bg_color = color;
        self.dirty = true;
    }

    pub fn set_bg_opa(&mut self, opa: Opacity) {
        self.bg_opa = opa;
        self.dirty = true;
    }

    pub fn bg_color(&self) -> Rgb565 {
        self.bg_color
    }

    /// Add an empty label
    pub fn create_label(&mut self) -> Result<LabelId, SceneError> {
        let id = LabelId(self.labels.len() as u8);
        self.labels
            .push(Label::new())
            .map_err(|_| SceneError::TooManyLabels)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(id.0 as usize)
    }

    /// Mutable access to a label; marks the screen dirty
    pub fn label_mut(&mut self, id: LabelId) -> Result<&mut Label, SceneError> {
        let label = self
            .labels
            .get_mut(id.0 as usize)
            .ok_or(SceneError::UnknownLabel)?;
        self.dirty = true;
        Ok(label)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Paint the whole screen
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        // Nothing sits below the screen, so a translucent background fades to black
        let bg = mix(self.bg_color, Rgb565::BLACK, self.bg_opa);
        target.clear(bg)?;
        for label in &self.labels {
            label.draw(target, bg)?;
        }
        Ok(())
    }
}

/// Populate `screen` with the startup scene
///
/// Background 0xFF0000 with full opacity, one white 20 px label reading
/// [`HELLO_TEXT`], centered.
pub fn setup_hello(screen: &mut Screen) -> Result<LabelId, SceneError> {
    screen.set_bg_color(color_hex(0xFF0000));
    screen.set_bg_opa(Opacity::COVER);

    let id = screen.create_label()?;
    let label = screen.label_mut(id)?;
    label.set_font(&FONT_10X20);
    label.set_text_color(color_hex(0xFFFFFF));
    label.set_text_opa(Opacity::COVER);
    label.set_text(HELLO_TEXT)?;
    label.align(Align::Center, 0, 0);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::FrameBuffer;
    use embedded_graphics::primitives::ContainsPoint;

    #[test]
    fn test_label_text_round_trip() {
        let mut screen = Screen::new();
        let id = setup_hello(&mut screen).unwrap();
        assert_eq!(screen.label(id).unwrap().text(), "Hello LVGL 9.3!");
    }

    #[test]
    fn test_text_too_long_keeps_previous() {
        let mut screen = Screen::new();
        let id = screen.create_label().unwrap();
        let label = screen.label_mut(id).unwrap();
        label.set_text("short").unwrap();

        let long = [b'x'; MAX_LABEL_TEXT + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(label.set_text(long), Err(SceneError::TextTooLong));
        assert_eq!(label.text(), "short");
    }

    #[test]
    fn test_label_capacity() {
        let mut screen = Screen::new();
        for _ in 0..MAX_LABELS {
            screen.create_label().unwrap();
        }
        assert_eq!(screen.create_label(), Err(SceneError::TooManyLabels));
        assert!(screen.label_mut(LabelId(9)).is_err());
    }

    #[test]
    fn test_dirty_tracking() {
        let mut screen = Screen::new();
        assert!(screen.take_dirty());
        assert!(!screen.is_dirty());
        screen.set_bg_opa(Opacity::COVER);
        assert!(screen.take_dirty());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(color_hex(0xFF0000), Rgb565::RED);
        assert_eq!(color_hex(0xFFFFFF), Rgb565::WHITE);
        assert_eq!(color_hex(0x000000), Rgb565::BLACK);
    }

    #[test]
    fn test_mix() {
        assert_eq!(mix(Rgb565::WHITE, Rgb565::BLACK, Opacity::COVER), Rgb565::WHITE);
        assert_eq!(mix(Rgb565::WHITE, Rgb565::BLACK, Opacity::TRANSP), Rgb565::BLACK);
        let half = mix(Rgb565::WHITE, Rgb565::BLACK, Opacity(128));
        assert_eq!(half.r(), 15);
        assert_eq!(half.g(), 31);
    }

    #[test]
    fn test_center_alignment() {
        let mut screen = Screen::new();
        let id = setup_hello(&mut screen).unwrap();
        let outer = Rectangle::new(Point::zero(), Size::new(240, 135));
        let bounds = screen.label(id).unwrap().bounds(&outer);

        // 15 glyphs of 10x20
        assert_eq!(bounds.size, Size::new(150, 20));
        assert_eq!(bounds.top_left, Point::new(45, 57));
    }

    #[test]
    fn test_hello_scene_pixels() {
        let mut screen = Screen::new();
        let id = setup_hello(&mut screen).unwrap();

        let mut bytes = [0u8; 240 * 135 * 2];
        let mut fb = FrameBuffer::new(&mut bytes, 240, 135).unwrap();
        screen.draw(&mut fb).unwrap();

        // Background everywhere outside the label
        assert_eq!(fb.pixel(0, 0), Some(Rgb565::RED));
        assert_eq!(fb.pixel(239, 134), Some(Rgb565::RED));

        let bounds = screen
            .label(id)
            .unwrap()
            .bounds(&Rectangle::new(Point::zero(), Size::new(240, 135)));
        let mut white_inside = 0;
        for y in 0..135u16 {
            for x in 0..240u16 {
                if fb.pixel(x, y) == Some(Rgb565::WHITE) {
                    assert!(bounds.contains(Point::new(x as i32, y as i32)));
                    white_inside += 1;
                }
            }
        }
        assert!(white_inside > 0);
    }

    #[test]
    fn test_label_background() {
        let mut screen = Screen::new();
        screen.set_bg_color(Rgb565::BLACK);
        let id = screen.create_label().unwrap();
        let label = screen.label_mut(id).unwrap();
        label.set_text("A").unwrap();
        label.set_bg_color(Rgb565::BLUE);
        label.set_bg_opa(Opacity::COVER);
        label.set_text_opa(Opacity::TRANSP);

        let mut bytes = [0u8; 20 * 20 * 2];
        let mut fb = FrameBuffer::new(&mut bytes, 20, 20).unwrap();
        screen.draw(&mut fb).unwrap();

        // Label box at top-left is 10x20 of solid blue, text hidden
        assert_eq!(fb.pixel(0, 0), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(9, 19), Some(Rgb565::BLUE));
        assert_eq!(fb.pixel(10, 0), Some(Rgb565::BLACK));
    }
}
