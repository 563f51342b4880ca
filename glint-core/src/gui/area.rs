//! Rectangular screen regions

/// Rectangle with inclusive corners
///
/// `(x1, y1)` is the top-left pixel and `(x2, y2)` the bottom-right pixel,
/// both part of the area. Panel drivers take exclusive ends, see
/// [`Area::exclusive_end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Area {
    /// Create an area from inclusive corners
    ///
    /// Returns `None` if the corners are swapped or an end coordinate is
    /// `u16::MAX` (its exclusive end would not be representable).
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Option<Self> {
        if x1 > x2 || y1 > y2 || x2 == u16::MAX || y2 == u16::MAX {
            return None;
        }
        Some(Self { x1, y1, x2, y2 })
    }

    /// Area covering a whole `width` x `height` surface
    ///
    /// Callers guarantee non-zero dimensions.
    pub const fn full(width: u16, height: u16) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: width - 1,
            y2: height - 1,
        }
    }

    pub const fn width(&self) -> u16 {
        self.x2 - self.x1 + 1
    }

    pub const fn height(&self) -> u16 {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels in the area
    pub const fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// One past the bottom-right pixel, as `(x_end, y_end)`
    pub const fn exclusive_end(&self) -> (u16, u16) {
        (self.x2 + 1, self.y2 + 1)
    }
}
