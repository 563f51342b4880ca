//! Display surface
//!
//! A [`Display`] is the graphics runtime's view of one rectangular pixel
//! area: fixed dimensions, one or two full-frame draw buffers, and a
//! flush callback that moves a rendered frame to the hardware.

use heapless::Vec;

use super::{Area, FrameBuffer};
use crate::traits::RenderOutcome;

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Width, height or row count is zero
    ZeroGeometry,
    /// Buffer length does not match width x rows x bytes-per-pixel
    BufferSize { expected: usize, actual: usize },
    /// No draw buffer registered yet
    NotInitialized,
}

#[derive(Debug, Default)]
struct FlushState {
    flushing: bool,
    completed: u32,
}

/// Completion token handed to the flush callback
///
/// Consuming it with [`signal`](FlushReady::signal) tells the display the
/// buffer may be reused. A token can only be signaled once. Dropping it
/// unsignaled leaves the display busy until [`Display::flush_ready`] is
/// called, which is how an asynchronous transfer reports completion.
pub struct FlushReady<'f> {
    state: &'f mut FlushState,
}

impl FlushReady<'_> {
    /// Mark the current flush complete
    pub fn signal(self) {
        self.state.flushing = false;
        self.state.completed = self.state.completed.wrapping_add(1);
    }
}

/// Receives rendered frames
pub trait FlushCallback {
    /// Transfer `pixels` covering `area` to the hardware, then signal `ready`
    fn flush(&mut self, area: &Area, pixels: &[u8], ready: FlushReady<'_>);
}

/// Full-frame display surface
pub struct Display<'a, F> {
    width: u16,
    height: u16,
    buffers: Vec<FrameBuffer<'a>, 2>,
    active: usize,
    flush_cb: F,
    flush: FlushState,
    invalidated: bool,
}

impl<'a, F: FlushCallback> Display<'a, F> {
    /// Create a display of fixed dimensions
    ///
    /// Buffers must be supplied with [`set_buffers`](Self::set_buffers)
    /// before the first refresh.
    pub fn new(width: u16, height: u16, flush_cb: F) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::ZeroGeometry);
        }
        Ok(Self {
            width,
            height,
            buffers: Vec::new(),
            active: 0,
            flush_cb,
            flush: FlushState::default(),
            invalidated: true,
        })
    }

    /// Register one or two full-frame draw buffers
    ///
    /// Each buffer must be exactly `width * height * 2` bytes. With two
    /// buffers, consecutive frames alternate between them.
    pub fn set_buffers(
        &mut self,
        buf1: &'a mut [u8],
        buf2: Option<&'a mut [u8]>,
    ) -> Result<(), DisplayError> {
        let first = FrameBuffer::new(buf1, self.width, self.height)?;
        let second = buf2
            .map(|buf| FrameBuffer::new(buf, self.width, self.height))
            .transpose()?;

        self.buffers.clear();
        // Capacity is 2, both pushes fit
        let _ = self.buffers.push(first);
        if let Some(second) = second {
            let _ = self.buffers.push(second);
        }
        self.active = 0;
        self.invalidated = true;
        Ok(())
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Area covering the whole display
    pub fn area(&self) -> Area {
        Area::full(self.width, self.height)
    }

    /// Number of registered draw buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Request a repaint on the next refresh
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// A flush was started and has not signaled completion
    pub fn is_flushing(&self) -> bool {
        self.flush.flushing
    }

    /// Completed flushes since creation (wrapping)
    pub fn flushes_completed(&self) -> u32 {
        self.flush.completed
    }

    /// Report completion of an outstanding flush
    ///
    /// Returns `false` if no flush was outstanding.
    pub fn flush_ready(&mut self) -> bool {
        if !self.flush.flushing {
            return false;
        }
        FlushReady {
            state: &mut self.flush,
        }
        .signal();
        true
    }

    pub fn flush_callback(&self) -> &F {
        &self.flush_cb
    }

    pub fn flush_callback_mut(&mut self) -> &mut F {
        &mut self.flush_cb
    }

    /// Render and flush one frame if the display was invalidated
    ///
    /// `draw` paints the whole frame into the active buffer. No frame is
    /// started while a previous flush is outstanding.
    pub fn refresh(
        &mut self,
        draw: impl FnOnce(&mut FrameBuffer<'a>),
    ) -> Result<RenderOutcome, DisplayError> {
        if self.buffers.is_empty() {
            return Err(DisplayError::NotInitialized);
        }
        if self.flush.flushing {
            return Ok(RenderOutcome::Busy);
        }
        if !self.invalidated {
            return Ok(RenderOutcome::Idle);
        }

        let area = self.area();
        let Self {
            buffers,
            active,
            flush_cb,
            flush,
            invalidated,
            ..
        } = self;

        let fb = &mut buffers[*active];
        draw(fb);
        *invalidated = false;

        flush.flushing = true;
        flush_cb.flush(&area, fb.as_bytes(), FlushReady { state: flush });

        if buffers.len() > 1 {
            *active = (*active + 1) % buffers.len();
        }
        Ok(RenderOutcome::Flushed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;

    const W: u16 = 8;
    const H: u16 = 4;
    const BYTES: usize = W as usize * H as usize * 2;

    // Records every flush; signals synchronously unless `deferred`
    #[derive(Default)]
    struct MockFlush {
        calls: u32,
        last_area: Option<Area>,
        last_ptr: usize,
        first_pixel: [u8; 2],
        deferred: bool,
    }

    impl FlushCallback for MockFlush {
        fn flush(&mut self, area: &Area, pixels: &[u8], ready: FlushReady<'_>) {
            self.calls += 1;
            self.last_area = Some(*area);
            self.last_ptr = pixels.as_ptr() as usize;
            self.first_pixel = [pixels[0], pixels[1]];
            if !self.deferred {
                ready.signal();
            }
        }
    }

    #[test]
    fn test_refresh_without_buffers() {
        let mut display = Display::new(W, H, MockFlush::default()).unwrap();
        assert_eq!(
            display.refresh(|_| {}),
            Err(DisplayError::NotInitialized)
        );
    }

    #[test]
    fn test_zero_geometry_rejected() {
        assert!(matches!(
            Display::new(0, H, MockFlush::default()),
            Err(DisplayError::ZeroGeometry)
        ));
    }

    #[test]
    fn test_wrong_buffer_size_rejected() {
        let mut small = [0u8; BYTES - 2];
        let mut display = Display::new(W, H, MockFlush::default()).unwrap();
        assert_eq!(
            display.set_buffers(&mut small, None),
            Err(DisplayError::BufferSize {
                expected: BYTES,
                actual: BYTES - 2
            })
        );
        assert_eq!(display.buffer_count(), 0);
    }

    #[test]
    fn test_full_frame_flush() {
        let mut buf = [0u8; BYTES];
        let mut display = Display::new(W, H, MockFlush::default()).unwrap();
        display.set_buffers(&mut buf, None).unwrap();

        let outcome = display.refresh(|fb| {
            fb.clear(Rgb565::RED).unwrap();
        });
        assert_eq!(outcome, Ok(RenderOutcome::Flushed));

        let cb = display.flush_callback();
        assert_eq!(cb.calls, 1);
        assert_eq!(cb.last_area, Some(Area::full(W, H)));
        assert_eq!(cb.first_pixel, [0xF8, 0x00]);
        assert_eq!(display.flushes_completed(), 1);
        assert!(!display.is_flushing());

        // Nothing invalidated since
        assert_eq!(display.refresh(|_| {}), Ok(RenderOutcome::Idle));
        assert_eq!(display.flush_callback().calls, 1);
    }

    #[test]
    fn test_deferred_completion_blocks_next_frame() {
        let mut buf = [0u8; BYTES];
        let mut display = Display::new(W, H, MockFlush::default()).unwrap();
        display.flush_callback_mut().deferred = true;
        display.set_buffers(&mut buf, None).unwrap();

        assert_eq!(display.refresh(|_| {}), Ok(RenderOutcome::Flushed));
        assert!(display.is_flushing());

        display.invalidate();
        assert_eq!(display.refresh(|_| {}), Ok(RenderOutcome::Busy));
        assert_eq!(display.flush_callback().calls, 1);

        assert!(display.flush_ready());
        assert!(!display.flush_ready());
        assert_eq!(display.flushes_completed(), 1);

        // Invalidation survived the busy pass
        assert_eq!(display.refresh(|_| {}), Ok(RenderOutcome::Flushed));
        assert_eq!(display.flush_callback().calls, 2);
    }

    #[test]
    fn test_double_buffers_alternate() {
        let mut a = [0u8; BYTES];
        let mut b = [0u8; BYTES];
        let mut display = Display::new(W, H, MockFlush::default()).unwrap();
        display.set_buffers(&mut a, Some(&mut b)).unwrap();
        assert_eq!(display.buffer_count(), 2);

        display.refresh(|_| {}).unwrap();
        let first = display.flush_callback().last_ptr;
        display.invalidate();
        display.refresh(|_| {}).unwrap();
        let second = display.flush_callback().last_ptr;
        display.invalidate();
        display.refresh(|_| {}).unwrap();
        let third = display.flush_callback().last_ptr;

        assert_ne!(first, second);
        assert_eq!(first, third);
    }
}
