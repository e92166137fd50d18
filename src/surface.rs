//! Addressable LED surface abstraction.
//!
//! The engine never touches hardware registers; it writes pixels through
//! this trait and calls `show` to flush a frame. On the layout the trait is
//! implemented by the WS2812 driver process; everywhere else the in-memory
//! implementation below preserves identical call semantics so the engine's
//! logic is unaffected by which one is bound.

use smart_leds::RGB8;

use crate::color::OFF;

pub trait Surface: Send {
    fn len(&self) -> usize;

    /// Stage one pixel. Out-of-range indexes are logged and dropped; a bad
    /// index in a document must not abort playback.
    fn set(&mut self, index: usize, color: RGB8);

    /// Flush all staged pixels to the strip.
    fn show(&mut self);

    fn fill(&mut self, color: RGB8);
}

/// Construct the surface for one strip.
///
/// The pin name is opaque and only carried for diagnostics; without a linked
/// hardware driver every strip is backed by [`MemorySurface`].
pub fn open(pin: &str, length: usize, brightness: f32) -> Box<dyn Surface> {
    log::info!("binding in-memory surface for pin {pin} ({length} pixels, brightness {brightness})");
    Box::new(MemorySurface::new(length))
}

/// No-hardware stand-in keeping the last flushed frame.
pub struct MemorySurface {
    staged: Vec<RGB8>,
    shown: Vec<RGB8>,
}

impl MemorySurface {
    pub fn new(length: usize) -> Self {
        Self {
            staged: vec![OFF; length],
            shown: vec![OFF; length],
        }
    }

    /// The frame as of the last `show` call.
    #[cfg(test)]
    pub fn shown(&self) -> &[RGB8] {
        &self.shown
    }
}

impl Surface for MemorySurface {
    fn len(&self) -> usize {
        self.staged.len()
    }

    fn set(&mut self, index: usize, color: RGB8) {
        match self.staged.get_mut(index) {
            Some(pixel) => *pixel = color,
            None => log::warn!(
                "pixel index {index} out of range (strip has {})",
                self.staged.len()
            ),
        }
    }

    fn show(&mut self) {
        self.shown.copy_from_slice(&self.staged);
    }

    fn fill(&mut self, color: RGB8) {
        self.staged.fill(color);
    }
}
