//! Symbolic color resolution.
//!
//! Track and util documents refer to colors by name; the table mapping names
//! to RGB values comes from configuration and is resolved once at startup.

use std::collections::HashMap;

use smart_leds::RGB8;

use crate::config::ColorSpec;

pub const OFF: RGB8 = RGB8::new(0, 0, 0);

/// Name → color lookup with per-color scale and global brightness applied.
#[derive(Clone)]
pub struct ColorTable {
    entries: HashMap<String, RGB8>,
}

impl ColorTable {
    pub fn new(specs: &HashMap<String, ColorSpec>, brightness: f32) -> Self {
        let brightness = brightness.clamp(0.0, 1.0);
        let entries = specs
            .iter()
            .map(|(name, spec)| (name.clone(), scale(*spec, brightness)))
            .collect();
        Self { entries }
    }

    /// Look up a color by name.
    ///
    /// Unknown names resolve to [`OFF`] with a warning; a misspelled color in
    /// a document must not take down playback.
    pub fn resolve(&self, name: &str) -> RGB8 {
        match self.entries.get(name) {
            Some(c) => *c,
            None => {
                log::warn!("unknown color {name:?}, using off");
                OFF
            }
        }
    }
}

fn scale(spec: ColorSpec, brightness: f32) -> RGB8 {
    let ColorSpec(r, g, b, color_scale) = spec;
    let factor = color_scale.clamp(0.0, 1.0) * brightness;
    RGB8::new(
        (f32::from(r) * factor).round() as u8,
        (f32::from(g) * factor).round() as u8,
        (f32::from(b) * factor).round() as u8,
    )
}
