use std::sync::Mutex;
use std::time::Duration;

use crate::color::{ColorTable, OFF};
use crate::library::{Util, UtilAction};
use crate::stop::StopFlag;
use crate::surface::Surface;

/// Executes one util's ordered action list against the util strip.
///
/// The runner is the only writer of the util surface. It is shared behind an
/// `Arc` so detached triggers can run on their own threads; the mutex keeps
/// concurrent utils from interleaving partial frames.
pub struct UtilRunner {
    surface: Mutex<Box<dyn Surface>>,
    colors: ColorTable,
    stop: StopFlag,
}

impl UtilRunner {
    pub fn new(surface: Box<dyn Surface>, colors: ColorTable, stop: StopFlag) -> Self {
        Self {
            surface: Mutex::new(surface),
            colors,
            stop,
        }
    }

    /// Run every action in order. Returns whether any action was applied,
    /// so callers can tell a no-op util from one that changed LEDs.
    pub fn run(&self, util: &Util) -> bool {
        let mut surface = match self.surface.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut applied = false;
        let mut pending = false;

        for action in &util.actions {
            if self.stop.is_raised() {
                break;
            }
            if action.led >= surface.len() {
                log::warn!(
                    "util {:?}: led {} out of range (strip has {}), skipping action",
                    util.id,
                    action.led,
                    surface.len()
                );
                continue;
            }

            if action.blink {
                // Flush accumulated static writes before blinking so the
                // strip never shows a half-written frame.
                if pending {
                    surface.show();
                    pending = false;
                }
                self.blink(surface.as_mut(), action);
                applied = true;
            } else {
                surface.set(action.led, self.colors.resolve(&action.color));
                pending = true;
                applied = true;
            }
        }

        // Static writes are flushed together in a single show.
        if pending {
            surface.show();
        }

        if !applied {
            log::debug!("util {:?} applied no actions", util.id);
        }
        applied
    }

    /// Blocks for `2 × duration × repeat`, honoring the stop flag between
    /// phases.
    fn blink(&self, surface: &mut dyn Surface, action: &UtilAction) {
        let on = self.colors.resolve(&action.color);
        let phase = Duration::from_secs_f64(action.duration.max(0.0));

        // An interrupt mid-blink may leave the pixel lit; shutdown clears
        // both strips before the process exits.
        for _ in 0..action.repeat {
            surface.set(action.led, on);
            surface.show();
            if !self.stop.wait(phase) {
                return;
            }
            surface.set(action.led, OFF);
            surface.show();
            if !self.stop.wait(phase) {
                return;
            }
        }
    }

    /// Force the util strip to all-off.
    pub fn clear(&self) {
        let mut surface = match self.surface.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        surface.fill(OFF);
        surface.show();
    }
}
