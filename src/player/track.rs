use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::RngExt;

use crate::color::{ColorTable, OFF};
use crate::config::{PlaybackSettings, TriggerMode};
use crate::library::{Track, Util, UtilLibrary};
use crate::stop::StopFlag;
use crate::surface::Surface;

use super::util_runner::UtilRunner;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Completed,
    Interrupted,
}

/// Walks one track's path on the track strip, firing bound utils on the way.
///
/// Owns the track surface exclusively: nothing else writes to it while the
/// scheduler is running.
pub struct TrackPlayer {
    surface: Box<dyn Surface>,
    colors: ColorTable,
    playback: PlaybackSettings,
    stop: StopFlag,
}

impl TrackPlayer {
    pub fn new(
        surface: Box<dyn Surface>,
        colors: ColorTable,
        playback: PlaybackSettings,
        stop: StopFlag,
    ) -> Self {
        Self {
            surface,
            colors,
            playback,
            stop,
        }
    }

    /// One full playback pass: arm, traverse, settle.
    pub fn play(
        &mut self,
        track: &Track,
        utils: &UtilLibrary,
        runner: &Arc<UtilRunner>,
    ) -> PlayOutcome {
        let step_delay =
            Duration::from_secs_f64((track.speed * self.playback.speed_modifier).max(0.0));
        let armed = self.colors.resolve(&self.playback.armed_color);
        let active = self.colors.resolve(&self.playback.active_color);

        log::info!(
            "playing track {:?} ({}): {} steps, {} bound utils",
            track.id,
            track.name,
            track.path.len(),
            track.util_count()
        );

        // Arm: light the whole route in one flush, no motion yet.
        for pos in track.positions() {
            self.surface.set(pos, armed);
        }
        self.surface.show();

        let mut rng = rand::rng();
        let mut previous: Option<usize> = None;
        let mut detached: Vec<JoinHandle<()>> = Vec::new();
        let mut outcome = PlayOutcome::Completed;

        for step in &track.path {
            if self.stop.is_raised() {
                outcome = PlayOutcome::Interrupted;
                break;
            }

            // A pause step keeps the indicator where it is and only waits.
            if let Some(pos) = step.position() {
                self.surface.set(pos, active);
                self.surface.show();
                if let Some(prev) = previous {
                    if prev != pos {
                        self.surface.set(prev, OFF);
                        self.surface.show();
                    }
                }
                previous = Some(pos);
            }

            for util_id in step.utils() {
                match utils.by_id(util_id) {
                    Some(util) => self.invoke(util, runner, &mut detached),
                    None => {
                        log::warn!("track {:?} references unknown util {util_id:?}", track.id);
                    }
                }
            }

            if self.playback.random_util_trigger_chance > 0.0
                && rng.random::<f64>() < self.playback.random_util_trigger_chance
            {
                if let Some(util) = utils.random_pick(&mut rng) {
                    log::debug!("random trigger fired util {:?}", util.id);
                    self.invoke(util, runner, &mut detached);
                }
            }

            if !self.stop.wait(step_delay) {
                outcome = PlayOutcome::Interrupted;
                break;
            }
        }

        // Settle: collect detached triggers, darken the route, give the
        // layout a breather before the next track.
        for handle in detached {
            let _ = handle.join();
        }
        for pos in track.positions() {
            self.surface.set(pos, OFF);
        }
        self.surface.show();

        if outcome == PlayOutcome::Completed
            && !self
                .stop
                .wait(Duration::from_secs_f64(self.playback.intertrack_wait_secs))
        {
            outcome = PlayOutcome::Interrupted;
        }
        outcome
    }

    fn invoke(&self, util: &Util, runner: &Arc<UtilRunner>, detached: &mut Vec<JoinHandle<()>>) {
        match self.playback.trigger_mode {
            TriggerMode::Blocking => {
                runner.run(util);
            }
            TriggerMode::Detached => {
                let runner = Arc::clone(runner);
                let util = util.clone();
                detached.push(thread::spawn(move || {
                    runner.run(&util);
                }));
            }
        }
    }

    /// Force the track strip to all-off.
    pub fn clear(&mut self) {
        self.surface.fill(OFF);
        self.surface.show();
    }
}
