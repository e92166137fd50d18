//! Process wiring: boot, the scheduler loop and shutdown.

mod boot;
mod scheduler;

use std::path::Path;
use std::sync::Arc;

use crate::color::ColorTable;
use crate::config::Settings;
use crate::player::{TrackPlayer, UtilRunner};
use crate::status::Status;
use crate::stop::StopFlag;
use crate::surface;

pub fn run(data_root: &Path) -> Status {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            log::error!("failed to load configuration: {e}");
            return Status::InvalidInput;
        }
    };
    if let Err(msg) = settings.validate() {
        log::error!("invalid configuration: {msg}");
        return Status::InvalidInput;
    }

    let colors = ColorTable::new(&settings.colors, settings.strips.brightness);

    let mut track_surface = surface::open(
        &settings.strips.track_pin,
        settings.strips.track_pixel_length,
        settings.strips.brightness,
    );
    let util_surface = surface::open(
        &settings.strips.util_pin,
        settings.strips.util_pixel_length,
        settings.strips.brightness,
    );

    let stop = StopFlag::new();
    if let Err(e) = stop.install_ctrlc() {
        log::error!("failed to install interrupt handler: {e}");
        return Status::SoftwareFailure;
    }

    let runner = Arc::new(UtilRunner::new(util_surface, colors.clone(), stop.clone()));

    let boot_outcome = boot::run(
        data_root,
        &settings.library,
        &settings.boot,
        track_surface.as_mut(),
        &runner,
        &stop,
    );

    let mut player = TrackPlayer::new(
        track_surface,
        colors,
        settings.playback.clone(),
        stop.clone(),
    );

    let status = match boot_outcome {
        Ok(boot::Boot::Ready { tracks, utils }) => {
            log::info!(
                "ready: {} tracks, {} utils ({} init, {} trigger, {} random)",
                tracks.len(),
                utils.len(),
                utils.init.len(),
                utils.trigger.len(),
                utils.random.len()
            );
            scheduler::run(
                &tracks,
                &utils,
                &mut player,
                &runner,
                settings.playback.selection,
                &stop,
            );
            Status::Ok
        }
        Ok(boot::Boot::Interrupted) => Status::Ok,
        Err(e) => {
            log::error!("boot failed: {e}");
            e.status()
        }
    };

    // Whatever ended the run, both strips go dark before the process exits.
    player.clear();
    runner.clear();
    status
}
