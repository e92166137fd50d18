//! Boot orchestrator: Loading → Validating → InitRunning → Ready.
//!
//! Both document directories load on their own threads; each loader owns its
//! collection until it hands it back through a dedicated channel, so nothing
//! is shared while loads are in flight. Meanwhile the track strip shows a
//! rainbow purely as liveness feedback.

use std::path::Path;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use smart_leds::RGB8;
use thiserror::Error;

use crate::config::{BootSettings, LibrarySettings};
use crate::library::{LoadError, Track, UtilLibrary, duplicate_ids, scan_tracks, scan_utils};
use crate::player::UtilRunner;
use crate::status::Status;
use crate::stop::StopFlag;
use crate::surface::Surface;

#[derive(Debug, Error)]
pub enum BootError {
    #[error("loading track documents failed: {0}")]
    TrackLoad(LoadError),
    #[error("loading util documents failed: {0}")]
    UtilLoad(LoadError),
    #[error("{0} loader thread died before delivering its collection")]
    WorkerLost(&'static str),
    #[error("document loading timed out after {0:?}")]
    Timeout(Duration),
    #[error("duplicate track ids: {0:?}")]
    DuplicateTrackIds(Vec<String>),
    #[error("duplicate util ids: {0:?}")]
    DuplicateUtilIds(Vec<String>),
}

impl BootError {
    pub fn status(&self) -> Status {
        match self {
            BootError::TrackLoad(_)
            | BootError::UtilLoad(_)
            | BootError::DuplicateTrackIds(_)
            | BootError::DuplicateUtilIds(_) => Status::InvalidInput,
            BootError::WorkerLost(_) => Status::SoftwareFailure,
            BootError::Timeout(_) => Status::Timeout,
        }
    }
}

pub enum Boot {
    Ready {
        tracks: Vec<Track>,
        utils: UtilLibrary,
    },
    Interrupted,
}

pub fn run(
    data_root: &Path,
    library: &LibrarySettings,
    boot: &BootSettings,
    track_surface: &mut dyn Surface,
    runner: &UtilRunner,
    stop: &StopFlag,
) -> Result<Boot, BootError> {
    let frame_delay = Duration::from_millis(boot.frame_delay_ms);
    let deadline = Instant::now() + Duration::from_secs(boot.load_timeout_secs);

    // Loading: one thread per directory, results handed back over one-shot
    // channels, each consumed exactly once below.
    let (track_tx, track_rx) = mpsc::channel();
    let (util_tx, util_rx) = mpsc::channel();
    {
        let dir = data_root.join(&library.tracks_dir);
        let extension = library.extension.clone();
        thread::spawn(move || {
            let _ = track_tx.send(scan_tracks(&dir, &extension));
        });
    }
    {
        let dir = data_root.join(&library.utils_dir);
        let extension = library.extension.clone();
        thread::spawn(move || {
            let _ = util_tx.send(scan_utils(&dir, &extension));
        });
    }

    let mut frame: u8 = 0;
    let mut tracks: Option<Vec<Track>> = None;
    let mut utils: Option<UtilLibrary> = None;

    while tracks.is_none() || utils.is_none() {
        if stop.is_raised() {
            return Ok(Boot::Interrupted);
        }
        if Instant::now() >= deadline {
            return Err(BootError::Timeout(Duration::from_secs(
                boot.load_timeout_secs,
            )));
        }

        if tracks.is_none() {
            match track_rx.try_recv() {
                Ok(result) => tracks = Some(result.map_err(BootError::TrackLoad)?),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => return Err(BootError::WorkerLost("track")),
            }
        }
        if utils.is_none() {
            match util_rx.try_recv() {
                Ok(result) => utils = Some(result.map_err(BootError::UtilLoad)?),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => return Err(BootError::WorkerLost("util")),
            }
        }

        rainbow_frame(track_surface, frame);
        frame = frame.wrapping_add(1);
        if !stop.wait(frame_delay) {
            return Ok(Boot::Interrupted);
        }
    }

    // Both loads are in; let the rainbow settle for a moment so a fast boot
    // does not flash and vanish.
    for _ in 0..boot.settle_cycles {
        rainbow_frame(track_surface, frame);
        frame = frame.wrapping_add(1);
        if !stop.wait(frame_delay) {
            return Ok(Boot::Interrupted);
        }
    }

    let tracks = tracks.expect("track load joined");
    let utils = utils.expect("util load joined");

    // Validating: duplicate ids mean two documents claim the same identity,
    // and there is no safe way to pick one.
    validate(&tracks, &utils)?;

    // InitRunning: init utils fire once, in collection order, to completion.
    for util in &utils.init {
        if stop.is_raised() {
            return Ok(Boot::Interrupted);
        }
        log::info!("running init util {:?} ({})", util.id, util.name);
        runner.run(util);
    }

    // Ready: both strips dark, scheduler may start.
    track_surface.fill(crate::color::OFF);
    track_surface.show();
    runner.clear();

    Ok(Boot::Ready { tracks, utils })
}

fn validate(tracks: &[Track], utils: &UtilLibrary) -> Result<(), BootError> {
    let dup = duplicate_ids(tracks.iter().map(|t| t.id.as_str()));
    if !dup.is_empty() {
        return Err(BootError::DuplicateTrackIds(dup));
    }
    let dup = duplicate_ids(utils.iter().map(|u| u.id.as_str()));
    if !dup.is_empty() {
        return Err(BootError::DuplicateUtilIds(dup));
    }
    Ok(())
}

/// Rainbow colors across 0-255 positions.
fn wheel(pos: u8) -> RGB8 {
    if pos < 85 {
        RGB8::new(pos * 3, 255 - pos * 3, 0)
    } else if pos < 170 {
        let pos = pos - 85;
        RGB8::new(255 - pos * 3, 0, pos * 3)
    } else {
        let pos = pos - 170;
        RGB8::new(0, pos * 3, 255 - pos * 3)
    }
}

fn rainbow_frame(surface: &mut dyn Surface, frame: u8) {
    let length = surface.len();
    for i in 0..length {
        let pos = ((i * 256 / length) as u8).wrapping_add(frame.wrapping_mul(2));
        surface.set(i, wheel(pos));
    }
    surface.show();
}
