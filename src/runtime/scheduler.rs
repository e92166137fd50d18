//! Track selection loop: runs until interrupted.

use std::sync::Arc;

use rand::seq::IndexedRandom;

use crate::config::SelectionMode;
use crate::library::{Track, UtilLibrary};
use crate::player::{PlayOutcome, TrackPlayer, UtilRunner};
use crate::stop::StopFlag;

pub fn run(
    tracks: &[Track],
    utils: &UtilLibrary,
    player: &mut TrackPlayer,
    runner: &Arc<UtilRunner>,
    selection: SelectionMode,
    stop: &StopFlag,
) {
    let mut rng = rand::rng();
    let mut next = 0usize;

    while !stop.is_raised() {
        // Boot guarantees a non-empty track collection.
        let track = match selection {
            SelectionMode::Random => match tracks.choose(&mut rng) {
                Some(t) => t,
                None => break,
            },
            SelectionMode::InOrder => {
                let t = &tracks[next % tracks.len()];
                next += 1;
                t
            }
        };

        if player.play(track, utils, runner) == PlayOutcome::Interrupted {
            break;
        }
    }
}
