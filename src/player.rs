//! Playback: the track state machine and the util effect runner.

mod track;
mod util_runner;

pub use track::{PlayOutcome, TrackPlayer};
pub use util_runner::UtilRunner;
