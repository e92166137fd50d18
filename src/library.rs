//! Track and util documents: in-memory model plus the directory scanners
//! that produce it at boot.

mod model;
mod scan;

pub use model::{Step, Track, Util, UtilAction, UtilClass, UtilLibrary};
pub use scan::{LoadError, duplicate_ids, scan_tracks, scan_utils};

#[cfg(test)]
mod tests;
