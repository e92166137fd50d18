//! Configuration loader and schema types.
//!
//! All tunables of the engine live here: strip geometry and pins, playback
//! pacing, boot behavior, document directories and the color table.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
