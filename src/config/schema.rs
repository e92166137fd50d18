use std::collections::HashMap;

use serde::Deserialize;

/// Top-level settings loaded from `trainpixels.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `./trainpixels.toml` or
/// `$XDG_CONFIG_HOME/trainpixels/config.toml`, local file winning.
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TRAINPIXELS__`, `__` as nested separator)
/// 2) Config file
/// 3) Struct defaults
///
/// `[strips]` has no defaults: a config without it does not describe any
/// hardware and is rejected at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub strips: StripSettings,
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub boot: BootSettings,
    #[serde(default)]
    pub library: LibrarySettings,
    #[serde(default = "default_color_table")]
    pub colors: HashMap<String, ColorSpec>,
}

/// Geometry and wiring of the two LED strips.
///
/// Pin names are opaque here and passed through to whatever surface
/// implementation gets bound (`"D19"` style, matching the board labels
/// printed on the layout's wiring plan).
#[derive(Debug, Clone, Deserialize)]
pub struct StripSettings {
    pub track_pin: String,
    pub util_pin: String,
    pub track_pixel_length: usize,
    pub util_pixel_length: usize,
    /// Global brightness, 0.0 to 1.0.
    pub brightness: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Multiplier applied to every track's own `speed` value.
    pub speed_modifier: f64,
    /// Per-step chance of firing a util from the random partition, 0.0 to 1.0.
    pub random_util_trigger_chance: f64,
    /// Pause between two track runs (seconds).
    pub intertrack_wait_secs: f64,
    /// How the scheduler picks the next track.
    pub selection: SelectionMode,
    /// Whether triggered utils block track progression.
    pub trigger_mode: TriggerMode,
    /// Color name for path positions lit during the arming pass.
    pub armed_color: String,
    /// Color name for the moving indicator.
    pub active_color: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            speed_modifier: 1.0,
            random_util_trigger_chance: 0.05,
            intertrack_wait_secs: 3.0,
            selection: SelectionMode::Random,
            trigger_mode: TriggerMode::Blocking,
            armed_color: "white".to_string(),
            active_color: "red".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Pick a track uniformly at random each round.
    Random,
    /// Walk the track collection in discovery order, wrapping around.
    #[serde(alias = "in_order", alias = "sequential")]
    InOrder,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerMode {
    /// Step-bound utils run inline and complete before the pacing delay.
    Blocking,
    /// Step-bound utils run on their own threads; the player joins the
    /// handles while settling at the end of the track.
    Detached,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootSettings {
    /// Extra rainbow frames rendered after both loads complete.
    pub settle_cycles: u32,
    /// Deadline for both document loads (seconds).
    pub load_timeout_secs: u64,
    /// Delay between rainbow frames (milliseconds).
    pub frame_delay_ms: u64,
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            settle_cycles: 40,
            load_timeout_secs: 30,
            frame_delay_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory of track documents, relative to the data root.
    pub tracks_dir: String,
    /// Directory of util documents, relative to the data root.
    pub utils_dir: String,
    /// File extension to treat as a document (case-insensitive, without dot).
    pub extension: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            tracks_dir: "tracks".to_string(),
            utils_dir: "utils".to_string(),
            extension: "toml".to_string(),
        }
    }
}

/// One color table entry: red, green, blue (0-255) and a per-color
/// brightness scale (0.0 to 1.0).
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct ColorSpec(pub u8, pub u8, pub u8, pub f32);

pub(super) fn default_color_table() -> HashMap<String, ColorSpec> {
    HashMap::from([
        ("off".to_string(), ColorSpec(0, 0, 0, 0.0)),
        ("white".to_string(), ColorSpec(255, 255, 255, 1.0)),
        ("warm-white".to_string(), ColorSpec(255, 180, 107, 1.0)),
        ("red".to_string(), ColorSpec(255, 0, 0, 1.0)),
        ("green".to_string(), ColorSpec(0, 255, 0, 1.0)),
        ("blue".to_string(), ColorSpec(0, 0, 255, 1.0)),
        ("yellow".to_string(), ColorSpec(255, 200, 0, 1.0)),
        ("orange".to_string(), ColorSpec(255, 100, 0, 1.0)),
        ("purple".to_string(), ColorSpec(160, 0, 255, 1.0)),
    ])
}
