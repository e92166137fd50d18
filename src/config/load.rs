use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads the resolved config file (if any), then applies
/// environment variables with the `TRAINPIXELS__` prefix on top. Unlike a
/// desktop app there is no silent fallback to defaults: a config that fails
/// to produce a valid `[strips]` section keeps the process from starting.
impl Settings {
    /// Load settings from the resolved config file and environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TRAINPIXELS")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Range checks the deserializer cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.strips.track_pixel_length == 0 || self.strips.util_pixel_length == 0 {
            return Err("strips.*_pixel_length must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.strips.brightness) {
            return Err("strips.brightness must be between 0.0 and 1.0".to_string());
        }
        if self.playback.speed_modifier <= 0.0 {
            return Err("playback.speed_modifier must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.random_util_trigger_chance) {
            return Err(
                "playback.random_util_trigger_chance must be between 0.0 and 1.0".to_string(),
            );
        }
        if self.playback.intertrack_wait_secs < 0.0 {
            return Err("playback.intertrack_wait_secs must be >= 0".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path: `TRAINPIXELS_CONFIG_PATH`, then a process-local
/// `trainpixels.toml`, then the per-user profile path.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TRAINPIXELS_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }

    let local = PathBuf::from("trainpixels.toml");
    if local.is_file() {
        return Some(local);
    }

    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/trainpixels/config.toml`
/// or `~/.config/trainpixels/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("trainpixels").join("config.toml"))
}
