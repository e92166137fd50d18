use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use super::model::{Step, Track, Util, UtilAction, UtilLibrary};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid document {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("no documents found in {}", dir.display())]
    Empty { dir: PathBuf },
}

#[derive(Deserialize)]
struct TrackDoc {
    id: String,
    name: String,
    speed: f64,
    path: Vec<RawStep>,
}

/// On-disk shape of a path step. `-1` is the historical pause sentinel;
/// `"pause"` is the readable spelling.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStep {
    Index(i64),
    Keyword(String),
    WithUtils {
        led: i64,
        #[serde(default)]
        utils: Vec<String>,
    },
}

impl RawStep {
    fn into_step(self) -> Result<Step, String> {
        match self {
            RawStep::Index(-1) => Ok(Step::Pause),
            RawStep::Index(n) => index(n).map(Step::Move),
            RawStep::Keyword(word) if word == "pause" => Ok(Step::Pause),
            RawStep::Keyword(word) => Err(format!("unknown step keyword {word:?}")),
            RawStep::WithUtils { led, utils } => index(led).map(|n| Step::MoveWithUtils(n, utils)),
        }
    }
}

fn index(value: i64) -> Result<usize, String> {
    usize::try_from(value).map_err(|_| format!("negative led index {value}"))
}

#[derive(Deserialize)]
struct UtilDoc {
    id: String,
    name: String,
    #[serde(default)]
    enabled_on_init: bool,
    #[serde(default)]
    is_random: bool,
    #[serde(default)]
    actions: Vec<UtilAction>,
}

/// List document files directly inside `dir`, sorted by file name so
/// collection order is stable across runs.
fn document_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect()
}

fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every track document in `dir`. An empty collection is an error:
/// without tracks the scheduler has nothing to run.
pub fn scan_tracks(dir: &Path, extension: &str) -> Result<Vec<Track>, LoadError> {
    let mut tracks = Vec::new();

    for path in document_files(dir, extension) {
        let doc: TrackDoc = read_document(&path)?;
        let steps: Result<Vec<Step>, String> =
            doc.path.into_iter().map(RawStep::into_step).collect();
        let path_steps = steps.map_err(|reason| LoadError::Invalid {
            path: path.clone(),
            reason,
        })?;

        log::debug!("loaded track {:?} from {}", doc.id, path.display());
        tracks.push(Track {
            id: doc.id,
            name: doc.name,
            speed: doc.speed,
            path: path_steps,
        });
    }

    if tracks.is_empty() {
        return Err(LoadError::Empty {
            dir: dir.to_path_buf(),
        });
    }
    Ok(tracks)
}

/// Load every util document in `dir` and partition the result.
pub fn scan_utils(dir: &Path, extension: &str) -> Result<UtilLibrary, LoadError> {
    let mut utils = Vec::new();

    for path in document_files(dir, extension) {
        let doc: UtilDoc = read_document(&path)?;
        log::debug!("loaded util {:?} from {}", doc.id, path.display());
        utils.push(Util {
            id: doc.id,
            name: doc.name,
            enabled_on_init: doc.enabled_on_init,
            is_random: doc.is_random,
            actions: doc.actions,
        });
    }

    let library = UtilLibrary::from_utils(utils);
    if library.is_empty() {
        return Err(LoadError::Empty {
            dir: dir.to_path_buf(),
        });
    }
    Ok(library)
}

/// Ids occurring more than once, each reported a single time, sorted.
pub fn duplicate_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            duplicates.insert(id.to_string());
        }
    }
    let mut duplicates: Vec<String> = duplicates.into_iter().collect();
    duplicates.sort();
    duplicates
}
