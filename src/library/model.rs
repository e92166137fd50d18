use serde::Deserialize;

/// One element of a track's path.
///
/// In documents a step is a bare LED index, the pause sentinel (`-1` or
/// `"pause"`), or an inline table binding utils to the position:
/// `{ led = 12, utils = ["crossing-bell"] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Move the indicator to this LED index.
    Move(usize),
    /// Hold the indicator in place for one step delay.
    Pause,
    /// Move the indicator and fire the named utils, in order.
    MoveWithUtils(usize, Vec<String>),
}

impl Step {
    /// LED position of this step, if it moves the indicator.
    pub fn position(&self) -> Option<usize> {
        match self {
            Step::Move(pos) | Step::MoveWithUtils(pos, _) => Some(*pos),
            Step::Pause => None,
        }
    }

    pub fn utils(&self) -> &[String] {
        match self {
            Step::MoveWithUtils(_, utils) => utils,
            _ => &[],
        }
    }
}

/// An ordered route of LED positions for the moving indicator.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// Base seconds per step, multiplied by the global speed modifier.
    pub speed: f64,
    pub path: Vec<Step>,
}

impl Track {
    /// Path positions in order, pauses excluded.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.path.iter().filter_map(Step::position)
    }

    /// Total number of utils bound along the path.
    pub fn util_count(&self) -> usize {
        self.path.iter().map(|s| s.utils().len()).sum()
    }
}

/// A named, reusable LED effect on the util strip.
#[derive(Debug, Clone)]
pub struct Util {
    pub id: String,
    pub name: String,
    pub enabled_on_init: bool,
    pub is_random: bool,
    pub actions: Vec<UtilAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UtilAction {
    pub led: usize,
    pub color: String,
    #[serde(default)]
    pub blink: bool,
    /// On/off phase length for blinking actions (seconds).
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_duration() -> f64 {
    0.5
}

fn default_repeat() -> u32 {
    1
}

/// Classification of a util, computed once at load time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UtilClass {
    /// Runs once after boot, before the scheduler starts.
    Init,
    /// Bound to track steps or invoked by id.
    Trigger,
    /// Candidate for random mid-path triggering.
    Random,
}

impl Util {
    /// `None` marks a contradictory record (both init and random), which is
    /// logged as unknown and excluded from every partition.
    pub fn classify(&self) -> Option<UtilClass> {
        match (self.enabled_on_init, self.is_random) {
            (true, true) => None,
            (true, false) => Some(UtilClass::Init),
            (false, true) => Some(UtilClass::Random),
            (false, false) => Some(UtilClass::Trigger),
        }
    }
}

/// All loaded utils, partitioned into the three disjoint sets.
#[derive(Debug, Clone, Default)]
pub struct UtilLibrary {
    pub init: Vec<Util>,
    pub trigger: Vec<Util>,
    pub random: Vec<Util>,
}

impl UtilLibrary {
    /// Partition utils in a single pass, preserving discovery order within
    /// each set.
    pub fn from_utils(utils: Vec<Util>) -> Self {
        let mut library = Self::default();
        for util in utils {
            match util.classify() {
                Some(UtilClass::Init) => library.init.push(util),
                Some(UtilClass::Trigger) => library.trigger.push(util),
                Some(UtilClass::Random) => library.random.push(util),
                None => {
                    log::warn!(
                        "util {:?} is marked both init and random, classification unknown; skipping",
                        util.id
                    );
                }
            }
        }
        library
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.init.len() + self.trigger.len() + self.random.len()
    }

    /// Lookup across all three partitions.
    pub fn by_id(&self, id: &str) -> Option<&Util> {
        self.iter().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Util> {
        self.init
            .iter()
            .chain(self.trigger.iter())
            .chain(self.random.iter())
    }

    /// Uniform pick from the random partition.
    pub fn random_pick<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<&Util> {
        use rand::seq::IndexedRandom;
        self.random.choose(rng)
    }
}
