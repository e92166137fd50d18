use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::*;

fn write_track(dir: &Path, file: &str, body: &str) {
    fs::write(dir.join(file), body).unwrap();
}

const MAINLINE: &str = r#"
id = "mainline"
name = "Mainline loop"
speed = 0.35
path = [
    0,
    1,
    { led = 2, utils = ["crossing", "yard"] },
    -1,
    "pause",
    3,
]
"#;

#[test]
fn track_document_parses_every_step_shape() {
    let dir = tempdir().unwrap();
    write_track(dir.path(), "mainline.toml", MAINLINE);

    let tracks = scan_tracks(dir.path(), "toml").unwrap();
    assert_eq!(tracks.len(), 1);

    let track = &tracks[0];
    assert_eq!(track.id, "mainline");
    assert_eq!(track.name, "Mainline loop");
    assert_eq!(track.speed, 0.35);
    assert_eq!(
        track.path,
        vec![
            Step::Move(0),
            Step::Move(1),
            Step::MoveWithUtils(2, vec!["crossing".to_string(), "yard".to_string()]),
            Step::Pause,
            Step::Pause,
            Step::Move(3),
        ]
    );
}

#[test]
fn track_positions_and_util_count_skip_pauses() {
    let dir = tempdir().unwrap();
    write_track(dir.path(), "mainline.toml", MAINLINE);

    let tracks = scan_tracks(dir.path(), "toml").unwrap();
    let track = &tracks[0];
    assert_eq!(track.positions().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    assert_eq!(track.util_count(), 2);
}

#[test]
fn tracks_load_in_file_name_order() {
    let dir = tempdir().unwrap();
    write_track(
        dir.path(),
        "b-siding.toml",
        "id = \"siding\"\nname = \"Siding\"\nspeed = 0.5\npath = [0]\n",
    );
    write_track(
        dir.path(),
        "a-mainline.toml",
        "id = \"mainline\"\nname = \"Mainline\"\nspeed = 0.5\npath = [0]\n",
    );

    let tracks = scan_tracks(dir.path(), "toml").unwrap();
    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["mainline", "siding"]);
}

#[test]
fn non_document_extensions_are_ignored() {
    let dir = tempdir().unwrap();
    write_track(
        dir.path(),
        "mainline.toml",
        "id = \"mainline\"\nname = \"Mainline\"\nspeed = 0.5\npath = [0]\n",
    );
    write_track(dir.path(), "notes.txt", "not a track");

    let tracks = scan_tracks(dir.path(), "toml").unwrap();
    assert_eq!(tracks.len(), 1);
}

#[test]
fn empty_track_directory_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        scan_tracks(dir.path(), "toml"),
        Err(LoadError::Empty { .. })
    ));
}

#[test]
fn unparseable_track_document_is_an_error() {
    let dir = tempdir().unwrap();
    write_track(dir.path(), "broken.toml", "id = \"x\"\nthis is not toml");
    assert!(matches!(
        scan_tracks(dir.path(), "toml"),
        Err(LoadError::Parse { .. })
    ));
}

#[test]
fn unknown_step_keyword_is_an_error() {
    let dir = tempdir().unwrap();
    write_track(
        dir.path(),
        "bad.toml",
        "id = \"bad\"\nname = \"Bad\"\nspeed = 0.5\npath = [\"wait\"]\n",
    );
    assert!(matches!(
        scan_tracks(dir.path(), "toml"),
        Err(LoadError::Invalid { .. })
    ));
}

#[test]
fn negative_led_index_other_than_pause_is_an_error() {
    let dir = tempdir().unwrap();
    write_track(
        dir.path(),
        "bad.toml",
        "id = \"bad\"\nname = \"Bad\"\nspeed = 0.5\npath = [-2]\n",
    );
    assert!(matches!(
        scan_tracks(dir.path(), "toml"),
        Err(LoadError::Invalid { .. })
    ));
}

fn util_doc(id: &str, init: bool, random: bool) -> String {
    format!(
        r#"
id = "{id}"
name = "{id}"
enabled_on_init = {init}
is_random = {random}

[[actions]]
led = 0
color = "red"
"#
    )
}

fn write_util_set(dir: &Path) {
    fs::write(dir.join("a.toml"), util_doc("lights-on", true, false)).unwrap();
    fs::write(dir.join("b.toml"), util_doc("crossing", false, false)).unwrap();
    fs::write(dir.join("c.toml"), util_doc("ambient", false, true)).unwrap();
}

#[test]
fn utils_partition_into_disjoint_sets() {
    let dir = tempdir().unwrap();
    write_util_set(dir.path());

    let library = scan_utils(dir.path(), "toml").unwrap();
    assert_eq!(library.len(), 3);

    let ids = |utils: &[Util]| utils.iter().map(|u| u.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&library.init), vec!["lights-on"]);
    assert_eq!(ids(&library.trigger), vec!["crossing"]);
    assert_eq!(ids(&library.random), vec!["ambient"]);
}

#[test]
fn util_with_neither_flag_is_a_trigger() {
    let util = Util {
        id: "u".to_string(),
        name: "u".to_string(),
        enabled_on_init: false,
        is_random: false,
        actions: Vec::new(),
    };
    assert_eq!(util.classify(), Some(UtilClass::Trigger));

    let library = UtilLibrary::from_utils(vec![util]);
    assert_eq!(library.init.len(), 0);
    assert_eq!(library.trigger.len(), 1);
    assert_eq!(library.random.len(), 0);
}

#[test]
fn contradictory_util_is_excluded_from_every_partition() {
    let dir = tempdir().unwrap();
    write_util_set(dir.path());
    fs::write(dir.path().join("d.toml"), util_doc("confused", true, true)).unwrap();

    let library = scan_utils(dir.path(), "toml").unwrap();
    assert_eq!(library.len(), 3);
    assert!(library.by_id("confused").is_none());
}

#[test]
fn util_action_defaults_apply() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("u.toml"), util_doc("u", false, false)).unwrap();

    let library = scan_utils(dir.path(), "toml").unwrap();
    let action = &library.by_id("u").unwrap().actions[0];
    assert!(!action.blink);
    assert_eq!(action.duration, 0.5);
    assert_eq!(action.repeat, 1);
}

#[test]
fn by_id_searches_all_partitions() {
    let dir = tempdir().unwrap();
    write_util_set(dir.path());

    let library = scan_utils(dir.path(), "toml").unwrap();
    assert!(library.by_id("lights-on").is_some());
    assert!(library.by_id("crossing").is_some());
    assert!(library.by_id("ambient").is_some());
    assert!(library.by_id("missing").is_none());
}

#[test]
fn random_pick_draws_only_from_the_random_partition() {
    let dir = tempdir().unwrap();
    write_util_set(dir.path());

    let library = scan_utils(dir.path(), "toml").unwrap();
    let mut rng = rand::rng();
    for _ in 0..10 {
        assert_eq!(library.random_pick(&mut rng).unwrap().id, "ambient");
    }
}

#[test]
fn empty_util_directory_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        scan_utils(dir.path(), "toml"),
        Err(LoadError::Empty { .. })
    ));
}

#[test]
fn loading_the_same_documents_twice_is_identical() {
    let track_dir = tempdir().unwrap();
    write_track(track_dir.path(), "mainline.toml", MAINLINE);
    let util_dir = tempdir().unwrap();
    write_util_set(util_dir.path());

    let tracks_a = scan_tracks(track_dir.path(), "toml").unwrap();
    let tracks_b = scan_tracks(track_dir.path(), "toml").unwrap();
    let track_ids = |ts: &[Track]| ts.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(track_ids(&tracks_a), track_ids(&tracks_b));

    let utils_a = scan_utils(util_dir.path(), "toml").unwrap();
    let utils_b = scan_utils(util_dir.path(), "toml").unwrap();
    let ids = |utils: &[Util]| utils.iter().map(|u| u.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&utils_a.init), ids(&utils_b.init));
    assert_eq!(ids(&utils_a.trigger), ids(&utils_b.trigger));
    assert_eq!(ids(&utils_a.random), ids(&utils_b.random));
}

#[test]
fn duplicate_ids_reports_each_offender_once_sorted() {
    let ids = ["b", "a", "b", "c", "a", "b"];
    assert_eq!(
        duplicate_ids(ids.iter().copied()),
        vec!["a".to_string(), "b".to_string()]
    );
    assert!(duplicate_ids(["x", "y"].iter().copied()).is_empty());
}
