use std::fs;
use std::path::{Path, PathBuf};

use mapemu::engine::{Interpreter, InterpreterLoop, TerrainRouter};
use mapemu::settings::{self, SettingValue, SettingsStore};
use mapemu::world::{TomlMapFile, load_graph_from_file, load_graph_from_str};
use mapemu::{RoomGraph, Settings};

const SCENARIO_MAP: &str = r#"
[[room]]
vnum = "1"
name = "Empty Room"
terrain = "field"

[[room]]
vnum = "2"
name = "Crossroads"
terrain = "field"

[[room.exit]]
direction = "north"
to = "3"
exit_flags = ["door"]

[[room]]
vnum = "3"
name = "Old Road"
terrain = "road"

[[room]]
vnum = "5"
name = "Narrow Ledge"
terrain = "mountains"

[[room.exit]]
direction = "north"
to = "death"
"#;

fn scenario_graph() -> RoomGraph {
    load_graph_from_str(SCENARIO_MAP).unwrap()
}

fn interpreter_at(vnum: &str, map_path: PathBuf) -> Interpreter {
    let mut settings = Settings::default();
    settings.set(settings::LAST_VNUM, SettingValue::Text(vnum.into()));
    Interpreter::new(
        scenario_graph(),
        settings,
        Box::new(TerrainRouter),
        Box::new(TomlMapFile::new(map_path)),
    )
    .unwrap()
}

/// Runs a whole session over `input` with settings kept in `dir`.
fn run_session(dir: &Path, input: impl AsRef<[u8]>) -> (String, Interpreter) {
    let session = InterpreterLoop::start(
        scenario_graph(),
        Box::new(TomlMapFile::new(dir.join("map.toml"))),
        SettingsStore::in_dir(dir),
    )
    .unwrap();
    let mut out = Vec::new();
    let interpreter = session.run(input.as_ref(), &mut out).unwrap();
    (String::from_utf8(out).unwrap(), interpreter)
}

#[test]
fn room_without_exits_lists_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut it = interpreter_at("1", dir.path().join("map.toml"));
    assert_eq!(it.step("exits").text(), "Exits: None!");
    assert!(it.step("look").lines().any(|l| l == "Exits: None!"));
}

#[test]
fn visible_unnamed_door_to_a_road() {
    let dir = tempfile::tempdir().unwrap();
    let mut it = interpreter_at("2", dir.path().join("map.toml"));
    let out = it.step("look");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec!["Crossroads", "Doors:", "north: exit", "Exits: =(north)=", "Vnum: 2"]
    );
}

#[test]
fn deathtrap_keeps_the_player_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut it = interpreter_at("5", dir.path().join("map.toml"));
    assert_eq!(it.step("north").text(), "Deathtrap in that direction!");
    assert_eq!(it.step("n").text(), "Deathtrap in that direction!");
    assert_eq!(it.current_vnum(), "5");
}

#[test]
fn first_run_starts_at_smallest_vnum() {
    let dir = tempfile::tempdir().unwrap();
    let (text, it) = run_session(dir.path(), "");
    assert_eq!(it.current_vnum(), "1");
    assert!(text.starts_with("Welcome to the map emulator!\nLoaded 4 rooms.\nEmpty Room\n"));
    assert!(!text.contains("Warning"));
}

#[test]
fn settings_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (text, _) = run_session(dir.path(), "5\nvnum\nquit\n");
    assert!(text.contains("Show room vnum disabled."));
    assert!(text.ends_with("Good bye.\n"));

    let saved = fs::read_to_string(dir.path().join("settings.json")).unwrap();
    assert_eq!(
        saved,
        "{\n  \"brief\": true,\n  \"last_vnum\": \"5\",\n  \"show_vnum\": false,\n  \"use_terrain_symbols\": false\n}"
    );

    let (_, it) = run_session(dir.path(), "q\n");
    assert_eq!(it.current_vnum(), "5");
    assert_eq!(it.settings().get_bool(settings::SHOW_VNUM), Some(false));
}

#[test]
fn user_layer_overrides_sample_layer() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("settings.json.sample"),
        r#"{"brief": false, "use_terrain_symbols": true}"#,
    )
    .unwrap();
    fs::write(dir.path().join("settings.json"), r#"{"brief": true, "volume": 3}"#).unwrap();

    let (text, it) = run_session(dir.path(), "quit\n");
    assert_eq!(it.settings().get_bool(settings::BRIEF), Some(true));
    assert!(it.settings().enabled(settings::USE_TERRAIN_SYMBOLS));
    assert!(text.contains("\n.> "));

    let saved = fs::read_to_string(dir.path().join("settings.json")).unwrap();
    assert!(saved.contains("\"volume\": 3"));
}

#[test]
fn corrupted_settings_are_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("settings.json"), "{not json").unwrap();

    let (text, it) = run_session(dir.path(), "");
    assert!(text.contains("Warning: Corrupted configuration file: "));
    assert_eq!(it.current_vnum(), "1");
    assert_eq!(it.settings().get_bool(settings::BRIEF), Some(true));
}

#[test]
fn settings_directory_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("settings.json.sample")).unwrap();

    let (text, _) = run_session(dir.path(), "");
    assert!(text.contains("is a directory, not a file."));
}

#[test]
fn blank_lines_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let (text, it) = run_session(dir.path(), "\n   \n2\n\nquit\n");
    assert_eq!(it.current_vnum(), "2");
    assert!(!text.contains("\n\n"));
    assert!(!text.contains("Arglebargle"));
}

#[test]
fn undecodable_input_does_not_end_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let (text, it) = run_session(dir.path(), b"2\ncaf\xe9\nvnum\nquit\n");

    assert!(text.contains("Arglebargle, glop-glyf!?!"));
    assert!(text.contains("Show room vnum disabled."));
    assert!(text.ends_with("Good bye.\n"));
    assert_eq!(it.current_vnum(), "2");

    let saved = fs::read_to_string(dir.path().join("settings.json")).unwrap();
    assert!(saved.contains("\"last_vnum\": \"2\""));
    assert!(saved.contains("\"show_vnum\": false"));
}

#[test]
fn savemap_writes_edits_back() {
    let dir = tempfile::tempdir().unwrap();
    let map_path = dir.path().join("out").join("map.toml");
    let mut it = interpreter_at("3", map_path.clone());

    it.step("rnote watch for riders");
    it.step("rlabel add road");
    assert_eq!(it.step("savemap").text(), "Map saved.");

    let reloaded = load_graph_from_file(&map_path).unwrap();
    assert_eq!(reloaded.room("3").unwrap().note, "watch for riders");
    assert_eq!(reloaded.label("road"), Some("3"));
    assert_eq!(&reloaded, it.graph());
}

#[test]
fn shipped_map_routes() {
    let map = Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("map.toml");
    let graph = load_graph_from_file(&map).unwrap();
    assert_eq!(graph.len(), 8);

    let dir = tempfile::tempdir().unwrap();
    let mut it = Interpreter::new(
        graph,
        Settings::default(),
        Box::new(TerrainRouter),
        Box::new(TomlMapFile::new(dir.path().join("map.toml"))),
    )
    .unwrap();
    assert_eq!(it.current_vnum(), "1000");

    let look = it.step("look");
    assert!(
        look.lines()
            .any(|l| l == "Exits: =north=, east, (south), -west-")
    );

    assert_eq!(it.step("path westgate").text(), "Number of steps: 2\n2w");
    assert_eq!(
        it.step("path 1007").text(),
        "Number of steps: 3\n2w, open gate west, w"
    );
    assert_eq!(
        it.step("path 1006").text(),
        "Number of steps: 2\ne, open trapdoor down, d"
    );
    assert_eq!(it.step("path bree").text(), "You are already there!");
}
