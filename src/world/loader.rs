use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{
    Align, DOOR_FLAGS, Destination, Direction, EXIT_FLAGS, Exit, LOAD_FLAGS, Light, MOB_FLAGS,
    Portable, Ridable, Room, RoomGraph, Terrain, is_vnum,
};
use super::validator::validate_graph;
use crate::error::MapError;

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize, Serialize, Default)]
struct MapFile {
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    room: Vec<RoomConfig>, // [[room]] blocks
}

#[derive(Deserialize, Serialize)]
struct RoomConfig {
    vnum: String,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    desc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    dynamic_desc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    note: String,

    #[serde(default = "default_undefined")]
    terrain: String,
    #[serde(default = "default_undefined")]
    light: String,
    #[serde(default = "default_undefined")]
    align: String,
    #[serde(default = "default_undefined")]
    portable: String,
    #[serde(default = "default_undefined")]
    ridable: String,
    #[serde(default, skip_serializing_if = "is_false")]
    avoid: bool,

    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    #[serde(default)]
    z: i32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    mob_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    load_flags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exit: Vec<ExitConfig>, // [[room.exit]]
}

#[derive(Deserialize, Serialize)]
struct ExitConfig {
    direction: String,
    to: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    door: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exit_flags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    door_flags: Vec<String>,
}

// Helpers for serde defaults
fn default_undefined() -> String {
    "undefined".to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Load a room graph from a .toml file on disk.
pub fn load_graph_from_file(path: &Path) -> Result<RoomGraph, MapError> {
    let contents = fs::read_to_string(path)?;
    let graph = load_graph_from_str(&contents)?;
    log::info!("loaded {} rooms from {}", graph.len(), path.display());
    Ok(graph)
}

/// Load a room graph from TOML text.
///
/// Structural problems (bad vnums, unknown keywords, duplicate rooms) are
/// errors. Dangling references are only logged; the renderer and navigator
/// already treat them as unknown rooms.
pub fn load_graph_from_str(contents: &str) -> Result<RoomGraph, MapError> {
    let map_file: MapFile = toml::from_str(contents)?;

    let mut graph = RoomGraph::new();

    for room_cfg in map_file.room {
        if !is_vnum(&room_cfg.vnum) {
            return Err(MapError::Invalid(format!(
                "room vnum '{}' is not numeric",
                room_cfg.vnum
            )));
        }
        if graph.contains(&room_cfg.vnum) {
            return Err(MapError::Invalid(format!(
                "duplicate room vnum: {}",
                room_cfg.vnum
            )));
        }
        let room = room_from_config(room_cfg)?;
        graph.insert_room(room);
    }

    if graph.is_empty() {
        return Err(MapError::Empty);
    }

    // Input is lowercased before dispatch, so labels are stored that way too.
    for (label, vnum) in map_file.labels {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Err(MapError::Invalid("labels may not be empty".to_string()));
        }
        if graph.labels.insert(label.clone(), vnum).is_some() {
            return Err(MapError::Invalid(format!("duplicate label: {label}")));
        }
    }

    for issue in validate_graph(&graph) {
        log::warn!("{}", issue.message);
    }

    Ok(graph)
}

/// Render a room graph back into the TOML map format.
pub fn graph_to_toml(graph: &RoomGraph) -> Result<String, MapError> {
    let map_file = MapFile {
        labels: graph.labels.clone(),
        room: graph.rooms.values().map(room_to_config).collect(),
    };
    Ok(toml::to_string_pretty(&map_file)?)
}

/// Write a room graph to disk, creating the parent directory if needed.
pub fn save_graph_to_file(graph: &RoomGraph, path: &Path) -> Result<(), MapError> {
    let text = graph_to_toml(graph)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    log::info!("saved {} rooms to {}", graph.len(), path.display());
    Ok(())
}

/// Somewhere the room graph can be saved to.
pub trait MapStore {
    fn save(&mut self, graph: &RoomGraph) -> Result<(), MapError>;
}

/// Saves the graph as TOML at a fixed path.
pub struct TomlMapFile {
    path: PathBuf,
}

impl TomlMapFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TomlMapFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MapStore for TomlMapFile {
    fn save(&mut self, graph: &RoomGraph) -> Result<(), MapError> {
        save_graph_to_file(graph, &self.path)
    }
}

////////////////////////////
/// ROOM PARSE HELPERS   ///
////////////////////////////

fn room_from_config(cfg: RoomConfig) -> Result<Room, MapError> {
    let vnum = cfg.vnum;
    let field = |what: &str, value: &str| {
        MapError::Invalid(format!("room {}: '{}' is not a valid {}", vnum, value, what))
    };

    let terrain = Terrain::parse(&cfg.terrain).ok_or_else(|| field("terrain", &cfg.terrain))?;
    let light = Light::parse(&cfg.light).ok_or_else(|| field("light", &cfg.light))?;
    let align = Align::parse(&cfg.align).ok_or_else(|| field("align", &cfg.align))?;
    let portable =
        Portable::parse(&cfg.portable).ok_or_else(|| field("portable", &cfg.portable))?;
    let ridable = Ridable::parse(&cfg.ridable).ok_or_else(|| field("ridable", &cfg.ridable))?;

    let mob_flags = checked_flags(cfg.mob_flags, MOB_FLAGS).map_err(|f| field("mob flag", &f))?;
    let load_flags =
        checked_flags(cfg.load_flags, LOAD_FLAGS).map_err(|f| field("load flag", &f))?;

    let mut exits = BTreeMap::new();
    for e in cfg.exit {
        let direction =
            Direction::parse(&e.direction).ok_or_else(|| field("direction", &e.direction))?;
        if exits.contains_key(&direction) {
            return Err(MapError::Invalid(format!(
                "room {}: duplicate exit {}",
                vnum, direction
            )));
        }
        let to = Destination::parse(&e.to).ok_or_else(|| field("destination", &e.to))?;
        let exit_flags =
            checked_flags(e.exit_flags, EXIT_FLAGS).map_err(|f| field("exit flag", &f))?;
        let door_flags =
            checked_flags(e.door_flags, DOOR_FLAGS).map_err(|f| field("door flag", &f))?;
        exits.insert(
            direction,
            Exit {
                to,
                door: e.door,
                exit_flags,
                door_flags,
            },
        );
    }

    Ok(Room {
        vnum: vnum.clone(),
        name: cfg.name,
        desc: cfg.desc,
        dynamic_desc: cfg.dynamic_desc,
        note: cfg.note,
        terrain,
        light,
        align,
        portable,
        ridable,
        avoid: cfg.avoid,
        x: cfg.x,
        y: cfg.y,
        z: cfg.z,
        mob_flags,
        load_flags,
        exits,
    })
}

fn room_to_config(room: &Room) -> RoomConfig {
    RoomConfig {
        vnum: room.vnum.clone(),
        name: room.name.clone(),
        desc: room.desc.clone(),
        dynamic_desc: room.dynamic_desc.clone(),
        note: room.note.clone(),
        terrain: room.terrain.name().to_string(),
        light: room.light.name().to_string(),
        align: room.align.name().to_string(),
        portable: room.portable.name().to_string(),
        ridable: room.ridable.name().to_string(),
        avoid: room.avoid,
        x: room.x,
        y: room.y,
        z: room.z,
        mob_flags: room.mob_flags.iter().cloned().collect(),
        load_flags: room.load_flags.iter().cloned().collect(),
        exit: room
            .exits
            .iter()
            .map(|(dir, exit)| ExitConfig {
                direction: dir.name().to_string(),
                to: exit.to.as_str().to_string(),
                door: exit.door.clone(),
                exit_flags: exit.exit_flags.iter().cloned().collect(),
                door_flags: exit.door_flags.iter().cloned().collect(),
            })
            .collect(),
    }
}

/// Keeps only known flag names; the first unknown one is returned as the error.
fn checked_flags(flags: Vec<String>, known: &[&str]) -> Result<BTreeSet<String>, String> {
    let mut out = BTreeSet::new();
    for flag in flags {
        if !known.contains(&flag.as_str()) {
            return Err(flag);
        }
        out.insert(flag);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_MAP: &str = r#"
[labels]
gate = "2"

[[room]]
vnum = "1"
name = "A Dusty Crossroads"
desc = """
Two tracks meet here.

Dust swirls.
"""
terrain = "field"

[[room.exit]]
direction = "north"
to = "2"
door = "gate"

[[room.exit]]
direction = "down"
to = "death"

[[room]]
vnum = "2"
name = "The Great East Road"
terrain = "road"
"#;

    #[test]
    fn loads_rooms_exits_and_labels() {
        let graph = load_graph_from_str(SMALL_MAP).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.label("gate"), Some("2"));

        let room = graph.room("1").unwrap();
        assert_eq!(room.terrain, Terrain::Field);
        assert_eq!(room.light, Light::Undefined);
        let north = &room.exits[&Direction::North];
        assert_eq!(north.to, Destination::Room("2".into()));
        assert_eq!(north.door, "gate");
        assert_eq!(room.exits[&Direction::Down].to, Destination::Death);
    }

    #[test]
    fn rejects_arbitrary_destinations() {
        let text = r#"
[[room]]
vnum = "1"
[[room.exit]]
direction = "north"
to = "somewhere"
"#;
        assert!(matches!(
            load_graph_from_str(text),
            Err(MapError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_terrain_and_duplicates() {
        let bad_terrain = "[[room]]\nvnum = \"1\"\nterrain = \"lava\"\n";
        assert!(load_graph_from_str(bad_terrain).is_err());

        let duplicate = "[[room]]\nvnum = \"1\"\n[[room]]\nvnum = \"1\"\n";
        assert!(matches!(
            load_graph_from_str(duplicate),
            Err(MapError::Invalid(_))
        ));
    }

    #[test]
    fn labels_are_lowercased() {
        let text = "[labels]\nWestGate = \"1\"\n\n[[room]]\nvnum = \"1\"\n";
        let graph = load_graph_from_str(text).unwrap();
        assert_eq!(graph.label("westgate"), Some("1"));
        assert!(graph.label("WestGate").is_none());

        let clash = "[labels]\nInn = \"1\"\ninn = \"1\"\n\n[[room]]\nvnum = \"1\"\n";
        assert!(matches!(
            load_graph_from_str(clash),
            Err(MapError::Invalid(_))
        ));
    }

    #[test]
    fn empty_map_is_an_error() {
        assert!(matches!(load_graph_from_str(""), Err(MapError::Empty)));
    }

    #[test]
    fn saved_text_loads_back_to_the_same_graph() {
        let graph = load_graph_from_str(SMALL_MAP).unwrap();
        let text = graph_to_toml(&graph).unwrap();
        assert_eq!(load_graph_from_str(&text).unwrap(), graph);
    }

    #[test]
    fn toml_map_file_writes_to_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("map.toml");
        let graph = load_graph_from_str(SMALL_MAP).unwrap();

        let mut store = TomlMapFile::new(&path);
        store.save(&graph).unwrap();
        assert_eq!(load_graph_from_file(store.path()).unwrap(), graph);
    }
}
