mod loader;
mod model;
mod validator;

pub use loader::{
    MapStore, TomlMapFile, graph_to_toml, load_graph_from_file, load_graph_from_str,
    save_graph_to_file,
};

pub use model::{
    Align, DOOR_FLAGS, Destination, Direction, EXIT_FLAGS, Exit, LOAD_FLAGS, Light, MOB_FLAGS,
    Portable, Ridable, Room, RoomGraph, Terrain, is_vnum,
};
pub use validator::{ValidationIssue, validate_graph};
