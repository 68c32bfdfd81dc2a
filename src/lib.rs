pub mod engine;
pub mod error;
pub mod settings;
pub mod world;

pub use engine::{Interpreter, InterpreterLoop, Output, Signal};
pub use error::{EditError, MapError, NavigationError, PathError, SettingsError};
pub use settings::{SettingValue, Settings, SettingsStore};
pub use world::{RoomGraph, load_graph_from_file, load_graph_from_str};
