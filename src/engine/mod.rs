mod editor;
mod helpers;
mod interpreter;
mod movement;
mod output;
mod pathfind;
mod render;
mod session;

pub use editor::{EDIT_VERBS, edit};

pub use helpers::{
    PrefixMatch, RouteRequest, collapse_description, parse_route, resolve_prefix, split_command,
};

pub use interpreter::Interpreter;
pub use movement::Navigator;
pub use output::Output;
pub use pathfind::{Pathfinder, Step, TerrainRouter, speedwalk};
pub use render::{exit_symbol, exits_lines, render_long_exits, render_room};

pub use session::{InterpreterLoop, Signal, presentation_loop};
