use crate::engine::helpers::collapse_description;
use crate::engine::output::Output;
use crate::settings::{self, Settings};
use crate::world::{Destination, Direction, Exit, Room, RoomGraph, Terrain};

/// Renders a room the way the game shows it on arrival.
pub fn render_room(out: &mut Output, room: &Room, graph: &RoomGraph, settings: &Settings) {
    out.say(room.name.clone());

    if !settings.get_bool(settings::BRIEF).unwrap_or(true) {
        out.say(collapse_description(&room.desc));
    }
    out.say(room.dynamic_desc.clone());

    let (doors, exits) = exits_lines(room, graph);
    if !doors.is_empty() {
        out.say("Doors:");
        out.say(doors.join(",\n"));
    }
    out.say(exits);

    if !room.note.is_empty() {
        out.say(format!("Note: {}", room.note));
    }
    if settings.get_bool(settings::SHOW_VNUM).unwrap_or(true) {
        out.say(format!("Vnum: {}", room.vnum));
    }
}

/// Builds the `direction: door` entries and the `Exits: ...` line.
pub fn exits_lines(room: &Room, graph: &RoomGraph) -> (Vec<String>, String) {
    let mut doors = Vec::new();
    let mut exits = Vec::new();

    for (direction, exit) in &room.exits {
        if exit.has_door() {
            doors.push(format!("{}: {}", direction, exit.door_name()));
        }
        exits.push(exit_symbol(*direction, exit, graph));
    }

    if exits.is_empty() {
        exits.push("None!".to_string());
    }
    (doors, format!("Exits: {}", exits.join(", ")))
}

/// Decorates a direction with the markers for its door and destination.
///
/// Door brackets go on first; the destination marker wraps the result.
/// `!!` marks a deathtrap, `??` an unknown room, `=` a road and `-` a trail.
pub fn exit_symbol(direction: Direction, exit: &Exit, graph: &RoomGraph) -> String {
    let mut text = direction.name().to_string();

    if exit.has_door() {
        text = if exit.is_hidden() {
            format!("[{text}]")
        } else {
            format!("({text})")
        };
    }

    let target = exit.to.room_vnum().and_then(|vnum| graph.room(vnum));
    match (&exit.to, target) {
        (Destination::Death, _) => format!("!!{text}!!"),
        (_, None) => format!("??{text}??"),
        (_, Some(room)) if room.terrain == Terrain::Road => format!("={text}="),
        _ if exit.exit_flags.contains("road") => format!("-{text}-"),
        _ => text,
    }
}

/// The long form shown by the `exits` command.
pub fn render_long_exits(out: &mut Output, room: &Room, graph: &RoomGraph) {
    if room.exits.is_empty() {
        out.say("Exits: None!");
        return;
    }

    out.say("Exits:");
    for (direction, exit) in &room.exits {
        let mut line = vec![format!("{}:", capitalize(direction.name()))];
        if exit.has_door() {
            let visibility = if exit.is_hidden() { "hidden" } else { "visible" };
            line.push(format!("{} ({}),", visibility, exit.door_name()));
        }
        match (&exit.to, exit.to.room_vnum().and_then(|v| graph.room(v))) {
            (_, Some(target)) => line.push(format!("{}, {}", target.name, target.terrain)),
            (Destination::Death, _) => line.push("death".to_string()),
            _ => line.push("undefined".to_string()),
        }
        out.say(line.join(" "));
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
