//! Room and label editing verbs.
//!
//! Every verb receives its argument text untouched and answers with the
//! text to show. Unless a vnum is given, verbs act on the current room.

use std::collections::BTreeSet;
use std::fmt;

use crate::engine::helpers::{collapse_description, resolve_prefix};
use crate::engine::interpreter::is_reserved;
use crate::engine::render::capitalize;
use crate::error::EditError;
use crate::world::{
    Align, DOOR_FLAGS, Destination, Direction, EXIT_FLAGS, Exit, LOAD_FLAGS, Light, MOB_FLAGS,
    Portable, Ridable, Room, RoomGraph, Terrain,
};

pub const EDIT_VERBS: &[&str] = &[
    "rlabel",
    "rinfo",
    "fdoor",
    "fname",
    "fnote",
    "rnote",
    "ralign",
    "rlight",
    "rportable",
    "rridable",
    "ravoid",
    "rterrain",
    "rx",
    "ry",
    "rz",
    "rmobflags",
    "rloadflags",
    "exitflags",
    "doorflags",
    "secret",
    "rlink",
    "rdelete",
];

const MAX_SEARCH_RESULTS: usize = 20;

/// Runs one editing verb. `current` is the vnum the player stands in.
pub fn edit(
    graph: &mut RoomGraph,
    current: &str,
    verb: &str,
    arguments: Option<&str>,
) -> Result<String, EditError> {
    let args = arguments.map(str::trim).filter(|a| !a.is_empty());
    log::debug!("edit verb '{}' with arguments {:?}", verb, args);

    match verb {
        "rlabel" => rlabel(graph, current, args),
        "rinfo" => {
            let vnum = args.unwrap_or(current);
            let room = graph
                .room(vnum)
                .ok_or_else(|| EditError::UnknownRoom(vnum.to_string()))?;
            Ok(room_info(room))
        }
        "fname" => search(graph, args, "fname <text>", |room, text| {
            room.name.to_lowercase().contains(text)
        }),
        "fnote" => search(graph, args, "fnote <text>", |room, text| {
            room.note.to_lowercase().contains(text)
        }),
        "fdoor" => search(graph, args, "fdoor <text>", |room, text| {
            room.exits
                .values()
                .any(|exit| exit.door.to_lowercase().contains(text))
        }),
        "rlink" => rlink(graph, current, args),
        "rdelete" => rdelete(graph, current, args),
        _ => {
            let room = graph
                .room_mut(current)
                .ok_or_else(|| EditError::UnknownRoom(current.to_string()))?;
            edit_room(room, verb, args)
        }
    }
}

/// Verbs that only touch the current room.
fn edit_room(room: &mut Room, verb: &str, args: Option<&str>) -> Result<String, EditError> {
    match verb {
        "rnote" => match args {
            Some(text) => {
                room.note = text.to_string();
                Ok(format!("Room note set to '{}'.", room.note))
            }
            None => {
                room.note.clear();
                Ok("Room note cleared.".to_string())
            }
        },
        "ralign" => set_keyword("align", &mut room.align, args, Align::parse),
        "rlight" => set_keyword("light", &mut room.light, args, Light::parse),
        "rportable" => set_keyword("portable", &mut room.portable, args, Portable::parse),
        "rridable" => set_keyword("ridable", &mut room.ridable, args, Ridable::parse),
        "rterrain" => set_keyword("terrain", &mut room.terrain, args, Terrain::parse),
        "ravoid" => {
            room.avoid = match args {
                None => return Ok(format!("Room avoid: {}.", on_off(room.avoid))),
                Some("+" | "on") => true,
                Some("-" | "off") => false,
                Some(other) => {
                    return Err(EditError::InvalidValue {
                        field: "avoid setting",
                        value: other.to_string(),
                    });
                }
            };
            Ok(format!("Room avoid {}.", on_off(room.avoid)))
        }
        "rx" => set_coordinate("x", &mut room.x, args),
        "ry" => set_coordinate("y", &mut room.y, args),
        "rz" => set_coordinate("z", &mut room.z, args),
        "rmobflags" => edit_flag_set(
            "mob flag",
            &mut room.mob_flags,
            MOB_FLAGS,
            args,
            "rmobflags [add|remove] [flag]",
        ),
        "rloadflags" => edit_flag_set(
            "load flag",
            &mut room.load_flags,
            LOAD_FLAGS,
            args,
            "rloadflags [add|remove] [flag]",
        ),
        "exitflags" => edit_exit_flags(room, args, false),
        "doorflags" => edit_exit_flags(room, args, true),
        "secret" => secret(room, args),
        _ => Err(EditError::Refused(format!("Unknown editing verb '{verb}'."))),
    }
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}

fn set_keyword<T: Copy + fmt::Display>(
    field: &'static str,
    slot: &mut T,
    args: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<String, EditError> {
    let Some(value) = args else {
        return Ok(format!("Room {field}: {slot}."));
    };
    *slot = parse(value).ok_or_else(|| EditError::InvalidValue {
        field,
        value: value.to_string(),
    })?;
    Ok(format!("Room {field} set to '{slot}'."))
}

fn set_coordinate(
    axis: &'static str,
    slot: &mut i32,
    args: Option<&str>,
) -> Result<String, EditError> {
    let Some(value) = args else {
        return Ok(format!("Room coordinate {axis}: {slot}."));
    };
    *slot = value.parse().map_err(|_| EditError::InvalidValue {
        field: "coordinate",
        value: value.to_string(),
    })?;
    Ok(format!("Room coordinate {axis} set to {slot}."))
}

fn edit_flag_set(
    field: &'static str,
    flags: &mut BTreeSet<String>,
    known: &[&str],
    args: Option<&str>,
    usage: &'static str,
) -> Result<String, EditError> {
    let Some(args) = args else {
        return Ok(format!("{}s: {}.", capitalize(field), list_or_none(flags.iter())));
    };
    let words: Vec<&str> = args.split_whitespace().collect();
    let [action, flag] = words[..] else {
        return Err(EditError::Usage(usage));
    };
    if !known.contains(&flag) {
        return Err(EditError::InvalidValue {
            field,
            value: flag.to_string(),
        });
    }
    match action {
        "add" => {
            flags.insert(flag.to_string());
            Ok(format!("{} '{}' added.", capitalize(field), flag))
        }
        "remove" => {
            if flags.remove(flag) {
                Ok(format!("{} '{}' removed.", capitalize(field), flag))
            } else {
                Err(EditError::Refused(format!("Room has no {field} '{flag}'.")))
            }
        }
        _ => Err(EditError::Usage(usage)),
    }
}

/// Accepts a full direction name or an unambiguous abbreviation of one.
fn parse_direction(text: &str) -> Result<Direction, EditError> {
    resolve_prefix(&Direction::names(), text)
        .first()
        .and_then(Direction::parse)
        .ok_or_else(|| EditError::InvalidValue {
            field: "direction",
            value: text.to_string(),
        })
}

fn edit_exit_flags(room: &mut Room, args: Option<&str>, door: bool) -> Result<String, EditError> {
    let (usage, field, known) = if door {
        ("doorflags <add|remove> <flag> <direction>", "door flag", DOOR_FLAGS)
    } else {
        ("exitflags <add|remove> <flag> <direction>", "exit flag", EXIT_FLAGS)
    };
    let words: Vec<&str> = args.unwrap_or_default().split_whitespace().collect();
    let [action, flag, direction] = words[..] else {
        return Err(EditError::Usage(usage));
    };
    let direction = parse_direction(direction)?;
    let exit = room
        .exits
        .get_mut(&direction)
        .ok_or_else(|| EditError::NoExit(direction.to_string()))?;
    let flags = if door {
        &mut exit.door_flags
    } else {
        &mut exit.exit_flags
    };
    if !known.contains(&flag) {
        return Err(EditError::InvalidValue {
            field,
            value: flag.to_string(),
        });
    }
    match action {
        "add" => {
            flags.insert(flag.to_string());
            Ok(format!("{} '{}' added to exit {}.", capitalize(field), flag, direction))
        }
        "remove" => {
            flags.remove(flag);
            Ok(format!("{} '{}' removed from exit {}.", capitalize(field), flag, direction))
        }
        _ => Err(EditError::Usage(usage)),
    }
}

fn secret(room: &mut Room, args: Option<&str>) -> Result<String, EditError> {
    const USAGE: &str = "secret <add|remove> [name] <direction>";
    let words: Vec<&str> = args.unwrap_or_default().split_whitespace().collect();
    let (Some(&action), Some(&direction)) = (words.first(), words.last()) else {
        return Err(EditError::Usage(USAGE));
    };
    if words.len() < 2 {
        return Err(EditError::Usage(USAGE));
    }
    let name = words[1..words.len() - 1].join(" ");
    let direction = parse_direction(direction)?;
    let exit = room
        .exits
        .get_mut(&direction)
        .ok_or_else(|| EditError::NoExit(direction.to_string()))?;

    match action {
        "add" if !name.is_empty() => {
            exit.door = name;
            exit.exit_flags.insert("door".to_string());
            exit.door_flags.insert("hidden".to_string());
            Ok(format!("Secret door '{}' added {}.", exit.door, direction))
        }
        "remove" => {
            exit.door.clear();
            exit.exit_flags.remove("door");
            exit.door_flags.remove("hidden");
            Ok(format!("Secret door removed from exit {}.", direction))
        }
        _ => Err(EditError::Usage(USAGE)),
    }
}

fn rlabel(graph: &mut RoomGraph, current: &str, args: Option<&str>) -> Result<String, EditError> {
    const USAGE: &str = "rlabel add <label> [vnum] | delete <label> | info [label] | search <text>";
    let words: Vec<&str> = args.unwrap_or_default().split_whitespace().collect();

    match words[..] {
        ["add", label] | ["add", label, _] => {
            let vnum = words.get(2).copied().unwrap_or(current);
            let label = label.to_lowercase();
            if is_reserved(&label) {
                return Err(EditError::Refused(format!(
                    "Error: '{label}' cannot be used as a label."
                )));
            }
            if !graph.contains(vnum) {
                return Err(EditError::UnknownRoom(vnum.to_string()));
            }
            graph.labels.insert(label.clone(), vnum.to_string());
            Ok(format!("Label '{label}' now points to room {vnum}."))
        }
        ["delete", label] => match graph.labels.remove(label) {
            Some(vnum) => Ok(format!("Label '{label}' (room {vnum}) deleted.")),
            None => Err(EditError::Refused(format!("No such label '{label}'."))),
        },
        ["info"] => {
            if graph.labels.is_empty() {
                return Ok("No labels defined.".to_string());
            }
            Ok(graph
                .labels
                .iter()
                .map(|(label, vnum)| format!("{label}: {vnum}"))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        ["info", label] => match graph.label(label) {
            Some(vnum) => Ok(format!("{label}: {vnum}")),
            None => Err(EditError::Refused(format!("No such label '{label}'."))),
        },
        ["search", text] => {
            let hits: Vec<String> = graph
                .labels
                .iter()
                .filter(|(label, _)| label.contains(text))
                .map(|(label, vnum)| format!("{label}: {vnum}"))
                .collect();
            if hits.is_empty() {
                Ok("Nothing found.".to_string())
            } else {
                Ok(hits.join("\n"))
            }
        }
        _ => Err(EditError::Usage(USAGE)),
    }
}

fn rlink(graph: &mut RoomGraph, current: &str, args: Option<&str>) -> Result<String, EditError> {
    const USAGE: &str = "rlink add [oneway] <vnum|undefined|death> <direction> | \
                         rlink remove [oneway] <direction>";
    let mut words: Vec<&str> = args.unwrap_or_default().split_whitespace().collect();
    let oneway = words.get(1) == Some(&"oneway");
    if oneway {
        words.remove(1);
    }

    match words[..] {
        ["add", target, direction] => {
            let direction = parse_direction(direction)?;
            let to = Destination::parse(target).ok_or_else(|| EditError::InvalidValue {
                field: "destination",
                value: target.to_string(),
            })?;
            if let Some(vnum) = to.room_vnum() {
                if !graph.contains(vnum) {
                    return Err(EditError::UnknownRoom(vnum.to_string()));
                }
            }

            let room = graph
                .room_mut(current)
                .ok_or_else(|| EditError::UnknownRoom(current.to_string()))?;
            room.exits
                .entry(direction)
                .and_modify(|exit| exit.to = to.clone())
                .or_insert_with(|| Exit::new(to.clone()));

            let mut linked_back = false;
            if let (false, Some(vnum)) = (oneway, to.room_vnum()) {
                if let Some(target_room) = graph.room_mut(vnum) {
                    let back = target_room
                        .exits
                        .entry(direction.reverse())
                        .or_insert_with(|| Exit::new(Destination::Undefined));
                    if back.to == Destination::Undefined {
                        back.to = Destination::Room(current.to_string());
                        linked_back = true;
                    }
                }
            }

            let mut msg = format!("Linked exit {direction} of room {current} to {to}.");
            if linked_back {
                msg.push_str(&format!(
                    "\nLinked exit {} of room {} back to {}.",
                    direction.reverse(),
                    to,
                    current
                ));
            }
            Ok(msg)
        }
        ["remove", direction] => {
            let direction = parse_direction(direction)?;
            let room = graph
                .room_mut(current)
                .ok_or_else(|| EditError::UnknownRoom(current.to_string()))?;
            let removed = room
                .exits
                .remove(&direction)
                .ok_or_else(|| EditError::NoExit(direction.to_string()))?;

            if let (false, Some(vnum)) = (oneway, removed.to.room_vnum()) {
                if let Some(target_room) = graph.room_mut(vnum) {
                    let points_back = target_room
                        .exits
                        .get(&direction.reverse())
                        .is_some_and(|exit| exit.to.room_vnum() == Some(current));
                    if points_back {
                        target_room.exits.remove(&direction.reverse());
                    }
                }
            }
            Ok(format!("Removed exit {direction} of room {current}."))
        }
        _ => Err(EditError::Usage(USAGE)),
    }
}

fn rdelete(graph: &mut RoomGraph, current: &str, args: Option<&str>) -> Result<String, EditError> {
    let vnum = args.unwrap_or(current);
    if vnum == current {
        return Err(EditError::Refused(
            "Error: you cannot delete the room you are standing in.".to_string(),
        ));
    }
    graph
        .remove_room(vnum)
        .ok_or_else(|| EditError::UnknownRoom(vnum.to_string()))?;
    Ok(format!("Room {vnum} deleted."))
}

fn search(
    graph: &RoomGraph,
    args: Option<&str>,
    usage: &'static str,
    matches: impl Fn(&Room, &str) -> bool,
) -> Result<String, EditError> {
    let text = args.ok_or(EditError::Usage(usage))?.to_lowercase();
    let mut hits: Vec<&Room> = graph.rooms.values().filter(|r| matches(r, &text)).collect();
    if hits.is_empty() {
        return Ok("Nothing found.".to_string());
    }
    hits.sort_by_key(|r| (r.vnum.len(), r.vnum.clone()));
    Ok(hits
        .iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|r| format!("{}, {}", r.vnum, r.name))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn room_info(room: &Room) -> String {
    let mut lines = vec![
        format!("vnum: {}", room.vnum),
        format!("name: {}", room.name),
        format!("desc: {}", collapse_description(&room.desc)),
        format!("dynamic desc: {}", room.dynamic_desc),
        format!("note: {}", room.note),
        format!("terrain: {}", room.terrain),
        format!("light: {}", room.light),
        format!("align: {}", room.align),
        format!("portable: {}", room.portable),
        format!("ridable: {}", room.ridable),
        format!("avoid: {}", on_off(room.avoid)),
        format!("coordinates: {}, {}, {}", room.x, room.y, room.z),
        format!("mob flags: {}", list_or_none(room.mob_flags.iter())),
        format!("load flags: {}", list_or_none(room.load_flags.iter())),
        "exits:".to_string(),
    ];
    if room.exits.is_empty() {
        lines.push("  none".to_string());
    }
    for (direction, exit) in &room.exits {
        let mut line = format!("  {direction}: to {}", exit.to);
        if !exit.door.is_empty() {
            line.push_str(&format!(", door '{}'", exit.door));
        }
        if !exit.exit_flags.is_empty() {
            line.push_str(&format!(", exit flags: {}", list_or_none(exit.exit_flags.iter())));
        }
        if !exit.door_flags.is_empty() {
            line.push_str(&format!(", door flags: {}", list_or_none(exit.door_flags.iter())));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn list_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let items: Vec<&str> = items.map(String::as_str).collect();
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
