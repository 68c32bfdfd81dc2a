use crate::engine::editor::{self, EDIT_VERBS};
use crate::engine::helpers::{RouteRequest, parse_route, resolve_prefix, split_command};
use crate::engine::movement::Navigator;
use crate::engine::output::Output;
use crate::engine::pathfind::{Pathfinder, speedwalk};
use crate::engine::render::{render_long_exits, render_room};
use crate::error::{MapError, PathError};
use crate::settings::{self, Settings};
use crate::world::{Direction, MapStore, RoomGraph, Terrain, is_vnum};

type Handler = fn(&mut Interpreter, &str, Option<&str>, &mut Output);

/// A keyword and what it runs. `abbreviable` entries also answer to any
/// prefix of the keyword.
struct Command {
    keyword: &'static str,
    abbreviable: bool,
    handler: Handler,
}

const COMMANDS: &[Command] = &[
    Command {
        keyword: "look",
        abbreviable: true,
        handler: Interpreter::look,
    },
    Command {
        keyword: "exits",
        abbreviable: true,
        handler: Interpreter::long_exits,
    },
    Command {
        keyword: "vnum",
        abbreviable: false,
        handler: Interpreter::toggle,
    },
    Command {
        keyword: "brief",
        abbreviable: false,
        handler: Interpreter::toggle,
    },
    Command {
        keyword: "terrain",
        abbreviable: false,
        handler: Interpreter::toggle,
    },
    Command {
        keyword: "path",
        abbreviable: false,
        handler: Interpreter::path,
    },
    Command {
        keyword: "savemap",
        abbreviable: false,
        handler: Interpreter::save_map,
    },
];

/// Toggle keyword, setting it flips, and how the new state is announced.
const TOGGLES: &[(&str, &str, &str)] = &[
    ("vnum", settings::SHOW_VNUM, "Show room vnum"),
    ("brief", settings::BRIEF, "Brief mode"),
    ("terrain", settings::USE_TERRAIN_SYMBOLS, "Terrain symbols in prompt"),
];

const UNKNOWN_COMMAND: &str = "Arglebargle, glop-glyf!?!";

fn lookup(command: &str) -> Option<&'static Command> {
    COMMANDS
        .iter()
        .find(|c| c.keyword == command || (c.abbreviable && c.keyword.starts_with(command)))
}

/// True when typing `word` at the prompt runs something other than a move
/// to a label named `word`, so such a label could never be reached.
pub(crate) fn is_reserved(word: &str) -> bool {
    is_vnum(word)
        || resolve_prefix(&Direction::names(), word).first().is_some()
        || lookup(word).is_some()
        || EDIT_VERBS.contains(&word)
        || "quit".starts_with(word)
}

/// Owns everything a session touches: the map, the settings, the current
/// room and the collaborators for routing and saving.
pub struct Interpreter {
    graph: RoomGraph,
    settings: Settings,
    navigator: Navigator,
    pathfinder: Box<dyn Pathfinder + Send>,
    map_store: Box<dyn MapStore + Send>,
    last_route: Option<RouteRequest>,
}

impl Interpreter {
    pub fn new(
        graph: RoomGraph,
        settings: Settings,
        pathfinder: Box<dyn Pathfinder + Send>,
        map_store: Box<dyn MapStore + Send>,
    ) -> Result<Self, MapError> {
        let navigator = Navigator::restore(&graph, settings.get_str(settings::LAST_VNUM))
            .ok_or(MapError::Empty)?;
        log::info!("starting in room {}", navigator.current());

        Ok(Interpreter {
            graph,
            settings,
            navigator,
            pathfinder,
            map_store,
            last_route: None,
        })
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_vnum(&self) -> &str {
        self.navigator.current()
    }

    /// The current room, rendered as on arrival.
    pub fn initialize(&mut self) -> Output {
        let mut out = Output::new();
        self.look("look", None, &mut out);
        out
    }

    /// `city> ` or `#> `, depending on `use_terrain_symbols`.
    pub fn prompt(&self) -> String {
        let terrain = self
            .navigator
            .current_room(&self.graph)
            .map_or(Terrain::Undefined, |room| room.terrain);
        if self.settings.enabled(settings::USE_TERRAIN_SYMBOLS) {
            format!("{}> ", terrain.symbol())
        } else {
            format!("{}> ", terrain)
        }
    }

    /// Runs one line of (already trimmed and lowercased) input.
    pub fn step(&mut self, input: &str) -> Output {
        let mut out = Output::new();
        let Some((command, arguments)) = split_command(input) else {
            return out;
        };

        if let Some(direction) = resolve_prefix(&Direction::names(), command).first() {
            log::debug!("'{}' resolved to direction {}", command, direction);
            self.go(direction, &mut out);
        } else if let Some(entry) = lookup(command) {
            log::debug!("'{}' resolved to command {}", command, entry.keyword);
            (entry.handler)(self, entry.keyword, arguments, &mut out);
        } else if EDIT_VERBS.contains(&command) {
            self.edit(command, arguments, &mut out);
        } else if is_vnum(command) || self.graph.label(command).is_some() {
            self.go(command, &mut out);
        } else {
            out.say(UNKNOWN_COMMAND);
        }
        out
    }

    fn go(&mut self, token: &str, out: &mut Output) {
        let moved = self
            .navigator
            .move_to(&self.graph, &mut self.settings, token)
            .map(|_| ());
        match moved {
            Ok(()) => self.look("look", None, out),
            Err(e) => out.say(e.to_string()),
        }
    }

    fn look(&mut self, _: &str, _: Option<&str>, out: &mut Output) {
        match self.navigator.current_room(&self.graph) {
            Some(room) => render_room(out, room, &self.graph, &self.settings),
            None => out.say(format!(
                "Error: you are in an unknown room '{}'.",
                self.navigator.current()
            )),
        }
    }

    fn long_exits(&mut self, _: &str, _: Option<&str>, out: &mut Output) {
        if let Some(room) = self.navigator.current_room(&self.graph) {
            render_long_exits(out, room, &self.graph);
        }
    }

    fn toggle(&mut self, keyword: &str, _: Option<&str>, out: &mut Output) {
        let Some((_, name, label)) = TOGGLES.iter().find(|(k, _, _)| *k == keyword) else {
            return;
        };
        let state = if self.settings.toggle(name) {
            "enabled"
        } else {
            "disabled"
        };
        out.say(format!("{label} {state}."));
    }

    fn path(&mut self, _: &str, arguments: Option<&str>, out: &mut Output) {
        let request = match arguments {
            Some(args) => parse_route(args),
            None => self.last_route.clone().ok_or(PathError::NoPreviousRoute),
        };
        let found = request.and_then(|request| {
            let steps = self
                .pathfinder
                .find(&self.graph, self.navigator.current(), &request)?;
            self.last_route = Some(request);
            Ok(steps)
        });
        match found {
            Ok(steps) => out.say(speedwalk(&steps)),
            Err(e) => out.say(e.to_string()),
        }
    }

    fn save_map(&mut self, _: &str, _: Option<&str>, out: &mut Output) {
        match self.map_store.save(&self.graph) {
            Ok(()) => out.say("Map saved."),
            Err(e) => {
                log::warn!("saving map failed: {e}");
                out.say(e.to_string());
            }
        }
    }

    fn edit(&mut self, verb: &str, arguments: Option<&str>, out: &mut Output) {
        match editor::edit(&mut self.graph, self.navigator.current(), verb, arguments) {
            Ok(text) => out.say(text),
            Err(e) => out.say(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pathfind::TerrainRouter;
    use crate::settings::SettingValue;
    use crate::world::{Destination, Exit, Room};
    use std::sync::{Arc, Mutex};

    /// Records how many times the map was saved.
    #[derive(Clone, Default)]
    struct CountingStore(Arc<Mutex<usize>>);

    impl MapStore for CountingStore {
        fn save(&mut self, _: &RoomGraph) -> Result<(), MapError> {
            if let Ok(mut n) = self.0.lock() {
                *n += 1;
            }
            Ok(())
        }
    }

    fn graph() -> RoomGraph {
        let mut g = RoomGraph::new();

        let mut square = Room::new("1");
        square.name = "Town Square".into();
        square.terrain = Terrain::City;
        square
            .exits
            .insert(Direction::East, Exit::new(Destination::Room("2".into())));
        square
            .exits
            .insert(Direction::Down, Exit::new(Destination::Death));
        g.insert_room(square);

        let mut road = Room::new("2");
        road.name = "East Road".into();
        road.terrain = Terrain::Road;
        road.exits
            .insert(Direction::West, Exit::new(Destination::Room("1".into())));
        road.exits
            .insert(Direction::East, Exit::new(Destination::Room("3".into())));
        g.insert_room(road);

        let mut gate = Room::new("3");
        gate.name = "City Gate".into();
        gate.terrain = Terrain::Building;
        g.insert_room(gate);

        g.labels.insert("gate".into(), "3".into());
        g
    }

    fn interpreter() -> (Interpreter, CountingStore) {
        let store = CountingStore::default();
        let it = Interpreter::new(
            graph(),
            Settings::default(),
            Box::new(TerrainRouter),
            Box::new(store.clone()),
        )
        .unwrap();
        (it, store)
    }

    #[test]
    fn starts_at_last_vnum_when_known() {
        let mut settings = Settings::default();
        settings.set(settings::LAST_VNUM, SettingValue::Text("2".into()));
        let it = Interpreter::new(
            graph(),
            settings,
            Box::new(TerrainRouter),
            Box::new(CountingStore::default()),
        )
        .unwrap();
        assert_eq!(it.current_vnum(), "2");
    }

    #[test]
    fn empty_graph_is_rejected() {
        let result = Interpreter::new(
            RoomGraph::new(),
            Settings::default(),
            Box::new(TerrainRouter),
            Box::new(CountingStore::default()),
        );
        assert!(matches!(result, Err(MapError::Empty)));
    }

    #[test]
    fn abbreviated_directions_move() {
        let (mut it, _) = interpreter();
        let out = it.step("e");
        assert_eq!(it.current_vnum(), "2");
        assert_eq!(out.lines().next(), Some("East Road"));
        assert_eq!(it.settings().get_str(settings::LAST_VNUM), Some("2"));
    }

    #[test]
    fn look_and_exits_accept_prefixes() {
        let (mut it, _) = interpreter();
        assert_eq!(it.step("l").lines().next(), Some("Town Square"));
        assert_eq!(
            it.step("ex").text(),
            "Exits:\nEast: East Road, road\nDown: death"
        );
    }

    #[test]
    fn deathtraps_do_not_move() {
        let (mut it, _) = interpreter();
        assert_eq!(it.step("down").text(), "Deathtrap in that direction!");
        assert_eq!(it.step("north").text(), "Alas, you cannot go that way!");
        assert_eq!(it.current_vnum(), "1");
    }

    #[test]
    fn toggles_report_new_state() {
        let (mut it, _) = interpreter();
        assert_eq!(it.step("brief").text(), "Brief mode disabled.");
        assert_eq!(it.step("brief").text(), "Brief mode enabled.");
        assert_eq!(it.step("vnum").text(), "Show room vnum disabled.");
        assert_eq!(it.prompt(), "city> ");
        assert_eq!(it.step("terrain").text(), "Terrain symbols in prompt enabled.");
        assert_eq!(it.prompt(), "#> ");
    }

    #[test]
    fn labels_and_vnums_move_directly() {
        let (mut it, _) = interpreter();
        it.step("gate");
        assert_eq!(it.current_vnum(), "3");
        it.step("1");
        assert_eq!(it.current_vnum(), "1");
        assert_eq!(
            it.step("42").text(),
            "Error: no rooms in the database with vnum (42)."
        );
    }

    #[test]
    fn reserved_words() {
        for word in ["so", "n", "u", "l", "ex", "vnum", "path", "rlink", "q", "qui", "12"] {
            assert!(is_reserved(word), "{word}");
        }
        for word in ["inn", "quits", "looking", "gate"] {
            assert!(!is_reserved(word), "{word}");
        }
    }

    #[test]
    fn shadowed_labels_are_refused() {
        let (mut it, _) = interpreter();
        assert_eq!(
            it.step("rlabel add e 3").text(),
            "Error: 'e' cannot be used as a label."
        );
        assert!(it.graph().label("e").is_none());
        it.step("e");
        assert_eq!(it.current_vnum(), "2");
    }

    #[test]
    fn unknown_commands() {
        let (mut it, _) = interpreter();
        assert_eq!(it.step("xyzzy").text(), UNKNOWN_COMMAND);
        assert_eq!(it.step("vnums").text(), UNKNOWN_COMMAND);
        assert_eq!(it.current_vnum(), "1");
    }

    #[test]
    fn path_remembers_the_last_request() {
        let (mut it, _) = interpreter();
        assert_eq!(it.step("path").text(), "No previous route.");
        assert_eq!(it.step("path gate").text(), "Number of steps: 2\n2e");
        it.step("east");
        assert_eq!(it.step("path").text(), "Number of steps: 1\ne");
        assert_eq!(
            it.step("path |road").text(),
            "Syntax: path [destination[|flag[|flag...]]] ('|road' is malformed)."
        );
    }

    #[test]
    fn editor_verbs_and_savemap() {
        let (mut it, store) = interpreter();
        assert_eq!(it.step("rnote mind the gap").text(), "Room note set to 'mind the gap'.");
        assert_eq!(it.graph().room("1").unwrap().note, "mind the gap");
        assert_eq!(it.step("savemap").text(), "Map saved.");
        assert_eq!(*store.0.lock().unwrap(), 1);
    }
}
