use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

//////////////////////////////
/// MAP STRUCTS AND ENUMS  ///
//////////////////////////////

/// Keyword enums that are written to and read from the map file by name.
macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.name()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

keyword_enum! {
    /// Exit directions. Declaration order is the canonical display order.
    Direction {
        North => "north",
        East => "east",
        South => "south",
        West => "west",
        Up => "up",
        Down => "down",
    }
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Single-letter form used in speedwalks.
    pub fn initial(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::East => 'e',
            Direction::South => 's',
            Direction::West => 'w',
            Direction::Up => 'u',
            Direction::Down => 'd',
        }
    }
}

keyword_enum! {
    Terrain {
        Brush => "brush",
        Building => "building",
        Cavern => "cavern",
        City => "city",
        Deathtrap => "deathtrap",
        Field => "field",
        Forest => "forest",
        Hills => "hills",
        Mountains => "mountains",
        Rapids => "rapids",
        Road => "road",
        Shallows => "shallows",
        Tunnel => "tunnel",
        Undefined => "undefined",
        Underwater => "underwater",
        Water => "water",
    }
}

impl Terrain {
    /// Prompt glyph shown when terrain symbols are enabled.
    pub fn symbol(self) -> char {
        match self {
            Terrain::Brush => ':',
            Terrain::Building => '[',
            Terrain::Cavern => 'O',
            Terrain::City => '#',
            Terrain::Deathtrap => 'X',
            Terrain::Field => '.',
            Terrain::Forest => 'f',
            Terrain::Hills => '(',
            Terrain::Mountains => '<',
            Terrain::Rapids => 'W',
            Terrain::Road => '+',
            Terrain::Shallows => '%',
            Terrain::Tunnel => '=',
            Terrain::Undefined => '?',
            Terrain::Underwater => 'U',
            Terrain::Water => '~',
        }
    }

    /// Cost of entering a room of this terrain, in hundredths of a step.
    pub fn cost(self) -> u32 {
        match self {
            Terrain::Building | Terrain::Cavern | Terrain::City | Terrain::Tunnel => 75,
            Terrain::Road => 85,
            Terrain::Field => 150,
            Terrain::Brush => 180,
            Terrain::Forest => 215,
            Terrain::Hills | Terrain::Shallows => 245,
            Terrain::Mountains => 280,
            Terrain::Undefined => 3_000,
            Terrain::Water => 5_000,
            Terrain::Rapids => 6_000,
            Terrain::Underwater => 10_000,
            Terrain::Deathtrap => 100_000,
        }
    }
}

keyword_enum! {
    Light {
        Lit => "lit",
        Dark => "dark",
        Undefined => "undefined",
    }
}

keyword_enum! {
    Align {
        Good => "good",
        Neutral => "neutral",
        Evil => "evil",
        Undefined => "undefined",
    }
}

keyword_enum! {
    Portable {
        Portable => "portable",
        NotPortable => "notportable",
        Undefined => "undefined",
    }
}

keyword_enum! {
    Ridable {
        Ridable => "ridable",
        NotRidable => "notridable",
        Undefined => "undefined",
    }
}

pub const MOB_FLAGS: &[&str] = &[
    "rent",
    "shop",
    "weaponshop",
    "armourshop",
    "foodshop",
    "petshop",
    "guild",
    "scoutguild",
    "mageguild",
    "clericguild",
    "warriorguild",
    "rangerguild",
    "smob",
    "quest",
    "any",
];

pub const LOAD_FLAGS: &[&str] = &[
    "treasure",
    "armour",
    "weapon",
    "water",
    "food",
    "herb",
    "key",
    "mule",
    "horse",
    "packhorse",
    "trainedhorse",
    "rohirrim",
    "warg",
    "boat",
    "attention",
    "tower",
];

pub const EXIT_FLAGS: &[&str] = &[
    "exit", "door", "road", "climb", "random", "special", "no_match", "flow", "no_flee",
    "damage", "fall", "guarded",
];

pub const DOOR_FLAGS: &[&str] = &[
    "hidden",
    "need_key",
    "no_block",
    "no_break",
    "no_pick",
    "delayed",
    "callable",
    "knockable",
    "magic",
    "action",
    "no_bash",
];

/// True for the digit-only strings used as room identifiers.
pub fn is_vnum(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Where an exit leads: a room, or one of the two sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Room(String),
    Undefined,
    Death,
}

impl Destination {
    /// Accepts a vnum, `undefined` or `death`; anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "undefined" => Some(Destination::Undefined),
            "death" => Some(Destination::Death),
            _ if is_vnum(s) => Some(Destination::Room(s.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Destination::Room(vnum) => vnum,
            Destination::Undefined => "undefined",
            Destination::Death => "death",
        }
    }

    pub fn room_vnum(&self) -> Option<&str> {
        match self {
            Destination::Room(vnum) => Some(vnum),
            _ => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub to: Destination,
    pub door: String,
    pub exit_flags: BTreeSet<String>,
    pub door_flags: BTreeSet<String>,
}

impl Exit {
    pub fn new(to: Destination) -> Self {
        Exit {
            to,
            door: String::new(),
            exit_flags: BTreeSet::new(),
            door_flags: BTreeSet::new(),
        }
    }

    /// A named door or a bare `door` flag both count.
    pub fn has_door(&self) -> bool {
        !self.door.is_empty() || self.exit_flags.contains("door")
    }

    pub fn is_hidden(&self) -> bool {
        self.door_flags.contains("hidden")
    }

    pub fn door_name(&self) -> &str {
        if self.door.is_empty() { "exit" } else { &self.door }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub vnum: String,
    pub name: String,
    pub desc: String,
    pub dynamic_desc: String,
    pub note: String,
    pub terrain: Terrain,
    pub light: Light,
    pub align: Align,
    pub portable: Portable,
    pub ridable: Ridable,
    pub avoid: bool,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub mob_flags: BTreeSet<String>,
    pub load_flags: BTreeSet<String>,
    pub exits: BTreeMap<Direction, Exit>,
}

impl Room {
    pub fn new(vnum: impl Into<String>) -> Self {
        Room {
            vnum: vnum.into(),
            name: String::new(),
            desc: String::new(),
            dynamic_desc: String::new(),
            note: String::new(),
            terrain: Terrain::Undefined,
            light: Light::Undefined,
            align: Align::Undefined,
            portable: Portable::Undefined,
            ridable: Ridable::Undefined,
            avoid: false,
            x: 0,
            y: 0,
            z: 0,
            mob_flags: BTreeSet::new(),
            load_flags: BTreeSet::new(),
            exits: BTreeMap::new(),
        }
    }
}

/// The room database: rooms keyed by vnum plus user labels.
///
/// Both maps are ordered, so `rooms` iterates vnums lexicographically and a
/// room's `exits` iterate in canonical direction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomGraph {
    pub rooms: BTreeMap<String, Room>,
    pub labels: BTreeMap<String, String>,
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn contains(&self, vnum: &str) -> bool {
        self.rooms.contains_key(vnum)
    }

    pub fn room(&self, vnum: &str) -> Option<&Room> {
        self.rooms.get(vnum)
    }

    pub fn room_mut(&mut self, vnum: &str) -> Option<&mut Room> {
        self.rooms.get_mut(vnum)
    }

    pub fn insert_room(&mut self, room: Room) {
        self.rooms.insert(room.vnum.clone(), room);
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn vnums(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }

    pub fn smallest_vnum(&self) -> Option<&str> {
        self.vnums().next()
    }

    pub fn exits(&self, vnum: &str) -> impl Iterator<Item = (Direction, &Exit)> {
        self.rooms
            .get(vnum)
            .into_iter()
            .flat_map(|room| room.exits.iter().map(|(dir, exit)| (*dir, exit)))
    }

    /// Removes a room. Exits that led to it become undefined and labels that
    /// named it are dropped.
    pub fn remove_room(&mut self, vnum: &str) -> Option<Room> {
        let removed = self.rooms.remove(vnum)?;
        for room in self.rooms.values_mut() {
            for exit in room.exits.values_mut() {
                if exit.to.room_vnum() == Some(vnum) {
                    exit.to = Destination::Undefined;
                }
            }
        }
        self.labels.retain(|_, target| target != vnum);
        Some(removed)
    }
}
