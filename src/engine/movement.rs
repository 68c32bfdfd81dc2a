use crate::error::NavigationError;
use crate::settings::{self, SettingValue, Settings};
use crate::world::{Destination, Direction, Room, RoomGraph, is_vnum};

/// Holds the current room and applies moves to it.
///
/// The current vnum is always a room present in the graph it was created
/// against; failed moves leave it untouched.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: String,
}

impl Navigator {
    /// Starts at `last_vnum` when it still exists, else at the smallest vnum.
    /// Returns `None` only for an empty graph.
    pub fn restore(graph: &RoomGraph, last_vnum: Option<&str>) -> Option<Self> {
        let start = match last_vnum {
            Some(vnum) if graph.contains(vnum) => vnum,
            _ => graph.smallest_vnum()?,
        };
        Some(Navigator {
            current: start.to_string(),
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn current_room<'g>(&self, graph: &'g RoomGraph) -> Option<&'g Room> {
        graph.room(&self.current)
    }

    /// Works out where `token` leads without moving.
    ///
    /// `token` is a full direction name, a label or a vnum.
    pub fn resolve(&self, graph: &RoomGraph, token: &str) -> Result<String, NavigationError> {
        let destination = if let Some(direction) = Direction::parse(token) {
            let exit = graph
                .room(&self.current)
                .and_then(|room| room.exits.get(&direction))
                .ok_or(NavigationError::NoSuchExit)?;
            exit.to.clone()
        } else if let Some(vnum) = graph.label(token) {
            Destination::Room(vnum.to_string())
        } else if is_vnum(token) {
            Destination::Room(token.to_string())
        } else {
            return Err(NavigationError::InvalidToken(token.to_string()));
        };

        match destination {
            Destination::Undefined => Err(NavigationError::UndefinedDestination),
            Destination::Death => Err(NavigationError::DeathtrapDestination),
            Destination::Room(vnum) if !graph.contains(&vnum) => {
                Err(NavigationError::UnknownRoom(vnum))
            }
            Destination::Room(vnum) => Ok(vnum),
        }
    }

    /// Moves along `token` and records the new room as `last_vnum`.
    pub fn move_to(
        &mut self,
        graph: &RoomGraph,
        settings: &mut Settings,
        token: &str,
    ) -> Result<&str, NavigationError> {
        let vnum = self.resolve(graph, token)?;
        log::debug!("moving from {} to {} via '{}'", self.current, vnum, token);
        settings.set(settings::LAST_VNUM, SettingValue::Text(vnum.clone()));
        self.current = vnum;
        Ok(&self.current)
    }
}
