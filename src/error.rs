//! Error types shared by the map, settings and engine modules.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a movement request was rejected. None of these change the current room.
///
/// The display strings are what the player sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Alas, you cannot go that way!")]
    NoSuchExit,

    #[error("Error: {0} isn't a direction, label, or vnum.")]
    InvalidToken(String),

    #[error("Undefined room in that direction!")]
    UndefinedDestination,

    #[error("Deathtrap in that direction!")]
    DeathtrapDestination,

    #[error("Error: no rooms in the database with vnum ({0}).")]
    UnknownRoom(String),
}

/// Errors raised while loading, validating or saving the room graph.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot access map file: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse map file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize map: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid map: {0}")]
    Invalid(String),

    #[error("the map contains no rooms")]
    Empty,
}

/// Problems with one settings layer. Always reported as warnings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{source}: '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error: '{}' is a directory, not a file.", .0.display())]
    IsDirectory(PathBuf),

    #[error("Corrupted configuration file: {}", .path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures from the route finder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Error! Invalid destination: '{0}'.")]
    InvalidDestination(String),

    #[error("Error! Unknown route flag: '{0}'.")]
    UnknownFlag(String),

    #[error("No routes found from {from} to {to}.")]
    NoRoute { from: String, to: String },

    #[error("No previous route.")]
    NoPreviousRoute,

    #[error("Syntax: path [destination[|flag[|flag...]]] ('{0}' is malformed).")]
    Malformed(String),
}

/// Failures from the room and label editing verbs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Syntax: {0}")]
    Usage(&'static str),

    #[error("Error: no rooms in the database with vnum ({0}).")]
    UnknownRoom(String),

    #[error("Error: '{value}' is not a valid {field}.")]
    InvalidValue { field: &'static str, value: String },

    #[error("Error: there is no exit {0} from this room.")]
    NoExit(String),

    #[error("{0}")]
    Refused(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_messages_match_the_game() {
        assert_eq!(
            NavigationError::DeathtrapDestination.to_string(),
            "Deathtrap in that direction!"
        );
        assert_eq!(
            NavigationError::InvalidToken("xyzzy".into()).to_string(),
            "Error: xyzzy isn't a direction, label, or vnum."
        );
        assert_eq!(
            NavigationError::UnknownRoom("42".into()).to_string(),
            "Error: no rooms in the database with vnum (42)."
        );
    }

    #[test]
    fn settings_directory_message() {
        let err = SettingsError::IsDirectory(PathBuf::from("data"));
        assert_eq!(err.to_string(), "Error: 'data' is a directory, not a file.");
    }
}
