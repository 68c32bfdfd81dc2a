//! Small pure helpers shared by the interpreter and renderer.

use crate::error::PathError;

/// Outcome of matching an abbreviation against a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixMatch<'a> {
    None,
    Unique(&'a str),
    /// Several candidates share the prefix, in candidate order.
    Ambiguous(Vec<&'a str>),
}

impl<'a> PrefixMatch<'a> {
    /// The single match, or the earliest candidate when ambiguous.
    pub fn first(&self) -> Option<&'a str> {
        match self {
            PrefixMatch::None => None,
            PrefixMatch::Unique(s) => Some(*s),
            PrefixMatch::Ambiguous(all) => all.first().copied(),
        }
    }
}

/// Matches `input` as an abbreviation of the candidates.
///
/// An exact match always wins, even when it is also a prefix of a longer
/// candidate. Empty input matches nothing.
pub fn resolve_prefix<'a>(candidates: &[&'a str], input: &str) -> PrefixMatch<'a> {
    if input.is_empty() {
        return PrefixMatch::None;
    }
    if let Some(exact) = candidates.iter().copied().find(|c| *c == input) {
        return PrefixMatch::Unique(exact);
    }

    let hits: Vec<&'a str> = candidates
        .iter()
        .copied()
        .filter(|c| c.starts_with(input))
        .collect();

    match hits.len() {
        0 => PrefixMatch::None,
        1 => PrefixMatch::Unique(hits[0]),
        _ => PrefixMatch::Ambiguous(hits),
    }
}

/// Splits a line into its first word and the rest (if any).
pub fn split_command(line: &str) -> Option<(&str, Option<&str>)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }
    match line.find(char::is_whitespace) {
        Some(idx) => {
            let rest = line[idx..].trim();
            let rest = if rest.is_empty() { None } else { Some(rest) };
            Some((&line[..idx], rest))
        }
        None => Some((line, None)),
    }
}

/// Joins the non-blank lines of a description with single spaces.
pub fn collapse_description(desc: &str) -> String {
    desc.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A destination plus the route flags that were attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub destination: String,
    pub flags: Vec<String>,
}

/// Parses `destination[|flag[|flag...]]`.
pub fn parse_route(arguments: &str) -> Result<RouteRequest, PathError> {
    let mut parts = arguments.split('|').map(str::trim);
    let destination = parts.next().unwrap_or_default();
    if destination.is_empty() {
        return Err(PathError::Malformed(arguments.to_string()));
    }

    let mut flags = Vec::new();
    for flag in parts {
        if flag.is_empty() {
            return Err(PathError::Malformed(arguments.to_string()));
        }
        flags.push(flag.to_string());
    }

    Ok(RouteRequest {
        destination: destination.to_string(),
        flags,
    })
}
