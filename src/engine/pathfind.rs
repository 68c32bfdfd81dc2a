//! Route finding over the room graph and speedwalk rendering.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::engine::helpers::RouteRequest;
use crate::error::PathError;
use crate::world::{Direction, Ridable, Room, RoomGraph, Terrain, is_vnum};

/// One entry of a route: a move, or a command to type before moving on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Move(Direction),
    Command(String),
}

/// Finds a route from `origin` to the request's destination.
pub trait Pathfinder {
    fn find(
        &self,
        graph: &RoomGraph,
        origin: &str,
        request: &RouteRequest,
    ) -> Result<Vec<Step>, PathError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteFlag {
    AvoidTerrain(Terrain),
    NoRide,
    NoDoors,
}

fn parse_flag(flag: &str) -> Result<RouteFlag, PathError> {
    match flag {
        "noride" => Ok(RouteFlag::NoRide),
        "nodoors" => Ok(RouteFlag::NoDoors),
        _ => Terrain::parse(flag)
            .map(RouteFlag::AvoidTerrain)
            .ok_or_else(|| PathError::UnknownFlag(flag.to_string())),
    }
}

/// Cheapest-route search weighted by the terrain of each room entered.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainRouter;

/// Priority queue entry, ordered so the heap pops the cheapest first.
#[derive(Clone, Eq, PartialEq)]
struct Node {
    cost: u32,
    vnum: String,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.vnum.cmp(&self.vnum))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Pathfinder for TerrainRouter {
    fn find(
        &self,
        graph: &RoomGraph,
        origin: &str,
        request: &RouteRequest,
    ) -> Result<Vec<Step>, PathError> {
        let target = resolve_destination(graph, &request.destination)?;
        let flags = request
            .flags
            .iter()
            .map(|f| parse_flag(f))
            .collect::<Result<Vec<_>, _>>()?;

        if origin == target {
            return Ok(Vec::new());
        }

        let mut best: HashMap<String, u32> = HashMap::new();
        let mut came_from: HashMap<String, (String, Direction)> = HashMap::new();
        let mut open = BinaryHeap::new();

        best.insert(origin.to_string(), 0);
        open.push(Node {
            cost: 0,
            vnum: origin.to_string(),
        });

        while let Some(Node { cost, vnum }) = open.pop() {
            if vnum == target {
                return Ok(reconstruct(graph, &came_from, origin, &target));
            }
            if best.get(&vnum).is_some_and(|b| cost > *b) {
                continue;
            }

            for (direction, exit) in graph.exits(&vnum) {
                if flags.contains(&RouteFlag::NoDoors) && exit.has_door() {
                    continue;
                }
                let Some(next) = exit.to.room_vnum().and_then(|v| graph.room(v)) else {
                    continue;
                };
                if next.vnum != target && !may_enter(next, &flags) {
                    continue;
                }

                let next_cost = cost + next.terrain.cost();
                if best.get(&next.vnum).is_none_or(|b| next_cost < *b) {
                    best.insert(next.vnum.clone(), next_cost);
                    came_from.insert(next.vnum.clone(), (vnum.clone(), direction));
                    open.push(Node {
                        cost: next_cost,
                        vnum: next.vnum.clone(),
                    });
                }
            }
        }

        Err(PathError::NoRoute {
            from: origin.to_string(),
            to: target,
        })
    }
}

fn resolve_destination(graph: &RoomGraph, destination: &str) -> Result<String, PathError> {
    let vnum = match graph.label(destination) {
        Some(vnum) => vnum,
        None if is_vnum(destination) => destination,
        None => return Err(PathError::InvalidDestination(destination.to_string())),
    };
    if graph.contains(vnum) {
        Ok(vnum.to_string())
    } else {
        Err(PathError::InvalidDestination(destination.to_string()))
    }
}

fn may_enter(room: &Room, flags: &[RouteFlag]) -> bool {
    if room.avoid || room.terrain == Terrain::Deathtrap {
        return false;
    }
    flags.iter().all(|flag| match flag {
        RouteFlag::AvoidTerrain(t) => room.terrain != *t,
        RouteFlag::NoRide => room.ridable != Ridable::NotRidable,
        RouteFlag::NoDoors => true,
    })
}

fn reconstruct(
    graph: &RoomGraph,
    came_from: &HashMap<String, (String, Direction)>,
    origin: &str,
    target: &str,
) -> Vec<Step> {
    let mut hops = Vec::new();
    let mut current = target.to_string();
    while current != origin {
        let Some((prev, direction)) = came_from.get(&current) else {
            break;
        };
        hops.push((prev.clone(), *direction));
        current = prev.clone();
    }
    hops.reverse();

    let mut steps = Vec::new();
    for (from, direction) in hops {
        let door = graph
            .room(&from)
            .and_then(|room| room.exits.get(&direction))
            .filter(|exit| exit.has_door());
        if let Some(exit) = door {
            steps.push(Step::Command(format!(
                "open {} {}",
                exit.door_name(),
                direction
            )));
        }
        steps.push(Step::Move(direction));
    }
    steps
}

/// Renders a route as a step count plus a compressed walk such as
/// `3n, open gate east, e, 2u`.
pub fn speedwalk(steps: &[Step]) -> String {
    if steps.is_empty() {
        return "You are already there!".to_string();
    }

    let moves = steps.iter().filter(|s| matches!(s, Step::Move(_))).count();
    let mut parts: Vec<String> = Vec::new();
    let mut run: Option<(Direction, usize)> = None;

    for step in steps {
        match step {
            Step::Move(dir) => match run {
                Some((d, n)) if d == *dir => run = Some((d, n + 1)),
                _ => {
                    flush_run(&mut parts, run.take());
                    run = Some((*dir, 1));
                }
            },
            Step::Command(text) => {
                flush_run(&mut parts, run.take());
                parts.push(text.clone());
            }
        }
    }
    flush_run(&mut parts, run);

    format!("Number of steps: {}\n{}", moves, parts.join(", "))
}

fn flush_run(parts: &mut Vec<String>, run: Option<(Direction, usize)>) {
    match run {
        Some((dir, 1)) => parts.push(dir.initial().to_string()),
        Some((dir, n)) => parts.push(format!("{}{}", n, dir.initial())),
        None => {}
    }
}
