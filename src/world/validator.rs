use super::model::RoomGraph;

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub message: String,
}

impl ValidationIssue {
    fn new(msg: impl Into<String>) -> Self {
        ValidationIssue {
            message: msg.into(),
        }
    }
}

/// Reports references that point outside the graph. None of these stop a
/// map from loading.
pub fn validate_graph(graph: &RoomGraph) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    // Exits leading to vnums we have never mapped
    for (vnum, room) in &graph.rooms {
        for (direction, exit) in &room.exits {
            if let Some(target) = exit.to.room_vnum() {
                if !graph.contains(target) {
                    issues.push(ValidationIssue::new(format!(
                        "room '{}' exit '{}' targets missing room '{}'",
                        vnum, direction, target
                    )));
                }
            }
        }
    }

    // Labels must name existing rooms
    for (label, vnum) in &graph.labels {
        if !graph.contains(vnum) {
            issues.push(ValidationIssue::new(format!(
                "label '{}' targets missing room '{}'",
                label, vnum
            )));
        }
    }

    issues
}
