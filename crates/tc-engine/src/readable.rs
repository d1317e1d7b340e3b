//! Driver read model: the context a driver reads before its next command.

use serde::Serialize;
use tc_core::model::Graph;

pub const GRAPH_STATE: &str = "Current graph state with vertices and edges";
pub const VERTEX_LISTING: &str = "List of all vertex IDs and labels";

/// One piece of context exposed to the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readable {
    pub description: &'static str,
    pub value: String,
}

/// Both readables, computed from the graph as it is right now.
pub fn readables(graph: &Graph) -> [Readable; 2] {
    [
        Readable {
            description: GRAPH_STATE,
            value: graph.to_json(),
        },
        Readable {
            description: VERTEX_LISTING,
            value: graph.listing(),
        },
    ]
}
