//! The command boundary between the driver and the canvas.
//!
//! A driver (an LLM agent's tool calls, a transcript, a test) sends named
//! commands with JSON arguments. Each maps to one handler on
//! `TeachingCanvas`; every outcome, success or failure, is a string the
//! driver can read and act on.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// A named drawing command, as `{"name": ..., "arguments": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments")]
pub enum Command {
    #[serde(rename = "drawVertex", alias = "draw-vertex", alias = "create-vertex")]
    DrawVertex {
        id: String,
        x: f64,
        y: f64,
        label: String,
    },

    #[serde(rename = "drawEdge", alias = "draw-edge", alias = "create-edge")]
    DrawEdge {
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
        #[serde(default)]
        directed: bool,
    },

    #[serde(rename = "clearCanvas", alias = "clear", alias = "clear-canvas")]
    ClearCanvas {},

    #[serde(rename = "annotate")]
    Annotate {
        target: String,
        text: String,
        position: String,
    },

    #[serde(rename = "showFormula", alias = "show-formula")]
    ShowFormula { latex: String, x: f64, y: f64 },

    #[serde(rename = "highlight")]
    Highlight {
        #[serde(rename = "elementIds")]
        element_ids: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
}

impl Command {
    /// Canonical command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::DrawVertex { .. } => "drawVertex",
            Command::DrawEdge { .. } => "drawEdge",
            Command::ClearCanvas {} => "clearCanvas",
            Command::Annotate { .. } => "annotate",
            Command::ShowFormula { .. } => "showFormula",
            Command::Highlight { .. } => "highlight",
        }
    }

    /// Parse a `{"name": ..., "arguments": {...}}` tool call.
    ///
    /// # Errors
    /// Returns the serde error text for unknown names or bad arguments.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid command: {e}"))
    }

    /// Build a command from its name and an arguments object.
    ///
    /// # Errors
    /// Returns the serde error text for unknown names or bad arguments.
    pub fn from_parts(name: &str, arguments: Value) -> Result<Self, String> {
        serde_json::from_value(json!({ "name": name, "arguments": arguments }))
            .map_err(|e| format!("Invalid command `{name}`: {e}"))
    }
}

// ─── Rejections ──────────────────────────────────────────────────────────

/// Why a command was refused. The canvas is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No drawing surface attached yet, or it was disposed.
    NotInitialized,
    VertexExists(String),
    /// An edge endpoint is missing; lists what the driver can use instead.
    VerticesNotFound { available: Vec<String> },
    EdgeExists { from: String, to: String },
    /// Annotation target is not a vertex.
    TargetNotFound(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotInitialized => f.write_str("Canvas not initialized"),
            Rejection::VertexExists(id) => write!(f, "Vertex {id} already exists"),
            Rejection::VerticesNotFound { available } => {
                write!(f, "Vertices not found. Available: {}", available.join(", "))
            }
            Rejection::EdgeExists { from, to } => {
                write!(f, "Edge from {from} to {to} already exists")
            }
            Rejection::TargetNotFound(_) => f.write_str("Vertex not found"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Outcome of a handler: success text or the reason for refusal.
pub type CommandResult = Result<String, Rejection>;

// ─── Tool schemas ────────────────────────────────────────────────────────

/// JSON descriptions of every command, for drivers that expose tools to a
/// language model.
pub fn tool_schemas() -> Value {
    json!([
        {
            "name": "drawVertex",
            "description": "Draw a vertex (node) on the canvas at specified coordinates. Canvas dimensions are 800x600.",
            "parameters": [
                { "name": "id", "type": "string", "required": true, "description": "Unique identifier for the vertex" },
                { "name": "x", "type": "number", "required": true, "description": "X coordinate position" },
                { "name": "y", "type": "number", "required": true, "description": "Y coordinate position" },
                { "name": "label", "type": "string", "required": true, "description": "Display label for the vertex" }
            ]
        },
        {
            "name": "drawEdge",
            "description": "Draw an edge (line) connecting two vertices. Both vertices must already exist.",
            "parameters": [
                { "name": "from", "type": "string", "required": true, "description": "ID of source vertex" },
                { "name": "to", "type": "string", "required": true, "description": "ID of destination vertex" },
                { "name": "weight", "type": "number", "required": false, "description": "Optional edge weight" },
                { "name": "directed", "type": "boolean", "required": false, "description": "Whether edge is directed (arrow)" }
            ]
        },
        {
            "name": "clearCanvas",
            "description": "Clear all elements from the canvas to start fresh",
            "parameters": []
        },
        {
            "name": "annotate",
            "description": "Add a text annotation near a vertex",
            "parameters": [
                { "name": "target", "type": "string", "required": true, "description": "ID of vertex to annotate" },
                { "name": "text", "type": "string", "required": true, "description": "Annotation text to display" },
                { "name": "position", "type": "string", "required": true, "enum": ["top", "bottom", "left", "right"], "description": "Position relative to vertex" }
            ]
        },
        {
            "name": "showFormula",
            "description": "Display a mathematical formula on the canvas",
            "parameters": [
                { "name": "latex", "type": "string", "required": true, "description": "LaTeX formula string" },
                { "name": "x", "type": "number", "required": true, "description": "X position for formula" },
                { "name": "y", "type": "number", "required": true, "description": "Y position for formula" }
            ]
        },
        {
            "name": "highlight",
            "description": "Highlight specific vertices temporarily. Pass vertex IDs as comma-separated string.",
            "parameters": [
                { "name": "elementIds", "type": "string", "required": true, "description": "Comma-separated vertex IDs to highlight (e.g., 'A,B,C')" },
                { "name": "color", "type": "string", "required": false, "description": "Highlight color" },
                { "name": "duration", "type": "number", "required": false, "description": "Duration in ms" }
            ]
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_tool_call() {
        let cmd = Command::from_json(
            r#"{"name":"drawVertex","arguments":{"id":"A","x":200,"y":200,"label":"A"}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::DrawVertex {
                id: "A".into(),
                x: 200.0,
                y: 200.0,
                label: "A".into()
            }
        );
    }

    #[test]
    fn kebab_aliases_are_accepted() {
        let cmd = Command::from_json(r#"{"name":"create-edge","arguments":{"from":"A","to":"B"}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::DrawEdge {
                from: "A".into(),
                to: "B".into(),
                weight: None,
                directed: false
            }
        );
        let cmd = Command::from_json(r#"{"name":"clear","arguments":{}}"#).unwrap();
        assert_eq!(cmd, Command::ClearCanvas {});
    }

    #[test]
    fn highlight_uses_camel_case_ids() {
        let cmd = Command::from_parts("highlight", json!({ "elementIds": "A, B" })).unwrap();
        assert_eq!(
            cmd,
            Command::Highlight {
                element_ids: "A, B".into(),
                color: None,
                duration: None
            }
        );
        let back = serde_json::to_value(&cmd).unwrap();
        assert_eq!(back, json!({ "name": "highlight", "arguments": { "elementIds": "A, B" } }));
    }

    #[test]
    fn missing_required_argument_is_an_error() {
        let err = Command::from_parts("drawVertex", json!({ "id": "A", "x": 1 })).unwrap_err();
        assert!(err.contains("drawVertex"), "{err}");
        assert!(Command::from_parts("teleport", json!({})).is_err());
    }

    #[test]
    fn rejection_texts() {
        assert_eq!(Rejection::NotInitialized.to_string(), "Canvas not initialized");
        assert_eq!(
            Rejection::VerticesNotFound {
                available: vec!["A".into(), "B".into()]
            }
            .to_string(),
            "Vertices not found. Available: A, B"
        );
        assert_eq!(Rejection::TargetNotFound("Z".into()).to_string(), "Vertex not found");
    }

    #[test]
    fn every_command_has_a_schema() {
        let schemas = tool_schemas();
        let names: Vec<&str> = schemas
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["drawVertex", "drawEdge", "clearCanvas", "annotate", "showFormula", "highlight"]
        );
    }
}
