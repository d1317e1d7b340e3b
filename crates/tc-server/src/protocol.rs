//! Newline-delimited JSON protocol between an agent and the canvas.
//!
//! One request per line, one response per line:
//!
//! ```text
//! → {"id":1,"method":"execute","params":{"name":"drawVertex","arguments":{"id":"A","x":200,"y":200,"label":"A"}}}
//! ← {"id":1,"result":"Drew vertex A at (200, 200)"}
//! ```
//!
//! Command refusals ("Vertex A already exists") are ordinary results; the
//! `error` member is reserved for requests that could not be understood.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tc_engine::{Command, DisplayList, Millis, TeachingCanvas, tool_schemas, transcript_for_graph};

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Response {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, error: String) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Handle one raw request line at wall-clock time `now` and return the
/// response line (without the trailing newline).
pub fn handle_line(canvas: &mut TeachingCanvas<DisplayList>, line: &str, now: Millis) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(canvas, request, now),
        Err(e) => Response::err(Value::Null, format!("Parse error: {e}")),
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|e| json!({ "id": null, "error": format!("Internal error: {e}") }).to_string())
}

/// Dispatch a parsed request. The canvas is ticked to `now` first so the
/// answer reflects every animation and reversion due by then.
pub fn handle(canvas: &mut TeachingCanvas<DisplayList>, request: Request, now: Millis) -> Response {
    canvas.tick(now);
    let Request { id, method, params } = request;
    log::debug!("request {id} {method}");

    match method.as_str() {
        "tools" => Response::ok(id, tool_schemas()),

        "execute" => match serde_json::from_value::<Command>(params) {
            Ok(command) => Response::ok(id, Value::String(canvas.execute(command))),
            Err(e) => Response::err(id, format!("Invalid command: {e}")),
        },

        "state" => match serde_json::to_value(canvas.readables()) {
            Ok(readables) => Response::ok(id, readables),
            Err(e) => Response::err(id, format!("Internal error: {e}")),
        },

        "render" => match canvas.surface() {
            Some(surface) => Response::ok(id, Value::String(tc_render::render_svg(surface))),
            None => Response::err(id, "Canvas not initialized".to_string()),
        },

        "transcript" => Response::ok(id, Value::String(transcript_for_graph(canvas.graph()))),

        other => {
            log::warn!("unknown method {other:?}");
            Response::err(id, format!("Unknown method: {other}"))
        }
    }
}
