//! WASM bridge for Teaching Canvas. Exposes the canvas engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<canvas>` element and the agent connection; it forwards tool calls to
//! `GraphCanvas` and drives `tick` + `render` from `requestAnimationFrame`.

mod render2d;

use serde_json::json;
use tc_engine::{CanvasConfig, Command, DisplayList, TeachingCanvas, parse_transcript};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// The JS-facing canvas controller.
///
/// Starts uninitialized (every command answers "Canvas not initialized")
/// until the host calls `attach` or `attach_to`, mirroring the component
/// mount. `dispose` releases it for good.
#[wasm_bindgen]
pub struct GraphCanvas {
    canvas: TeachingCanvas<DisplayList>,
    /// Wall-clock origin for `tick_now`.
    epoch: Option<f64>,
}

#[wasm_bindgen]
impl GraphCanvas {
    /// Create a controller with the default look and the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        let config = CanvasConfig {
            width,
            height,
            ..CanvasConfig::default()
        };
        Self::from(config)
    }

    /// Create a controller from a JSON `CanvasConfig`; missing fields take
    /// their defaults.
    pub fn with_config(json: &str) -> Result<GraphCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config = CanvasConfig::from_json(json).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self::from(config))
    }

    /// Initialize the drawing surface. Returns `false` after `dispose`.
    pub fn attach(&mut self) -> bool {
        let config = self.canvas.config();
        let surface = DisplayList::new(config.width, config.height, config.background_color());
        self.canvas.attach(surface)
    }

    /// Size the `<canvas>` element to the configured dimensions, then attach.
    pub fn attach_to(&mut self, element: &HtmlCanvasElement) -> bool {
        let config = self.canvas.config();
        element.set_width(config.width.max(0.0) as u32);
        element.set_height(config.height.max(0.0) as u32);
        self.attach()
    }

    pub fn is_initialized(&self) -> bool {
        self.canvas.is_initialized()
    }

    /// Release the surface. Only the first call returns `true`.
    pub fn dispose(&mut self) -> bool {
        self.canvas.dispose()
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn draw_vertex(&mut self, id: &str, x: f64, y: f64, label: &str) -> String {
        self.canvas.execute(Command::DrawVertex {
            id: id.to_string(),
            x,
            y,
            label: label.to_string(),
        })
    }

    pub fn draw_edge(&mut self, from: &str, to: &str, weight: Option<f64>, directed: bool) -> String {
        self.canvas.execute(Command::DrawEdge {
            from: from.to_string(),
            to: to.to_string(),
            weight,
            directed,
        })
    }

    pub fn clear(&mut self) -> String {
        self.canvas.execute(Command::ClearCanvas {})
    }

    pub fn annotate(&mut self, target: &str, text: &str, position: &str) -> String {
        self.canvas.execute(Command::Annotate {
            target: target.to_string(),
            text: text.to_string(),
            position: position.to_string(),
        })
    }

    pub fn show_formula(&mut self, latex: &str, x: f64, y: f64) -> String {
        self.canvas.execute(Command::ShowFormula {
            latex: latex.to_string(),
            x,
            y,
        })
    }

    pub fn highlight(&mut self, element_ids: &str, color: Option<String>, duration: Option<f64>) -> String {
        self.canvas.execute(Command::Highlight {
            element_ids: element_ids.to_string(),
            color,
            duration,
        })
    }

    /// Run a `{"name": ..., "arguments": {...}}` tool call.
    /// Malformed calls come back as text too, so the agent can correct itself.
    pub fn execute(&mut self, call_json: &str) -> String {
        match Command::from_json(call_json) {
            Ok(command) => self.canvas.execute(command),
            Err(e) => {
                log::warn!("{e}");
                e
            }
        }
    }

    /// Run a transcript. Returns JSON `{"ok":true,"results":[...]}` or
    /// `{"ok":false,"error":"..."}`; nothing runs if any line is malformed.
    pub fn run_transcript(&mut self, text: &str) -> String {
        match parse_transcript(text) {
            Ok(commands) => {
                let results: Vec<String> = commands
                    .into_iter()
                    .map(|cmd| self.canvas.execute(cmd))
                    .collect();
                json!({ "ok": true, "results": results }).to_string()
            }
            Err(e) => json!({ "ok": false, "error": e }).to_string(),
        }
    }

    // ─── Read model ──────────────────────────────────────────────────────

    /// Current graph as the JSON snapshot the agent reads.
    pub fn graph_json(&self) -> String {
        self.canvas.graph().to_json()
    }

    /// `id:label` listing of every vertex.
    pub fn vertex_listing(&self) -> String {
        self.canvas.graph().listing()
    }

    /// Both readables as a JSON array of `{description, value}`.
    pub fn readables_json(&self) -> String {
        serde_json::to_string(&self.canvas.readables()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Transcript that rebuilds the current graph.
    pub fn transcript(&self) -> String {
        tc_engine::transcript_for_graph(self.canvas.graph())
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    /// Advance animations to `time_ms` (the `requestAnimationFrame`
    /// timestamp). Returns `true` when something changed and a repaint is
    /// due.
    pub fn tick(&mut self, time_ms: f64) -> bool {
        self.canvas.tick(time_ms) > 0
    }

    /// Advance animations by the wall clock, measured from the first call.
    /// Use either this or `tick`, not both.
    pub fn tick_now(&mut self) -> bool {
        let wall = js_sys::Date::now();
        let epoch = *self.epoch.get_or_insert(wall);
        self.tick(wall - epoch)
    }

    pub fn is_idle(&self) -> bool {
        self.canvas.is_idle()
    }

    /// Paint the current frame to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        if let Some(surface) = self.canvas.surface() {
            render2d::render_display_list(ctx, surface);
        }
    }

    /// Current frame as a standalone SVG document; empty when uninitialized.
    pub fn to_svg(&self) -> String {
        self.canvas
            .surface()
            .map(tc_render::render_svg)
            .unwrap_or_default()
    }
}

impl From<CanvasConfig> for GraphCanvas {
    fn from(config: CanvasConfig) -> Self {
        Self {
            canvas: TeachingCanvas::new(config),
            epoch: None,
        }
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Teaching Canvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Tool descriptions to hand to the agent, as a JSON array.
#[wasm_bindgen]
pub fn tool_schemas() -> String {
    tc_engine::tool_schemas().to_string()
}

/// Validate a transcript. Returns JSON `{"ok":true,"commands":N}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_transcript(text: &str) -> String {
    match parse_transcript(text) {
        Ok(commands) => json!({ "ok": true, "commands": commands.len() }).to_string(),
        Err(e) => json!({ "ok": false, "error": e }).to_string(),
    }
}
