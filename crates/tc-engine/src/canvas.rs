//! The teaching canvas: command handlers over a drawing surface.
//!
//! `TeachingCanvas` owns the authoritative `Graph`, the `SceneRegistry`
//! mapping entities to primitives, and the animation `Scheduler`. Every
//! handler checks its preconditions first and only then mutates surface,
//! registry and graph together, so a refused command leaves all three
//! untouched.

use crate::commands::{Command, CommandResult, Rejection};
use crate::config::CanvasConfig;
use crate::readable::{Readable, readables};
use crate::registry::{SceneRegistry, VertexShapes};
use crate::scheduler::{EdgeDraw, Frame, Millis, RevertTargets, Scheduler};
use smallvec::{SmallVec, smallvec};
use std::collections::HashMap;
use tc_core::geometry::{AnnotationPosition, Point, arrowhead_placement, weight_label_anchor};
use tc_core::id::{EdgeKey, VertexId};
use tc_core::model::{Color, Edge, Graph, Vertex, format_number};
use tc_core::scene::{FontSpec, Primitive, Shape, ShapeId, ShapeStyle, TextOrigin, palette};
use tc_core::surface::Surface;

/// Fallback when a highlight names a color we cannot paint.
const HIGHLIGHT_FALLBACK: Color = Color::rgb8(255, 255, 0);

pub struct TeachingCanvas<S: Surface> {
    surface: Option<S>,
    disposed: bool,
    graph: Graph,
    registry: SceneRegistry,
    scheduler: Scheduler,
    /// Pencil cursor riding the tip of each edge being drawn, keyed by line.
    cursors: HashMap<ShapeId, ShapeId>,
    config: CanvasConfig,
}

impl<S: Surface> TeachingCanvas<S> {
    /// A canvas with no surface yet; every command reports
    /// "Canvas not initialized" until `attach` is called.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            surface: None,
            disposed: false,
            graph: Graph::new(),
            registry: SceneRegistry::new(),
            scheduler: Scheduler::new(),
            cursors: HashMap::new(),
            config,
        }
    }

    pub fn with_surface(config: CanvasConfig, surface: S) -> Self {
        let mut canvas = Self::new(config);
        canvas.attach(surface);
        canvas
    }

    /// Initialize with a surface. Refused once the canvas has been disposed.
    pub fn attach(&mut self, mut surface: S) -> bool {
        if self.disposed {
            log::warn!("attach after dispose ignored");
            return false;
        }
        surface.clear(self.config.background_color());
        surface.render();
        self.surface = Some(surface);
        true
    }

    /// Release the surface. Only the first call does anything.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        if let Some(mut surface) = self.surface.take() {
            surface.dispose();
        }
        log::debug!("canvas disposed");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Current state of the graph (read-only).
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    /// Nothing left to animate or revert.
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Context for the driver, always reflecting the latest mutation.
    pub fn readables(&self) -> [Readable; 2] {
        readables(&self.graph)
    }

    /// Run a command and flatten its outcome to the driver-facing text.
    pub fn execute(&mut self, command: Command) -> String {
        let name = command.name();
        let result = match command {
            Command::DrawVertex { id, x, y, label } => self.draw_vertex(&id, x, y, &label),
            Command::DrawEdge {
                from,
                to,
                weight,
                directed,
            } => self.draw_edge(&from, &to, weight, directed),
            Command::ClearCanvas {} => self.clear(),
            Command::Annotate {
                target,
                text,
                position,
            } => self.annotate(&target, &text, &position),
            Command::ShowFormula { latex, x, y } => self.show_formula(&latex, x, y),
            Command::Highlight {
                element_ids,
                color,
                duration,
            } => self.highlight(&element_ids, color.as_deref(), duration),
        };
        match result {
            Ok(message) => message,
            Err(rejection) => {
                log::warn!("{name} refused: {rejection}");
                rejection.to_string()
            }
        }
    }

    // ─── Handlers ────────────────────────────────────────────────────────

    pub fn draw_vertex(&mut self, id: &str, x: f64, y: f64, label: &str) -> CommandResult {
        let surface = self.surface.as_mut().ok_or(Rejection::NotInitialized)?;
        let vertex_id = VertexId::intern(id);
        if self.registry.contains_vertex(vertex_id) {
            return Err(Rejection::VertexExists(id.to_string()));
        }

        let animated = self.config.is_animated();
        let center = Point::new(x, y);
        let mut circle = vertex_circle(center);
        let mut text = vertex_label(center, label);
        if animated {
            circle = circle.hidden();
            text = text.hidden();
        }
        let shapes = VertexShapes {
            circle: surface.add(circle),
            label: surface.add(text),
        };
        self.registry.register_vertex(vertex_id, shapes);
        self.graph.vertices.push(Vertex {
            id: vertex_id,
            x,
            y,
            label: label.to_string(),
        });
        if animated {
            self.scheduler.enqueue_vertex_fade(
                vertex_id,
                smallvec![shapes.circle, shapes.label],
                self.config.vertex_fade_ms,
            );
        }
        surface.render();

        log::debug!("vertex {id} at ({x}, {y})");
        Ok(format!(
            "Drew vertex {label} at ({}, {})",
            format_number(x),
            format_number(y)
        ))
    }

    pub fn draw_edge(
        &mut self,
        from: &str,
        to: &str,
        weight: Option<f64>,
        directed: bool,
    ) -> CommandResult {
        let surface = self.surface.as_mut().ok_or(Rejection::NotInitialized)?;
        let a = VertexId::lookup(from).and_then(|id| self.graph.vertex(id));
        let b = VertexId::lookup(to).and_then(|id| self.graph.vertex(id));
        let (Some(a), Some(b)) = (a, b) else {
            return Err(Rejection::VerticesNotFound {
                available: self
                    .graph
                    .vertices
                    .iter()
                    .map(|v| v.id.as_str().to_string())
                    .collect(),
            });
        };
        let key = EdgeKey::new(a.id, b.id);
        if self.registry.contains_edge(key) {
            return Err(Rejection::EdgeExists {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let (start, end) = (Point::new(a.x, a.y), Point::new(b.x, b.y));
        let mut decorations: SmallVec<[Primitive; 2]> = SmallVec::new();
        if directed {
            decorations.push(arrowhead(start, end));
        }
        if let Some(w) = weight {
            decorations.push(weight_label(start, end, w));
        }

        let line = if self.config.is_animated() {
            let line = surface.add(edge_line(start, start).hidden());
            surface.send_to_back(line);
            self.scheduler.enqueue_edge_draw(EdgeDraw {
                key,
                line,
                from: start,
                to: end,
                decorations,
                settle_ms: self.config.edge_settle_ms,
                draw_ms: self.config.edge_draw_ms,
            });
            line
        } else {
            let line = surface.add(edge_line(start, end));
            surface.send_to_back(line);
            for decoration in decorations {
                surface.add(decoration);
            }
            line
        };

        self.registry.register_edge(key, line);
        self.graph.edges.push(Edge {
            from: key.from,
            to: key.to,
            weight,
            directed,
        });
        surface.render();

        log::debug!("edge {key}");
        let kind = if directed { "directed " } else { "" };
        // A zero weight is drawn but not reported.
        let suffix = weight
            .filter(|w| *w != 0.0)
            .map(|w| format!(" with weight {}", format_number(w)))
            .unwrap_or_default();
        Ok(format!("Drew {kind}edge from {from} to {to}{suffix}"))
    }

    pub fn clear(&mut self) -> CommandResult {
        let surface = self.surface.as_mut().ok_or(Rejection::NotInitialized)?;
        surface.clear(self.config.background_color());
        surface.render();
        self.registry.unregister_all();
        self.graph = Graph::new();
        self.cursors.clear();
        self.scheduler.retire_entrances();

        log::debug!("canvas cleared");
        Ok("Canvas cleared successfully".to_string())
    }

    pub fn annotate(&mut self, target: &str, text: &str, position: &str) -> CommandResult {
        if self.surface.is_none() {
            return Err(Rejection::NotInitialized);
        }
        let vertex = VertexId::lookup(target)
            .and_then(|id| self.graph.vertex(id))
            .ok_or_else(|| Rejection::TargetNotFound(target.to_string()))?;

        let side = AnnotationPosition::parse_or_top(position);
        let (dx, dy) = side.offset();
        let anchor = Point::new(vertex.x + dx, vertex.y + dy);
        let note = annotation_label(anchor, text);
        self.place_fading(note, self.config.annotation_fade_ms);

        log::debug!("annotation on {target} ({})", side.as_str());
        Ok(format!("Added annotation {text} to {target}"))
    }

    pub fn show_formula(&mut self, latex: &str, x: f64, y: f64) -> CommandResult {
        if self.surface.is_none() {
            return Err(Rejection::NotInitialized);
        }
        let formula = formula_label(Point::new(x, y), latex);
        self.place_fading(formula, self.config.formula_fade_ms);

        Ok(format!(
            "Displayed formula: {latex} at ({}, {})",
            format_number(x),
            format_number(y)
        ))
    }

    /// Restyle the outline of each listed vertex now and restore it after
    /// `duration` ms. Unknown IDs are skipped.
    pub fn highlight(
        &mut self,
        element_ids: &str,
        color: Option<&str>,
        duration: Option<f64>,
    ) -> CommandResult {
        let surface = self.surface.as_mut().ok_or(Rejection::NotInitialized)?;
        let color_name = color.unwrap_or(self.config.highlight_color.as_str());
        let stroke = Color::parse(color_name).unwrap_or_else(|| {
            log::warn!("unknown highlight color {color_name:?}, using yellow");
            HIGHLIGHT_FALLBACK
        });
        let duration = duration.unwrap_or(self.config.highlight_duration_ms).max(0.0);

        let names = parse_element_ids(element_ids);
        let mut targets = RevertTargets::new();
        for id in names.iter().filter_map(|name| VertexId::lookup(name)) {
            if targets.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            let Some(shapes) = self.registry.vertex(id) else {
                continue;
            };
            if let Some(circle) = surface.get_mut(shapes.circle) {
                circle.style.stroke = Some(stroke);
                circle.style.stroke_width = palette::HIGHLIGHT_STROKE_WIDTH;
                targets.push((id, shapes.circle));
            }
        }
        // Counts every listed name, unknown and repeated ones included.
        let count = names.len();
        if !targets.is_empty() {
            self.scheduler.revert_after(targets, duration);
        }
        surface.render();

        Ok(format!(
            "Highlighted {count} vertices for {}ms",
            format_number(duration)
        ))
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    /// Advance animations to `now` and apply what is due.
    /// Returns the number of effects that touched a live primitive.
    pub fn tick(&mut self, now: Millis) -> usize {
        let frames = self.scheduler.tick(now);
        let Some(surface) = self.surface.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        for frame in frames {
            if apply_frame(surface, &self.registry, &mut self.cursors, frame) {
                applied += 1;
            }
        }
        if applied > 0 {
            surface.render();
        }
        applied
    }

    /// Add a standalone label, fading it in when animated.
    fn place_fading(&mut self, primitive: Primitive, fade_ms: Millis) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if self.config.is_animated() {
            let id = surface.add(primitive.hidden());
            self.scheduler.fade(smallvec![id], fade_ms);
        } else {
            surface.add(primitive);
        }
        surface.render();
    }
}

/// Split a comma-separated ID list, trimming blanks.
pub fn parse_element_ids(list: &str) -> SmallVec<[&str; 4]> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Apply one effect. Everything is re-resolved; a target that no longer
/// exists makes the effect a no-op.
fn apply_frame<S: Surface>(
    surface: &mut S,
    registry: &SceneRegistry,
    cursors: &mut HashMap<ShapeId, ShapeId>,
    frame: Frame,
) -> bool {
    match frame {
        Frame::Opacity { shapes, opacity } => {
            let mut touched = false;
            for id in shapes {
                if let Some(p) = surface.get_mut(id) {
                    p.style.opacity = opacity;
                    touched = true;
                }
            }
            touched
        }
        Frame::EdgeProgress {
            key,
            line,
            from,
            to,
            progress,
        } => {
            if registry.edge(key) != Some(line) {
                return false;
            }
            let tip = from.lerp(to, progress);
            let Some(p) = surface.get_mut(line) else {
                return false;
            };
            p.shape = Shape::Line { from, to: tip };
            p.style.opacity = 1.0;

            let live_cursor = cursors
                .get(&line)
                .copied()
                .filter(|c| surface.get(*c).is_some());
            match live_cursor {
                Some(c) => {
                    if let Some(marker) = surface.get_mut(c) {
                        marker.shape = cursor_shape(tip);
                    }
                }
                None => {
                    let marker = surface.add(cursor_marker(tip));
                    cursors.insert(line, marker);
                }
            }
            true
        }
        Frame::EdgeDrawn {
            key,
            line,
            from,
            to,
            decorations,
        } => {
            if let Some(marker) = cursors.remove(&line) {
                surface.remove(marker);
            }
            if registry.edge(key) != Some(line) {
                return false;
            }
            let Some(p) = surface.get_mut(line) else {
                return false;
            };
            p.shape = Shape::Line { from, to };
            p.style.opacity = 1.0;
            for decoration in decorations {
                surface.add(decoration);
            }
            true
        }
        Frame::Revert { targets } => {
            let mut touched = false;
            for (vertex, circle) in targets {
                if registry.vertex(vertex).is_none_or(|s| s.circle != circle) {
                    continue;
                }
                if let Some(p) = surface.get_mut(circle) {
                    p.style.stroke = Some(palette::ACCENT);
                    p.style.stroke_width = palette::VERTEX_STROKE_WIDTH;
                    touched = true;
                }
            }
            touched
        }
    }
}

// ─── Primitive builders ──────────────────────────────────────────────────

fn vertex_circle(center: Point) -> Primitive {
    Primitive::new(
        Shape::Circle {
            center,
            radius: palette::VERTEX_RADIUS,
        },
        ShapeStyle {
            fill: Some(palette::VERTEX_FILL),
            stroke: Some(palette::ACCENT),
            stroke_width: palette::VERTEX_STROKE_WIDTH,
            ..ShapeStyle::default()
        },
    )
}

fn vertex_label(center: Point, label: &str) -> Primitive {
    Primitive::new(
        Shape::Text {
            anchor: center,
            content: label.to_string(),
            font: FontSpec {
                family: "sans-serif".into(),
                weight: 700,
                size: 18.0,
            },
            origin: TextOrigin::Center,
        },
        ShapeStyle {
            fill: Some(Color::WHITE),
            ..ShapeStyle::default()
        },
    )
}

fn edge_line(from: Point, to: Point) -> Primitive {
    Primitive::new(
        Shape::Line { from, to },
        ShapeStyle {
            stroke: Some(palette::ACCENT),
            stroke_width: palette::EDGE_STROKE_WIDTH,
            ..ShapeStyle::default()
        },
    )
}

fn arrowhead(from: Point, to: Point) -> Primitive {
    let (center, angle) = arrowhead_placement(from, to);
    Primitive::new(
        Shape::Triangle {
            center,
            size: palette::ARROW_SIZE,
            angle,
        },
        ShapeStyle {
            fill: Some(palette::ACCENT),
            ..ShapeStyle::default()
        },
    )
}

fn weight_label(from: Point, to: Point, weight: f64) -> Primitive {
    Primitive::new(
        Shape::Text {
            anchor: weight_label_anchor(from, to),
            content: format_number(weight),
            font: FontSpec {
                size: 14.0,
                ..FontSpec::default()
            },
            origin: TextOrigin::Center,
        },
        ShapeStyle {
            fill: Some(palette::NOTE),
            background: Some(palette::LABEL_BG),
            padding: 3.0,
            ..ShapeStyle::default()
        },
    )
}

fn annotation_label(anchor: Point, text: &str) -> Primitive {
    Primitive::new(
        Shape::Text {
            anchor,
            content: text.to_string(),
            font: FontSpec {
                size: 14.0,
                ..FontSpec::default()
            },
            origin: TextOrigin::TopLeft,
        },
        ShapeStyle {
            fill: Some(palette::NOTE),
            background: Some(palette::LABEL_BG),
            padding: 5.0,
            ..ShapeStyle::default()
        },
    )
}

fn formula_label(anchor: Point, latex: &str) -> Primitive {
    Primitive::new(
        Shape::Text {
            anchor,
            content: latex.to_string(),
            font: FontSpec {
                family: "Courier New".into(),
                weight: 400,
                size: 18.0,
            },
            origin: TextOrigin::TopLeft,
        },
        ShapeStyle {
            fill: Some(palette::FORMULA),
            background: Some(palette::FORMULA_BG),
            padding: 10.0,
            ..ShapeStyle::default()
        },
    )
}

fn cursor_shape(tip: Point) -> Shape {
    Shape::Circle {
        center: tip,
        radius: palette::CURSOR_RADIUS,
    }
}

fn cursor_marker(tip: Point) -> Primitive {
    Primitive::new(
        cursor_shape(tip),
        ShapeStyle {
            fill: Some(palette::NOTE),
            ..ShapeStyle::default()
        },
    )
}
