//! Integration tests: command semantics over a recording surface (tc-engine).
//!
//! Drives `TeachingCanvas` the way an agent would, with named commands,
//! and checks the graph, the registry and the surface calls together.

use pretty_assertions::assert_eq;
use tc_core::id::{EdgeKey, VertexId};
use tc_core::model::{Color, Graph};
use tc_core::geometry::Point;
use tc_core::scene::{Primitive, Shape, ShapeId, palette};
use tc_core::surface::{DisplayList, Surface};
use tc_engine::{CanvasConfig, Command, TeachingCanvas, parse_transcript, replay_commands};

/// Surface double that logs every call and delegates storage to a
/// `DisplayList`.
#[derive(Default)]
struct RecordingSurface {
    inner: DisplayList,
    calls: Vec<String>,
}

impl Surface for RecordingSurface {
    fn add(&mut self, primitive: Primitive) -> ShapeId {
        let id = self.inner.add(primitive);
        self.calls.push(format!("add {id}"));
        id
    }

    fn remove(&mut self, id: ShapeId) -> Option<Primitive> {
        self.calls.push(format!("remove {id}"));
        self.inner.remove(id)
    }

    fn get(&self, id: ShapeId) -> Option<&Primitive> {
        self.inner.get(id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Primitive> {
        self.inner.get_mut(id)
    }

    fn send_to_back(&mut self, id: ShapeId) {
        self.calls.push(format!("back {id}"));
        self.inner.send_to_back(id);
    }

    fn clear(&mut self, background: Color) {
        self.calls.push("clear".into());
        self.inner.clear(background);
    }

    fn render(&mut self) {
        self.calls.push("render".into());
        self.inner.render();
    }

    fn dispose(&mut self) -> bool {
        self.calls.push("dispose".into());
        self.inner.dispose()
    }
}

fn canvas() -> TeachingCanvas<RecordingSurface> {
    TeachingCanvas::with_surface(CanvasConfig::immediate(), RecordingSurface::default())
}

fn animated() -> TeachingCanvas<RecordingSurface> {
    TeachingCanvas::with_surface(CanvasConfig::default(), RecordingSurface::default())
}

fn vertex(id: &str, x: f64, y: f64) -> Command {
    Command::DrawVertex {
        id: id.into(),
        x,
        y,
        label: id.into(),
    }
}

fn edge(from: &str, to: &str) -> Command {
    Command::DrawEdge {
        from: from.into(),
        to: to.into(),
        weight: None,
        directed: false,
    }
}

fn highlight(ids: &str, color: &str, duration: f64) -> Command {
    Command::Highlight {
        element_ids: ids.into(),
        color: Some(color.into()),
        duration: Some(duration),
    }
}

fn stroke_of(canvas: &TeachingCanvas<RecordingSurface>, id: &str) -> (Option<Color>, f64) {
    let shapes = canvas.registry().vertex(VertexId::intern(id)).unwrap();
    let circle = canvas.surface().unwrap().get(shapes.circle).unwrap();
    (circle.style.stroke, circle.style.stroke_width)
}

// ─── Vertices ────────────────────────────────────────────────────────────

#[test]
fn duplicate_vertex_is_refused_without_side_effects() {
    let mut canvas = canvas();
    assert_eq!(canvas.execute(vertex("A", 200.0, 200.0)), "Drew vertex A at (200, 200)");
    assert!(canvas.graph().contains_vertex(VertexId::intern("A")));
    let shapes_before = canvas.surface().unwrap().inner.len();

    assert_eq!(canvas.execute(vertex("A", 10.0, 10.0)), "Vertex A already exists");
    assert_eq!(canvas.graph().vertices.len(), 1);
    assert_eq!(canvas.graph().vertices[0].x, 200.0);
    assert_eq!(canvas.surface().unwrap().inner.len(), shapes_before);
}

// ─── Edges ───────────────────────────────────────────────────────────────

#[test]
fn edge_to_missing_vertex_lists_what_exists() {
    let mut canvas = canvas();
    assert_eq!(
        canvas.execute(edge("A", "B")),
        "Vertices not found. Available: "
    );
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("C", 300.0, 100.0));
    assert_eq!(
        canvas.execute(edge("A", "B")),
        "Vertices not found. Available: A, C"
    );
    assert!(canvas.graph().edges.is_empty());
    assert!(canvas.registry().edge_count() == 0);
}

#[test]
fn edge_succeeds_once() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("B", 300.0, 100.0));
    assert_eq!(canvas.execute(edge("A", "B")), "Drew edge from A to B");
    assert_eq!(
        canvas.execute(edge("A", "B")),
        "Edge from A to B already exists"
    );
    assert_eq!(canvas.graph().edges.len(), 1);
}

#[test]
fn reversed_edges_are_distinct() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("B", 300.0, 100.0));
    assert_eq!(canvas.execute(edge("A", "B")), "Drew edge from A to B");
    assert_eq!(canvas.execute(edge("B", "A")), "Drew edge from B to A");

    let ab = EdgeKey::new(VertexId::intern("A"), VertexId::intern("B"));
    assert!(canvas.graph().contains_edge(ab));
    assert!(canvas.graph().contains_edge(ab.reversed()));
    assert_ne!(canvas.registry().edge(ab), canvas.registry().edge(ab.reversed()));
}

#[test]
fn edge_line_is_sent_behind_its_vertices() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("B", 300.0, 100.0));
    canvas.execute(edge("A", "B"));

    let line = canvas
        .registry()
        .edge(EdgeKey::new(VertexId::intern("A"), VertexId::intern("B")))
        .unwrap();
    let calls = &canvas.surface().unwrap().calls;
    let added = calls.iter().position(|c| *c == format!("add {line}")).unwrap();
    assert_eq!(calls[added + 1], format!("back {line}"));
    assert_eq!(canvas.surface().unwrap().inner.z_order()[0], line);
}

// ─── Clear ───────────────────────────────────────────────────────────────

#[test]
fn clear_is_idempotent() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("B", 300.0, 100.0));
    canvas.execute(edge("A", "B"));

    assert_eq!(canvas.execute(Command::ClearCanvas {}), "Canvas cleared successfully");
    assert_eq!(canvas.execute(Command::ClearCanvas {}), "Canvas cleared successfully");
    assert!(canvas.graph().is_empty());
    assert!(canvas.registry().is_empty());
    assert!(canvas.surface().unwrap().inner.is_empty());

    // IDs are free again.
    assert_eq!(canvas.execute(vertex("A", 50.0, 50.0)), "Drew vertex A at (50, 50)");
}

// ─── Annotations and formulas ───────────────────────────────────────────

#[test]
fn annotation_needs_a_vertex() {
    let mut canvas = canvas();
    let note = Command::Annotate {
        target: "A".into(),
        text: "start here".into(),
        position: "top".into(),
    };
    assert_eq!(canvas.execute(note.clone()), "Vertex not found");
    canvas.execute(vertex("A", 100.0, 100.0));
    assert_eq!(canvas.execute(note), "Added annotation start here to A");
    // Annotations are not part of the graph.
    assert_eq!(canvas.graph().vertices.len(), 1);
}

#[test]
fn formula_is_placed_as_given() {
    let mut canvas = canvas();
    assert_eq!(
        canvas.execute(Command::ShowFormula {
            latex: "E = V - 1".into(),
            x: 400.0,
            y: 50.5,
        }),
        "Displayed formula: E = V - 1 at (400, 50.5)"
    );
    assert!(canvas.graph().is_empty());
}

// ─── Highlight ───────────────────────────────────────────────────────────

#[test]
fn highlight_restyles_then_reverts() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("B", 300.0, 100.0));

    assert_eq!(
        canvas.execute(highlight("A,B", "red", 100.0)),
        "Highlighted 2 vertices for 100ms"
    );
    let red = Color::parse("red");
    assert_eq!(stroke_of(&canvas, "A"), (red, palette::HIGHLIGHT_STROKE_WIDTH));
    assert_eq!(stroke_of(&canvas, "B"), (red, palette::HIGHLIGHT_STROKE_WIDTH));

    // Unrelated commands in between do not disturb the reversion.
    canvas.execute(vertex("C", 200.0, 300.0));
    canvas.execute(edge("A", "C"));
    canvas.tick(99.0);
    assert_eq!(stroke_of(&canvas, "A").0, red);

    canvas.tick(100.0);
    let base = (Some(palette::ACCENT), palette::VERTEX_STROKE_WIDTH);
    assert_eq!(stroke_of(&canvas, "A"), base);
    assert_eq!(stroke_of(&canvas, "B"), base);
    assert!(canvas.is_idle());
}

#[test]
fn highlight_reversion_after_clear_is_a_no_op() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(highlight("A", "red", 100.0));
    canvas.execute(Command::ClearCanvas {});

    // A new A reuses the ID but not the circle.
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(highlight("A", "green", 1000.0));
    assert_eq!(canvas.tick(150.0), 0);
    assert_eq!(stroke_of(&canvas, "A").0, Color::parse("green"));
}

#[test]
fn highlight_counts_every_listed_id() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    assert_eq!(
        canvas.execute(highlight("A, Z, A", "blue", 500.0)),
        "Highlighted 3 vertices for 500ms"
    );
    // Only A is restyled; Z is skipped.
    assert_eq!(stroke_of(&canvas, "A").0, Color::parse("blue"));
    assert!(VertexId::lookup("Z").is_none_or(|z| canvas.registry().vertex(z).is_none()));
}

#[test]
fn unknown_names_are_not_interned() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(edge("A", "ghost-edge-end"));
    canvas.execute(Command::Annotate {
        target: "ghost-annotation".into(),
        text: "hi".into(),
        position: "top".into(),
    });
    canvas.execute(highlight("ghost-highlight", "red", 10.0));
    for name in ["ghost-edge-end", "ghost-annotation", "ghost-highlight"] {
        assert_eq!(VertexId::lookup(name), None, "{name}");
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn triangle_scenario() {
    let mut canvas = canvas();
    let script = [
        vertex("A", 200.0, 200.0),
        vertex("B", 400.0, 200.0),
        vertex("C", 300.0, 350.0),
        edge("A", "B"),
        edge("B", "C"),
        edge("C", "A"),
    ];
    for cmd in script {
        let out = canvas.execute(cmd);
        assert!(out.starts_with("Drew"), "{out}");
    }
    assert_eq!(canvas.graph().vertices.len(), 3);
    assert_eq!(canvas.graph().edges.len(), 3);
    assert_eq!(canvas.graph().listing(), "A:A, B:B, C:C");
    assert_eq!(
        canvas.execute(edge("A", "B")),
        "Edge from A to B already exists"
    );
}

#[test]
fn snapshot_replay_reproduces_the_graph() {
    let mut canvas = canvas();
    let script = parse_transcript(
        "drawVertex id=A x=200 y=200 label=A\n\
         drawVertex id=B x=400 y=200 label=B\n\
         drawVertex id=C x=300 y=350 label=C\n\
         drawEdge from=A to=B weight=5\n\
         drawEdge from=C to=A directed=true\n",
    )
    .unwrap();
    for cmd in script {
        canvas.execute(cmd);
    }

    let snapshot = canvas.graph().to_json();
    canvas.execute(Command::ClearCanvas {});
    let restored = Graph::from_json(&snapshot).unwrap();
    for cmd in replay_commands(&restored) {
        canvas.execute(cmd);
    }
    assert!(canvas.graph().equivalent(&restored));
    assert_eq!(canvas.graph().to_json(), snapshot);
}

#[test]
fn readables_follow_every_mutation() {
    let mut canvas = canvas();
    canvas.execute(vertex("A", 1.0, 2.0));
    let [state, listing] = canvas.readables();
    assert_eq!(listing.value, "A:A");
    assert!(state.value.contains("\"id\":\"A\""));

    canvas.execute(Command::ClearCanvas {});
    let [state, listing] = canvas.readables();
    assert_eq!(listing.value, "");
    assert_eq!(state.value, r#"{"vertices":[],"edges":[]}"#);
}

// ─── Animation ───────────────────────────────────────────────────────────

#[test]
fn animated_entrances_finish_in_command_order() {
    let mut canvas = animated();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("B", 300.0, 100.0));
    canvas.execute(edge("A", "B"));

    let b = canvas.registry().vertex(VertexId::intern("B")).unwrap();
    canvas.tick(400.0);
    let opacity = |c: &TeachingCanvas<RecordingSurface>, id| {
        c.surface().unwrap().get(id).unwrap().style.opacity
    };
    assert_eq!(opacity(&canvas, b.circle), 0.0);

    // One coarse tick well past the whole timeline settles everything.
    canvas.tick(10_000.0);
    assert_eq!(opacity(&canvas, b.circle), 1.0);
    assert!(canvas.is_idle());
}

#[test]
fn clear_during_animation_leaves_nothing_behind() {
    let mut canvas = animated();
    canvas.execute(vertex("A", 100.0, 100.0));
    canvas.execute(vertex("B", 300.0, 100.0));
    canvas.execute(Command::DrawEdge {
        from: "A".into(),
        to: "B".into(),
        weight: Some(2.0),
        directed: true,
    });
    canvas.tick(1300.0);
    canvas.execute(Command::ClearCanvas {});

    canvas.tick(5000.0);
    assert!(canvas.surface().unwrap().inner.is_empty());
    assert!(canvas.is_idle());
}

#[test]
fn entrances_after_clear_do_not_wait_for_removed_ones() {
    let mut canvas = animated();
    for i in 0..6 {
        canvas.execute(vertex(&format!("old{i}"), 50.0 * i as f64, 50.0));
    }
    canvas.execute(edge("old0", "old1"));
    canvas.execute(edge("old1", "old2"));
    canvas.execute(edge("old2", "old3"));
    canvas.tick(10.0);
    canvas.execute(Command::ClearCanvas {});

    canvas.execute(vertex("Z", 100.0, 100.0));
    canvas.execute(vertex("Y", 300.0, 100.0));
    canvas.execute(edge("Z", "Y"));
    let z = canvas.registry().vertex(VertexId::intern("Z")).unwrap();
    let y = canvas.registry().vertex(VertexId::intern("Y")).unwrap();
    let line = canvas
        .registry()
        .edge(EdgeKey::new(VertexId::intern("Z"), VertexId::intern("Y")))
        .unwrap();
    let primitive = |c: &TeachingCanvas<RecordingSurface>, id| c.surface().unwrap().get(id).cloned().unwrap();

    // Vertex lane: Z fades 10..510, Y 510..1010.
    canvas.tick(510.0);
    assert_eq!(primitive(&canvas, z.circle).style.opacity, 1.0);
    canvas.tick(1010.0);
    assert_eq!(primitive(&canvas, y.circle).style.opacity, 1.0);

    // Edge lane: settles until 1160, half drawn at 1460, done at 1760.
    canvas.tick(1460.0);
    assert_eq!(
        primitive(&canvas, line).shape,
        Shape::Line {
            from: Point::new(100.0, 100.0),
            to: Point::new(200.0, 100.0),
        }
    );
    canvas.tick(1760.0);
    assert_eq!(
        primitive(&canvas, line).shape,
        Shape::Line {
            from: Point::new(100.0, 100.0),
            to: Point::new(300.0, 100.0),
        }
    );
    assert!(canvas.is_idle());
}

#[test]
fn dispose_releases_the_surface_once() {
    let mut canvas = canvas();
    assert!(canvas.dispose());
    assert!(!canvas.dispose());
    assert_eq!(canvas.execute(vertex("A", 1.0, 1.0)), "Canvas not initialized");
}
