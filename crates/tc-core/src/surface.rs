//! The drawing surface capability and its in-memory implementation.
//!
//! The engine only ever talks to a `Surface`: add/remove a primitive,
//! restyle it in place, reorder it, render a frame. Concrete backends
//! (Canvas2D in the browser, Vello, SVG export) paint a `DisplayList`.

use crate::model::Color;
use crate::scene::{Primitive, ShapeId, palette};

/// Minimal capability set the canvas engine needs from a 2D backend.
pub trait Surface {
    /// Add a primitive on top of everything else.
    fn add(&mut self, primitive: Primitive) -> ShapeId;

    /// Remove a primitive. Returns it if it was present.
    fn remove(&mut self, id: ShapeId) -> Option<Primitive>;

    fn get(&self, id: ShapeId) -> Option<&Primitive>;

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Primitive>;

    /// Move a primitive beneath all others.
    fn send_to_back(&mut self, id: ShapeId);

    /// Drop every primitive and repaint the background.
    fn clear(&mut self, background: Color);

    /// Present the current state as a frame.
    fn render(&mut self);

    /// Release backend resources. Returns `false` if already released.
    fn dispose(&mut self) -> bool;
}

/// Ordered, back-to-front list of primitives.
#[derive(Debug, Clone)]
pub struct DisplayList {
    items: Vec<(ShapeId, Primitive)>,
    next_id: u64,
    background: Color,
    width: f64,
    height: f64,
    frames: u64,
    disposed: bool,
}

impl DisplayList {
    pub fn new(width: f64, height: f64, background: Color) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            background,
            width,
            height,
            frames: 0,
            disposed: false,
        }
    }

    /// Primitives back-to-front (paint order).
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Primitive)> {
        self.items.iter().map(|(id, p)| (*id, p))
    }

    /// Shape IDs back-to-front.
    pub fn z_order(&self) -> Vec<ShapeId> {
        self.items.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn position(&self, id: ShapeId) -> Option<usize> {
        self.items.iter().position(|(sid, _)| *sid == id)
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new(800.0, 600.0, palette::BACKGROUND)
    }
}

impl Surface for DisplayList {
    fn add(&mut self, primitive: Primitive) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.items.push((id, primitive));
        id
    }

    fn remove(&mut self, id: ShapeId) -> Option<Primitive> {
        let pos = self.position(id)?;
        Some(self.items.remove(pos).1)
    }

    fn get(&self, id: ShapeId) -> Option<&Primitive> {
        self.items.iter().find(|(sid, _)| *sid == id).map(|(_, p)| p)
    }

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Primitive> {
        self.items
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, p)| p)
    }

    fn send_to_back(&mut self, id: ShapeId) {
        if let Some(pos) = self.position(id) {
            let item = self.items.remove(pos);
            self.items.insert(0, item);
        }
    }

    fn clear(&mut self, background: Color) {
        self.items.clear();
        self.background = background;
    }

    fn render(&mut self) {
        self.frames += 1;
        log::trace!("frame {} with {} primitives", self.frames, self.items.len());
    }

    fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        self.items.clear();
        true
    }
}
