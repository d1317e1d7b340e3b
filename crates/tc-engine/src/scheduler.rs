//! Animation scheduler driven by a caller-supplied clock.
//!
//! The host calls `tick(now_ms)` once per frame (`requestAnimationFrame` in
//! the browser, an interval in the server, explicit values in tests). The
//! scheduler never touches the surface itself: it returns `Frame` effects
//! that carry IDs only, and the canvas re-resolves each one through the
//! registry before applying it.
//!
//! Entrances run through two FIFO lanes with one active animation each:
//!
//! - **vertex lane**: fade-ins, one vertex after another.
//! - **edge lane**: settle, then a progressive draw from source to
//!   destination. An edge does not start while either endpoint still has
//!   a pending entrance, so a line never shows up before its vertices.
//!
//! Each lane item starts at `max(enqueue time, end of previous item)`, so
//! the visual timeline is strictly increasing no matter how coarse the
//! ticks are. Annotation/formula fades and highlight reversions run
//! independently of the lanes. Nothing is ever cancelled: `retire_entrances`
//! (called on clear) collapses every queued or running entrance to a
//! zero-length no-op, so a fresh drawing starts with empty lanes.

use smallvec::SmallVec;
use std::collections::{HashMap, VecDeque};
use tc_core::geometry::Point;
use tc_core::id::{EdgeKey, VertexId};
use tc_core::scene::{Primitive, ShapeId};

/// Milliseconds on the host clock.
pub type Millis = f64;

pub type Shapes = SmallVec<[ShapeId; 2]>;

/// Vertices restored by one highlight reversion, with the circle each was
/// highlighted through.
pub type RevertTargets = SmallVec<[(VertexId, ShapeId); 4]>;

/// A progressive edge draw. Endpoints are snapshotted at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDraw {
    pub key: EdgeKey,
    pub line: ShapeId,
    pub from: Point,
    pub to: Point,
    /// Arrowhead / weight label, added once the line is complete.
    pub decorations: SmallVec<[Primitive; 2]>,
    pub settle_ms: Millis,
    pub draw_ms: Millis,
}

/// One effect to apply to the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Opacity {
        shapes: Shapes,
        opacity: f32,
    },
    EdgeProgress {
        key: EdgeKey,
        line: ShapeId,
        from: Point,
        to: Point,
        progress: f64,
    },
    EdgeDrawn {
        key: EdgeKey,
        line: ShapeId,
        from: Point,
        to: Point,
        decorations: SmallVec<[Primitive; 2]>,
    },
    Revert {
        targets: RevertTargets,
    },
}

#[derive(Debug, Clone)]
enum Animation {
    Fade {
        owner: Option<VertexId>,
        shapes: Shapes,
        duration: Millis,
    },
    Draw(EdgeDraw),
}

impl Animation {
    fn length(&self) -> Millis {
        match self {
            Animation::Fade { duration, .. } => duration.max(0.0),
            Animation::Draw(d) => d.settle_ms.max(0.0) + d.draw_ms.max(0.0),
        }
    }

    fn owned_by(&self, vertex: VertexId) -> bool {
        matches!(self, Animation::Fade { owner: Some(v), .. } if *v == vertex)
    }

    fn frames(&self, started_at: Millis, now: Millis, out: &mut Vec<Frame>) {
        let elapsed = now - started_at;
        match self {
            Animation::Fade {
                shapes, duration, ..
            } => out.push(Frame::Opacity {
                shapes: shapes.clone(),
                opacity: fraction(elapsed, *duration) as f32,
            }),
            Animation::Draw(d) => {
                let drawing = elapsed - d.settle_ms.max(0.0);
                if drawing < 0.0 {
                    return;
                }
                let progress = fraction(drawing, d.draw_ms);
                if progress < 1.0 {
                    out.push(Frame::EdgeProgress {
                        key: d.key,
                        line: d.line,
                        from: d.from,
                        to: d.to,
                        progress,
                    });
                } else {
                    out.push(Frame::EdgeDrawn {
                        key: d.key,
                        line: d.line,
                        from: d.from,
                        to: d.to,
                        decorations: d.decorations.clone(),
                    });
                }
            }
        }
    }
}

fn fraction(elapsed: Millis, duration: Millis) -> f64 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
struct Running {
    anim: Animation,
    started_at: Millis,
}

impl Running {
    fn end(&self) -> Millis {
        self.started_at + self.anim.length()
    }
}

#[derive(Debug, Clone)]
struct Queued {
    anim: Animation,
    enqueued_at: Millis,
    /// Clear epoch the item was queued in.
    epoch: u64,
}

/// The entrance running in a lane.
#[derive(Debug, Clone)]
struct Active {
    running: Running,
    epoch: u64,
}

/// FIFO queue with a single active cursor.
#[derive(Debug, Clone, Default)]
struct Lane {
    queue: VecDeque<Queued>,
    active: Option<Active>,
    free_at: Millis,
}

impl Lane {
    fn push(&mut self, anim: Animation, now: Millis, epoch: u64) {
        self.queue.push_back(Queued {
            anim,
            enqueued_at: now,
            epoch,
        });
    }

    /// Free the lane from `now`; `step` drops older-epoch items on sight.
    fn retire(&mut self, now: Millis) {
        self.free_at = now;
    }

    fn len(&self) -> usize {
        self.queue.len() + usize::from(self.active.is_some())
    }

    /// Whether `vertex` has an entrance of the current `epoch` queued or
    /// running.
    fn has_pending(&self, vertex: VertexId, epoch: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.epoch == epoch && a.running.anim.owned_by(vertex))
            || self
                .queue
                .iter()
                .any(|q| q.epoch == epoch && q.anim.owned_by(vertex))
    }

    /// Advance to `now`. `gate` returns the earliest start time of the head
    /// item, or `None` while it is blocked; `finished` sees each completed
    /// animation with its end time. Items older than `epoch` finish at once
    /// without frames, gates or callbacks.
    fn step(
        &mut self,
        now: Millis,
        epoch: u64,
        out: &mut Vec<Frame>,
        mut gate: impl FnMut(&Animation) -> Option<Millis>,
        mut finished: impl FnMut(&Animation, Millis),
    ) {
        loop {
            if let Some(active) = self.active.take() {
                if active.epoch == epoch {
                    let running = &active.running;
                    running.anim.frames(running.started_at, now, out);
                    let end = running.end();
                    if end > now {
                        self.active = Some(active);
                        return;
                    }
                    finished(&running.anim, end);
                    self.free_at = end;
                }
            }

            let Some(head) = self.queue.front() else {
                return;
            };
            let start = if head.epoch == epoch {
                let Some(earliest) = gate(&head.anim) else {
                    return;
                };
                head.enqueued_at.max(self.free_at).max(earliest)
            } else {
                now
            };
            if start > now {
                return;
            }
            if let Some(head) = self.queue.pop_front() {
                self.active = Some(Active {
                    running: Running {
                        anim: head.anim,
                        started_at: start,
                    },
                    epoch: head.epoch,
                });
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Reversion {
    due: Millis,
    targets: RevertTargets,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Millis,
    vertices: Lane,
    edges: Lane,
    fades: Vec<Running>,
    reversions: Vec<Reversion>,
    /// When each vertex finished its entrance, for the current epoch.
    ready_at: HashMap<VertexId, Millis>,
    /// Bumped by every `retire_entrances`.
    epoch: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest time seen by `tick`.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Queue a vertex entrance behind the ones already queued.
    pub fn enqueue_vertex_fade(&mut self, owner: VertexId, shapes: Shapes, duration: Millis) {
        let anim = Animation::Fade {
            owner: Some(owner),
            shapes,
            duration,
        };
        self.vertices.push(anim, self.now, self.epoch);
    }

    /// Queue an edge draw behind the ones already queued.
    pub fn enqueue_edge_draw(&mut self, draw: EdgeDraw) {
        self.edges.push(Animation::Draw(draw), self.now, self.epoch);
    }

    /// Turn every queued or running entrance into a zero-length no-op and
    /// free both lanes from now on. Free fades and reversions are kept.
    pub fn retire_entrances(&mut self) {
        self.epoch += 1;
        self.vertices.retire(self.now);
        self.edges.retire(self.now);
        self.ready_at.clear();
    }

    /// Start a fade right away, outside the lanes.
    pub fn fade(&mut self, shapes: Shapes, duration: Millis) {
        self.fades.push(Running {
            anim: Animation::Fade {
                owner: None,
                shapes,
                duration,
            },
            started_at: self.now,
        });
    }

    /// Schedule one reversion for all `targets`, `delay` ms from now.
    pub fn revert_after(&mut self, targets: RevertTargets, delay: Millis) {
        let due = self.now + delay.max(0.0);
        self.reversions.push(Reversion { due, targets });
        self.reversions.sort_by(|a, b| a.due.total_cmp(&b.due));
    }

    /// Whether `vertex` still has an entrance queued or running.
    pub fn has_pending_entrance(&self, vertex: VertexId) -> bool {
        self.vertices.has_pending(vertex, self.epoch)
    }

    /// Number of animations and reversions not yet completed.
    pub fn pending(&self) -> usize {
        self.vertices.len() + self.edges.len() + self.fades.len() + self.reversions.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Advance the clock and collect the effects due by `now`.
    /// A clock that goes backwards is held at its latest value.
    pub fn tick(&mut self, now: Millis) -> Vec<Frame> {
        if now > self.now {
            self.now = now;
        }
        let now = self.now;
        let epoch = self.epoch;
        let mut out = Vec::new();

        let ready_at = &mut self.ready_at;
        self.vertices.step(
            now,
            epoch,
            &mut out,
            |_| Some(f64::NEG_INFINITY),
            |anim, end| {
                if let Animation::Fade {
                    owner: Some(vertex),
                    ..
                } = anim
                {
                    ready_at.insert(*vertex, end);
                }
            },
        );

        let vertices = &self.vertices;
        let ready_at = &self.ready_at;
        self.edges.step(
            now,
            epoch,
            &mut out,
            |anim| match anim {
                Animation::Draw(d) => {
                    let (a, b) = (d.key.from, d.key.to);
                    if vertices.has_pending(a, epoch) || vertices.has_pending(b, epoch) {
                        return None;
                    }
                    let at = |v: VertexId| ready_at.get(&v).copied().unwrap_or(f64::NEG_INFINITY);
                    Some(at(a).max(at(b)))
                }
                Animation::Fade { .. } => Some(f64::NEG_INFINITY),
            },
            |_, _| {},
        );

        self.fades.retain(|running| {
            running.anim.frames(running.started_at, now, &mut out);
            running.end() > now
        });

        let due = self.reversions.partition_point(|r| r.due <= now);
        for reversion in self.reversions.drain(..due) {
            out.push(Frame::Revert {
                targets: reversion.targets,
            });
        }

        out
    }
}
