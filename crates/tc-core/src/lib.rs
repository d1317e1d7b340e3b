pub mod geometry;
pub mod id;
pub mod model;
pub mod scene;
pub mod surface;

pub use geometry::{AnnotationPosition, Point};
pub use id::{EdgeKey, VertexId};
pub use model::*;
pub use scene::{FontSpec, Primitive, Shape, ShapeId, ShapeStyle, TextOrigin, palette};
pub use surface::{DisplayList, Surface};
