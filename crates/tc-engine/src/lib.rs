pub mod canvas;
pub mod commands;
pub mod config;
pub mod readable;
pub mod registry;
pub mod scheduler;
pub mod transcript;

pub use canvas::{TeachingCanvas, parse_element_ids};
pub use commands::{Command, CommandResult, Rejection, tool_schemas};
pub use config::{AnimationMode, CanvasConfig};
pub use readable::{Readable, readables};
pub use registry::{SceneRegistry, VertexShapes};
pub use scheduler::{Frame, Millis, Scheduler};
pub use transcript::{emit_command, parse_transcript, replay_commands, transcript_for_graph};

// Re-export the surface types so drivers don't need a direct tc-core dependency
pub use tc_core::{DisplayList, Surface};
