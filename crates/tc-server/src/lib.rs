//! Teaching Canvas server: lets an external agent drive the canvas over
//! stdio with newline-delimited JSON.

pub mod protocol;

pub use protocol::{Request, Response, handle, handle_line};
