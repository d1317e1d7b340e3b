pub mod paint;
pub mod svg;
pub mod text;

pub use paint::{paint_display_list, paint_primitive};
pub use svg::render_svg;
pub use text::{estimate_width, text_box};
