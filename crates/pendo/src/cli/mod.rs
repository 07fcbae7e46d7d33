//! CLI building blocks: validation, rendering and console output.

pub mod output;
pub mod render;
pub mod validate;

pub use output::{Console, SessionInfo};
pub use render::{select_renderer, Colored, Plain, Renderer, Tone};
pub use validate::validate_inputs;
