//! Rendering of analysis results for output.

mod json;
mod markdown;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;
pub use text::{describe_boundary, to_text};
