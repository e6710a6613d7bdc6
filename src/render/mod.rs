//! Rendering of segmented documents and extracted content.

mod json;
mod text;

pub use json::{content_to_json, to_json, JsonFormat};
pub use text::{content_to_text, to_text};
