//! Document model types shared by extraction and synthesis.
//!
//! The `{role, text}` block sequence is the seam between the text half
//! (extractors + classifier) and the PDF half (synthesizer). It serializes
//! to JSON so either half can run on its own.

mod block;
mod document;
mod style;

pub use block::{BlockRole, TextBlock};
pub use document::{CodedDocument, JsonFormat};
pub use style::{FontWeight, StyleConfig};
