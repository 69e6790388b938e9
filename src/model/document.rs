//! Block exchange document and its JSON form.

use serde::{Deserialize, Serialize};

use super::TextBlock;
use crate::error::Result;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// An ordered, never-empty sequence of text blocks.
///
/// Serialized as `{"blocks": [{"role": "...", "text": "..."}, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedDocument {
    /// Blocks in reading order
    pub blocks: Vec<TextBlock>,
}

impl CodedDocument {
    /// Wrap a block sequence, substituting the placeholder when empty.
    pub fn new(blocks: Vec<TextBlock>) -> Self {
        if blocks.is_empty() {
            return Self {
                blocks: vec![TextBlock::placeholder()],
            };
        }
        Self { blocks }
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false once constructed through [`CodedDocument::new`].
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain text of all blocks, separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Serialize to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)?,
            JsonFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }

    /// Parse from JSON.
    ///
    /// Accepts either the wrapped form or a bare array of blocks. An empty
    /// block list is replaced by the placeholder.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Wrapped { blocks: Vec<TextBlock> },
            Bare(Vec<TextBlock>),
        }

        let blocks = match serde_json::from_str::<Wire>(json)? {
            Wire::Wrapped { blocks } => blocks,
            Wire::Bare(blocks) => blocks,
        };
        Ok(Self::new(blocks))
    }
}

impl From<Vec<TextBlock>> for CodedDocument {
    fn from(blocks: Vec<TextBlock>) -> Self {
        Self::new(blocks)
    }
}
