//! Typed text blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation role of a text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockRole {
    /// Document title, centered
    Title,
    /// Section heading
    Heading,
    /// Running text
    #[default]
    Body,
    /// Body text centered under the title (notices, version lines)
    CenteredBody,
}

impl BlockRole {
    /// Whether blocks of this role are horizontally centered.
    pub fn is_centered(&self) -> bool {
        matches!(self, BlockRole::Title | BlockRole::CenteredBody)
    }
}

impl fmt::Display for BlockRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockRole::Title => "title",
            BlockRole::Heading => "heading",
            BlockRole::Body => "body",
            BlockRole::CenteredBody => "centeredBody",
        };
        f.write_str(name)
    }
}

/// A role-tagged unit of document text, in reading order.
///
/// The text may contain embedded newlines and a leading bullet marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Presentation role
    pub role: BlockRole,

    /// Raw block text
    pub text: String,
}

impl TextBlock {
    /// Create a block with the given role.
    pub fn new(role: BlockRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Create a title block.
    pub fn title(text: impl Into<String>) -> Self {
        Self::new(BlockRole::Title, text)
    }

    /// Create a heading block.
    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(BlockRole::Heading, text)
    }

    /// Create a body block.
    pub fn body(text: impl Into<String>) -> Self {
        Self::new(BlockRole::Body, text)
    }

    /// The stand-in block used when a document has no content.
    pub fn placeholder() -> Self {
        Self::body(" ")
    }

    /// Check if the block carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
