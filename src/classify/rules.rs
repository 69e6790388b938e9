//! House-style overrides applied after generic role assignment.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::model::{BlockRole, TextBlock};

/// A presentation override evaluated over the classified block sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum HouseRule {
    /// A first block that is exactly one of `tokens` (ignoring case) is
    /// merged with the second block into a single two-line title.
    Masthead { tokens: Vec<String> },

    /// Body blocks among the first `within` blocks that contain `keyword`
    /// as a whole word (ignoring case) become centered body text.
    CenterNotice { keyword: String, within: usize },
}

impl HouseRule {
    /// Rewrite `blocks` in place.
    pub fn apply(&self, blocks: &mut Vec<TextBlock>) {
        match self {
            HouseRule::Masthead { tokens } => apply_masthead(tokens, blocks),
            HouseRule::CenterNotice { keyword, within } => {
                apply_center_notice(keyword, *within, blocks)
            }
        }
    }
}

fn apply_masthead(tokens: &[String], blocks: &mut Vec<TextBlock>) {
    if blocks.len() < 2 {
        return;
    }
    let first = blocks[0].text.trim().to_lowercase();
    if !tokens.iter().any(|t| t.to_lowercase() == first) {
        return;
    }

    let second = blocks.remove(1);
    let merged = format!("{}\n{}", blocks[0].text.trim(), second.text.trim());
    log::debug!("Masthead rule merged the first two blocks");
    blocks[0] = TextBlock::title(merged);
}

fn apply_center_notice(keyword: &str, within: usize, blocks: &mut [TextBlock]) {
    let pattern = format!(r"\b{}\b", regex::escape(keyword));
    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            log::warn!("Ignoring center-notice rule for {:?}: {}", keyword, e);
            return;
        }
    };

    for block in blocks.iter_mut().take(within) {
        if block.role == BlockRole::Body && re.is_match(&block.text) {
            block.role = BlockRole::CenteredBody;
        }
    }
}
