//! Paragraph classification into role-tagged blocks.
//!
//! Text is cleaned, split on blank lines and each paragraph is assigned a
//! [`BlockRole`] from its shape alone. Configurable [`HouseRule`]s then
//! adjust the result for a particular presentation template.
//!
//! # Example
//!
//! ```
//! use docpdf::classify::classify;
//! use docpdf::model::{BlockRole, TextBlock};
//!
//! let blocks = classify("Report Title\n\nOverview\n\nThis is body text.");
//! assert_eq!(
//!     blocks,
//!     vec![
//!         TextBlock::title("Report Title"),
//!         TextBlock::heading("Overview"),
//!         TextBlock::body("This is body text."),
//!     ]
//! );
//! ```

mod cleanup;
mod rules;

pub use cleanup::{CleanupOptions, CleanupPipeline};
pub use rules::HouseRule;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::model::{BlockRole, TextBlock};

/// Longest paragraph, in characters, that may be an all-caps heading.
pub const MAX_UPPERCASE_HEADING_CHARS: usize = 72;

/// Longest paragraph, in characters, that may be a title-case heading.
pub const MAX_TITLE_CASE_HEADING_CHARS: usize = 68;

/// Classifier configuration: the ordered house-style rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Rules applied in order after generic classification
    pub rules: Vec<HouseRule>,
}

impl ClassifierConfig {
    /// Configuration without any house-style rules.
    pub fn generic() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: HouseRule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                HouseRule::Masthead {
                    tokens: vec!["alethra".to_string()],
                },
                HouseRule::CenterNotice {
                    keyword: "confidential".to_string(),
                    within: 4,
                },
            ],
        }
    }
}

/// Paragraph classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
    cleanup: CleanupPipeline,
}

impl Classifier {
    /// Create a classifier with the given rules and standard cleanup.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            cleanup: CleanupPipeline::default(),
        }
    }

    /// Replace the cleanup stage.
    pub fn with_cleanup(mut self, options: CleanupOptions) -> Self {
        self.cleanup = CleanupPipeline::new(options);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify `text` into blocks. Never returns an empty sequence.
    pub fn classify(&self, text: &str) -> Vec<TextBlock> {
        let cleaned = self.cleanup.process(text);

        let mut blocks: Vec<TextBlock> = split_paragraphs(&cleaned)
            .enumerate()
            .map(|(index, paragraph)| TextBlock::new(infer_role(paragraph, index), paragraph))
            .collect();

        if blocks.is_empty() {
            return vec![TextBlock::placeholder()];
        }

        for rule in &self.config.rules {
            rule.apply(&mut blocks);
        }
        blocks.retain(|b| !b.is_blank());

        if blocks.is_empty() {
            blocks.push(TextBlock::placeholder());
        }
        log::debug!("Classified {} blocks", blocks.len());
        blocks
    }
}

/// Classify with the default house rules.
pub fn classify(text: &str) -> Vec<TextBlock> {
    Classifier::default().classify(text)
}

fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid regex"));
    re.split(text).map(str::trim).filter(|p| !p.is_empty())
}

/// Role of a paragraph from its shape and position.
pub fn infer_role(paragraph: &str, index: usize) -> BlockRole {
    let trimmed = paragraph.trim();
    if trimmed.is_empty() {
        return BlockRole::Body;
    }
    if index == 0 {
        return BlockRole::Title;
    }
    if is_numbered_heading(trimmed) || is_uppercase_heading(trimmed) || is_title_case_heading(trimmed) {
        BlockRole::Heading
    } else {
        BlockRole::Body
    }
}

fn is_numbered_heading(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]\s+").expect("valid regex"))
        .is_match(text)
}

fn is_uppercase_heading(text: &str) -> bool {
    text == text.to_uppercase()
        && text.chars().any(|c| c.is_ascii_uppercase())
        && text.chars().count() <= MAX_UPPERCASE_HEADING_CHARS
}

fn is_title_case_heading(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9'’&:,()\-\s]+$").expect("valid regex"));
    re.is_match(text)
        && text.chars().count() <= MAX_TITLE_CASE_HEADING_CHARS
        && !text.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(blocks: &[TextBlock]) -> Vec<BlockRole> {
        blocks.iter().map(|b| b.role).collect()
    }

    #[test]
    fn test_title_heading_body() {
        let blocks = classify("Report Title\n\nOverview\n\nThis is body text.");
        assert_eq!(
            roles(&blocks),
            vec![BlockRole::Title, BlockRole::Heading, BlockRole::Body]
        );
    }

    #[test]
    fn test_blank_input_yields_placeholder() {
        for input in ["", "   ", "\n\n\u{00A0}\n"] {
            assert_eq!(classify(input), vec![TextBlock::body(" ")], "{input:?}");
        }
    }

    #[test]
    fn test_heading_shapes() {
        assert_eq!(infer_role("2) Scope of work", 3), BlockRole::Heading);
        assert_eq!(infer_role("EXECUTIVE SUMMARY", 1), BlockRole::Heading);
        assert_eq!(infer_role("Market Context: 2026", 1), BlockRole::Heading);
        assert_eq!(infer_role("This ends with a period.", 1), BlockRole::Body);
        assert_eq!(infer_role("lowercase start", 1), BlockRole::Body);
        assert_eq!(infer_role("1.5 million users", 1), BlockRole::Body);
    }

    #[test]
    fn test_heading_length_limits() {
        let long_upper = "A".repeat(MAX_UPPERCASE_HEADING_CHARS + 1);
        assert_eq!(infer_role(&long_upper, 1), BlockRole::Body);

        let title_case = format!("Word{}", " word".repeat(13));
        assert_eq!(title_case.len(), 69);
        assert_eq!(infer_role(&title_case, 1), BlockRole::Body);
        assert_eq!(infer_role(&title_case[..68], 1), BlockRole::Heading);
    }

    #[test]
    fn test_paragraph_text_is_kept_verbatim() {
        let blocks = classify("Report\n\nLegend: \u{25A0} done \u{25A1} open \u{FB01}le");
        assert_eq!(blocks[1].text, "Legend: \u{25A0} done \u{25A1} open \u{FB01}le");
    }

    #[test]
    fn test_whitespace_only_lines_separate_paragraphs() {
        let blocks = Classifier::new(ClassifierConfig::generic())
            .classify("Title\n \t\nfirst line\nsecond line");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text, "first line\nsecond line");
    }

    #[test]
    fn test_default_rules() {
        let text = "Alethra\n\nMarket Entry Plan\n\nConfidential draft, partners only.\n\nBody.";
        let blocks = classify(text);
        assert_eq!(blocks[0], TextBlock::title("Alethra\nMarket Entry Plan"));
        assert_eq!(blocks[1].role, BlockRole::CenteredBody);
        assert_eq!(blocks[2].role, BlockRole::Body);
    }

    #[test]
    fn test_generic_config_skips_rules() {
        let text = "Alethra\n\nMarket Entry Plan\n\nconfidential draft";
        let blocks = Classifier::new(ClassifierConfig::generic()).classify(text);
        assert_eq!(
            roles(&blocks),
            vec![BlockRole::Title, BlockRole::Heading, BlockRole::Body]
        );
    }

    #[test]
    fn test_config_json() {
        let config: ClassifierConfig = serde_json::from_str(r#"{"rules":[]}"#).unwrap();
        assert_eq!(config, ClassifierConfig::generic());
        let config: ClassifierConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }
}
