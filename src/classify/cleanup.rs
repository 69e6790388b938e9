//! Text cleanup applied before paragraph classification.
//!
//! Only whitespace is touched. Glyphs, bullets and letter forms reach the
//! blocks exactly as extracted.

use regex::Regex;

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Replace no-break spaces with plain spaces
    pub replace_nbsp: bool,

    /// Convert CRLF and lone CR line endings to LF
    pub normalize_line_endings: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl CleanupOptions {
    /// Only what paragraph splitting needs: no-break spaces and blank-line runs.
    pub fn minimal() -> Self {
        Self {
            replace_nbsp: true,
            normalize_line_endings: false,
            max_consecutive_newlines: 2,
        }
    }

    /// Standard cleanup options: minimal plus line ending normalization.
    pub fn standard() -> Self {
        Self {
            normalize_line_endings: true,
            ..Self::minimal()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    options: CleanupOptions,
    newline_run: Option<Regex>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        let newline_run = match options.max_consecutive_newlines {
            0 => None,
            max => Regex::new(&format!(r"\n{{{},}}", max as usize + 1)).ok(),
        };
        Self {
            options,
            newline_run,
        }
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.options.normalize_line_endings {
            result = result.replace("\r\n", "\n").replace('\r', "\n");
        }

        if self.options.replace_nbsp {
            result = result.replace('\u{00A0}', " ");
        }

        if let Some(re) = &self.newline_run {
            let replacement = "\n".repeat(self.options.max_consecutive_newlines as usize);
            result = re.replace_all(&result, replacement.as_str()).into_owned();
        }

        result.trim().to_string()
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}
