//! Block styling, line wrapping and pagination.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::metrics::BaseFont;
use crate::model::{BlockRole, StyleConfig, TextBlock};

/// An RGB color with 8-bit channels, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Black.
    pub const BLACK: RgbColor = RgbColor(0, 0, 0);
}

/// Page geometry and decoration placement, in points.
///
/// Vertical positions are measured from the top edge of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Page width
    pub page_width: f64,
    /// Page height
    pub page_height: f64,

    /// Width of the colored rail along the left edge
    pub rail_width: f64,
    /// Rail color
    pub rail_color: RgbColor,

    /// Left edge of the text column
    pub text_left: f64,
    /// Distance from the right page edge to the text column
    pub text_right_margin: f64,
    /// Fraction of the column width available to centered blocks
    pub centered_width_factor: f64,

    /// First content position
    pub content_top: f64,
    /// Distance from the bottom page edge to the last content position
    pub content_bottom_margin: f64,

    /// Smallest font size any scaled role may use
    pub min_font_size: f64,
    /// Line height multiple for titles
    pub title_line_height: f64,
    /// Line height multiple for headings
    pub heading_line_height: f64,
    /// Line height multiple for centered body text
    pub centered_line_height: f64,
    /// Line height multiple for body text
    pub body_line_height: f64,

    /// Logo anchor, left
    pub logo_x: f64,
    /// Logo anchor, top
    pub logo_y: f64,
    /// Logo width; height follows the aspect ratio
    pub logo_width: f64,

    /// Distance from the bottom page edge to the first footer baseline
    pub footer_offset: f64,
    /// Distance between the two footer baselines
    pub footer_line_gap: f64,
    /// Footer text left edge
    pub footer_x: f64,
    /// Distance from the right page edge to the page number's right edge
    pub footer_right_margin: f64,
    /// Footer size before scaling
    pub footer_font_size: f64,

    /// Distance from the right page edge to the notice's right edge
    pub notice_right_margin: f64,
    /// Top of the first-page notice
    pub notice_top: f64,
    /// Notice color
    pub notice_color: RgbColor,

    /// Base font for regular text
    pub regular_font: String,
    /// Base font for bold text
    pub bold_font: String,
}

impl LayoutConfig {
    /// Right edge of the text column.
    pub fn text_right(&self) -> f64 {
        self.page_width - self.text_right_margin
    }

    /// Width of the text column.
    pub fn text_width(&self) -> f64 {
        self.text_right() - self.text_left
    }

    /// Last position a baseline may occupy.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.content_bottom_margin
    }

    /// First footer baseline.
    pub fn footer_y(&self) -> f64 {
        self.page_height - self.footer_offset
    }

    /// Line height multiple for a role.
    pub fn line_height_factor(&self, role: BlockRole) -> f64 {
        match role {
            BlockRole::Title => self.title_line_height,
            BlockRole::Heading => self.heading_line_height,
            BlockRole::CenteredBody => self.centered_line_height,
            BlockRole::Body => self.body_line_height,
        }
    }

    /// PostScript name of a base font.
    pub fn font_name(&self, font: BaseFont) -> &str {
        match font {
            BaseFont::Regular => &self.regular_font,
            BaseFont::Bold => &self.bold_font,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            rail_width: 22.0,
            rail_color: RgbColor(211, 31, 45),
            text_left: 64.0,
            text_right_margin: 40.0,
            centered_width_factor: 0.9,
            content_top: 112.0,
            content_bottom_margin: 74.0,
            min_font_size: 8.0,
            title_line_height: 1.3,
            heading_line_height: 1.42,
            centered_line_height: 1.35,
            body_line_height: 1.58,
            logo_x: 54.0,
            logo_y: 40.0,
            logo_width: 135.0,
            footer_offset: 42.0,
            footer_line_gap: 17.0,
            footer_x: 72.0,
            footer_right_margin: 72.0,
            footer_font_size: 10.0,
            notice_right_margin: 72.0,
            notice_top: 56.0,
            notice_color: RgbColor(65, 69, 78),
            regular_font: "Helvetica".to_string(),
            bold_font: "Helvetica-Bold".to_string(),
        }
    }
}

const CENTERED_AFTER_TITLE_BOOST: f64 = 2.0;
const HEADING_SPACING_FACTOR: f64 = 0.55;
const MIN_HEADING_SPACING: f64 = 8.0;
const TITLE_SPACING_AFTER: f64 = 14.0;
const MASTHEAD_SPACING_AFTER: f64 = -6.0;
const CENTERED_SPACING_AFTER: f64 = 8.0;
const BODY_SPACING_AFTER: f64 = 10.0;
const MIN_HANGING_WIDTH: f64 = 24.0;

/// Horizontal alignment of a block's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Typography resolved for one block in its context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLineStyle {
    pub font: BaseFont,
    pub font_size: f64,
    pub line_height: f64,
    pub align: Align,
    pub spacing_before: f64,
    pub spacing_after: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Font size of a role after scaling, clamped to the layout minimum.
pub fn scaled_size(base: f64, style: &StyleConfig, layout: &LayoutConfig) -> f64 {
    layout
        .min_font_size
        .max(round2(base * f64::from(style.scale())))
}

/// Resolve the style of a block given its neighbours' roles.
pub fn resolve_style(
    role: BlockRole,
    previous: Option<BlockRole>,
    next: Option<BlockRole>,
    style: &StyleConfig,
    layout: &LayoutConfig,
) -> ResolvedLineStyle {
    let mut base = f64::from(style.base_size(role));
    if role == BlockRole::CenteredBody && previous == Some(BlockRole::Title) {
        base += CENTERED_AFTER_TITLE_BOOST;
    }
    let font_size = scaled_size(base, style, layout);
    let heading_spacing = MIN_HEADING_SPACING.max(round2(font_size * HEADING_SPACING_FACTOR));

    let spacing_after = match role {
        BlockRole::Heading => heading_spacing,
        BlockRole::Title if next == Some(BlockRole::CenteredBody) => MASTHEAD_SPACING_AFTER,
        BlockRole::Title => TITLE_SPACING_AFTER,
        BlockRole::CenteredBody => CENTERED_SPACING_AFTER,
        BlockRole::Body => BODY_SPACING_AFTER,
    };

    ResolvedLineStyle {
        font: BaseFont::for_weight(style.weight(role)),
        font_size,
        line_height: font_size * layout.line_height_factor(role),
        align: if role.is_centered() {
            Align::Center
        } else {
            Align::Left
        },
        spacing_before: if role == BlockRole::Heading {
            heading_spacing
        } else {
            0.0
        },
        spacing_after,
    }
}

/// A wrapped line and its offset from the block's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub indent: f64,
}

impl WrappedLine {
    fn flush(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            indent: 0.0,
        }
    }
}

/// Split a logical line at inline bullets and repeated enumeration markers.
///
/// `"1. First item 2. Second item"` becomes two lines, each keeping its marker.
pub fn split_inline_list_items(line: &str) -> Vec<String> {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    let bullet = BULLET.get_or_init(|| Regex::new(r"\s*•\s*").expect("valid regex"));
    let numbered =
        NUMBERED.get_or_init(|| Regex::new(r"(?:^|\s)(\d+[.)])\s+").expect("valid regex"));

    let normalized = line.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return vec![String::new()];
    }

    let with_breaks = bullet.replace_all(&normalized, "\n• ");
    let mut expanded = Vec::new();
    for segment in with_breaks.split('\n').map(str::trim).filter(|s| !s.is_empty()) {
        let markers: Vec<_> = numbered.captures_iter(segment).collect();
        if markers.len() <= 1 {
            expanded.push(segment.to_string());
            continue;
        }
        let lead_end = markers[0].get(0).map_or(0, |m| m.start());
        let lead = segment[..lead_end].trim();
        if !lead.is_empty() {
            expanded.push(lead.to_string());
        }
        for (i, caps) in markers.iter().enumerate() {
            let (Some(whole), Some(marker)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(segment.len(), |m| m.start());
            let content = segment[whole.end()..end].trim();
            if !content.is_empty() {
                expanded.push(format!("{} {}", marker.as_str(), content));
            }
        }
    }

    if expanded.is_empty() {
        vec![normalized]
    } else {
        expanded
    }
}

/// Greedy word wrap. Words wider than `max_width` are broken by character.
pub fn wrap_words(text: &str, font: BaseFont, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if font.text_width(word, size) <= max_width {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            if font.text_width(&current, size) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Wrap one logical line, hanging list content under its marker.
pub fn wrap_list_line(line: &str, font: BaseFont, size: f64, max_width: f64) -> Vec<WrappedLine> {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let marker_re =
        MARKER.get_or_init(|| Regex::new(r"^([•\-*]|\d+[.)])\s+(.*)$").expect("valid regex"));

    let Some(caps) = marker_re.captures(line) else {
        return wrap_words(line, font, size, max_width)
            .into_iter()
            .map(WrappedLine::flush)
            .collect();
    };

    let marker = format!("{} ", &caps[1]);
    let indent = font.text_width(&marker, size);
    let available = MIN_HANGING_WIDTH.max(max_width - indent);
    let content = wrap_words(&caps[2], font, size, available);

    content
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            if i == 0 {
                WrappedLine::flush(format!("{}{}", marker, part).trim_end().to_string())
            } else {
                WrappedLine { text: part, indent }
            }
        })
        .collect()
}

/// Wrap a whole block's text to `max_width`.
///
/// Explicit newlines are kept; blank source lines become empty lines.
pub fn wrap_block(text: &str, font: BaseFont, size: f64, max_width: f64) -> Vec<WrappedLine> {
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            out.push(WrappedLine::flush(""));
            continue;
        }
        for logical in split_inline_list_items(trimmed) {
            out.extend(wrap_list_line(&logical, font, size, max_width));
        }
    }
    out
}

/// A line with its final position; `baseline` is measured from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font: BaseFont,
    pub font_size: f64,
    pub x: f64,
    pub baseline: f64,
}

/// Lines placed on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

impl PageLayout {
    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

struct PreparedBlock {
    style: ResolvedLineStyle,
    lines: Vec<WrappedLine>,
}

impl PreparedBlock {
    fn height(&self) -> f64 {
        self.style.spacing_before
            + self.lines.len() as f64 * self.style.line_height
            + self.style.spacing_after
    }
}

fn prepare_blocks(
    blocks: &[TextBlock],
    style: &StyleConfig,
    layout: &LayoutConfig,
) -> Vec<PreparedBlock> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(i, block)| {
            let text = block.text.trim();
            if text.is_empty() {
                return None;
            }
            let previous = i.checked_sub(1).map(|p| blocks[p].role);
            let next = blocks.get(i + 1).map(|b| b.role);
            let resolved = resolve_style(block.role, previous, next, style, layout);
            let width = match resolved.align {
                Align::Center => layout.text_width() * layout.centered_width_factor,
                Align::Left => layout.text_width(),
            };
            Some(PreparedBlock {
                lines: wrap_block(text, resolved.font, resolved.font_size, width),
                style: resolved,
            })
        })
        .collect()
}

fn place_line(line: &WrappedLine, style: &ResolvedLineStyle, baseline: f64, layout: &LayoutConfig) -> PlacedLine {
    let x = match style.align {
        Align::Left => layout.text_left + line.indent,
        Align::Center => {
            layout.page_width / 2.0 - style.font.text_width(&line.text, style.font_size) / 2.0
        }
    };
    PlacedLine {
        text: line.text.clone(),
        font: style.font,
        font_size: style.font_size,
        x,
        baseline,
    }
}

/// Lay blocks out across pages. Always returns at least one page.
///
/// A block that does not fit below the current content moves to a new
/// page; a block taller than a whole page continues line by line onto
/// the following pages.
pub fn paginate(blocks: &[TextBlock], style: &StyleConfig, layout: &LayoutConfig) -> Vec<PageLayout> {
    let top = layout.content_top;
    let bottom = layout.content_bottom();

    let mut pages = Vec::new();
    let mut page = PageLayout::default();
    let mut y = top;

    for block in prepare_blocks(blocks, style, layout) {
        if y + block.height() > bottom && !page.is_empty() {
            pages.push(std::mem::take(&mut page));
            y = top;
        }

        let mut baseline = y + block.style.spacing_before;
        for line in &block.lines {
            if baseline > bottom && !page.is_empty() {
                pages.push(std::mem::take(&mut page));
                baseline = top;
            }
            page.lines.push(place_line(line, &block.style, baseline, layout));
            baseline += block.style.line_height;
        }
        y = baseline + block.style.spacing_after;
    }

    if pages.is_empty() && page.is_empty() {
        let body = resolve_style(BlockRole::Body, None, None, style, layout);
        let placeholder = WrappedLine::flush(" ");
        let left = ResolvedLineStyle {
            align: Align::Left,
            ..body
        };
        page.lines.push(place_line(&placeholder, &left, top, layout));
    }
    if !page.is_empty() {
        pages.push(page);
    }

    log::debug!("Laid out {} blocks on {} pages", blocks.len(), pages.len());
    pages
}
