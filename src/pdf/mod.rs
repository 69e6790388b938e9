//! PDF synthesis from text blocks.
//!
//! Blocks are styled and laid out by [`layout`], each page gets the fixed
//! decorations (rail, logo, first-page notice, footer with page numbers)
//! and the result is written as a complete PDF file with base-14 fonts.
//!
//! Synthesis is total: every block sequence produces a valid document.
//!
//! # Example
//!
//! ```
//! use docpdf::model::{StyleConfig, TextBlock};
//! use docpdf::pdf::{build, LayoutConfig, PageAssets};
//!
//! let blocks = vec![TextBlock::title("Hello"), TextBlock::body("World.")];
//! let pdf = build(&blocks, &StyleConfig::default(), &LayoutConfig::default(), &PageAssets::default());
//! assert!(pdf.starts_with(b"%PDF-1.4"));
//! ```

pub mod content;
pub mod layout;
mod logo;
pub mod metrics;
pub mod writer;

pub use logo::LogoImage;
pub use layout::{paginate, LayoutConfig, PageLayout, RgbColor};
pub use metrics::BaseFont;

use chrono::{DateTime, Utc};

use crate::model::{BlockRole, StyleConfig, TextBlock};
use content::{literal_string, ContentStream};
use layout::{resolve_style, scaled_size};
use writer::{stream_object, ObjectId, ObjectTable};

/// Footer lines used by the house template.
pub const HOUSE_FOOTER_LINES: [&str; 2] = [
    "© 2026 ALETHRA™. All rights reserved.",
    "Confidential – Not for distribution without written authorization.",
];

/// First-page notice used by the house template.
pub const HOUSE_NOTICE: &str = "Confidential, Restricted Distribution\nVersion 1.0 – March 2026";

/// Ascent of the base fonts as a fraction of the font size.
const ASCENT: f64 = 0.718;

const LOGO_RESOURCE: &str = "Im1";

/// Optional `/Info` dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    /// Info naming this library as producer, dated now.
    pub fn now(title: Option<String>) -> Self {
        Self {
            title,
            producer: Some(format!("docpdf {}", crate::VERSION)),
            creation_date: Some(Utc::now()),
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none() && self.producer.is_none() && self.creation_date.is_none()
    }

    fn to_dictionary(&self) -> String {
        let mut dict = String::from("<<");
        if let Some(title) = &self.title {
            dict.push_str(&format!(" /Title {}", literal_string(title)));
        }
        if let Some(producer) = &self.producer {
            dict.push_str(&format!(" /Producer {}", literal_string(producer)));
        }
        if let Some(date) = &self.creation_date {
            dict.push_str(&format!(
                " /CreationDate {}",
                literal_string(&date.format("D:%Y%m%d%H%M%SZ").to_string())
            ));
        }
        dict.push_str(" >>");
        dict
    }
}

/// Decorations and metadata drawn independently of the content flow.
#[derive(Debug, Clone, Default)]
pub struct PageAssets {
    /// Logo drawn on every page
    pub logo: Option<LogoImage>,
    /// Footer lines, one below the other
    pub footer_lines: Vec<String>,
    /// Right-aligned notice on the first page; lines split on `\n`
    pub notice: Option<String>,
    /// Document information dictionary
    pub info: DocumentInfo,
}

impl PageAssets {
    /// The house template's footer and notice, without a logo.
    pub fn house() -> Self {
        Self {
            footer_lines: HOUSE_FOOTER_LINES.iter().map(|s| s.to_string()).collect(),
            notice: Some(HOUSE_NOTICE.to_string()),
            ..Self::default()
        }
    }

    pub fn with_logo(mut self, logo: Option<LogoImage>) -> Self {
        self.logo = logo;
        self
    }

    pub fn with_footer_lines(mut self, lines: Vec<String>) -> Self {
        self.footer_lines = lines;
        self
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }
}

/// Convert a top-down position to PDF user space.
fn flip(layout: &LayoutConfig, y: f64) -> f64 {
    layout.page_height - y
}

fn page_content(
    page: &PageLayout,
    index: usize,
    total: usize,
    style: &StyleConfig,
    layout: &LayoutConfig,
    assets: &PageAssets,
) -> Vec<u8> {
    let mut stream = ContentStream::new();

    stream
        .fill_color(layout.rail_color)
        .fill_rect(0.0, 0.0, layout.rail_width, layout.page_height);

    if let Some(logo) = &assets.logo {
        let height = logo.height_for_width(layout.logo_width);
        stream.image(
            LOGO_RESOURCE,
            layout.logo_x,
            flip(layout, layout.logo_y + height),
            layout.logo_width,
            height,
        );
    }

    if index == 0 {
        if let Some(notice) = &assets.notice {
            let body = resolve_style(BlockRole::Body, None, None, style, layout);
            let font = BaseFont::Regular;
            let right = layout.page_width - layout.notice_right_margin;
            let mut baseline = layout.notice_top + body.font_size * ASCENT;
            stream.fill_color(layout.notice_color);
            for line in notice.trim().lines().map(str::trim) {
                if !line.is_empty() {
                    let x = right - font.text_width(line, body.font_size);
                    stream.text(font, body.font_size, x, flip(layout, baseline), line);
                }
                baseline += body.line_height;
            }
        }
    }

    stream.fill_color(RgbColor::BLACK);
    for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
        stream.text(line.font, line.font_size, line.x, flip(layout, line.baseline), &line.text);
    }

    let footer_size = scaled_size(layout.footer_font_size, style, layout);
    let footer_y = layout.footer_y();
    for (i, line) in assets.footer_lines.iter().enumerate() {
        let y = footer_y + layout.footer_line_gap * i as f64;
        stream.text(BaseFont::Regular, footer_size, layout.footer_x, flip(layout, y), line);
    }
    let page_number = format!("Page {} of {}", index + 1, total);
    let x = layout.page_width
        - layout.footer_right_margin
        - BaseFont::Regular.text_width(&page_number, footer_size);
    stream.text(
        BaseFont::Regular,
        footer_size,
        x,
        flip(layout, footer_y + layout.footer_line_gap),
        &page_number,
    );

    stream.into_bytes()
}

/// Synthesize a PDF document.
///
/// An empty or all-blank block sequence yields a single page.
pub fn build(
    blocks: &[TextBlock],
    style: &StyleConfig,
    layout: &LayoutConfig,
    assets: &PageAssets,
) -> Vec<u8> {
    let pages = paginate(blocks, style, layout);
    let mut table = ObjectTable::new();

    let font_object = |font: BaseFont| {
        format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            layout.font_name(font)
        )
    };
    let regular = table.add(font_object(BaseFont::Regular));
    let bold = table.add(font_object(BaseFont::Bold));

    let logo = assets.logo.as_ref().map(|logo| {
        let smask = logo.smask_object().map(|body| table.add(body));
        let reference = smask.map(|id| id.to_string());
        table.add(logo.image_object(reference.as_deref()))
    });

    let mut resources = format!(
        "<< /Font << /{} {} /{} {} >>",
        BaseFont::Regular.resource_name(),
        regular,
        BaseFont::Bold.resource_name(),
        bold
    );
    if let Some(id) = logo {
        resources.push_str(&format!(" /XObject << /{} {} >>", LOGO_RESOURCE, id));
    }
    resources.push_str(" >>");

    let pages_id = table.reserve();
    let media_box = format!(
        "[0 0 {} {}]",
        content::fmt_num(layout.page_width),
        content::fmt_num(layout.page_height)
    );

    let mut kids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let data = page_content(page, index, pages.len(), style, layout, assets);
        let contents = table.add(stream_object("", &data));
        let page_id = table.add(format!(
            "<< /Type /Page /Parent {} /MediaBox {} /Resources {} /Contents {} >>",
            pages_id, media_box, resources, contents
        ));
        kids.push(page_id);
    }

    let kid_refs: Vec<String> = kids.iter().map(ObjectId::to_string).collect();
    table.set(
        pages_id,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kid_refs.join(" "),
            kids.len()
        ),
    );

    let catalog = table.add(format!("<< /Type /Catalog /Pages {} >>", pages_id));
    let info = if assets.info.is_empty() {
        None
    } else {
        Some(table.add(assets.info.to_dictionary()))
    };

    log::debug!("Writing {} pages as {} objects", kids.len(), table.len());
    table.serialize(catalog, info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(blocks: &[TextBlock], assets: &PageAssets) -> String {
        let pdf = build(blocks, &StyleConfig::default(), &LayoutConfig::default(), assets);
        String::from_utf8_lossy(&pdf).into_owned()
    }

    #[test]
    fn test_single_page_structure() {
        let text = render(&[TextBlock::title("Hello")], &PageAssets::default());
        assert_eq!(text.matches("/Type /Page ").count(), 1);
        assert!(text.contains("/Type /Pages /Kids [5 0 R] /Count 1"));
        assert!(text.contains("/BaseFont /Helvetica /Encoding /WinAnsiEncoding"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("(Hello) Tj"));
        assert!(text.contains("(Page 1 of 1) Tj"));
        assert!(text.contains("0 0 22 792 re f"));
        assert!(!text.contains("/Info"));
    }

    #[test]
    fn test_footer_and_notice() {
        let text = render(&[TextBlock::body("x")], &PageAssets::house());
        assert!(text.contains("All rights reserved."));
        assert!(text.contains("(Confidential, Restricted Distribution) Tj"));
        assert!(text.contains("0.25 0.27 0.31 rg"));
    }

    #[test]
    fn test_notice_only_on_first_page() {
        let blocks: Vec<_> = (0..80).map(|i| TextBlock::body(format!("Row {i}."))).collect();
        let text = render(&blocks, &PageAssets::house());
        assert!(text.matches("/Type /Page ").count() > 1);
        assert_eq!(text.matches("Restricted Distribution").count(), 1);
        assert!(text.contains("(Page 4 of 4) Tj"));
    }

    #[test]
    fn test_info_dictionary() {
        let info = DocumentInfo {
            title: Some("Plan (draft)".to_string()),
            producer: Some("docpdf".to_string()),
            creation_date: DateTime::parse_from_rfc3339("2026-03-01T10:20:30Z")
                .ok()
                .map(|d| d.with_timezone(&Utc)),
        };
        let text = render(&[TextBlock::body("x")], &PageAssets::default().with_info(info));
        assert!(text.contains("/Title (Plan \\(draft\\))"));
        assert!(text.contains("/CreationDate (D:20260301102030Z)"));
        assert!(text.contains("/Info "));
    }

    #[test]
    fn test_output_is_deterministic() {
        let blocks = [TextBlock::title("Same"), TextBlock::body("Input.")];
        assert_eq!(
            render(&blocks, &PageAssets::house()),
            render(&blocks, &PageAssets::house())
        );
    }
}
