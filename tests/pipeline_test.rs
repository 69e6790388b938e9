//! End-to-end conversion tests across input formats.

mod common;

use std::sync::Arc;

use docpdf::pipeline::{ConvertOptions, Converter, TextRewriter, UploadedFile};
use docpdf::{
    BlockRole, ClassifierConfig, CodedDocument, Error, ExtractorRegistry, JsonFormat, PageAssets,
    TextBlock, TextExtractor,
};

fn roles(doc: &CodedDocument) -> Vec<BlockRole> {
    doc.blocks.iter().map(|b| b.role).collect()
}

fn pdf_text(pdf: &[u8]) -> String {
    String::from_utf8_lossy(pdf).into_owned()
}

#[test]
fn test_docx_end_to_end() {
    let data = common::docx(&[
        "Annual Review",
        "Highlights",
        "Revenue grew across every region.",
        "*First item",
        "*Second item",
    ]);
    let converter = Converter::default();

    let doc = converter.preview("Annual Review.docx", &data).unwrap();
    assert_eq!(
        roles(&doc),
        vec![
            BlockRole::Title,
            BlockRole::Heading,
            BlockRole::Body,
            BlockRole::Body,
            BlockRole::Body
        ]
    );
    assert_eq!(doc.blocks[3].text, "• First item");

    let result = converter.convert("Annual Review.docx", &data).unwrap();
    assert_eq!(result.file_name, "Annual-Review.pdf");
    let text = pdf_text(&result.pdf);
    assert!(text.contains("(Annual Review) Tj"));
    assert!(text.contains("(\\225 First item) Tj"));
    assert!(text.ends_with("%%EOF\n"));
}

#[test]
fn test_masthead_and_notice_rules() {
    let data = common::docx(&[
        "ALETHRA",
        "Strategy Brief",
        "Confidential, prepared for the board.",
        "Body text follows here.",
    ]);
    let doc = Converter::default().preview("brief.docx", &data).unwrap();
    assert_eq!(doc.blocks[0], TextBlock::title("ALETHRA\nStrategy Brief"));
    assert_eq!(doc.blocks[1].role, BlockRole::CenteredBody);
    assert_eq!(doc.blocks[2].role, BlockRole::Body);

    let generic = Converter::new(ConvertOptions::new().with_classifier(ClassifierConfig::generic()));
    let doc = generic.preview("brief.docx", &data).unwrap();
    assert_eq!(doc.len(), 4);
    assert_eq!(doc.blocks[2].role, BlockRole::Body);
}

#[test]
fn test_rtf_and_html_inputs() {
    let rtf = br"{\rtf1\ansi{\fonttbl{\f0 Arial;}}\f0 Memo\par\par Summary\par\par Details go here.}";
    let doc = Converter::default().preview("memo.rtf", rtf).unwrap();
    assert_eq!(doc.plain_text(), "Memo\n\nSummary\n\nDetails go here.");
    assert_eq!(doc.blocks[1].role, BlockRole::Heading);

    let html = b"<html><head><style>p{}</style></head><body><h1>Notes &amp; Plans</h1><ul><li>One</li><li>Two</li></ul></body></html>";
    let doc = Converter::default().preview("notes.htm", html).unwrap();
    assert_eq!(doc.blocks[0], TextBlock::title("Notes & Plans"));
    assert!(doc.blocks[1].text.contains("• One"));
}

#[test]
fn test_preview_json_exchange() {
    let doc = Converter::default()
        .preview("a.txt", b"Title\n\nSome body text.")
        .unwrap();
    let json = doc.to_json(JsonFormat::Compact).unwrap();
    assert_eq!(
        json,
        r#"{"blocks":[{"role":"title","text":"Title"},{"role":"body","text":"Some body text."}]}"#
    );

    let back = CodedDocument::from_json(&json).unwrap();
    let converter = Converter::default();
    assert_eq!(converter.render(&back), converter.render(&doc));
}

#[test]
fn test_errors_are_classified() {
    let converter = Converter::default();

    let err = converter.convert("deck.pptx", b"whatever").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "pptx"));
    assert!(err.is_user_error());

    let err = converter.convert("README", b"text").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "readme"));

    let err = converter.convert("broken.docx", b"PK\x03\x04 truncated").unwrap_err();
    assert!(matches!(err, Error::Archive(_)));

    let err = converter.convert("fake.pdf", b"<html>").unwrap_err();
    assert!(matches!(err, Error::NotPdf));
}

#[test]
fn test_batch_preserves_order_and_isolates_failures() {
    let files: Vec<UploadedFile> = (0..8)
        .map(|i| {
            if i == 5 {
                UploadedFile::from_bytes("bad.docx", b"nope")
            } else {
                UploadedFile::from_bytes(format!("file {i}.txt"), format!("Doc {i}\n\nBody.").as_bytes())
            }
        })
        .collect();

    let results = Converter::default().convert_batch(&files);
    assert_eq!(results.len(), 8);
    for (i, result) in results.iter().enumerate() {
        if i == 5 {
            assert!(result.is_err());
        } else {
            let converted = result.as_ref().unwrap();
            assert_eq!(converted.file_name, format!("file-{i}.pdf"));
            assert!(pdf_text(&converted.pdf).contains(&format!("(Doc {i}) Tj")));
        }
    }
}

#[test]
fn test_pdf_passthrough_upload() {
    let original = b"%PDF-1.6\n1 0 obj\n<< >>\nendobj\n%%EOF\n".to_vec();
    let upload = UploadedFile::from_bytes("Signed Contract.pdf", &original);
    let result = Converter::default().convert_upload(&upload).unwrap();
    assert_eq!(result.pdf, original);
    assert_eq!(result.file_name, "Signed-Contract.pdf");
    assert!(result.document.is_none());
}

struct Summarizer;

impl TextRewriter for Summarizer {
    fn rewrite(&self, text: &str, source_name: &str) -> docpdf::Result<String> {
        Ok(format!("Rewritten {}\n\n{}", source_name, text))
    }
}

#[test]
fn test_rewriter_runs_before_classification() {
    let converter = Converter::default().with_rewriter(Arc::new(Summarizer));
    let doc = converter.preview("in.txt", b"original body text.").unwrap();
    assert_eq!(doc.blocks[0], TextBlock::title("Rewritten in.txt"));
    assert_eq!(doc.blocks[1], TextBlock::body("original body text."));
}

struct Shouting;

impl TextExtractor for Shouting {
    fn supported_extensions(&self) -> &[&str] {
        &["md"]
    }

    fn name(&self) -> &str {
        "shouting"
    }

    fn extract(&self, bytes: &[u8]) -> docpdf::Result<String> {
        Ok(String::from_utf8_lossy(bytes).to_uppercase())
    }
}

#[test]
fn test_custom_extractor_registration() {
    let mut registry = ExtractorRegistry::with_defaults();
    registry.register(Arc::new(Shouting));
    let converter = Converter::default().with_registry(registry);
    let doc = converter.preview("readme.md", b"hello\n\nworld").unwrap();
    assert_eq!(doc.plain_text(), "HELLO\n\nWORLD");
}

#[test]
fn test_house_assets_on_every_page() {
    let text: String = (0..60)
        .map(|i| format!("Paragraph {i} with enough words to fill the line."))
        .collect::<Vec<_>>()
        .join("\n\n");
    let converter = Converter::new(ConvertOptions::new().with_assets(PageAssets::house()));
    let result = converter.convert("long.txt", text.as_bytes()).unwrap();
    let pdf = pdf_text(&result.pdf);

    let pages = pdf.matches("/Type /Page ").count();
    assert!(pages >= 2);
    assert_eq!(pdf.matches("All rights reserved.").count(), pages);
    assert_eq!(pdf.matches("Restricted Distribution").count(), 1);
    assert!(pdf.contains(&format!("(Page {pages} of {pages}) Tj")));
}

#[test]
fn test_extraction_is_deterministic() {
    let registry = ExtractorRegistry::with_defaults();
    let html = b"<h1>Plan</h1><p>First &amp; <b>second</b></p><ul><li>a</li></ul>".to_vec();
    let inputs: Vec<(&str, Vec<u8>)> = vec![
        ("report.docx", common::docx(&["Plan", "Body text here."])),
        ("notes.txt", b"\xEF\xBB\xBFPlan\r\n\r\nBody".to_vec()),
        ("memo.rtf", br"{\rtf1\ansi Plan\par\par Caf\'e9 body}".to_vec()),
        ("page.htm", html.clone()),
        ("page.html", html),
    ];
    for (name, bytes) in &inputs {
        let first = registry.extract(bytes, name).unwrap();
        let second = registry.extract(bytes, name).unwrap();
        assert!(!first.is_empty(), "{name} extracted nothing");
        assert_eq!(first, second, "{name} extraction differs between runs");
    }
}
