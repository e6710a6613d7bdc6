//! Integration tests for logical structure extraction.

mod common;

use std::sync::Arc;

use docstrum::classify::{Exemplar, KnnClassifier, LayoutFeatures, ZoneFeatureExtractor};
use docstrum::content::{
    CleanerOptions, DocumentContent, KnnContentFilter, KnnHeaderExtractor,
    LogicalStructureExtractor, SectionConverter, TextContentCleaner,
};
use docstrum::render::{content_to_json, content_to_text, JsonFormat};
use docstrum::{Bounds, Chunk, Docstrum, Document, KnnModel, Page, ZoneLabel};

use common::add_text_line;

/// Add one line of larger text, `width` by `height` per character.
fn add_large_line(page: &mut Page, text: &str, top: f64, width: f64, height: f64) {
    let mut cursor = 50.0;
    for word in text.split_whitespace() {
        for ch in word.chars() {
            page.add_chunk(Chunk::new(Bounds::new(cursor, top, width, height), ch.to_string()));
            cursor += width;
        }
        cursor += width * 0.7;
    }
}

fn add_paragraph(page: &mut Page, lines: &[&str], top: f64) {
    for (i, line) in lines.iter().enumerate() {
        add_text_line(page, line, 50.0, top + i as f64 * 14.0);
    }
}

/// An article page: abstract, two sections, a subsection, optionally a page number.
fn article(page_number: bool) -> Document {
    let mut page = Page::new(1);
    add_paragraph(
        &mut page,
        &[
            "We describe a method for page",
            "segmentation that works on any",
            "text layout without training",
            "data of any kind at all.",
        ],
        50.0,
    );
    add_large_line(&mut page, "Introduction", 130.0, 9.0, 16.0);
    add_paragraph(
        &mut page,
        &[
            "Page segmen-",
            "tation splits text into zones",
            "of related lines and words",
            "before any labeling happens.",
        ],
        170.0,
    );
    add_large_line(&mut page, "Data", 250.0, 8.0, 13.0);
    add_paragraph(
        &mut page,
        &[
            "We use a set of scanned pages",
            "taken from many journals with",
            "many different page layouts",
            "and many font sizes in them.",
        ],
        290.0,
    );
    add_large_line(&mut page, "Results", 370.0, 9.0, 16.0);
    add_paragraph(
        &mut page,
        &[
            "The zones match the ground",
            "truth on nearly all of the",
            "pages in the evaluation set",
            "with very few split errors.",
        ],
        410.0,
    );
    if page_number {
        page.add_chunk(Chunk::new(Bounds::new(150.0, 560.0, 6.0, 10.0), "7"));
    }

    let mut doc = Document::new();
    doc.add_page(page);
    Docstrum::new().analyze(&doc).unwrap().into_document()
}

fn check_article(content: &DocumentContent) {
    assert_eq!(
        content.preamble,
        vec!["We describe a method for page segmentation that works on any text layout without training data of any kind at all."]
    );
    assert_eq!(content.sections.len(), 2);

    let intro = &content.sections[0];
    assert_eq!(intro.title, "Introduction");
    assert_eq!(intro.level, 1);
    assert_eq!(
        intro.paragraphs,
        vec!["Page segmentation splits text into zones of related lines and words before any labeling happens."]
    );
    assert_eq!(intro.subsections.len(), 1);
    assert_eq!(intro.subsections[0].title, "Data");
    assert_eq!(intro.subsections[0].level, 2);
    assert_eq!(intro.subsections[0].paragraphs.len(), 1);

    let results = &content.sections[1];
    assert_eq!(results.title, "Results");
    assert_eq!(results.paragraphs.len(), 1);
    assert!(results.subsections.is_empty());
}

#[test]
fn test_article_segmentation() {
    let doc = article(false);
    assert_eq!(doc.zone_count(), 7);
}

#[test]
fn test_rule_based_extraction() {
    let mut doc = article(false);
    let content = LogicalStructureExtractor::rule_based()
        .unwrap()
        .extract(&mut doc)
        .unwrap();
    check_article(&content);

    let page = &doc.pages[0];
    let headers = page
        .zones()
        .filter(|(_, z)| z.label() == Some(ZoneLabel::BodyHeader))
        .count();
    assert_eq!(headers, 3);
}

/// Label every zone of a page with `label_of(zone index, zone text)`.
fn train(doc: &Document, label_of: impl Fn(usize, &str) -> ZoneLabel) -> KnnModel<ZoneLabel> {
    let page = &doc.pages[0];
    let exemplars = page
        .zone_ids()
        .iter()
        .enumerate()
        .map(|(i, &zone)| {
            Exemplar::new(
                LayoutFeatures.features(page, zone).into_inner(),
                label_of(i, &page.zone_text(zone)),
            )
        })
        .collect();
    KnnModel::new(exemplars).unwrap()
}

#[test]
fn test_knn_extraction_drops_junk() {
    let training = article(true);
    let filter_model = train(&training, |_, text| {
        if text == "7" {
            ZoneLabel::BodyJunk
        } else {
            ZoneLabel::BodyContent
        }
    });
    let header_model = train(&training, |_, text| {
        if matches!(text, "Introduction" | "Data" | "Results") {
            ZoneLabel::BodyHeader
        } else {
            ZoneLabel::BodyContent
        }
    });

    let extractor = LogicalStructureExtractor::new(
        Box::new(KnnContentFilter::new(Arc::new(filter_model)).with_neighbors(1)),
        Box::new(
            KnnHeaderExtractor::new(Arc::new(header_model), KnnClassifier::new()).with_neighbors(1),
        ),
        Box::new(TextContentCleaner::new(CleanerOptions::default()).unwrap()),
        Box::new(SectionConverter::new()),
    );

    let mut doc = article(true);
    let content = extractor.extract(&mut doc).unwrap();
    check_article(&content);
    assert!(!content.plain_text().contains('7'));

    let page = &doc.pages[0];
    let labeled = page.zones().filter(|(_, z)| z.label().is_some()).count();
    assert_eq!(labeled, 7);
}

#[test]
fn test_content_rendering() {
    let mut doc = article(false);
    let content = LogicalStructureExtractor::rule_based()
        .unwrap()
        .extract(&mut doc)
        .unwrap();

    let text = content_to_text(&content);
    assert!(text.contains("# Introduction\n\nPage segmentation"));
    assert!(text.contains("## Data"));

    let json = content_to_json(&content, JsonFormat::Compact).unwrap();
    let parsed: DocumentContent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, content);
}
