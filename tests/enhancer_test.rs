//! Integration tests for the author/affiliation splitter.

mod common;

use docstrum::{
    AuthorAffiliationSplitter, Bounds, Chunk, Docstrum, Document, HierarchicalReadingOrderResolver,
    Page, ZoneLabel,
};

use common::add_text_line;

fn title_page(number: u32) -> Page {
    let mut page = Page::new(number);
    let mut cursor = 50.0;
    for ch in "Segmentation".chars() {
        page.add_chunk(Chunk::new(Bounds::new(cursor, 40.0, 10.0, 18.0), ch.to_string()));
        cursor += 10.0;
    }
    add_text_line(&mut page, "Ann Smith and Bob Jones", 50.0, 100.0);
    add_text_line(&mut page, "Department of Computer Science", 50.0, 114.0);
    add_text_line(&mut page, "University of Somewhere", 50.0, 128.0);
    page
}

/// Segment, order and label: the first zone is the title, the second the authors.
fn labeled_document(pages: u32) -> Document {
    let mut doc = Document::new();
    for number in 1..=pages {
        doc.add_page(title_page(number));
    }
    let mut doc = Docstrum::new().analyze(&doc).unwrap().into_document();
    for page in &mut doc.pages {
        let zones = page.zone_ids().to_vec();
        page.zone_mut(zones[0]).set_label(ZoneLabel::MetTitle);
        page.zone_mut(zones[1]).set_label(ZoneLabel::MetAuthor);
    }
    doc
}

fn labels_and_texts(page: &Page) -> Vec<(Option<ZoneLabel>, String)> {
    page.zones()
        .map(|(id, zone)| (zone.label(), page.zone_text(id)))
        .collect()
}

#[test]
fn test_segmented_author_zone() {
    let doc = labeled_document(1);
    assert_eq!(doc.pages[0].zone_count(), 2);
    assert_eq!(doc.pages[0].zone(doc.pages[0].zone_ids()[1]).lines().len(), 3);
}

#[test]
fn test_split_first_page_only() {
    let mut doc = labeled_document(2);
    assert!(AuthorAffiliationSplitter::new().enhance(&mut doc));

    assert_eq!(
        labels_and_texts(&doc.pages[0]),
        vec![
            (Some(ZoneLabel::MetTitle), "Segmentation".to_string()),
            (
                Some(ZoneLabel::MetAuthor),
                "Ann Smith and Bob Jones".to_string()
            ),
            (
                Some(ZoneLabel::MetAffiliation),
                "Department of Computer Science\nUniversity of Somewhere".to_string()
            ),
        ]
    );
    assert_eq!(doc.pages[1].zone_count(), 2);
}

#[test]
fn test_split_zones_are_ordered_and_bounded() {
    let mut doc = labeled_document(1);
    AuthorAffiliationSplitter::new().enhance(&mut doc);
    let page = &mut doc.pages[0];

    let before: Vec<_> = page.zone_ids().to_vec();
    HierarchicalReadingOrderResolver::default()
        .resolve_page(page)
        .unwrap();
    assert_eq!(page.zone_ids(), before.as_slice());

    let authors = page.zone(before[1]).bounds().copied().unwrap();
    let affiliation = page.zone(before[2]).bounds().copied().unwrap();
    assert_eq!(authors.top(), 100.0);
    assert_eq!(affiliation.top(), 114.0);
    assert_eq!(affiliation.bottom(), 138.0);
}

#[test]
fn test_second_run_changes_nothing() {
    let mut doc = labeled_document(1);
    let splitter = AuthorAffiliationSplitter::new();
    assert!(splitter.enhance(&mut doc));
    let after_first = labels_and_texts(&doc.pages[0]);

    assert!(!splitter.enhance(&mut doc));
    assert_eq!(labels_and_texts(&doc.pages[0]), after_first);
}
