//! Post-classification zone enhancers.

use crate::model::{Document, Page, ZoneId, ZoneLabel};
use crate::order::HierarchicalReadingOrderResolver;

/// Default affiliation keywords, matched case-insensitively as substrings.
pub const AFFILIATION_KEYWORDS: &[&str] = &[
    "department",
    "departament",
    "university",
    "institute",
    "school",
    "college",
    "univ.",
];

/// Splits author zones that run on into affiliations.
///
/// On the first page, every [`ZoneLabel::MetAuthor`] zone whose text contains
/// an affiliation keyword is cut at the first line containing one: the lines
/// before stay authors, that line and all after it become a
/// [`ZoneLabel::MetAffiliation`] zone. Zones where either side would be empty
/// are left alone.
#[derive(Debug, Clone)]
pub struct AuthorAffiliationSplitter {
    keywords: Vec<String>,
    resolver: HierarchicalReadingOrderResolver,
}

impl Default for AuthorAffiliationSplitter {
    fn default() -> Self {
        Self {
            keywords: AFFILIATION_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            resolver: HierarchicalReadingOrderResolver::default(),
        }
    }
}

impl AuthorAffiliationSplitter {
    /// Create a splitter with the default keywords.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        self
    }

    /// Use a differently configured resolver for the re-ordering pass.
    pub fn with_resolver(mut self, resolver: HierarchicalReadingOrderResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Split author zones on the first page. Returns `true` if any zone was split.
    pub fn enhance(&self, document: &mut Document) -> bool {
        let Some(page) = document.pages.first_mut() else {
            return false;
        };

        let authors: Vec<ZoneId> = page
            .zones()
            .filter(|(_, zone)| zone.label() == Some(ZoneLabel::MetAuthor))
            .map(|(id, _)| id)
            .collect();

        let mut split = 0;
        for zone in authors {
            if !self.mentions_affiliation(&page.zone_text(zone)) {
                continue;
            }
            let mut seen = false;
            let parts = page.split_zone(zone, |page: &Page, line| {
                seen = seen || self.mentions_affiliation(&page.line_text(line));
                seen
            });
            if let Some((_, affiliation)) = parts {
                page.zone_mut(affiliation).set_label(ZoneLabel::MetAffiliation);
                split += 1;
            }
        }

        if split == 0 {
            return false;
        }
        log::debug!("Split {} author zones on page {}", split, page.number);
        if let Err(e) = self.resolver.resolve_page(page) {
            log::warn!("Keeping previous zone order on page {}: {}", page.number, e);
        }
        true
    }

    fn mentions_affiliation(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}
