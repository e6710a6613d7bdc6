//! Document-level types.

use super::{Chunk, Page};
use serde::{Deserialize, Serialize};

/// A document: an ordered sequence of pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in the document
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Build an unsegmented document from per-page chunk lists.
    ///
    /// Pages are numbered from 1 in iteration order.
    pub fn from_page_chunks<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = Vec<Chunk>>,
    {
        Self {
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(i, chunks)| Page::from_chunks(i as u32 + 1, chunks))
                .collect(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Total number of zones across all pages.
    pub fn zone_count(&self) -> usize {
        self.pages.iter().map(|p| p.zone_count()).sum()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
