//! Text cleanup of extracted content parts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::model::ContentPart;
use crate::error::{Error, Result};

/// Normalizes the text of content parts.
pub trait ContentCleaner: Send + Sync {
    /// Name of the cleaner, for diagnostics.
    fn name(&self) -> &str;

    /// Clean every part; parts may be dropped.
    fn clean(&self, parts: Vec<ContentPart>) -> Vec<ContentPart>;
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Join words hyphenated at line breaks
    pub fix_hyphenation: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Collapse whitespace runs, line breaks included, into single spaces
    pub normalize_whitespace: bool,

    /// Drop parts whose text is empty after cleanup
    pub remove_empty: bool,
}

impl CleanerOptions {
    /// Create new cleaner options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal cleanup: NFC normalization and whitespace only.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            fix_hyphenation: false,
            remove_replacement_char: false,
            normalize_whitespace: true,
            remove_empty: true,
        }
    }

    /// Enable or disable hyphenation repair.
    pub fn with_hyphenation(mut self, fix: bool) -> Self {
        self.fix_hyphenation = fix;
        self
    }

    /// Enable or disable ligature repair.
    pub fn with_ligatures(mut self, fix: bool) -> Self {
        self.fix_ligatures = fix;
        self
    }
}

impl Default for CleanerOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            fix_hyphenation: true,
            remove_replacement_char: true,
            normalize_whitespace: true,
            remove_empty: true,
        }
    }
}

/// Default cleaner: NFC, ligatures, hyphenation, whitespace.
pub struct TextContentCleaner {
    options: CleanerOptions,
    hyphenation_regex: Regex,
    whitespace_regex: Regex,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl TextContentCleaner {
    /// Create a new cleaner with the given options.
    pub fn new(options: CleanerOptions) -> Result<Self> {
        Ok(Self {
            options,
            hyphenation_regex: compile(r"(\p{L})-[ \t]*\n\s*(\p{Ll})")?,
            whitespace_regex: compile(r"\s+")?,
            ligature_map: vec![
                ("\u{FB00}", "ff"),  // ﬀ
                ("\u{FB01}", "fi"),  // ﬁ
                ("\u{FB02}", "fl"),  // ﬂ
                ("\u{FB03}", "ffi"), // ﬃ
                ("\u{FB04}", "ffl"), // ﬄ
                ("\u{FB05}", "st"),  // ﬅ (long s + t)
                ("\u{FB06}", "st"),  // ﬆ
            ],
        })
    }

    /// The cleaner options.
    pub fn options(&self) -> &CleanerOptions {
        &self.options
    }

    /// Clean a single text.
    pub fn clean_text(&self, text: &str) -> String {
        let mut result = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        // Must run before line breaks are collapsed.
        if self.options.fix_hyphenation {
            result = self
                .hyphenation_regex
                .replace_all(&result, "$1$2")
                .into_owned();
        }

        if self.options.normalize_whitespace {
            result = self.whitespace_regex.replace_all(&result, " ").into_owned();
        }

        result.trim().to_string()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Other(format!("invalid pattern {}: {}", pattern, e)))
}

impl ContentCleaner for TextContentCleaner {
    fn name(&self) -> &str {
        "text"
    }

    fn clean(&self, parts: Vec<ContentPart>) -> Vec<ContentPart> {
        parts
            .into_iter()
            .map(|mut part| {
                part.text = self.clean_text(&part.text);
                part
            })
            .filter(|part| !(self.options.remove_empty && part.text.is_empty()))
            .collect()
    }
}
