//! Conversion of flat content parts into nested sections.

use super::model::{ContentPart, DocumentContent, Section};

/// Builds the final content structure.
pub trait ContentConverter: Send + Sync {
    /// Name of the converter, for diagnostics.
    fn name(&self) -> &str;

    /// Assemble parts, in reading order, into sections.
    fn convert(&self, parts: Vec<ContentPart>) -> DocumentContent;
}

/// Nests sections by header line height: the tallest distinct header height
/// is level 1, the next one level 2, and so on.
#[derive(Debug, Clone)]
pub struct SectionConverter {
    /// Header heights closer than this share a level
    pub height_tolerance: f64,
    /// Deepest level assigned
    pub max_level: u8,
}

impl Default for SectionConverter {
    fn default() -> Self {
        Self {
            height_tolerance: 0.5,
            max_level: 6,
        }
    }
}

impl SectionConverter {
    /// Create a converter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct header heights, largest first.
    fn levels(&self, parts: &[ContentPart]) -> Vec<f64> {
        let mut heights: Vec<f64> = parts
            .iter()
            .filter(|p| p.is_header())
            .map(|p| p.line_height)
            .collect();
        heights.sort_by(|a, b| b.total_cmp(a));
        let mut levels: Vec<f64> = Vec::new();
        for h in heights {
            match levels.last() {
                Some(&last) if last - h <= self.height_tolerance => {}
                _ => levels.push(h),
            }
        }
        levels
    }

    fn level_of(&self, levels: &[f64], height: f64) -> u8 {
        let index = levels
            .iter()
            .position(|&l| l - height <= self.height_tolerance)
            .unwrap_or(levels.len().saturating_sub(1));
        (index + 1).min(self.max_level.max(1) as usize) as u8
    }
}

impl ContentConverter for SectionConverter {
    fn name(&self) -> &str {
        "sections"
    }

    fn convert(&self, parts: Vec<ContentPart>) -> DocumentContent {
        let levels = self.levels(&parts);
        let mut content = DocumentContent::new();
        let mut stack: Vec<Section> = Vec::new();

        for part in parts {
            if part.is_header() {
                let level = self.level_of(&levels, part.line_height);
                close_sections(&mut stack, &mut content, level);
                stack.push(Section::new(part.text, level));
            } else {
                match stack.last_mut() {
                    Some(section) => section.paragraphs.push(part.text),
                    None => content.preamble.push(part.text),
                }
            }
        }
        close_sections(&mut stack, &mut content, 0);
        content
    }
}

/// Pop every open section at `level` or deeper into its parent.
fn close_sections(stack: &mut Vec<Section>, content: &mut DocumentContent, level: u8) {
    while stack.last().is_some_and(|s| s.level >= level) {
        let Some(section) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.subsections.push(section),
            None => content.sections.push(section),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_sections() {
        let parts = vec![
            ContentPart::paragraph("Intro text"),
            ContentPart::header("1 Methods", 16.0),
            ContentPart::paragraph("Methods text"),
            ContentPart::header("1.1 Data", 13.0),
            ContentPart::paragraph("Data text"),
            ContentPart::header("1.2 Model", 13.2),
            ContentPart::header("2 Results", 16.0),
            ContentPart::paragraph("Results text"),
        ];
        let content = SectionConverter::new().convert(parts);

        assert_eq!(content.preamble, vec!["Intro text"]);
        assert_eq!(content.sections.len(), 2);
        assert_eq!(content.section_count(), 4);

        let methods = &content.sections[0];
        assert_eq!(methods.level, 1);
        assert_eq!(methods.paragraphs, vec!["Methods text"]);
        assert_eq!(methods.subsections.len(), 2);
        assert_eq!(methods.subsections[0].level, 2);
        assert_eq!(methods.subsections[1].title, "1.2 Model");
        assert_eq!(content.sections[1].paragraphs, vec!["Results text"]);
    }

    #[test]
    fn test_no_headers() {
        let content = SectionConverter::new().convert(vec![
            ContentPart::paragraph("a"),
            ContentPart::paragraph("b"),
        ]);
        assert!(content.sections.is_empty());
        assert_eq!(content.plain_text(), "a\n\nb");
    }
}
