//! Zone role labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse grouping of zone labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCategory {
    /// Front matter: title, authors, abstract, ...
    Metadata,
    /// Main text and its headers, figures, tables
    Body,
    /// Bibliography
    References,
    /// Page numbers and anything unrecognized
    Other,
    /// Generic labels from a first, coarse classification pass
    General,
}

/// Role of a zone in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneLabel {
    /// Document title
    MetTitle,
    /// Author names
    MetAuthor,
    /// Author affiliations
    MetAffiliation,
    /// Abstract
    MetAbstract,
    /// Bibliographic information (journal, volume, pages)
    MetBibInfo,
    /// Article type
    MetType,
    /// Received/accepted/published dates
    MetDates,
    /// Editor information
    MetEditor,
    /// Keywords
    MetKeywords,
    /// Correspondence address
    MetCorrespondence,
    /// Copyright statement
    MetCopyright,
    /// Regular body text
    BodyContent,
    /// Section header
    BodyHeader,
    /// Running heads, footers and other noise
    BodyJunk,
    /// Table
    BodyTable,
    /// Figure or figure caption
    BodyFigure,
    /// Equation
    BodyEquation,
    /// Acknowledgments
    BodyAcknowledgment,
    /// Conflict of interest statement
    BodyConflictStmt,
    /// Attachment
    BodyAttachment,
    /// Glossary
    BodyGlossary,
    /// Bibliography entries
    References,
    /// Page number
    OthPageNumber,
    /// Unknown role
    OthUnknown,
    /// Generic metadata
    GenMetadata,
    /// Generic body
    GenBody,
    /// Generic references
    GenReferences,
    /// Generic other
    GenOther,
}

impl ZoneLabel {
    /// The category this label belongs to.
    pub fn category(&self) -> LabelCategory {
        use ZoneLabel::*;
        match self {
            MetTitle | MetAuthor | MetAffiliation | MetAbstract | MetBibInfo | MetType
            | MetDates | MetEditor | MetKeywords | MetCorrespondence | MetCopyright => {
                LabelCategory::Metadata
            }
            BodyContent | BodyHeader | BodyJunk | BodyTable | BodyFigure | BodyEquation
            | BodyAcknowledgment | BodyConflictStmt | BodyAttachment | BodyGlossary => {
                LabelCategory::Body
            }
            References => LabelCategory::References,
            OthPageNumber | OthUnknown => LabelCategory::Other,
            GenMetadata | GenBody | GenReferences | GenOther => LabelCategory::General,
        }
    }

    /// The generic label a specific label refines.
    pub fn general(&self) -> ZoneLabel {
        match self.category() {
            LabelCategory::Metadata => ZoneLabel::GenMetadata,
            LabelCategory::Body => ZoneLabel::GenBody,
            LabelCategory::References => ZoneLabel::GenReferences,
            LabelCategory::Other => ZoneLabel::GenOther,
            LabelCategory::General => *self,
        }
    }

    /// Whether the label belongs to the body of the document, generic or specific.
    pub fn is_body(&self) -> bool {
        self.general() == ZoneLabel::GenBody
    }
}

impl fmt::Display for ZoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
