//! Document model types.
//!
//! This module defines the structure tree shared by every stage:
//! document → page → zone → line → word → chunk. Pages own their
//! elements in an arena (see [`Page`]); containers hold typed handles.

mod bounds;
mod document;
mod label;
mod page;

pub use bounds::{Bounds, BoundsBuilder};
pub use document::Document;
pub use label::{LabelCategory, ZoneLabel};
pub use page::{Chunk, ChunkId, Line, LineId, Page, Word, WordId, Zone, ZoneId};
