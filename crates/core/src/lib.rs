//! boxmatch - layout pattern discovery and record extraction.
//!
//! Given the area tree of a rendered page, a set of output tags with
//! cardinality flags and weak tags on the areas, the engine measures
//! geometric relations between areas, enumerates candidate extraction
//! configurations (inter-tag relations plus per-tag style fingerprints),
//! ranks them against a sample page and applies the selected configuration
//! to other pages.

pub mod analysis;
pub mod error;
pub mod geometry;
pub mod matcher;
pub mod model;
pub mod params;
pub mod pattern;
pub mod relations;
pub mod style;
pub mod tagging;

pub use analysis::{AreaConnection, ConnectionPattern, RelationAnalyzer, TagConnection};
pub use error::{MineError, Result};
pub use matcher::{AttributeGroupMatcher, Match, MatchResult, MatcherConfiguration, PresentationHint};
pub use model::{Area, AreaId, AreaStyle, AreaTree, Color, Rect, Tag};
pub use params::MinerParams;
pub use pattern::{Attribute, AttributeGroup};
pub use relations::{Relation, RelationId, RelationSet};
pub use tagging::{RegexTagger, Tagger, tag_areas};
