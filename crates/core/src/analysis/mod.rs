//! Relation analysis: the connection graph of an area corpus and its
//! projection onto tags.

mod analyzer;
mod connection;
mod tag_index;

pub use analyzer::{Direction, RelationAnalyzer};
pub use connection::{AreaConnection, ConnectionPattern, TagConnection};
pub use tag_index::TagConnectionIndex;
