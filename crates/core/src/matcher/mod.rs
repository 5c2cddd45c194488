//! Configuration search and record matching.

mod backtrack;
mod chunks;
mod config;
mod constraints;
mod corpus;
mod group;
mod hints;
mod matches;
mod scoring;

pub use backtrack::BacktrackingMatcher;
pub use chunks::{Chunk, ChunkCache, ChunkSource};
pub use config::MatcherConfiguration;
pub use constraints::infer_constraints;
pub use group::AttributeGroupMatcher;
pub use hints::{PresentationHint, PresentationHints};
pub use matches::{Match, MatchResult};
pub use scoring::{MatchStatistics, Measures, ScoreBreakdown, ScoredConfiguration, breakdown, rank};
