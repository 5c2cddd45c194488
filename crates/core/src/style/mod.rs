//! Visual styles: fingerprints, style-based tag inference, disambiguation
//! and mining of representative styles.

mod analyzer;
mod disambiguator;
mod generator;
mod spec;

pub use analyzer::{FixedStyleAnalyzer, StyleAnalyzer};
pub use disambiguator::{Disambiguator, TagAssignment};
pub use generator::{StyleGenerator, StyleVariant};
pub use spec::{Field, StyleMap, StyleSpec};
