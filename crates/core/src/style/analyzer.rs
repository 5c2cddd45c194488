//! Style-based tag inference.

use crate::model::{Area, Tag};
use crate::params::StyleTolerance;

use super::spec::StyleMap;

/// Maps an area to the tags its visual style suggests.
pub trait StyleAnalyzer: Send + Sync {
    /// Candidate tags for `area`, judged from style alone.
    fn infer_tags(&self, area: &Area) -> Vec<Tag>;
}

/// Fixed style-per-tag lookup.
#[derive(Debug, Clone)]
pub struct FixedStyleAnalyzer {
    styles: StyleMap,
    tolerance: StyleTolerance,
}

impl FixedStyleAnalyzer {
    pub fn new(styles: StyleMap, tolerance: StyleTolerance) -> Self {
        Self { styles, tolerance }
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }
}

impl StyleAnalyzer for FixedStyleAnalyzer {
    fn infer_tags(&self, area: &Area) -> Vec<Tag> {
        self.styles
            .iter()
            .filter(|(_, spec)| spec.matches(area.style(), &self.tolerance))
            .map(|(tag, _)| tag.clone())
            .collect()
    }
}
