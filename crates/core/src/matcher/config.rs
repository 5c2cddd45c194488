//! Matcher configurations: one complete extraction hypothesis.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::analysis::ConnectionPattern;
use crate::model::Tag;
use crate::relations::RelationSet;
use crate::style::StyleMap;

use super::hints::PresentationHints;

/// A style map, a connection pattern, optional consistency constraints and
/// presentation hints.
///
/// Identity is the triple (style map, pattern, constraints); hints follow
/// from the attribute group and take no part in equality.
#[derive(Debug, Clone)]
pub struct MatcherConfiguration {
    style_map: StyleMap,
    pattern: ConnectionPattern,
    constraints: Option<ConnectionPattern>,
    hints: IndexMap<Tag, PresentationHints>,
}

impl MatcherConfiguration {
    pub fn new(style_map: StyleMap, pattern: ConnectionPattern) -> Self {
        Self {
            style_map,
            pattern,
            constraints: None,
            hints: IndexMap::new(),
        }
    }

    pub fn with_constraints(mut self, constraints: ConnectionPattern) -> Self {
        self.constraints = (!constraints.is_empty()).then_some(constraints);
        self
    }

    pub fn with_hints(mut self, hints: IndexMap<Tag, PresentationHints>) -> Self {
        self.hints = hints.into_iter().filter(|(_, h)| !h.is_empty()).collect();
        self
    }

    pub fn style_map(&self) -> &StyleMap {
        &self.style_map
    }

    pub fn pattern(&self) -> &ConnectionPattern {
        &self.pattern
    }

    /// Extra edges a match must satisfy without being resolved through them.
    pub fn constraints(&self) -> Option<&ConnectionPattern> {
        self.constraints.as_ref()
    }

    pub fn hints(&self, tag: &Tag) -> PresentationHints {
        self.hints.get(tag).cloned().unwrap_or_default()
    }

    pub fn all_hints(&self) -> &IndexMap<Tag, PresentationHints> {
        &self.hints
    }

    pub fn display(&self, relations: &RelationSet) -> String {
        let styles: Vec<String> = self
            .style_map
            .iter()
            .map(|(tag, style)| format!("{tag}: {style}"))
            .collect();
        let mut out = format!("{} {{{}}}", self.pattern.display(relations), styles.join("; "));
        if let Some(c) = &self.constraints {
            out.push_str(" where ");
            out.push_str(&c.display(relations));
        }
        out
    }
}

impl PartialEq for MatcherConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.style_map == other.style_map
            && self.pattern == other.pattern
            && self.constraints == other.constraints
    }
}

impl Eq for MatcherConfiguration {}

impl Hash for MatcherConfiguration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.style_map.hash(state);
        self.pattern.hash(state);
        self.constraints.hash(state);
    }
}
