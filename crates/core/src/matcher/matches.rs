//! Matches (bound records) and match results.

use indexmap::{IndexMap, IndexSet};

use crate::analysis::AreaConnection;
use crate::model::{AreaId, Tag};

/// One bound record: areas per tag, the connections that justified the
/// binding, and the dependency sub-matches it absorbed.
#[derive(Debug, Clone, Default)]
pub struct Match {
    bindings: IndexMap<Tag, Vec<AreaId>>,
    connections: Vec<AreaConnection>,
    sub_matches: Vec<(Tag, usize, Match)>,
}

impl Match {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `area` to `tag`; binding the same pair twice is a no-op.
    pub fn bind(&mut self, tag: &Tag, area: AreaId) {
        let areas = self.bindings.entry(tag.clone()).or_default();
        if !areas.contains(&area) {
            areas.push(area);
        }
    }

    pub(crate) fn add_connection(&mut self, connection: AreaConnection) {
        self.connections.push(connection);
    }

    /// Absorbs sub-match `index` of the dependency bound to `tag`.
    pub(crate) fn add_sub_match(&mut self, tag: &Tag, index: usize, sub: &Match) {
        if self.has_sub_match(tag, index) {
            return;
        }
        for area in sub.areas() {
            self.bind(tag, area);
        }
        self.sub_matches.push((tag.clone(), index, sub.clone()));
    }

    pub(crate) fn has_sub_match(&self, tag: &Tag, index: usize) -> bool {
        self.sub_matches
            .iter()
            .any(|(t, i, _)| t == tag && *i == index)
    }

    /// Areas bound to `tag`, in binding order.
    pub fn get(&self, tag: &Tag) -> &[AreaId] {
        self.bindings.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_bound(&self, tag: &Tag) -> bool {
        self.bindings.get(tag).is_some_and(|v| !v.is_empty())
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.bindings.keys()
    }

    pub fn bindings(&self) -> &IndexMap<Tag, Vec<AreaId>> {
        &self.bindings
    }

    /// Every bound area, tag by tag.
    pub fn areas(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.bindings.values().flatten().copied()
    }

    pub fn contains_area(&self, area: AreaId) -> bool {
        self.bindings.values().any(|v| v.contains(&area))
    }

    pub fn connections(&self) -> &[AreaConnection] {
        &self.connections
    }

    pub fn sub_matches(&self) -> impl Iterator<Item = (&Tag, &Match)> {
        self.sub_matches.iter().map(|(t, _, m)| (t, m))
    }

    /// Number of bound areas.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merges another record of the same key into this one.
    pub(crate) fn merge(&mut self, other: Match) {
        for (tag, areas) in other.bindings {
            for area in areas {
                self.bind(&tag, area);
            }
        }
        self.connections.extend(other.connections);
        for (tag, index, sub) in other.sub_matches {
            if !self.has_sub_match(&tag, index) {
                self.sub_matches.push((tag, index, sub));
            }
        }
    }
}

/// All matches of one configuration and the areas they consumed.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    matches: Vec<Match>,
    areas: IndexSet<AreaId>,
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, m: Match) {
        self.areas.extend(m.areas());
        self.matches.push(m);
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }

    /// Areas consumed by any match.
    pub fn areas(&self) -> &IndexSet<AreaId> {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Every connection used by any match.
    pub fn connections(&self) -> impl Iterator<Item = &AreaConnection> {
        self.matches.iter().flat_map(|m| m.connections.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::RelationId;

    #[test]
    fn result_tracks_consumed_areas() {
        let name = Tag::from("name");
        let value = Tag::from("value");
        let mut m = Match::new();
        m.bind(&name, AreaId(1));
        m.bind(&value, AreaId(2));
        m.bind(&value, AreaId(2));
        m.add_connection(AreaConnection::new(AreaId(2), RelationId(0), AreaId(1), 1.0));
        assert_eq!(m.len(), 2);
        assert!(m.contains_area(AreaId(2)));

        let mut result = MatchResult::new();
        result.push(m);
        assert_eq!(result.areas().len(), 2);
        assert_eq!(result.connections().count(), 1);
    }

    #[test]
    fn sub_matches_bind_their_areas_once() {
        let author = Tag::from("author");
        let mut sub = Match::new();
        sub.bind(&Tag::from("first"), AreaId(3));
        sub.bind(&Tag::from("last"), AreaId(4));

        let mut m = Match::new();
        m.add_sub_match(&author, 0, &sub);
        m.add_sub_match(&author, 0, &sub);
        assert_eq!(m.get(&author), &[AreaId(3), AreaId(4)]);
        assert_eq!(m.sub_matches().count(), 1);
    }
}
