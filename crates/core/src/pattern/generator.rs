//! Enumeration of connection patterns supported by a sample.
//!
//! Generation runs in two phases. The first enumerates spanning trees over
//! the tags reachable from the group's core tags, using only tag pairs seen
//! in the sample's tag-connection index. The second assigns concrete
//! relations to every tree edge and expands the choices into patterns.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use itertools::Itertools;

use crate::analysis::{ConnectionPattern, TagConnection, TagConnectionIndex};
use crate::model::Tag;
use crate::relations::RelationSet;

use super::attribute::AttributeGroup;

/// An unordered tag-pair edge of a tag pattern, stored as
/// `(added, anchor)`: the tag the edge brought into the tree first.
pub type TagPair = (Tag, Tag);

pub struct PatternGenerator<'a> {
    group: &'a AttributeGroup,
    index: &'a TagConnectionIndex,
    relations: &'a RelationSet,
    min_frequency: f64,
    fixed: Vec<TagConnection>,
}

impl<'a> PatternGenerator<'a> {
    pub fn new(
        group: &'a AttributeGroup,
        index: &'a TagConnectionIndex,
        relations: &'a RelationSet,
        min_frequency: f64,
    ) -> Self {
        Self {
            group,
            index,
            relations,
            min_frequency,
            fixed: Vec::new(),
        }
    }

    /// Relations already decided by dependency matchers.
    pub fn with_fixed(mut self, fixed: Vec<TagConnection>) -> Self {
        self.fixed = fixed;
        self
    }

    /// Oriented relation choices for the ordered pair, blacklist applied.
    fn oriented(&self, a1: &Tag, a2: &Tag) -> Vec<TagConnection> {
        if self.group.is_blacklisted(a1, a2) {
            return Vec::new();
        }
        self.index
            .relations_for(a1, a2, self.min_frequency)
            .into_iter()
            .map(|r| TagConnection::new(a1.clone(), r, a2.clone()))
            .collect()
    }

    /// Relation choices for a tree edge: the edge's own orientation first,
    /// then the reverse orientation minus choices equivalent to one already
    /// listed.
    fn choices(&self, added: &Tag, anchor: &Tag) -> Vec<TagConnection> {
        let mut out = self.oriented(added, anchor);
        for c in self.oriented(anchor, added) {
            if !out.iter().any(|o| o.is_equivalent(&c, self.relations)) {
                out.push(c);
            }
        }
        out
    }

    fn adjacent(&self, t1: &Tag, t2: &Tag) -> bool {
        !self.oriented(t1, t2).is_empty() || !self.oriented(t2, t1).is_empty()
    }

    /// Group tags reachable from the core tags through usable pairs, in
    /// discovery order. Empty when a required tag is unreachable.
    pub fn reachable_tags(&self) -> Vec<Tag> {
        let tags: Vec<Tag> = self.group.tags().cloned().collect();
        let Some(start) = self
            .group
            .core_tags()
            .into_iter()
            .find(|t| tags.iter().any(|o| o != t && self.adjacent(t, o)))
        else {
            return Vec::new();
        };
        let mut reached: IndexSet<Tag> = IndexSet::new();
        reached.insert(start);
        let mut i = 0;
        while i < reached.len() {
            let cur = reached[i].clone();
            for t in &tags {
                if !reached.contains(t) && self.adjacent(&cur, t) {
                    reached.insert(t.clone());
                }
            }
            i += 1;
        }
        for a in self.group.attributes() {
            if a.is_required() && !reached.contains(a.tag()) {
                tracing::warn!(tag = %a.tag(), "required tag not connected to the record");
                return Vec::new();
            }
        }
        reached.into_iter().collect()
    }

    /// Phase one: every spanning tree over the reachable tags.
    pub fn tag_patterns(&self) -> Vec<Vec<TagPair>> {
        let tags = self.reachable_tags();
        if tags.len() < 2 {
            return Vec::new();
        }
        let mut seen: BTreeSet<BTreeSet<(Tag, Tag)>> = BTreeSet::new();
        let mut out = Vec::new();
        let mut covered: IndexSet<Tag> = IndexSet::new();
        covered.insert(tags[0].clone());
        self.extend_tree(&tags, &mut covered, &mut Vec::new(), &mut seen, &mut out);
        out
    }

    fn extend_tree(
        &self,
        tags: &[Tag],
        covered: &mut IndexSet<Tag>,
        edges: &mut Vec<TagPair>,
        seen: &mut BTreeSet<BTreeSet<(Tag, Tag)>>,
        out: &mut Vec<Vec<TagPair>>,
    ) {
        if edges.len() == tags.len() - 1 {
            let key: BTreeSet<(Tag, Tag)> = edges
                .iter()
                .map(|(a, b)| if a <= b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) })
                .collect();
            if seen.insert(key) {
                out.push(edges.clone());
            }
            return;
        }
        let anchors: Vec<Tag> = covered.iter().cloned().collect();
        for anchor in &anchors {
            for added in tags {
                if covered.contains(added) || !self.adjacent(added, anchor) {
                    continue;
                }
                covered.insert(added.clone());
                edges.push((added.clone(), anchor.clone()));
                self.extend_tree(tags, covered, edges, seen, out);
                edges.pop();
                covered.pop();
            }
        }
    }

    /// Phase two: concrete patterns for one tag pattern. Returns nothing
    /// when a dependency fixed only the reverse of one of its edges.
    pub fn relation_patterns(&self, tag_pattern: &[TagPair]) -> Vec<ConnectionPattern> {
        let mut per_edge: Vec<Vec<TagConnection>> = Vec::with_capacity(tag_pattern.len());
        for (added, anchor) in tag_pattern {
            let same = self
                .fixed
                .iter()
                .find(|e| &e.a1 == added && &e.a2 == anchor);
            if let Some(edge) = same {
                per_edge.push(vec![edge.clone()]);
                continue;
            }
            if self.fixed.iter().any(|e| &e.a1 == anchor && &e.a2 == added) {
                return Vec::new();
            }
            let choices = self.choices(added, anchor);
            if choices.is_empty() {
                return Vec::new();
            }
            per_edge.push(choices);
        }
        per_edge
            .into_iter()
            .multi_cartesian_product()
            .map(ConnectionPattern::new)
            .collect()
    }

    /// All concrete patterns, tag pattern by tag pattern.
    pub fn generate(&self) -> Vec<ConnectionPattern> {
        let mut out = Vec::new();
        for tp in self.tag_patterns() {
            out.extend(self.relation_patterns(&tp));
        }
        tracing::debug!(patterns = out.len(), "connection patterns generated");
        out
    }
}
