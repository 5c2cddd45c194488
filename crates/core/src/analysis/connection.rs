//! Weighted edges between areas and between tags.

use indexmap::IndexSet;

use crate::model::{AreaId, Tag};
use crate::relations::{RelationId, RelationSet};

/// A directed, weighted edge `a1 relation a2` between two areas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaConnection {
    pub a1: AreaId,
    pub a2: AreaId,
    pub relation: RelationId,
    pub weight: f64,
}

impl AreaConnection {
    pub fn new(a1: AreaId, relation: RelationId, a2: AreaId, weight: f64) -> Self {
        Self {
            a1,
            a2,
            relation,
            weight,
        }
    }
}

/// A directed edge `a1 relation a2` between two tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagConnection {
    pub a1: Tag,
    pub a2: Tag,
    pub relation: RelationId,
}

impl TagConnection {
    pub fn new(a1: Tag, relation: RelationId, a2: Tag) -> Self {
        Self { a1, a2, relation }
    }

    /// True if the edge joins the two tags in either direction.
    pub fn joins(&self, t1: &Tag, t2: &Tag) -> bool {
        (&self.a1 == t1 && &self.a2 == t2) || (&self.a1 == t2 && &self.a2 == t1)
    }

    /// Tests whether two edges state the same fact, taking relation symmetry
    /// and declared inverses into account.
    pub fn is_equivalent(&self, other: &TagConnection, relations: &RelationSet) -> bool {
        if self.a1 == other.a1 && self.a2 == other.a2 {
            return self.relation == other.relation;
        }
        if self.a1 == other.a2 && self.a2 == other.a1 {
            if self.relation == other.relation {
                return relations.is_symmetric(self.relation);
            }
            return relations.inverse_of(self.relation) == Some(other.relation);
        }
        false
    }

    pub fn display(&self, relations: &RelationSet) -> String {
        format!("{} {} {}", self.a1, relations.name(self.relation), self.a2)
    }
}

/// A set of tag connections describing one candidate record schema.
///
/// Edges are kept in the order they were added; every edge after the first
/// shares at least one tag with an earlier edge when the pattern comes from
/// the pattern generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ConnectionPattern {
    edges: Vec<TagConnection>,
}

impl ConnectionPattern {
    pub fn new(edges: Vec<TagConnection>) -> Self {
        Self { edges }
    }

    pub fn push(&mut self, edge: TagConnection) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[TagConnection] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Tags in order of first appearance.
    pub fn tags(&self) -> IndexSet<Tag> {
        let mut out = IndexSet::new();
        for e in &self.edges {
            out.insert(e.a1.clone());
            out.insert(e.a2.clone());
        }
        out
    }

    /// True if some edge joins the two tags, in either direction.
    pub fn joins(&self, t1: &Tag, t2: &Tag) -> bool {
        self.edges.iter().any(|e| e.joins(t1, t2))
    }

    /// The relation fixed for the ordered pair, if any.
    pub fn relation_for(&self, a1: &Tag, a2: &Tag) -> Option<RelationId> {
        self.edges
            .iter()
            .find(|e| &e.a1 == a1 && &e.a2 == a2)
            .map(|e| e.relation)
    }

    /// True if the edges form one connected graph over their tags.
    pub fn is_connected(&self) -> bool {
        let tags = self.tags();
        if tags.len() <= 1 {
            return true;
        }
        let mut reached: IndexSet<&Tag> = IndexSet::new();
        reached.insert(&self.edges[0].a1);
        loop {
            let before = reached.len();
            for e in &self.edges {
                if reached.contains(&e.a1) || reached.contains(&e.a2) {
                    reached.insert(&e.a1);
                    reached.insert(&e.a2);
                }
            }
            if reached.len() == before {
                break;
            }
        }
        reached.len() == tags.len()
    }

    /// Tests edge-wise equivalence with another pattern.
    pub fn is_equivalent(&self, other: &ConnectionPattern, relations: &RelationSet) -> bool {
        self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .all(|e| other.edges.iter().any(|o| e.is_equivalent(o, relations)))
            && other
                .edges
                .iter()
                .all(|o| self.edges.iter().any(|e| e.is_equivalent(o, relations)))
    }

    pub fn display(&self, relations: &RelationSet) -> String {
        let parts: Vec<String> = self.edges.iter().map(|e| e.display(relations)).collect();
        format!("[{}]", parts.join(", "))
    }
}

impl FromIterator<TagConnection> for ConnectionPattern {
    fn from_iter<I: IntoIterator<Item = TagConnection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
