//! Tag connections observed in a sample, projected from area connections.

use indexmap::IndexMap;

use crate::model::{AreaId, Tag};
use crate::relations::RelationId;

use super::analyzer::RelationAnalyzer;
use super::connection::TagConnection;

/// Occurrence counts of `(t1, relation, t2)` over a sample.
#[derive(Debug, Clone, Default)]
pub struct TagConnectionIndex {
    pairs: IndexMap<(Tag, Tag), IndexMap<RelationId, usize>>,
}

impl TagConnectionIndex {
    /// Projects every area connection through `tag_of`. Connections between
    /// areas of the same tag, or with an untagged endpoint, are skipped.
    pub fn build(analyzer: &RelationAnalyzer, tag_of: &dyn Fn(AreaId) -> Option<Tag>) -> Self {
        let mut index = Self::default();
        for c in analyzer.all_connections() {
            let (Some(t1), Some(t2)) = (tag_of(c.a1), tag_of(c.a2)) else {
                continue;
            };
            if t1 == t2 {
                continue;
            }
            *index
                .pairs
                .entry((t1, t2))
                .or_default()
                .entry(c.relation)
                .or_default() += 1;
        }
        index
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Ordered tag pairs with at least one observed connection.
    pub fn pairs(&self) -> impl Iterator<Item = &(Tag, Tag)> {
        self.pairs.keys()
    }

    pub fn contains_pair(&self, a1: &Tag, a2: &Tag) -> bool {
        self.pairs.contains_key(&(a1.clone(), a2.clone()))
    }

    pub fn count(&self, a1: &Tag, relation: RelationId, a2: &Tag) -> usize {
        self.pairs
            .get(&(a1.clone(), a2.clone()))
            .and_then(|m| m.get(&relation))
            .copied()
            .unwrap_or(0)
    }

    /// Relations observed for the ordered pair whose share of the pair's
    /// connections reaches `min_frequency`, most frequent first.
    pub fn relations_for(&self, a1: &Tag, a2: &Tag, min_frequency: f64) -> Vec<RelationId> {
        let Some(counts) = self.pairs.get(&(a1.clone(), a2.clone())) else {
            return Vec::new();
        };
        let total: usize = counts.values().sum();
        if total == 0 {
            return Vec::new();
        }
        let mut out: Vec<(RelationId, usize)> = counts
            .iter()
            .filter(|(_, n)| **n as f64 / total as f64 >= min_frequency)
            .map(|(r, n)| (*r, *n))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out.into_iter().map(|(r, _)| r).collect()
    }

    /// Every observed tag connection.
    pub fn connections(&self) -> Vec<TagConnection> {
        self.pairs
            .iter()
            .flat_map(|((t1, t2), counts)| {
                counts
                    .keys()
                    .map(|r| TagConnection::new(t1.clone(), *r, t2.clone()))
            })
            .collect()
    }
}
