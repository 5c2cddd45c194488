//! Connection graph over an area corpus.
//!
//! The analyzer evaluates every active relation over all ordered pairs of the
//! corpus once (bulk relations in one pass) and keeps the resulting edges
//! indexed by both endpoints. It is immutable afterwards and can be shared
//! across threads.

use rustc_hash::FxHashMap;

use crate::geometry::{AreaTopology, GridTopology};
use crate::model::{AreaId, AreaTree};
use crate::relations::{Predicate, RelationContext, RelationId, RelationSet};

use super::connection::AreaConnection;

/// Which endpoint of a connection is the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Anchor is `a2`; candidates are the `a1` side of `(b, r, anchor)`.
    Incoming,
    /// Anchor is `a1`; candidates are the `a2` side of `(anchor, r, b)`.
    Outgoing,
}

pub struct RelationAnalyzer {
    relations: RelationSet,
    min_weight: f64,
    areas: Vec<AreaId>,
    connections: Vec<AreaConnection>,
    by_a1: FxHashMap<AreaId, Vec<usize>>,
    by_a2: FxHashMap<AreaId, Vec<usize>>,
}

impl RelationAnalyzer {
    /// Builds the connection graph of `areas` for every relation in `relations`.
    pub fn new(tree: &AreaTree, areas: &[AreaId], relations: &RelationSet, min_weight: f64) -> Self {
        let topology = GridTopology::new(tree, areas);
        Self::with_topology(tree, &topology, relations, min_weight)
    }

    pub fn with_topology(
        tree: &AreaTree,
        topology: &dyn AreaTopology,
        relations: &RelationSet,
        min_weight: f64,
    ) -> Self {
        let ctx = RelationContext::new(tree, topology);
        let areas = topology.areas().to_vec();
        let members: FxHashMap<AreaId, ()> = areas.iter().map(|a| (*a, ())).collect();

        let mut connections = Vec::new();
        for (rid, relation) in relations.iter() {
            match relation.predicate() {
                Predicate::Pair(_) => {
                    for &a1 in &areas {
                        for &a2 in &areas {
                            if a1 == a2 {
                                continue;
                            }
                            let w = relation.weight(&ctx, &tree[a1], &tree[a2], min_weight);
                            if w > 0.0 {
                                connections.push(AreaConnection::new(a1, rid, a2, w));
                            }
                        }
                    }
                }
                Predicate::Bulk(_) => {
                    for (a1, a2, w) in relation.bulk_weights(&ctx, min_weight) {
                        if members.contains_key(&a1) && members.contains_key(&a2) {
                            connections.push(AreaConnection::new(a1, rid, a2, w));
                        }
                    }
                }
            }
        }

        let mut by_a1: FxHashMap<AreaId, Vec<usize>> = FxHashMap::default();
        let mut by_a2: FxHashMap<AreaId, Vec<usize>> = FxHashMap::default();
        for (i, c) in connections.iter().enumerate() {
            by_a1.entry(c.a1).or_default().push(i);
            by_a2.entry(c.a2).or_default().push(i);
        }

        tracing::debug!(
            areas = areas.len(),
            connections = connections.len(),
            "relation graph built"
        );

        Self {
            relations: relations.clone(),
            min_weight,
            areas,
            connections,
            by_a1,
            by_a2,
        }
    }

    pub fn relations(&self) -> &RelationSet {
        &self.relations
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    pub fn areas(&self) -> &[AreaId] {
        &self.areas
    }

    pub fn all_connections(&self) -> &[AreaConnection] {
        &self.connections
    }

    fn indexed<'s>(
        &'s self,
        index: &'s FxHashMap<AreaId, Vec<usize>>,
        id: AreaId,
    ) -> impl Iterator<Item = &'s AreaConnection> {
        index
            .get(&id)
            .into_iter()
            .flatten()
            .map(|i| &self.connections[*i])
    }

    /// All connections matching the given endpoints and relation, where
    /// `None` matches anything, with weight at least `min_weight`.
    pub fn connections(
        &self,
        a1: Option<AreaId>,
        relation: Option<RelationId>,
        a2: Option<AreaId>,
        min_weight: f64,
    ) -> Vec<&AreaConnection> {
        let keep = |c: &&AreaConnection| {
            a1.is_none_or(|a| c.a1 == a)
                && a2.is_none_or(|a| c.a2 == a)
                && relation.is_none_or(|r| c.relation == r)
                && c.weight >= min_weight
        };
        match (a1, a2) {
            (Some(a), _) => self.indexed(&self.by_a1, a).filter(keep).collect(),
            (None, Some(b)) => self.indexed(&self.by_a2, b).filter(keep).collect(),
            (None, None) => self.connections.iter().filter(keep).collect(),
        }
    }

    /// Weight of `a1 relation a2`, 0 when not connected.
    pub fn weight(&self, a1: AreaId, relation: RelationId, a2: AreaId) -> f64 {
        self.indexed(&self.by_a1, a1)
            .find(|c| c.a2 == a2 && c.relation == relation)
            .map_or(0.0, |c| c.weight)
    }

    /// Relations holding for `a1 r a2`, in relation-set order.
    pub fn relations_between(&self, a1: AreaId, a2: AreaId) -> Vec<RelationId> {
        let mut out: Vec<RelationId> = self
            .indexed(&self.by_a1, a1)
            .filter(|c| c.a2 == a2)
            .map(|c| c.relation)
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Candidates connected to `anchor` by `relation` for which the anchor is
    /// the best counterpart among the rivals.
    ///
    /// A candidate `b` passing `is_candidate` is kept unless some other area
    /// passing `is_rival` is connected to `b` by the same relation, in the
    /// same role as the anchor, with a strictly higher weight. Results keep
    /// the graph order.
    pub fn best_candidates(
        &self,
        anchor: AreaId,
        relation: RelationId,
        direction: Direction,
        is_candidate: &dyn Fn(AreaId) -> bool,
        is_rival: &dyn Fn(AreaId) -> bool,
    ) -> Vec<AreaConnection> {
        let edges: Vec<&AreaConnection> = match direction {
            Direction::Incoming => self.indexed(&self.by_a2, anchor).collect(),
            Direction::Outgoing => self.indexed(&self.by_a1, anchor).collect(),
        };
        edges
            .into_iter()
            .filter(|c| c.relation == relation)
            .filter(|c| {
                let cand = match direction {
                    Direction::Incoming => c.a1,
                    Direction::Outgoing => c.a2,
                };
                if !is_candidate(cand) {
                    return false;
                }
                let rivals: Vec<&AreaConnection> = match direction {
                    Direction::Incoming => self
                        .indexed(&self.by_a1, cand)
                        .filter(|o| o.relation == relation && o.a2 != anchor && is_rival(o.a2))
                        .collect(),
                    Direction::Outgoing => self
                        .indexed(&self.by_a2, cand)
                        .filter(|o| o.relation == relation && o.a1 != anchor && is_rival(o.a1))
                        .collect(),
                };
                !rivals.iter().any(|o| o.weight > c.weight)
            })
            .copied()
            .collect()
    }

    /// Areas `b` with `b relation a` for which `a` is their best destination.
    pub fn areas_in_best_relation(&self, a: AreaId, relation: RelationId) -> Vec<AreaConnection> {
        self.best_candidates(a, relation, Direction::Incoming, &|_| true, &|_| true)
    }
}
