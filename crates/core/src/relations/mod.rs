//! Geometric relations between areas.
//!
//! Every relation is a named strategy in a [`RelationSet`]: a weight
//! function over a pair of areas (or, for relations that depend on more than
//! one pair, a bulk function over the whole corpus), optional metric used by
//! scoring, and explicit symmetry/inverse metadata.
//!
//! `r(a1, a2)` reads "a1 is r of a2": `below(b, a)` means `b` lies below `a`.

mod heading;
mod horizontal;
mod vertical;

use std::fmt;

use rustc_hash::FxHashSet;

use crate::error::{MineError, Result};
use crate::geometry::AreaTopology;
use crate::model::{Area, AreaId, AreaTree};

/// Weight function of a pairwise relation. Returns a raw weight; values are
/// clamped and thresholded by [`Relation::weight`].
pub type PairWeightFn = fn(&RelationContext<'_>, &Area, &Area) -> f64;

/// Weight function of a bulk relation, producing `(a1, a2, weight)` triples.
pub type BulkWeightFn = fn(&RelationContext<'_>) -> Vec<(AreaId, AreaId, f64)>;

/// Geometric metric of a connected pair, in em units.
pub type MetricFn = fn(&Area, &Area) -> f64;

/// How a relation computes its weights.
#[derive(Clone, Copy)]
pub enum Predicate {
    Pair(PairWeightFn),
    Bulk(BulkWeightFn),
}

/// Index of a relation in its [`RelationSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationId(pub u16);

impl RelationId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named weighted predicate.
#[derive(Clone)]
pub struct Relation {
    name: &'static str,
    symmetric: bool,
    inverse: Option<&'static str>,
    predicate: Predicate,
    metric: Option<MetricFn>,
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("name", &self.name)
            .field("symmetric", &self.symmetric)
            .field("inverse", &self.inverse)
            .field("bulk", &self.is_bulk())
            .finish()
    }
}

impl Relation {
    pub fn pair(name: &'static str, weight: PairWeightFn) -> Self {
        Self {
            name,
            symmetric: false,
            inverse: None,
            predicate: Predicate::Pair(weight),
            metric: None,
        }
    }

    pub fn bulk(name: &'static str, weight: BulkWeightFn) -> Self {
        Self {
            name,
            symmetric: false,
            inverse: None,
            predicate: Predicate::Bulk(weight),
            metric: None,
        }
    }

    pub fn symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }

    pub fn with_inverse(mut self, inverse: &'static str) -> Self {
        self.inverse = Some(inverse);
        self
    }

    pub fn with_metric(mut self, metric: MetricFn) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn inverse_name(&self) -> Option<&'static str> {
        self.inverse
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self.predicate, Predicate::Bulk(_))
    }

    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    pub fn metric(&self) -> Option<MetricFn> {
        self.metric
    }

    /// Weight of `a1 r a2`: either exactly 0 or within `[min_weight, 1]`.
    ///
    /// Bulk relations have no pairwise form and always return 0 here; their
    /// weights come from [`Relation::bulk_weights`].
    pub fn weight(&self, ctx: &RelationContext<'_>, a1: &Area, a2: &Area, min_weight: f64) -> f64 {
        match self.predicate {
            Predicate::Pair(f) if a1.id() != a2.id() => normalize_weight(f(ctx, a1, a2), min_weight),
            _ => 0.0,
        }
    }

    /// All weighted pairs of a bulk relation, thresholded like [`Relation::weight`].
    pub fn bulk_weights(&self, ctx: &RelationContext<'_>, min_weight: f64) -> Vec<(AreaId, AreaId, f64)> {
        match self.predicate {
            Predicate::Bulk(f) => f(ctx)
                .into_iter()
                .filter(|(a1, a2, _)| a1 != a2)
                .map(|(a1, a2, w)| (a1, a2, normalize_weight(w, min_weight)))
                .filter(|(_, _, w)| *w > 0.0)
                .collect(),
            Predicate::Pair(_) => Vec::new(),
        }
    }
}

/// Clamps a raw weight to `[0, 1]` and zeroes anything under `min_weight`.
pub(crate) fn normalize_weight(raw: f64, min_weight: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    let w = raw.clamp(0.0, 1.0);
    if w < min_weight { 0.0 } else { w }
}

/// The font-relative distance unit of a pair: the larger font size.
pub(crate) fn em(a: &Area, b: &Area) -> f64 {
    a.font_size().max(b.font_size()).max(1.0)
}

/// Everything a predicate may look at besides the two areas.
pub struct RelationContext<'a> {
    tree: &'a AreaTree,
    topology: &'a dyn AreaTopology,
    line_dominant: FxHashSet<AreaId>,
}

impl<'a> RelationContext<'a> {
    pub fn new(tree: &'a AreaTree, topology: &'a dyn AreaTopology) -> Self {
        let line_dominant = heading::line_dominant_areas(tree, topology.areas());
        Self {
            tree,
            topology,
            line_dominant,
        }
    }

    pub fn tree(&self) -> &'a AreaTree {
        self.tree
    }

    pub fn topology(&self) -> &'a dyn AreaTopology {
        self.topology
    }

    /// Areas of the corpus.
    pub fn areas(&self) -> &'a [AreaId] {
        self.topology.areas()
    }

    pub fn page_width(&self) -> f64 {
        self.tree.page_width().max(1.0)
    }

    pub fn page_height(&self) -> f64 {
        self.tree.page_height().max(1.0)
    }

    /// Areas more marked than every other area on their text line.
    pub(crate) fn is_line_dominant(&self, id: AreaId) -> bool {
        self.line_dominant.contains(&id)
    }

    /// Corpus areas sharing a parent with `area`, excluding `area` itself.
    pub(crate) fn siblings(&self, area: &Area) -> impl Iterator<Item = &'a Area> + use<'a> {
        let tree = self.tree;
        let parent = area.parent();
        let id = area.id();
        self.areas()
            .iter()
            .map(move |c| &tree[*c])
            .filter(move |c| c.id() != id && c.parent() == parent)
    }
}

/// Registry of the relations known to the engine, keyed by name.
#[derive(Debug, Clone)]
pub struct RelationSet {
    relations: Vec<Relation>,
}

impl Default for RelationSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RelationSet {
    pub fn empty() -> Self {
        Self {
            relations: Vec::new(),
        }
    }

    /// The standard relation table.
    pub fn standard() -> Self {
        let mut set = Self::empty();
        set.register(
            Relation::pair("below", vertical::below)
                .with_inverse("above")
                .with_metric(vertical::vertical_gap),
        );
        set.register(
            Relation::pair("above", vertical::above)
                .with_inverse("below")
                .with_metric(vertical::vertical_gap_inverse),
        );
        set.register(Relation::pair("under", vertical::under).with_metric(vertical::vertical_gap));
        set.register(
            Relation::pair("side", horizontal::side)
                .symmetric()
                .with_metric(horizontal::horizontal_gap),
        );
        set.register(
            Relation::pair("onLeft", horizontal::on_left)
                .with_inverse("onRight")
                .with_metric(horizontal::horizontal_gap),
        );
        set.register(
            Relation::pair("onRight", horizontal::on_right)
                .with_inverse("onLeft")
                .with_metric(horizontal::horizontal_gap),
        );
        set.register(
            Relation::pair("after", horizontal::after)
                .with_inverse("before")
                .with_metric(horizontal::horizontal_gap),
        );
        set.register(
            Relation::pair("before", horizontal::before)
                .with_inverse("after")
                .with_metric(horizontal::horizontal_gap),
        );
        set.register(
            Relation::pair("sameLine", horizontal::same_line)
                .symmetric()
                .with_metric(horizontal::horizontal_gap),
        );
        set.register(
            Relation::pair("underHeading", heading::under_heading)
                .with_metric(heading::heading_offset),
        );
        set.register(
            Relation::bulk("lineBelow", vertical::line_below).with_metric(vertical::vertical_gap),
        );
        set
    }

    /// Adds a relation, replacing any relation with the same name.
    pub fn register(&mut self, relation: Relation) -> RelationId {
        if let Some(pos) = self.relations.iter().position(|r| r.name == relation.name) {
            self.relations[pos] = relation;
            return RelationId(pos as u16);
        }
        self.relations.push(relation);
        RelationId((self.relations.len() - 1) as u16)
    }

    /// A copy holding only the named relations, in the given order.
    pub fn subset(&self, names: &[&str]) -> Result<Self> {
        let mut out = Self::empty();
        for name in names {
            let id = self.by_name(name)?;
            out.register(self.relations[id.index()].clone());
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn get(&self, id: RelationId) -> &Relation {
        &self.relations[id.index()]
    }

    pub fn name(&self, id: RelationId) -> &'static str {
        self.relations[id.index()].name
    }

    pub fn by_name(&self, name: &str) -> Result<RelationId> {
        self.relations
            .iter()
            .position(|r| r.name == name)
            .map(|i| RelationId(i as u16))
            .ok_or_else(|| MineError::UnknownRelation(name.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = RelationId> + '_ {
        (0..self.relations.len()).map(|i| RelationId(i as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelationId, &Relation)> {
        self.relations
            .iter()
            .enumerate()
            .map(|(i, r)| (RelationId(i as u16), r))
    }

    pub fn is_symmetric(&self, id: RelationId) -> bool {
        self.relations[id.index()].symmetric
    }

    /// The declared inverse of a relation, if it is part of this set.
    pub fn inverse_of(&self, id: RelationId) -> Option<RelationId> {
        self.relations[id.index()]
            .inverse
            .and_then(|name| self.by_name(name).ok())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::flat_page;
    use super::*;
    use crate::geometry::GridTopology;
    use crate::model::Rect;

    #[test]
    fn standard_set_metadata() {
        let set = RelationSet::standard();
        let below = set.by_name("below").unwrap();
        let above = set.by_name("above").unwrap();
        assert_eq!(set.inverse_of(below), Some(above));
        assert_eq!(set.inverse_of(above), Some(below));
        assert!(set.is_symmetric(set.by_name("sameLine").unwrap()));
        assert!(set.get(set.by_name("lineBelow").unwrap()).is_bulk());
        assert!(matches!(
            set.by_name("diagonal"),
            Err(MineError::UnknownRelation(_))
        ));
    }

    #[test]
    fn subset_drops_dangling_inverse() {
        let set = RelationSet::standard().subset(&["below", "after"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.inverse_of(set.by_name("below").unwrap()), None);
    }

    #[test]
    fn weights_are_zero_or_within_bounds() {
        let rects: Vec<(Rect, f64)> = (0..6)
            .map(|i| {
                let x = (i % 3) as f64 * 120.0;
                let y = (i / 3) as f64 * 16.0;
                (Rect::new(x, y, x + 100.0, y + 12.0), 10.0 + (i % 2) as f64 * 4.0)
            })
            .collect();
        let (tree, ids) = flat_page(&rects);
        let topo = GridTopology::new(&tree, &ids);
        let ctx = RelationContext::new(&tree, &topo);
        let set = RelationSet::standard();
        let min = 0.3;
        for (_, rel) in set.iter() {
            for a in &ids {
                for b in &ids {
                    let w = rel.weight(&ctx, &tree[*a], &tree[*b], min);
                    assert!(w == 0.0 || (min..=1.0).contains(&w), "{} {w}", rel.name());
                }
            }
            for (_, _, w) in rel.bulk_weights(&ctx, min) {
                assert!((min..=1.0).contains(&w));
            }
        }
    }

    #[test]
    fn normalize_rejects_nan_and_small() {
        assert_eq!(normalize_weight(f64::NAN, 0.1), 0.0);
        assert_eq!(normalize_weight(0.05, 0.1), 0.0);
        assert_eq!(normalize_weight(1.7, 0.1), 1.0);
    }
}
