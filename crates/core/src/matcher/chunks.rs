//! Chunk extraction: the areas a tag is matched against, after applying
//! presentation hints.

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::model::{AreaId, AreaTree, Tag};

use super::hints::{PresentationHint, PresentationHints};

/// A matchable area and the leaf it was derived from. Tags and style are
/// read from `source`; geometry from `area`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub area: AreaId,
    pub source: AreaId,
}

/// Extracts chunks from the leaves under one root.
pub struct ChunkSource<'a> {
    tree: &'a AreaTree,
    root: AreaId,
    leaves: Vec<AreaId>,
}

impl<'a> ChunkSource<'a> {
    pub fn new(tree: &'a AreaTree, root: AreaId) -> Self {
        Self {
            tree,
            root,
            leaves: tree.leaves(root),
        }
    }

    pub fn tree(&self) -> &'a AreaTree {
        self.tree
    }

    /// Leaves under the root in document order.
    pub fn leaves(&self) -> &[AreaId] {
        &self.leaves
    }

    /// Outermost ancestor of `leaf`, below the root, that holds nothing but
    /// `leaf`.
    fn lift(&self, leaf: AreaId) -> AreaId {
        let mut cur = leaf;
        while let Some(parent) = self.tree[cur].parent() {
            if parent == self.root || self.tree[parent].children().len() != 1 {
                break;
            }
            cur = parent;
        }
        cur
    }

    /// Chunks for the leaves carrying `tag` with at least `min_support`.
    pub fn extract(&self, tag: &Tag, hints: &PresentationHints, min_support: f64) -> Vec<Chunk> {
        let whole_box = hints.contains(PresentationHint::WholeBox);
        self.leaves
            .iter()
            .filter(|id| self.tree[**id].has_tag(tag, min_support))
            .map(|&source| Chunk {
                area: if whole_box { self.lift(source) } else { source },
                source,
            })
            .collect()
    }
}

/// Memoized chunk lists keyed by tag, hints and support threshold.
///
/// Entries are valid for one document only; use a fresh cache (or
/// [`ChunkCache::clear`]) for every document.
#[derive(Debug, Default)]
pub struct ChunkCache {
    entries: FxHashMap<(Tag, PresentationHints, OrderedFloat<f64>), Vec<Chunk>>,
}

impl ChunkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        source: &ChunkSource<'_>,
        tag: &Tag,
        hints: &PresentationHints,
        min_support: f64,
    ) -> &[Chunk] {
        self.entries
            .entry((tag.clone(), hints.clone(), OrderedFloat(min_support)))
            .or_insert_with(|| source.extract(tag, hints, min_support))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AreaStyle, Rect};

    #[test]
    fn whole_box_lifts_to_single_child_ancestors() {
        let mut tree = AreaTree::new(500.0, 500.0);
        let root = tree.root();
        let cell = tree
            .add_area(root, Rect::new(0.0, 0.0, 200.0, 40.0), AreaStyle::default(), "")
            .unwrap();
        let inner = tree
            .add_area(cell, Rect::new(5.0, 5.0, 195.0, 35.0), AreaStyle::default(), "")
            .unwrap();
        let text = tree
            .add_area(inner, Rect::new(10.0, 10.0, 90.0, 22.0), AreaStyle::default(), "price")
            .unwrap();
        let other = tree
            .add_area(root, Rect::new(0.0, 50.0, 90.0, 62.0), AreaStyle::default(), "x")
            .unwrap();
        let price = Tag::from("price");
        tree.add_tag(text, price.clone(), 1.0).unwrap();
        tree.add_tag(other, price.clone(), 0.2).unwrap();

        let source = ChunkSource::new(&tree, root);
        let plain = source.extract(&price, &PresentationHints::new(), 0.5);
        assert_eq!(plain, vec![Chunk { area: text, source: text }]);

        let hints: PresentationHints = [PresentationHint::WholeBox].into_iter().collect();
        let lifted = source.extract(&price, &hints, 0.5);
        assert_eq!(lifted, vec![Chunk { area: cell, source: text }]);

        let mut cache = ChunkCache::new();
        assert_eq!(cache.get(&source, &price, &hints, 0.5).len(), 1);
        assert_eq!(cache.get(&source, &price, &PresentationHints::new(), 0.0).len(), 2);
        assert_eq!(cache.get(&source, &price, &PresentationHints::new(), 0.5).len(), 1);
        assert_eq!(cache.get(&source, &price, &PresentationHints::new(), 0.0).len(), 2);
        assert_eq!(cache.len(), 3);
    }
}
