//! Single-tag assignment from weak tags and visual style.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::model::{Area, AreaId, AreaTree, Tag};

use super::analyzer::StyleAnalyzer;

/// Assigns at most one tag to an area.
///
/// Only the tags registered with the disambiguator are considered; a weak
/// tag counts when its support reaches the tag's minimum. With a style
/// analyzer the inferred tags are intersected with the weak tags, unless new
/// tags are allowed, in which case the inferred tags are used as they are.
/// Remaining ties go to the highest support, then to registration order.
pub struct Disambiguator {
    tags: IndexMap<Tag, f64>,
    analyzer: Option<Box<dyn StyleAnalyzer>>,
    allow_new_tags: bool,
}

impl Disambiguator {
    /// Creates a disambiguator over `tags`, each with its minimum support.
    pub fn new(tags: IndexMap<Tag, f64>) -> Self {
        Self {
            tags,
            analyzer: None,
            allow_new_tags: false,
        }
    }

    pub fn with_analyzer(mut self, analyzer: Box<dyn StyleAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn allow_new_tags(mut self, allow: bool) -> Self {
        self.allow_new_tags = allow;
        self
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.keys()
    }

    fn is_weak(&self, area: &Area, tag: &Tag) -> bool {
        self.tags
            .get(tag)
            .is_some_and(|min| area.has_tag(tag, *min))
    }

    /// The tag assigned to `area`, if any.
    pub fn get_area_tag(&self, area: &Area) -> Option<Tag> {
        let inferred = self.analyzer.as_ref().map(|a| a.infer_tags(area));
        let mut best: Option<(&Tag, f64)> = None;
        for tag in self.tags.keys() {
            let keep = match &inferred {
                None => self.is_weak(area, tag),
                Some(inferred) => {
                    inferred.contains(tag) && (self.allow_new_tags || self.is_weak(area, tag))
                }
            };
            if !keep {
                continue;
            }
            let support = area.tag_support(tag);
            if best.is_none_or(|(_, s)| support > s) {
                best = Some((tag, support));
            }
        }
        best.map(|(tag, _)| tag.clone())
    }

    /// Assigns tags to all `areas`.
    pub fn assign(&self, tree: &AreaTree, areas: &[AreaId]) -> TagAssignment {
        let mut out = TagAssignment::default();
        for &id in areas {
            if let Some(tag) = tree.get(id).and_then(|a| self.get_area_tag(a)) {
                out.insert(id, tag);
            }
        }
        out
    }

    /// Writes the assignment back into the tree: every registered tag other
    /// than the chosen one is removed, and a chosen tag the area did not
    /// carry is added with full support.
    pub fn apply(&self, tree: &mut AreaTree, areas: &[AreaId]) -> Result<TagAssignment> {
        let assignment = self.assign(tree, areas);
        for &id in areas {
            let chosen = assignment.tag_of(id).cloned();
            for tag in self.tags.keys() {
                if Some(tag) != chosen.as_ref() {
                    tree.remove_tag(id, tag)?;
                }
            }
            if let Some(tag) = chosen
                && tree[id].tag_support(&tag) == 0.0
            {
                tree.add_tag(id, tag, 1.0)?;
            }
        }
        Ok(assignment)
    }
}

/// The outcome of disambiguating an area list.
#[derive(Debug, Clone, Default)]
pub struct TagAssignment {
    tag_of: FxHashMap<AreaId, Tag>,
    by_tag: IndexMap<Tag, Vec<AreaId>>,
}

impl TagAssignment {
    pub(crate) fn insert(&mut self, id: AreaId, tag: Tag) {
        self.by_tag.entry(tag.clone()).or_default().push(id);
        self.tag_of.insert(id, tag);
    }

    pub fn tag_of(&self, id: AreaId) -> Option<&Tag> {
        self.tag_of.get(&id)
    }

    pub fn has(&self, id: AreaId, tag: &Tag) -> bool {
        self.tag_of.get(&id) == Some(tag)
    }

    /// Areas assigned `tag`, in input order.
    pub fn areas(&self, tag: &Tag) -> &[AreaId] {
        self.by_tag.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tag_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_of.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AreaStyle, Color, Rect};
    use crate::params::StyleTolerance;
    use crate::style::{FixedStyleAnalyzer, StyleMap, StyleSpec};

    fn tags() -> IndexMap<Tag, f64> {
        IndexMap::from([(Tag::from("title"), 0.1), (Tag::from("author"), 0.1)])
    }

    fn bold() -> AreaStyle {
        AreaStyle::new(14.0, 1.0, 0.0, Color::BLACK)
    }

    fn page() -> (AreaTree, AreaId) {
        let mut tree = AreaTree::new(100.0, 100.0);
        let a = tree
            .add_area(tree.root(), Rect::new(0.0, 0.0, 10.0, 10.0), bold(), "x")
            .unwrap();
        tree.add_tag(a, Tag::from("author"), 0.6).unwrap();
        tree.add_tag(a, Tag::from("title"), 0.4).unwrap();
        tree.add_tag(a, Tag::from("year"), 0.9).unwrap();
        (tree, a)
    }

    fn analyzer(tag: &str) -> Box<dyn StyleAnalyzer> {
        let mut styles = StyleMap::new();
        styles.insert(Tag::from(tag), StyleSpec::exact(&bold()));
        Box::new(FixedStyleAnalyzer::new(styles, StyleTolerance::default()))
    }

    #[test]
    fn weak_tags_only_pick_highest_support() {
        let (tree, a) = page();
        let d = Disambiguator::new(tags());
        assert_eq!(d.get_area_tag(&tree[a]), Some(Tag::from("author")));
        // idempotent
        assert_eq!(d.get_area_tag(&tree[a]), d.get_area_tag(&tree[a]));
    }

    #[test]
    fn style_narrows_weak_tags() {
        let (tree, a) = page();
        let d = Disambiguator::new(tags()).with_analyzer(analyzer("title"));
        assert_eq!(d.get_area_tag(&tree[a]), Some(Tag::from("title")));
    }

    #[test]
    fn new_tags_need_permission() {
        let mut tree = AreaTree::new(100.0, 100.0);
        let a = tree
            .add_area(tree.root(), Rect::new(0.0, 0.0, 10.0, 10.0), bold(), "x")
            .unwrap();
        let strict = Disambiguator::new(tags()).with_analyzer(analyzer("title"));
        assert_eq!(strict.get_area_tag(&tree[a]), None);
        let lax = Disambiguator::new(tags())
            .with_analyzer(analyzer("title"))
            .allow_new_tags(true);
        assert_eq!(lax.get_area_tag(&tree[a]), Some(Tag::from("title")));
    }

    #[test]
    fn apply_writes_back_the_chosen_tag() {
        let (mut tree, a) = page();
        let d = Disambiguator::new(tags()).with_analyzer(analyzer("title"));
        let assignment = d.apply(&mut tree, &[a]).unwrap();
        assert_eq!(assignment.areas(&Tag::from("title")), &[a]);
        assert_eq!(tree[a].tag_support(&Tag::from("author")), 0.0);
        assert_eq!(tree[a].tag_support(&Tag::from("title")), 0.4);
        // unregistered tags are left alone
        assert_eq!(tree[a].tag_support(&Tag::from("year")), 0.9);
    }
}
