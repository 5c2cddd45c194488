//! Arena-backed area tree produced by the rendering engine.
//!
//! Areas are stored in creation order and addressed by [`AreaId`]; ids are
//! stable for the lifetime of the tree and are the only notion of area
//! identity used by the engine.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

use crate::error::{MineError, Result};

use super::rect::Rect;
use super::style::AreaStyle;
use super::tag::Tag;

/// Stable identifier of an area within one [`AreaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(pub u32);

impl AreaId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// A rectangular region of the rendered document.
#[derive(Debug, Clone)]
pub struct Area {
    pub(crate) id: AreaId,
    pub(crate) bounds: Rect,
    pub(crate) parent: Option<AreaId>,
    pub(crate) children: Vec<AreaId>,
    pub(crate) style: AreaStyle,
    pub(crate) text: String,
    pub(crate) tags: IndexMap<Tag, f64>,
    pub(crate) logical_line: Option<u32>,
}

impl Area {
    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn parent(&self) -> Option<AreaId> {
        self.parent
    }

    pub fn children(&self) -> &[AreaId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn style(&self) -> &AreaStyle {
        &self.style
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f64 {
        self.style.font_size
    }

    /// All weak tags with their support scores, in assignment order.
    pub fn tags(&self) -> &IndexMap<Tag, f64> {
        &self.tags
    }

    /// Support of `tag` for this area, 0 when the tag is absent.
    pub fn tag_support(&self, tag: &Tag) -> f64 {
        self.tags.get(tag).copied().unwrap_or(0.0)
    }

    pub fn has_tag(&self, tag: &Tag, min_support: f64) -> bool {
        self.tags.get(tag).is_some_and(|s| *s >= min_support)
    }

    /// Id of the logical line the layout model grouped this area into.
    pub fn logical_line(&self) -> Option<u32> {
        self.logical_line
    }
}

/// The area tree of one rendered page.
#[derive(Debug, Clone)]
pub struct AreaTree {
    areas: Vec<Area>,
    root: AreaId,
}

impl AreaTree {
    /// Creates a tree whose root area covers a page of the given size.
    pub fn new(page_width: f64, page_height: f64) -> Self {
        let root = Area {
            id: AreaId(0),
            bounds: Rect::new(0.0, 0.0, page_width, page_height),
            parent: None,
            children: Vec::new(),
            style: AreaStyle::default(),
            text: String::new(),
            tags: IndexMap::new(),
            logical_line: None,
        };
        Self {
            areas: vec![root],
            root: AreaId(0),
        }
    }

    pub fn root(&self) -> AreaId {
        self.root
    }

    pub fn page_bounds(&self) -> &Rect {
        &self.areas[self.root.index()].bounds
    }

    pub fn page_width(&self) -> f64 {
        self.page_bounds().width()
    }

    pub fn page_height(&self) -> f64 {
        self.page_bounds().height()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.len() <= 1
    }

    pub fn get(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(id.index())
    }

    fn get_mut(&mut self, id: AreaId) -> Result<&mut Area> {
        self.areas
            .get_mut(id.index())
            .ok_or(MineError::UnknownArea(id.0))
    }

    /// Adds a child area under `parent` and returns its id.
    pub fn add_area(
        &mut self,
        parent: AreaId,
        bounds: Rect,
        style: AreaStyle,
        text: impl Into<String>,
    ) -> Result<AreaId> {
        let id = AreaId(self.areas.len() as u32);
        self.get_mut(parent)?.children.push(id);
        self.areas.push(Area {
            id,
            bounds,
            parent: Some(parent),
            children: Vec::new(),
            style,
            text: text.into(),
            tags: IndexMap::new(),
            logical_line: None,
        });
        Ok(id)
    }

    /// Assigns (or overwrites) a weak tag with its support score.
    pub fn add_tag(&mut self, id: AreaId, tag: Tag, support: f64) -> Result<()> {
        self.get_mut(id)?.tags.insert(tag, support);
        Ok(())
    }

    /// Removes a tag; returns its previous support.
    pub fn remove_tag(&mut self, id: AreaId, tag: &Tag) -> Result<Option<f64>> {
        Ok(self.get_mut(id)?.tags.shift_remove(tag))
    }

    pub fn set_logical_line(&mut self, id: AreaId, line: u32) -> Result<()> {
        self.get_mut(id)?.logical_line = Some(line);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    /// Leaf areas under `root` in depth-first document order.
    pub fn leaves(&self, root: AreaId) -> Vec<AreaId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(area) = self.get(id) else {
                continue;
            };
            if area.is_leaf() {
                if id != self.root {
                    out.push(id);
                }
            } else {
                stack.extend(area.children.iter().rev().copied());
            }
        }
        out
    }

    /// Text of the leaves under `id`, space separated. A leaf yields its own
    /// text.
    pub fn text_under(&self, id: AreaId) -> String {
        if self.get(id).is_some_and(Area::is_leaf) {
            return self[id].text.trim().to_string();
        }
        self.leaves(id)
            .into_iter()
            .map(|leaf| self[leaf].text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns true if `ancestor` is `id` itself or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: AreaId, id: AreaId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.get(c).and_then(|a| a.parent);
        }
        false
    }
}

impl Index<AreaId> for AreaTree {
    type Output = Area;

    fn index(&self, id: AreaId) -> &Area {
        &self.areas[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_follow_document_order() {
        let mut tree = AreaTree::new(800.0, 600.0);
        let root = tree.root();
        let block = tree
            .add_area(root, Rect::new(0.0, 0.0, 800.0, 100.0), AreaStyle::default(), "")
            .unwrap();
        let a = tree
            .add_area(block, Rect::new(0.0, 0.0, 100.0, 20.0), AreaStyle::default(), "a")
            .unwrap();
        let b = tree
            .add_area(block, Rect::new(0.0, 20.0, 100.0, 40.0), AreaStyle::default(), "b")
            .unwrap();
        let c = tree
            .add_area(root, Rect::new(0.0, 200.0, 100.0, 220.0), AreaStyle::default(), "c")
            .unwrap();

        assert_eq!(tree.leaves(root), vec![a, b, c]);
        assert_eq!(tree.leaves(block), vec![a, b]);
        assert!(tree.is_ancestor_or_self(block, b));
        assert!(!tree.is_ancestor_or_self(block, c));
        assert_eq!(tree.text_under(block), "a b");
        assert_eq!(tree.text_under(c), "c");
    }

    #[test]
    fn tags_can_be_added_and_removed() {
        let mut tree = AreaTree::new(100.0, 100.0);
        let a = tree
            .add_area(tree.root(), Rect::new(0.0, 0.0, 10.0, 10.0), AreaStyle::default(), "x")
            .unwrap();
        tree.add_tag(a, Tag::from("title"), 0.8).unwrap();
        assert!(tree[a].has_tag(&Tag::from("title"), 0.5));
        assert_eq!(tree.remove_tag(a, &Tag::from("title")).unwrap(), Some(0.8));
        assert_eq!(tree[a].tag_support(&Tag::from("title")), 0.0);
        assert!(matches!(
            tree.add_tag(AreaId(99), Tag::from("x"), 1.0),
            Err(MineError::UnknownArea(99))
        ));
    }
}
