//! Output attributes and their cardinality rules.

use indexmap::IndexMap;

use crate::matcher::{PresentationHint, PresentationHints};
use crate::model::Tag;

/// A tag of the record schema with its cardinality flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    tag: Tag,
    required: bool,
    many: bool,
    src_many: bool,
    min_support: f64,
    hints: PresentationHints,
}

impl Attribute {
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            required: false,
            many: false,
            src_many: false,
            min_support: 0.0,
            hints: PresentationHints::new(),
        }
    }

    /// Every record must bind this tag.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// A record may bind several areas to this tag.
    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    /// Several records may share the same area for this tag.
    pub fn src_many(mut self) -> Self {
        self.src_many = true;
        self
    }

    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn with_hint(mut self, hint: PresentationHint) -> Self {
        self.hints.insert(hint);
        self
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_many(&self) -> bool {
        self.many
    }

    pub fn is_src_many(&self) -> bool {
        self.src_many
    }

    /// Minimum weak-tag support for an area to count as carrying the tag.
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    pub fn hints(&self) -> &PresentationHints {
        &self.hints
    }

    /// Tags usable as a record seed: single-valued and never shared.
    fn is_single(&self) -> bool {
        !self.many && !self.src_many
    }
}

/// The attributes forming one record schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeGroup {
    attributes: Vec<Attribute>,
}

impl AttributeGroup {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get(&self, tag: &Tag) -> Option<&Attribute> {
        self.attributes.iter().find(|a| &a.tag == tag)
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.get(tag).is_some()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.attributes.iter().map(|a| &a.tag)
    }

    pub fn is_many(&self, tag: &Tag) -> bool {
        self.get(tag).is_some_and(|a| a.many)
    }

    pub fn is_src_many(&self, tag: &Tag) -> bool {
        self.get(tag).is_some_and(|a| a.src_many)
    }

    /// Minimum support per tag, in attribute order.
    pub fn min_supports(&self) -> IndexMap<Tag, f64> {
        self.attributes
            .iter()
            .map(|a| (a.tag.clone(), a.min_support))
            .collect()
    }

    /// The attribute used to seed and group records: the first required
    /// single-valued attribute, else the first single-valued one.
    pub fn key_attribute(&self) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.required && a.is_single())
            .or_else(|| self.attributes.iter().find(|a| a.is_single()))
    }

    /// Tags pattern search starts from: the key tag followed by the other
    /// required tags. Falls back to every tag when nothing qualifies.
    pub fn core_tags(&self) -> Vec<Tag> {
        let mut out: Vec<Tag> = self.key_attribute().map(|a| a.tag.clone()).into_iter().collect();
        for a in &self.attributes {
            if a.required && !out.contains(&a.tag) {
                out.push(a.tag.clone());
            }
        }
        if out.is_empty() {
            out = self.tags().cloned().collect();
        }
        out
    }

    /// Whether an edge `t1 r t2` is excluded from patterns.
    ///
    /// Pairs of two many-valued tags (M:N) are blacklisted, as are edges
    /// leaving a shared, single-valued tag (M:1), so that matching stays
    /// 1:1 or 1:M.
    pub fn is_blacklisted(&self, t1: &Tag, t2: &Tag) -> bool {
        let (Some(a1), Some(a2)) = (self.get(t1), self.get(t2)) else {
            return false;
        };
        (a1.many && a2.many) || (a1.src_many && !a1.many)
    }
}

impl FromIterator<Attribute> for AttributeGroup {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
