//! Mining of representative styles per tag.

use indexmap::IndexMap;
use itertools::Itertools;

use crate::model::{AreaId, AreaTree, Tag};
use crate::pattern::Attribute;

use super::spec::{StyleMap, StyleSpec};

/// A style fingerprint observed (or generalized) for a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleVariant {
    pub style: StyleSpec,
    /// Number of tagged sample areas the fingerprint covers.
    pub count: usize,
    /// `count` relative to the number of tagged sample areas.
    pub frequency: f64,
}

#[derive(Debug)]
struct TagStyles {
    required: bool,
    variants: Vec<StyleVariant>,
}

/// Frequency tables of style fingerprints, one per attribute tag.
#[derive(Debug)]
pub struct StyleGenerator {
    tags: IndexMap<Tag, TagStyles>,
}

impl StyleGenerator {
    /// Scans `areas` for areas carrying each attribute's tag with at least
    /// the attribute's minimum support. Exact fingerprints that differ in at
    /// most `wildcard_budget` fields are also merged into wildcard variants.
    pub fn new<'a>(
        tree: &AreaTree,
        areas: &[AreaId],
        attributes: impl IntoIterator<Item = &'a Attribute>,
        wildcard_budget: usize,
    ) -> Self {
        let mut tags = IndexMap::new();
        for attr in attributes {
            let mut exact: IndexMap<StyleSpec, usize> = IndexMap::new();
            let mut total = 0usize;
            for &id in areas {
                let area = &tree[id];
                if area.has_tag(attr.tag(), attr.min_support()) {
                    *exact.entry(StyleSpec::exact(area.style())).or_default() += 1;
                    total += 1;
                }
            }

            let mut counts: IndexMap<StyleSpec, usize> = exact.clone();
            if wildcard_budget > 0 {
                let styles: Vec<StyleSpec> = exact.keys().copied().collect();
                for (i, a) in styles.iter().enumerate() {
                    for b in &styles[i + 1..] {
                        if a.differing_fields(b) > wildcard_budget {
                            continue;
                        }
                        let general = a.generalize(b);
                        if counts.contains_key(&general) {
                            continue;
                        }
                        let covered = exact
                            .iter()
                            .filter(|(s, _)| general.covers(s))
                            .map(|(_, n)| *n)
                            .sum();
                        counts.insert(general, covered);
                    }
                }
            }

            let mut variants: Vec<StyleVariant> = counts
                .into_iter()
                .map(|(style, count)| StyleVariant {
                    style,
                    count,
                    frequency: if total == 0 { 0.0 } else { count as f64 / total as f64 },
                })
                .collect();
            variants.sort_by(|a, b| b.count.cmp(&a.count));

            tracing::debug!(
                tag = %attr.tag(),
                areas = total,
                variants = variants.len(),
                "style variants collected"
            );
            tags.insert(
                attr.tag().clone(),
                TagStyles {
                    required: attr.is_required(),
                    variants,
                },
            );
        }
        Self { tags }
    }

    /// Variants of `tag` reaching `min_frequency`, most frequent first.
    pub fn variants(&self, tag: &Tag, min_frequency: f64) -> Vec<&StyleVariant> {
        self.tags
            .get(tag)
            .map(|t| {
                t.variants
                    .iter()
                    .filter(|v| v.frequency >= min_frequency)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every combination of one frequent variant per tag.
    ///
    /// Optional tags without any frequent variant are left out of the maps.
    /// A required tag without one makes the result empty.
    pub fn generate_style_maps(&self, min_frequency: f64) -> Vec<StyleMap> {
        let mut choices: Vec<(Tag, Vec<StyleSpec>)> = Vec::new();
        for (tag, styles) in &self.tags {
            let specs: Vec<StyleSpec> = self
                .variants(tag, min_frequency)
                .into_iter()
                .map(|v| v.style)
                .collect();
            if specs.is_empty() {
                if styles.required {
                    tracing::error!(tag = %tag, "no style variants for required tag");
                    return Vec::new();
                }
                continue;
            }
            choices.push((tag.clone(), specs));
        }
        if choices.is_empty() {
            return Vec::new();
        }
        choices
            .iter()
            .map(|(_, specs)| specs.iter().copied())
            .multi_cartesian_product()
            .map(|combo| {
                choices
                    .iter()
                    .map(|(tag, _)| tag.clone())
                    .zip(combo)
                    .collect::<StyleMap>()
            })
            .collect()
    }
}
