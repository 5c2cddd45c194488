//! Text taggers: the source of the weak tags the engine starts from.

use regex::Regex;

use crate::error::Result;
use crate::model::{AreaId, AreaTree, Tag};

/// A labeled substring found by a tagger. `start` and `len` are byte offsets
/// into the tagged text.
#[derive(Debug, Clone, PartialEq)]
pub struct TagOccurrence {
    pub tag: Tag,
    pub start: usize,
    pub len: usize,
}

/// Extracts labeled occurrences from raw text.
pub trait Tagger: Send + Sync {
    /// The tag this tagger assigns.
    fn tag(&self) -> &Tag;

    /// Support of a perfect occurrence covering the whole text.
    fn base_support(&self) -> f64 {
        1.0
    }

    fn extract(&self, text: &str) -> Vec<TagOccurrence>;
}

/// Tags every match of a regular expression.
#[derive(Debug, Clone)]
pub struct RegexTagger {
    tag: Tag,
    regex: Regex,
    support: f64,
}

impl RegexTagger {
    pub fn new(tag: impl Into<Tag>, pattern: &str) -> Result<Self> {
        Ok(Self {
            tag: tag.into(),
            regex: Regex::new(pattern)?,
            support: 1.0,
        })
    }

    pub fn with_support(mut self, support: f64) -> Self {
        self.support = support.clamp(0.0, 1.0);
        self
    }
}

impl Tagger for RegexTagger {
    fn tag(&self) -> &Tag {
        &self.tag
    }

    fn base_support(&self) -> f64 {
        self.support
    }

    fn extract(&self, text: &str) -> Vec<TagOccurrence> {
        self.regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| TagOccurrence {
                tag: self.tag.clone(),
                start: m.start(),
                len: m.len(),
            })
            .collect()
    }
}

/// Runs every tagger over the text of `areas` and records weak tags.
///
/// The support of a tag is the tagger's base support scaled by the share of
/// the trimmed text its occurrences cover. An existing, higher support is
/// kept. Returns the number of tags written.
pub fn tag_areas(tree: &mut AreaTree, areas: &[AreaId], taggers: &[Box<dyn Tagger>]) -> Result<usize> {
    let mut found: Vec<(AreaId, Tag, f64)> = Vec::new();
    for &id in areas {
        let Some(area) = tree.get(id) else {
            continue;
        };
        let text = area.text().trim();
        if text.is_empty() {
            continue;
        }
        for tagger in taggers {
            let covered: usize = tagger.extract(text).iter().map(|o| o.len).sum();
            if covered == 0 {
                continue;
            }
            let share = (covered as f64 / text.len() as f64).min(1.0);
            let support = tagger.base_support() * share;
            if support > area.tag_support(tagger.tag()) {
                found.push((id, tagger.tag().clone(), support));
            }
        }
    }
    let written = found.len();
    for (id, tag, support) in found {
        tree.add_tag(id, tag, support)?;
    }
    tracing::debug!(areas = areas.len(), tags = written, "weak tags assigned");
    Ok(written)
}
