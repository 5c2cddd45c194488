//! The matchable content of one document for one attribute group.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::analysis::{RelationAnalyzer, TagConnectionIndex};
use crate::model::{AreaId, AreaTree, Tag};
use crate::params::MinerParams;
use crate::pattern::AttributeGroup;
use crate::relations::RelationSet;
use crate::style::{Disambiguator, TagAssignment};

use super::chunks::{Chunk, ChunkCache, ChunkSource};
use super::matches::Match;

/// Chunks of the group's own tags plus the areas of resolved dependency
/// matches, in document order, with their connection graph.
pub(crate) struct Corpus {
    chunks: Vec<Chunk>,
    source_of: FxHashMap<AreaId, AreaId>,
    order: FxHashMap<AreaId, usize>,
    dependencies: IndexMap<Tag, Vec<Match>>,
    dependency_areas: FxHashMap<AreaId, Tag>,
    analyzer: RelationAnalyzer,
}

impl Corpus {
    pub(crate) fn build(
        tree: &AreaTree,
        root: AreaId,
        group: &AttributeGroup,
        dependencies: IndexMap<Tag, Vec<Match>>,
        relations: &RelationSet,
        params: &MinerParams,
        cache: &mut ChunkCache,
    ) -> Self {
        let source = ChunkSource::new(tree, root);
        let position: FxHashMap<AreaId, usize> = source
            .leaves()
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let mut dependency_areas: FxHashMap<AreaId, Tag> = FxHashMap::default();
        for (tag, matches) in &dependencies {
            for area in matches.iter().flat_map(|m| m.areas()) {
                dependency_areas.entry(area).or_insert_with(|| tag.clone());
            }
        }

        let mut seen: FxHashSet<AreaId> = dependency_areas.keys().copied().collect();
        let mut chunks: Vec<Chunk> = Vec::new();
        for attr in group.attributes() {
            if dependencies.contains_key(attr.tag()) {
                continue;
            }
            for chunk in cache.get(&source, attr.tag(), attr.hints(), attr.min_support()) {
                if seen.insert(chunk.source) {
                    chunks.push(*chunk);
                }
            }
        }
        if params.allow_new_tags {
            for &leaf in source.leaves() {
                if seen.insert(leaf) {
                    chunks.push(Chunk {
                        area: leaf,
                        source: leaf,
                    });
                }
            }
        }
        chunks.extend(dependency_areas.keys().map(|&a| Chunk { area: a, source: a }));
        chunks.sort_by_key(|c| (position.get(&c.source).copied().unwrap_or(usize::MAX), c.source));
        let mut areas_seen = FxHashSet::default();
        chunks.retain(|c| areas_seen.insert(c.area));

        let areas: Vec<AreaId> = chunks.iter().map(|c| c.area).collect();
        let order = areas.iter().enumerate().map(|(i, a)| (*a, i)).collect();
        let source_of = chunks.iter().map(|c| (c.area, c.source)).collect();
        let analyzer = RelationAnalyzer::new(tree, &areas, relations, params.min_relation_weight);

        Self {
            chunks,
            source_of,
            order,
            dependencies,
            dependency_areas,
            analyzer,
        }
    }

    /// Source leaves of the group's own chunks.
    pub(crate) fn own_sources(&self) -> Vec<AreaId> {
        self.chunks
            .iter()
            .filter(|c| !self.dependency_areas.contains_key(&c.area))
            .map(|c| c.source)
            .collect()
    }

    pub(crate) fn analyzer(&self) -> &RelationAnalyzer {
        &self.analyzer
    }

    pub(crate) fn dependencies(&self) -> &IndexMap<Tag, Vec<Match>> {
        &self.dependencies
    }

    /// The leaf a chunk area was derived from.
    pub(crate) fn source_of(&self, area: AreaId) -> AreaId {
        self.source_of.get(&area).copied().unwrap_or(area)
    }

    /// Position of an area in document order.
    pub(crate) fn position(&self, area: AreaId) -> usize {
        self.order.get(&area).copied().unwrap_or(usize::MAX)
    }

    /// Tags every chunk through `disambiguator`; dependency areas carry the
    /// dependency's tag.
    pub(crate) fn assign(&self, tree: &AreaTree, disambiguator: &Disambiguator) -> TagAssignment {
        let mut out = TagAssignment::default();
        for chunk in &self.chunks {
            if let Some(tag) = self.dependency_areas.get(&chunk.area) {
                out.insert(chunk.area, tag.clone());
            } else if let Some(tag) = disambiguator.get_area_tag(&tree[chunk.source]) {
                out.insert(chunk.area, tag);
            }
        }
        out
    }

    /// Tag-connection counts of the sample under an assignment.
    pub(crate) fn tag_index(&self, assignment: &TagAssignment) -> TagConnectionIndex {
        TagConnectionIndex::build(&self.analyzer, &|a| assignment.tag_of(a).cloned())
    }
}
