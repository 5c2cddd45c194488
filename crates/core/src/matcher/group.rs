//! The attribute group matcher: configuration search and runtime matching
//! for one record schema.

use std::time::Instant;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::analysis::TagConnection;
use crate::error::{MineError, Result};
use crate::model::{AreaId, AreaTree, Tag};
use crate::params::MinerParams;
use crate::pattern::{Attribute, AttributeGroup, ConfigurationRegistry, PatternGenerator};
use crate::relations::RelationSet;
use crate::style::{Disambiguator, FixedStyleAnalyzer, StyleGenerator, StyleMap};

use super::backtrack::BacktrackingMatcher;
use super::chunks::ChunkCache;
use super::config::MatcherConfiguration;
use super::constraints::infer_constraints;
use super::corpus::Corpus;
use super::matches::Match;
use super::scoring::{self, Measures, MatchStatistics, ScoredConfiguration};

/// Discovers extraction configurations for an attribute group on a sample
/// document and applies the selected one to other documents.
///
/// The matcher starts unconfigured. [`configure`](Self::configure) ranks
/// configurations; one of them is selected with
/// [`set_used_conf`](Self::set_used_conf) before matching.
pub struct AttributeGroupMatcher {
    group: AttributeGroup,
    relations: RelationSet,
    params: MinerParams,
    dependencies: IndexMap<Tag, AttributeGroupMatcher>,
    configured: bool,
    best: Vec<ScoredConfiguration>,
    stats: MatchStatistics,
    used: Option<usize>,
}

impl AttributeGroupMatcher {
    pub fn new(group: AttributeGroup, relations: RelationSet, params: MinerParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            group,
            relations,
            params,
            dependencies: IndexMap::new(),
            configured: false,
            best: Vec::new(),
            stats: MatchStatistics::default(),
            used: None,
        })
    }

    pub fn group(&self) -> &AttributeGroup {
        &self.group
    }

    pub fn relations(&self) -> &RelationSet {
        &self.relations
    }

    pub fn params(&self) -> &MinerParams {
        &self.params
    }

    /// Binds `tag` to the records found by `matcher`, which must have a
    /// selected configuration. Dependencies are matched first and their
    /// records bound as a whole.
    pub fn add_dependency(&mut self, tag: impl Into<Tag>, matcher: AttributeGroupMatcher) -> Result<()> {
        let tag = tag.into();
        if !self.group.contains(&tag) {
            return Err(MineError::UnknownTag(tag.to_string()));
        }
        if matcher.used_conf().is_none() {
            return Err(MineError::DependencyNotReady(tag.to_string()));
        }
        self.dependencies.insert(tag, matcher);
        Ok(())
    }

    /// Whether a record may bind several areas to `tag`.
    pub fn is_tag_many(&self, tag: &Tag) -> bool {
        self.group.is_many(tag)
    }

    pub fn key_tag(&self) -> Option<&Tag> {
        self.group.key_attribute().map(Attribute::tag)
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Ranked configurations of the last [`configure`](Self::configure), best first.
    pub fn best_configurations(&self) -> &[ScoredConfiguration] {
        &self.best
    }

    pub fn statistics(&self) -> &MatchStatistics {
        &self.stats
    }

    pub fn set_used_conf(&mut self, index: usize) -> Result<()> {
        if !self.configured {
            return Err(MineError::NotConfigured);
        }
        if index >= self.best.len() {
            return Err(MineError::InvalidConfigurationIndex {
                index,
                len: self.best.len(),
            });
        }
        self.used = Some(index);
        Ok(())
    }

    pub fn used_conf(&self) -> Option<&ScoredConfiguration> {
        self.used.and_then(|i| self.best.get(i))
    }

    fn own_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.group
            .attributes()
            .iter()
            .filter(|a| !self.dependencies.contains_key(a.tag()))
    }

    /// A disambiguator fixed to one style map.
    fn disambiguator(&self, styles: &StyleMap) -> Disambiguator {
        let tags = self
            .own_attributes()
            .map(|a| (a.tag().clone(), a.min_support()))
            .collect();
        let analyzer = FixedStyleAnalyzer::new(styles.clone(), self.params.style_tolerance.clone());
        Disambiguator::new(tags)
            .with_analyzer(Box::new(analyzer))
            .allow_new_tags(self.params.allow_new_tags)
    }

    fn resolve_dependencies(&self, tree: &AreaTree, root: AreaId) -> Result<IndexMap<Tag, Vec<Match>>> {
        let mut out = IndexMap::new();
        for (tag, dep) in &self.dependencies {
            out.insert(tag.clone(), dep.try_match(tree, root)?);
        }
        Ok(out)
    }

    fn build_corpus(&self, tree: &AreaTree, root: AreaId, dependencies: IndexMap<Tag, Vec<Match>>) -> Corpus {
        let mut cache = ChunkCache::new();
        Corpus::build(
            tree,
            root,
            &self.group,
            dependencies,
            &self.relations,
            &self.params,
            &mut cache,
        )
    }

    /// Generates, evaluates and ranks every configuration for the sample
    /// document under `root`. Returns the ranked list, which may be empty.
    pub fn configure(&mut self, tree: &AreaTree, root: AreaId) -> &[ScoredConfiguration] {
        let started = Instant::now();
        let deadline = self.params.deadline.map(|d| started + d);
        match self.key_tag() {
            Some(key) => tracing::debug!(key = %key, "key attribute"),
            None => tracing::warn!("no key attribute; records may overlap"),
        }

        let dependencies = match self.resolve_dependencies(tree, root) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "dependency matching failed");
                IndexMap::new()
            }
        };
        let corpus = self.build_corpus(tree, root, dependencies);

        let weak = Disambiguator::new(
            self.own_attributes()
                .map(|a| (a.tag().clone(), a.min_support()))
                .collect(),
        );
        let index = corpus.tag_index(&corpus.assign(tree, &weak));

        let own: Vec<&Attribute> = self.own_attributes().collect();
        let style_maps = if own.is_empty() {
            vec![StyleMap::new()]
        } else {
            StyleGenerator::new(tree, &corpus.own_sources(), own.iter().copied(), self.params.wildcard_budget)
                .generate_style_maps(self.params.min_style_frequency)
        };

        let fixed: Vec<TagConnection> = self
            .dependencies
            .values()
            .filter_map(|d| d.used_conf())
            .flat_map(|c| c.configuration.pattern().edges().iter().cloned())
            .collect();
        let patterns = PatternGenerator::new(
            &self.group,
            &index,
            &self.relations,
            self.params.min_relation_frequency,
        )
        .with_fixed(fixed)
        .generate();

        let hints: IndexMap<Tag, _> = self
            .group
            .attributes()
            .iter()
            .map(|a| (a.tag().clone(), a.hints().clone()))
            .collect();
        let mut registry = ConfigurationRegistry::new(&self.relations);
        let mut configurations = Vec::new();
        for pattern in &patterns {
            for styles in &style_maps {
                let conf = MatcherConfiguration::new(styles.clone(), pattern.clone())
                    .with_hints(hints.clone());
                if self.params.dedup_equivalent && !registry.register(&conf) {
                    continue;
                }
                configurations.push(conf);
            }
        }
        let generated = configurations.len();

        let expired = || deadline.is_some_and(|d| Instant::now() >= d);
        let evaluated: Vec<(MatcherConfiguration, Measures)> = if self.params.parallel {
            configurations
                .into_par_iter()
                .filter_map(|conf| (!expired()).then(|| self.evaluate(conf, &corpus, tree)))
                .collect()
        } else {
            let mut out = Vec::with_capacity(configurations.len());
            for conf in configurations {
                if expired() {
                    break;
                }
                out.push(self.evaluate(conf, &corpus, tree));
            }
            out
        };
        if evaluated.len() < generated {
            tracing::warn!(
                evaluated = evaluated.len(),
                generated,
                "deadline reached before all configurations were evaluated"
            );
        }

        let (ranked, stats) = scoring::rank(evaluated, &self.params.weights, self.params.best_candidate_limit);
        tracing::info!(
            patterns = patterns.len(),
            style_maps = style_maps.len(),
            configurations = generated,
            best_score = ranked.first().map(|r| r.score),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "configuration search finished"
        );

        self.best = ranked;
        self.stats = stats;
        self.used = None;
        self.configured = true;
        &self.best
    }

    /// Runs one configuration over the corpus, adding consistency
    /// constraints when the matches disagree on an unconstrained tag pair.
    fn evaluate(&self, conf: MatcherConfiguration, corpus: &Corpus, tree: &AreaTree) -> (MatcherConfiguration, Measures) {
        let disambiguator = self.disambiguator(conf.style_map());
        let assignment = corpus.assign(tree, &disambiguator);
        let matcher = BacktrackingMatcher::new(corpus.analyzer(), &assignment, &self.group)
            .with_dependencies(corpus.dependencies());

        let mut conf = conf;
        let mut result = matcher.find_matches(conf.pattern(), conf.constraints());
        if conf.constraints().is_none() {
            let constraints = infer_constraints(&result, conf.pattern(), corpus.analyzer());
            if !constraints.is_empty() {
                conf = conf.with_constraints(constraints);
                result = matcher.find_matches(conf.pattern(), conf.constraints());
            }
        }
        let measures = scoring::measure(&result, &conf, corpus, tree, &self.relations, &self.params);
        tracing::debug!(
            configuration = %conf.display(&self.relations),
            matches = measures.matches,
            covered = measures.covered,
            "configuration evaluated"
        );
        (conf, measures)
    }

    /// Applies the selected configuration to the document under `root`.
    ///
    /// Logs an error and returns no records when the matcher is not
    /// configured or no configuration is selected.
    pub fn match_areas(&self, tree: &AreaTree, root: AreaId) -> Vec<Match> {
        match self.try_match(tree, root) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(error = %e, "cannot match");
                Vec::new()
            }
        }
    }

    /// Like [`match_areas`](Self::match_areas), reporting misuse as an error.
    pub fn try_match(&self, tree: &AreaTree, root: AreaId) -> Result<Vec<Match>> {
        if !self.configured {
            return Err(MineError::NotConfigured);
        }
        let conf = &self
            .used_conf()
            .ok_or(MineError::NoConfigurationSelected)?
            .configuration;
        let dependencies = self.resolve_dependencies(tree, root)?;
        let corpus = self.build_corpus(tree, root, dependencies);
        let disambiguator = self.disambiguator(conf.style_map());
        let assignment = corpus.assign(tree, &disambiguator);
        let result = BacktrackingMatcher::new(corpus.analyzer(), &assignment, &self.group)
            .with_dependencies(corpus.dependencies())
            .find_matches(conf.pattern(), conf.constraints());
        Ok(self.group_by_key(result.into_matches(), &corpus))
    }

    /// Merges records sharing a key area; records are ordered by the
    /// document position of their key.
    fn group_by_key(&self, matches: Vec<Match>, corpus: &Corpus) -> Vec<Match> {
        let Some(key) = self.key_tag() else {
            return matches;
        };
        let mut grouped: IndexMap<AreaId, Match> = IndexMap::new();
        let mut loose = Vec::new();
        for m in matches {
            match m.get(key).first().copied() {
                Some(k) => match grouped.get_mut(&k) {
                    Some(existing) => existing.merge(m),
                    None => {
                        grouped.insert(k, m);
                    }
                },
                None => loose.push(m),
            }
        }
        grouped.sort_by(|k1, _, k2, _| corpus.position(*k1).cmp(&corpus.position(*k2)));
        grouped.into_values().chain(loose).collect()
    }
}
