//! Configuration scoring.
//!
//! Raw measures are taken per configuration independently; the statistics
//! used for normalization are collected afterwards over all measures of the
//! run, so evaluation order does not affect scores.

use crate::model::AreaTree;
use crate::params::{MinerParams, ScoreWeights};
use crate::relations::RelationSet;
use crate::style::StyleSpec;

use super::config::MatcherConfiguration;
use super::corpus::Corpus;
use super::hints::PresentationHint;
use super::matches::MatchResult;

/// Run-wide maxima used to normalize scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStatistics {
    pub max_matches: usize,
    pub max_covered: usize,
    pub max_metric: f64,
}

impl MatchStatistics {
    pub fn observe(&mut self, measures: &Measures) {
        self.max_matches = self.max_matches.max(measures.matches);
        self.max_covered = self.max_covered.max(measures.covered);
        if let Some(m) = measures.metric {
            self.max_metric = self.max_metric.max(m);
        }
    }
}

/// Unnormalized quality measures of one match result.
#[derive(Debug, Clone, PartialEq)]
pub struct Measures {
    pub matches: usize,
    pub covered: usize,
    /// Smallest standard deviation of a relation metric, taken per pattern
    /// edge; None when no pattern edge has a metric.
    pub metric: Option<f64>,
    pub style_consistency: f64,
    pub connection_weight: f64,
    pub hint_compliance: f64,
}

/// The terms of a composite score, each in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub coverage: f64,
    pub metric_consistency: f64,
    pub style_consistency: f64,
    pub connection_weight: f64,
    pub hint_compliance: f64,
}

impl ScoreBreakdown {
    pub fn composite(&self, weights: &ScoreWeights) -> f64 {
        let total = weights.total();
        if total <= 0.0 {
            return 0.0;
        }
        (weights.coverage * self.coverage
            + weights.metric_consistency * self.metric_consistency
            + weights.style_consistency * self.style_consistency
            + weights.connection_weight * self.connection_weight
            + weights.hint_compliance * self.hint_compliance)
            / total
    }
}

/// A ranked configuration.
#[derive(Debug, Clone)]
pub struct ScoredConfiguration {
    pub configuration: MatcherConfiguration,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub measures: Measures,
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

pub(crate) fn measure(
    result: &MatchResult,
    conf: &MatcherConfiguration,
    corpus: &Corpus,
    tree: &AreaTree,
    relations: &RelationSet,
    params: &MinerParams,
) -> Measures {
    let mut metric: Option<f64> = None;
    for edge in conf.pattern().edges() {
        let Some(f) = relations.get(edge.relation).metric() else {
            continue;
        };
        let values: Vec<f64> = result
            .matches()
            .iter()
            .flat_map(|m| {
                m.connections().iter().filter(move |c| {
                    c.relation == edge.relation && m.get(&edge.a1).contains(&c.a1) && m.get(&edge.a2).contains(&c.a2)
                })
            })
            .map(|c| f(&tree[c.a1], &tree[c.a2]))
            .collect();
        if values.is_empty() {
            continue;
        }
        let sd = std_dev(&values);
        metric = Some(metric.map_or(sd, |m: f64| m.min(sd)));
    }

    // Exact agreement: areas admitted only through the analyzer's tolerance
    // do not count.
    let style_of = |area| StyleSpec::exact(tree[corpus.source_of(area)].style());
    let consistent = result
        .matches()
        .iter()
        .filter(|m| {
            conf.style_map()
                .iter()
                .all(|(tag, spec)| m.get(tag).iter().all(|a| spec.covers(&style_of(*a))))
        })
        .count();
    let style_consistency = if result.is_empty() {
        0.0
    } else {
        consistent as f64 / result.len() as f64
    };

    let weights: Vec<f64> = result
        .connections()
        .map(|c| (c.weight * params.relation_prior(relations.name(c.relation))).clamp(0.0, 1.0))
        .collect();
    let connection_weight = if weights.is_empty() {
        0.0
    } else {
        weights.iter().sum::<f64>() / weights.len() as f64
    };

    let mut hinted = 0usize;
    let mut compliant = 0usize;
    for (tag, hints) in conf.all_hints() {
        if !hints.contains(PresentationHint::SingleLine) {
            continue;
        }
        for m in result.matches() {
            let areas = m.get(tag);
            let Some(first) = areas.first() else {
                continue;
            };
            hinted += 1;
            let line = tree[*first].bounds();
            if areas.iter().all(|a| tree[*a].bounds().is_same_line(line)) {
                compliant += 1;
            }
        }
    }
    let hint_compliance = if hinted == 0 {
        1.0
    } else {
        compliant as f64 / hinted as f64
    };

    Measures {
        matches: result.len(),
        covered: result.areas().len(),
        metric,
        style_consistency,
        connection_weight,
        hint_compliance,
    }
}

/// Normalizes raw measures against the run statistics.
pub fn breakdown(measures: &Measures, stats: &MatchStatistics) -> ScoreBreakdown {
    let coverage = if stats.max_covered == 0 {
        0.0
    } else {
        measures.covered as f64 / stats.max_covered as f64
    };
    let metric_consistency = match measures.metric {
        None => 0.5,
        Some(_) if stats.max_metric <= 0.0 => 1.0,
        Some(m) => 1.0 - m / stats.max_metric,
    };
    ScoreBreakdown {
        coverage,
        metric_consistency,
        style_consistency: measures.style_consistency,
        connection_weight: measures.connection_weight,
        hint_compliance: measures.hint_compliance,
    }
}

/// Scores every entry against statistics gathered over all of them and
/// sorts by score, descending. The sort is stable: equal scores keep their
/// generation order.
pub fn rank(
    entries: Vec<(MatcherConfiguration, Measures)>,
    weights: &ScoreWeights,
    limit: usize,
) -> (Vec<ScoredConfiguration>, MatchStatistics) {
    let mut stats = MatchStatistics::default();
    for (_, m) in &entries {
        stats.observe(m);
    }
    let mut ranked: Vec<ScoredConfiguration> = entries
        .into_iter()
        .map(|(configuration, measures)| {
            let breakdown = breakdown(&measures, &stats);
            ScoredConfiguration {
                configuration,
                score: breakdown.composite(weights),
                breakdown,
                measures,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    (ranked, stats)
}
