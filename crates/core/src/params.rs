//! Pattern discovery parameters.
//!
//! Contains MinerParams for controlling configuration search and scoring.

use std::time::Duration;

use indexmap::IndexMap;

use crate::error::{MineError, Result};

/// Weights of the composite configuration score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    /// Matched areas relative to the best configuration of the run.
    pub coverage: f64,
    /// Stability of the geometric metric of pattern relations.
    pub metric_consistency: f64,
    /// Share of matches whose areas carry the tag's representative style.
    pub style_consistency: f64,
    /// Average weight of the area connections used by the matches.
    pub connection_weight: f64,
    /// Compliance with the presentation hints of the configuration.
    pub hint_compliance: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            coverage: 1.0,
            metric_consistency: 0.5,
            style_consistency: 1.0,
            connection_weight: 0.5,
            hint_compliance: 0.25,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.coverage
            + self.metric_consistency
            + self.style_consistency
            + self.connection_weight
            + self.hint_compliance
    }
}

/// Tolerances used when comparing an area style with a style fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTolerance {
    /// Maximum font size difference in points.
    pub font_size: f64,
    /// Maximum difference of the normalized font weight.
    pub font_weight: f64,
    /// Maximum difference of the normalized font style.
    pub font_style: f64,
}

impl Default for StyleTolerance {
    fn default() -> Self {
        Self {
            font_size: 0.5,
            font_weight: 0.1,
            font_style: 0.1,
        }
    }
}

/// Parameters for configuration search.
#[derive(Debug, Clone, PartialEq)]
pub struct MinerParams {
    /// Connections weaker than this are not recorded. Every recorded
    /// connection weight lies in `[min_relation_weight, 1.0]`.
    pub min_relation_weight: f64,

    /// Number of ranked configurations retained after a search.
    pub best_candidate_limit: usize,

    /// Maximum number of style fields that may differ when two styles are
    /// generalized into one wildcard style. Zero disables generalization.
    pub wildcard_budget: usize,

    /// Fraction of a tag's sample areas a style variant must cover.
    pub min_style_frequency: f64,

    /// Fraction of a tag pair's sample connections a relation must cover to
    /// be tried in a connection pattern.
    pub min_relation_frequency: f64,

    /// Tolerances of the fixed style analyzer.
    pub style_tolerance: StyleTolerance,

    /// If the disambiguator may assign tags inferred from style alone,
    /// without a matching weak tag on the area.
    pub allow_new_tags: bool,

    /// Composite score weights.
    pub weights: ScoreWeights,

    /// Per-relation multipliers applied to connection weights when scoring.
    /// Relations not listed use 1.0.
    pub relation_priors: IndexMap<String, f64>,

    /// Evaluate configurations on the rayon thread pool.
    pub parallel: bool,

    /// Wall-clock budget for one configuration search.
    pub deadline: Option<Duration>,

    /// Skip configurations equivalent to one already generated.
    pub dedup_equivalent: bool,
}

impl Default for MinerParams {
    fn default() -> Self {
        Self {
            min_relation_weight: 0.1,
            best_candidate_limit: 30,
            wildcard_budget: 1,
            min_style_frequency: 0.1,
            min_relation_frequency: 0.1,
            style_tolerance: StyleTolerance::default(),
            allow_new_tags: false,
            weights: ScoreWeights::default(),
            relation_priors: IndexMap::new(),
            parallel: false,
            deadline: None,
            dedup_equivalent: true,
        }
    }
}

impl MinerParams {
    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_relation_weight) || self.min_relation_weight == 0.0 {
            return Err(MineError::InvalidParam {
                name: "min_relation_weight",
                msg: format!("must be in (0, 1], got {}", self.min_relation_weight),
            });
        }
        if self.best_candidate_limit == 0 {
            return Err(MineError::InvalidParam {
                name: "best_candidate_limit",
                msg: "must be positive".to_string(),
            });
        }
        for (name, value) in [
            ("min_style_frequency", self.min_style_frequency),
            ("min_relation_frequency", self.min_relation_frequency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MineError::InvalidParam {
                    name,
                    msg: format!("must be in [0, 1], got {value}"),
                });
            }
        }
        if self.weights.total() <= 0.0 {
            return Err(MineError::InvalidParam {
                name: "weights",
                msg: "weights must sum to a positive value".to_string(),
            });
        }
        Ok(())
    }

    /// Prior multiplier for a relation name.
    pub fn relation_prior(&self, name: &str) -> f64 {
        self.relation_priors.get(name).copied().unwrap_or(1.0)
    }
}
