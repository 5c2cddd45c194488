//! Serializable views of ranked configurations and extracted records.

use boxmatch_core::matcher::ScoredConfiguration;
use boxmatch_core::{AreaTree, Match, RelationSet};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ConfigurationView {
    pub index: usize,
    pub score: f64,
    pub matches: usize,
    pub covered: usize,
    pub pattern: String,
    pub constraints: Option<String>,
    pub styles: Vec<(String, String)>,
    pub breakdown: BreakdownView,
}

#[derive(Debug, Serialize)]
pub struct BreakdownView {
    pub coverage: f64,
    pub metric_consistency: f64,
    pub style_consistency: f64,
    pub connection_weight: f64,
    pub hint_compliance: f64,
}

impl ConfigurationView {
    pub fn new(index: usize, scored: &ScoredConfiguration, relations: &RelationSet) -> Self {
        let conf = &scored.configuration;
        let b = &scored.breakdown;
        Self {
            index,
            score: scored.score,
            matches: scored.measures.matches,
            covered: scored.measures.covered,
            pattern: conf.pattern().display(relations),
            constraints: conf.constraints().map(|c| c.display(relations)),
            styles: conf
                .style_map()
                .iter()
                .map(|(tag, spec)| (tag.to_string(), spec.to_string()))
                .collect(),
            breakdown: BreakdownView {
                coverage: b.coverage,
                metric_consistency: b.metric_consistency,
                style_consistency: b.style_consistency,
                connection_weight: b.connection_weight,
                hint_compliance: b.hint_compliance,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Field {
    pub tag: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordView {
    /// Fields in binding order.
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<NestedView>,
}

#[derive(Debug, Serialize)]
pub struct NestedView {
    pub tag: String,
    pub record: RecordView,
}

impl RecordView {
    pub fn new(m: &Match, tree: &AreaTree) -> Self {
        let fields = m
            .bindings()
            .iter()
            .map(|(tag, areas)| Field {
                tag: tag.to_string(),
                values: areas
                    .iter()
                    .filter(|&&id| tree.get(id).is_some())
                    .map(|&id| tree.text_under(id))
                    .collect(),
            })
            .collect();
        let nested = m
            .sub_matches()
            .map(|(tag, sub)| NestedView {
                tag: tag.to_string(),
                record: RecordView::new(sub, tree),
            })
            .collect();
        Self { fields, nested }
    }
}
