//! Extraction tasks: the record schema, the taggers producing weak tags and
//! optional search parameter overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use boxmatch_core::matcher::PresentationHint;
use boxmatch_core::{Attribute, AttributeGroup, MinerParams, RegexTagger, RelationSet, Tagger};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TaskFile {
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub taggers: Vec<TaggerSpec>,
    /// Relation names to search; all standard relations when absent.
    #[serde(default)]
    pub relations: Option<Vec<String>>,
    #[serde(default)]
    pub params: ParamOverrides,
}

#[derive(Debug, Deserialize)]
pub struct AttributeSpec {
    pub tag: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub many: bool,
    #[serde(default)]
    pub src_many: bool,
    #[serde(default)]
    pub min_support: Option<f64>,
    #[serde(default)]
    pub hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TaggerSpec {
    pub tag: String,
    pub pattern: String,
    #[serde(default)]
    pub support: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParamOverrides {
    pub min_relation_weight: Option<f64>,
    pub best_candidate_limit: Option<usize>,
    pub wildcard_budget: Option<usize>,
    pub min_style_frequency: Option<f64>,
    pub min_relation_frequency: Option<f64>,
    pub allow_new_tags: Option<bool>,
    pub parallel: Option<bool>,
    pub deadline_ms: Option<u64>,
}

impl TaskFile {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn group(&self) -> Result<AttributeGroup> {
        self.attributes.iter().map(AttributeSpec::to_attribute).collect()
    }

    pub fn taggers(&self) -> Result<Vec<Box<dyn Tagger>>> {
        self.taggers
            .iter()
            .map(|t| {
                let mut tagger = RegexTagger::new(t.tag.as_str(), &t.pattern)
                    .with_context(|| format!("tagger for {}", t.tag))?;
                if let Some(support) = t.support {
                    tagger = tagger.with_support(support);
                }
                Ok(Box::new(tagger) as Box<dyn Tagger>)
            })
            .collect()
    }

    pub fn relations(&self) -> Result<RelationSet> {
        let standard = RelationSet::standard();
        match &self.relations {
            None => Ok(standard),
            Some(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                Ok(standard.subset(&names)?)
            }
        }
    }

    pub fn params(&self) -> MinerParams {
        let o = &self.params;
        let mut params = MinerParams::default();
        if let Some(v) = o.min_relation_weight {
            params.min_relation_weight = v;
        }
        if let Some(v) = o.best_candidate_limit {
            params.best_candidate_limit = v;
        }
        if let Some(v) = o.wildcard_budget {
            params.wildcard_budget = v;
        }
        if let Some(v) = o.min_style_frequency {
            params.min_style_frequency = v;
        }
        if let Some(v) = o.min_relation_frequency {
            params.min_relation_frequency = v;
        }
        if let Some(v) = o.allow_new_tags {
            params.allow_new_tags = v;
        }
        if let Some(v) = o.parallel {
            params.parallel = v;
        }
        if let Some(ms) = o.deadline_ms {
            params.deadline = Some(Duration::from_millis(ms));
        }
        params
    }
}

impl AttributeSpec {
    fn to_attribute(&self) -> Result<Attribute> {
        let mut attribute = Attribute::new(self.tag.as_str());
        if self.required {
            attribute = attribute.required();
        }
        if self.many {
            attribute = attribute.many();
        }
        if self.src_many {
            attribute = attribute.src_many();
        }
        if let Some(s) = self.min_support {
            attribute = attribute.with_min_support(s);
        }
        for name in &self.hints {
            let hint = PresentationHint::from_name(name)
                .ok_or_else(|| anyhow!("unknown presentation hint {name} on {}", self.tag))?;
            attribute = attribute.with_hint(hint);
        }
        Ok(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_and_overrides() {
        let task: TaskFile = serde_json::from_str(
            r#"{
                "attributes": [
                    {"tag": "title", "required": true},
                    {"tag": "author", "many": true, "hints": ["singleLine"]}
                ],
                "taggers": [{"tag": "year", "pattern": "\\d{4}", "support": 0.8}],
                "relations": ["below", "after"],
                "params": {"best_candidate_limit": 5, "deadline_ms": 250}
            }"#,
        )
        .unwrap();
        let group = task.group().unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.attributes()[0].is_required());
        assert!(group.attributes()[1].is_many());
        assert!(group.attributes()[1].hints().contains(PresentationHint::SingleLine));
        assert_eq!(task.taggers().unwrap().len(), 1);
        assert_eq!(task.relations().unwrap().len(), 2);
        let params = task.params();
        assert_eq!(params.best_candidate_limit, 5);
        assert_eq!(params.deadline, Some(Duration::from_millis(250)));
    }

    #[test]
    fn unknown_hint_is_rejected() {
        let task: TaskFile =
            serde_json::from_str(r#"{"attributes": [{"tag": "a", "hints": ["bold"]}]}"#).unwrap();
        assert!(task.group().is_err());
    }
}
