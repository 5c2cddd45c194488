//! Detection of configurations equivalent modulo relation symmetry and
//! inversion.

use crate::analysis::ConnectionPattern;
use crate::matcher::MatcherConfiguration;
use crate::relations::RelationSet;

pub struct ConfigurationRegistry<'a> {
    relations: &'a RelationSet,
    entries: Vec<MatcherConfiguration>,
}

impl<'a> ConfigurationRegistry<'a> {
    pub fn new(relations: &'a RelationSet) -> Self {
        Self {
            relations,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn same_constraints(&self, a: Option<&ConnectionPattern>, b: Option<&ConnectionPattern>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.is_equivalent(b, self.relations),
            _ => false,
        }
    }

    /// Index of a registered configuration equivalent to `conf`.
    pub fn find_equivalent(&self, conf: &MatcherConfiguration) -> Option<usize> {
        self.entries.iter().position(|e| {
            e.style_map() == conf.style_map()
                && e.pattern().is_equivalent(conf.pattern(), self.relations)
                && self.same_constraints(e.constraints(), conf.constraints())
        })
    }

    /// Registers `conf` unless an equivalent one is known. Returns whether it
    /// was added.
    pub fn register(&mut self, conf: &MatcherConfiguration) -> bool {
        if self.find_equivalent(conf).is_some() {
            return false;
        }
        self.entries.push(conf.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TagConnection;
    use crate::model::Tag;
    use crate::style::{StyleMap, StyleSpec};

    fn conf(set: &RelationSet, a1: &str, rel: &str, a2: &str) -> MatcherConfiguration {
        let mut styles = StyleMap::new();
        styles.insert(Tag::from("name"), StyleSpec::any());
        let edge = TagConnection::new(Tag::from(a1), set.by_name(rel).unwrap(), Tag::from(a2));
        MatcherConfiguration::new(styles, ConnectionPattern::new(vec![edge]))
    }

    #[test]
    fn inverse_patterns_are_equivalent() {
        let set = RelationSet::standard();
        let mut registry = ConfigurationRegistry::new(&set);
        assert!(registry.register(&conf(&set, "value", "below", "name")));
        assert_eq!(registry.find_equivalent(&conf(&set, "name", "above", "value")), Some(0));
        assert!(!registry.register(&conf(&set, "name", "above", "value")));
        assert!(registry.register(&conf(&set, "value", "under", "name")));
        assert_eq!(registry.len(), 2);
    }
}
