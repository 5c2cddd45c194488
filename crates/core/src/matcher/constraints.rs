//! Consistency constraints derived from a match result.

use std::collections::BTreeMap;

use crate::analysis::{ConnectionPattern, RelationAnalyzer, TagConnection};
use crate::model::AreaId;
use crate::relations::RelationId;

use super::matches::MatchResult;

/// A relation between two tags, oriented from the first tag of the pair
/// (`false`) or from the second (`true`).
type Fact = (bool, RelationId);

/// Facts holding between the areas bound to two tags in one match. A
/// reverse-oriented relation with a declared inverse, or a symmetric one,
/// is folded into the forward orientation.
fn facts(analyzer: &RelationAnalyzer, first: &[AreaId], second: &[AreaId]) -> Vec<Fact> {
    let relations = analyzer.relations();
    let mut out: Vec<Fact> = Vec::new();
    let mut add = |f: Fact| {
        if !out.contains(&f) {
            out.push(f);
        }
    };
    for &a in first {
        for &b in second {
            for r in analyzer.relations_between(a, b) {
                add((false, r));
            }
            for r in analyzer.relations_between(b, a) {
                if relations.is_symmetric(r) {
                    add((false, r));
                } else if let Some(inv) = relations.inverse_of(r) {
                    add((false, inv));
                } else {
                    add((true, r));
                }
            }
        }
    }
    out
}

/// For every pair of pattern tags not joined by the pattern, tallies the
/// relations holding between their bound areas across all matches. When
/// several relations occur and the most frequent one is missing from some
/// matches, that relation becomes a constraint. Ties go to the forward
/// orientation, then to relation-set order.
pub fn infer_constraints(
    result: &MatchResult,
    pattern: &ConnectionPattern,
    analyzer: &RelationAnalyzer,
) -> ConnectionPattern {
    let tags: Vec<_> = pattern.tags().into_iter().collect();
    let mut out = ConnectionPattern::default();
    for (i, t1) in tags.iter().enumerate() {
        for t2 in &tags[i + 1..] {
            if pattern.joins(t1, t2) {
                continue;
            }
            let mut tally: BTreeMap<Fact, usize> = BTreeMap::new();
            let mut bound = 0usize;
            for m in result.matches() {
                if !m.is_bound(t1) || !m.is_bound(t2) {
                    continue;
                }
                bound += 1;
                for f in facts(analyzer, m.get(t1), m.get(t2)) {
                    *tally.entry(f).or_default() += 1;
                }
            }
            if tally.len() < 2 {
                continue;
            }
            let mut best: Option<(Fact, usize)> = None;
            for (f, n) in &tally {
                if best.is_none_or(|(_, b)| *n > b) {
                    best = Some((*f, *n));
                }
            }
            let Some(((reversed, relation), count)) = best else {
                continue;
            };
            if count >= bound {
                continue;
            }
            let edge = if reversed {
                TagConnection::new(t2.clone(), relation, t1.clone())
            } else {
                TagConnection::new(t1.clone(), relation, t2.clone())
            };
            tracing::debug!(
                constraint = %edge.display(analyzer.relations()),
                support = count,
                matches = bound,
                "consistency constraint inferred"
            );
            out.push(edge);
        }
    }
    out
}
