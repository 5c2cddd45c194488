//! Backtracking matcher: binds areas to the tags of a connection pattern.
//!
//! Seeds are the areas of the key tag (or of the first edge's source tag
//! when the key is not part of the pattern), tried in document order. From
//! every seed the pattern edges are resolved one at a time, always through
//! an edge with a bound endpoint, using the best-relation candidates of the
//! bound anchor. The first complete, valid match of a seed is recorded and
//! its areas are consumed for the following seeds.
//!
//! Partial matches are passed by value and the consumed set is only read
//! during a search, so sibling branches never see each other's bindings.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::analysis::{AreaConnection, ConnectionPattern, Direction, RelationAnalyzer, TagConnection};
use crate::model::{AreaId, Tag};
use crate::pattern::AttributeGroup;
use crate::style::TagAssignment;

use super::matches::{Match, MatchResult};

#[derive(Clone)]
struct Partial<'p> {
    m: Match,
    remaining: Vec<&'p TagConnection>,
    absent: SmallVec<[Tag; 2]>,
}

pub struct BacktrackingMatcher<'a> {
    analyzer: &'a RelationAnalyzer,
    assignment: &'a TagAssignment,
    group: &'a AttributeGroup,
    dependencies: Option<&'a IndexMap<Tag, Vec<Match>>>,
    owner: FxHashMap<(Tag, AreaId), usize>,
}

impl<'a> BacktrackingMatcher<'a> {
    pub fn new(
        analyzer: &'a RelationAnalyzer,
        assignment: &'a TagAssignment,
        group: &'a AttributeGroup,
    ) -> Self {
        Self {
            analyzer,
            assignment,
            group,
            dependencies: None,
            owner: FxHashMap::default(),
        }
    }

    /// Binds the given tags to pre-resolved matches instead of single areas.
    pub fn with_dependencies(mut self, dependencies: &'a IndexMap<Tag, Vec<Match>>) -> Self {
        self.owner.clear();
        for (tag, matches) in dependencies {
            for (i, m) in matches.iter().enumerate() {
                for area in m.areas() {
                    self.owner.entry((tag.clone(), area)).or_insert(i);
                }
            }
        }
        self.dependencies = Some(dependencies);
        self
    }

    fn sub_matches(&self, tag: &Tag) -> Option<&'a [Match]> {
        self.dependencies
            .and_then(|d| d.get(tag))
            .map(Vec::as_slice)
    }

    fn is_dependency(&self, tag: &Tag) -> bool {
        self.sub_matches(tag).is_some()
    }

    fn carries(&self, area: AreaId, tag: &Tag) -> bool {
        if self.is_dependency(tag) {
            self.owner.contains_key(&(tag.clone(), area))
        } else {
            self.assignment.has(area, tag)
        }
    }

    fn reusable(&self, tag: &Tag, area: AreaId, consumed: &FxHashSet<AreaId>) -> bool {
        self.group.is_src_many(tag) || !consumed.contains(&area)
    }

    /// Runs the search over every seed.
    pub fn find_matches(
        &self,
        pattern: &ConnectionPattern,
        constraints: Option<&ConnectionPattern>,
    ) -> MatchResult {
        let mut result = MatchResult::new();
        let Some(first) = pattern.edges().first() else {
            return result;
        };
        let seed_tag = match self.group.key_attribute() {
            Some(key) if pattern.tags().contains(key.tag()) => key.tag().clone(),
            _ => first.a1.clone(),
        };

        let mut consumed: FxHashSet<AreaId> = FxHashSet::default();
        for seed in self.seeds(&seed_tag) {
            let taken = seed
                .areas()
                .any(|a| !self.reusable(&seed_tag, a, &consumed));
            if taken {
                continue;
            }
            let start = Partial {
                m: seed,
                remaining: pattern.edges().iter().collect(),
                absent: SmallVec::new(),
            };
            if let Some(m) = self.extend(start, pattern, constraints, &consumed) {
                consumed.extend(m.areas());
                result.push(m);
            }
        }
        result
    }

    /// Seed matches for `tag`, each binding one area or one sub-match.
    fn seeds(&self, tag: &Tag) -> Vec<Match> {
        match self.sub_matches(tag) {
            Some(subs) => subs
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let mut m = Match::new();
                    m.add_sub_match(tag, i, s);
                    m
                })
                .collect(),
            None => self
                .assignment
                .areas(tag)
                .iter()
                .map(|&a| {
                    let mut m = Match::new();
                    m.bind(tag, a);
                    m
                })
                .collect(),
        }
    }

    fn extend<'p>(
        &self,
        mut state: Partial<'p>,
        pattern: &ConnectionPattern,
        constraints: Option<&ConnectionPattern>,
        consumed: &FxHashSet<AreaId>,
    ) -> Option<Match> {
        let absent = state.absent.clone();
        state
            .remaining
            .retain(|e| !absent.contains(&e.a1) && !absent.contains(&e.a2));
        let Some(pos) = state
            .remaining
            .iter()
            .position(|e| state.m.is_bound(&e.a1) || state.m.is_bound(&e.a2))
        else {
            if !state.remaining.is_empty() {
                return None;
            }
            return self.complete(state.m, pattern, constraints);
        };
        let edge = state.remaining.remove(pos);

        let (bound1, bound2) = (state.m.is_bound(&edge.a1), state.m.is_bound(&edge.a2));
        if bound1 && bound2 {
            let connection = self.strongest(&state.m, edge)?;
            state.m.add_connection(connection);
            return self.extend(state, pattern, constraints, consumed);
        }

        let (anchor_tag, free_tag, direction) = if bound1 {
            (&edge.a1, &edge.a2, Direction::Outgoing)
        } else {
            (&edge.a2, &edge.a1, Direction::Incoming)
        };
        let survivors = self.candidates(&state.m, edge, anchor_tag, free_tag, direction, consumed);

        if survivors.is_empty() {
            if self.group.get(free_tag).is_some_and(|a| a.is_required()) {
                return None;
            }
            state.absent.push(free_tag.clone());
            return self.extend(state, pattern, constraints, consumed);
        }

        if self.group.is_many(free_tag) {
            for c in &survivors {
                self.bind(&mut state.m, free_tag, c, direction);
            }
            return self.extend(state, pattern, constraints, consumed);
        }

        let best = survivors
            .iter()
            .map(|c| c.weight)
            .fold(f64::NEG_INFINITY, f64::max);
        for c in survivors.iter().filter(|c| c.weight >= best) {
            let mut next = state.clone();
            self.bind(&mut next.m, free_tag, c, direction);
            if let Some(done) = self.extend(next, pattern, constraints, consumed) {
                return Some(done);
            }
        }
        None
    }

    /// Best-relation candidates for `free_tag` from every bound anchor.
    fn candidates(
        &self,
        m: &Match,
        edge: &TagConnection,
        anchor_tag: &Tag,
        free_tag: &Tag,
        direction: Direction,
        consumed: &FxHashSet<AreaId>,
    ) -> Vec<AreaConnection> {
        let subs = self.sub_matches(free_tag);
        let is_candidate = |b: AreaId| {
            if !self.carries(b, free_tag) || m.contains_area(b) {
                return false;
            }
            match subs {
                Some(subs) => self
                    .owner
                    .get(&(free_tag.clone(), b))
                    .and_then(|i| subs.get(*i))
                    .is_some_and(|s| {
                        s.areas()
                            .all(|a| !m.contains_area(a) && self.reusable(free_tag, a, consumed))
                    }),
                None => self.reusable(free_tag, b, consumed),
            }
        };
        let is_rival = |x: AreaId| self.carries(x, anchor_tag);

        let mut out: Vec<AreaConnection> = Vec::new();
        for &anchor in m.get(anchor_tag) {
            for c in self
                .analyzer
                .best_candidates(anchor, edge.relation, direction, &is_candidate, &is_rival)
            {
                let target = match direction {
                    Direction::Incoming => c.a1,
                    Direction::Outgoing => c.a2,
                };
                let duplicate = out.iter().any(|o| match direction {
                    Direction::Incoming => o.a1 == target,
                    Direction::Outgoing => o.a2 == target,
                });
                if !duplicate {
                    out.push(c);
                }
            }
        }
        out
    }

    fn bind(&self, m: &mut Match, tag: &Tag, c: &AreaConnection, direction: Direction) {
        let target = match direction {
            Direction::Incoming => c.a1,
            Direction::Outgoing => c.a2,
        };
        match self.sub_matches(tag) {
            Some(subs) => {
                if let Some(i) = self.owner.get(&(tag.clone(), target))
                    && let Some(sub) = subs.get(*i)
                {
                    m.add_sub_match(tag, *i, sub);
                }
            }
            None => m.bind(tag, target),
        }
        m.add_connection(*c);
    }

    /// The strongest connection realizing `edge` between bound areas.
    fn strongest(&self, m: &Match, edge: &TagConnection) -> Option<AreaConnection> {
        let mut best: Option<AreaConnection> = None;
        for &a1 in m.get(&edge.a1) {
            for &a2 in m.get(&edge.a2) {
                let w = self.analyzer.weight(a1, edge.relation, a2);
                if w > 0.0 && best.is_none_or(|b| w > b.weight) {
                    best = Some(AreaConnection::new(a1, edge.relation, a2, w));
                }
            }
        }
        best
    }

    fn complete(
        &self,
        m: Match,
        pattern: &ConnectionPattern,
        constraints: Option<&ConnectionPattern>,
    ) -> Option<Match> {
        for tag in pattern.tags() {
            if !m.is_bound(&tag) && self.group.get(&tag).is_some_and(|a| a.is_required()) {
                return None;
            }
        }
        if let Some(constraints) = constraints {
            for edge in constraints.edges() {
                if m.is_bound(&edge.a1) && m.is_bound(&edge.a2) && self.strongest(&m, edge).is_none() {
                    return None;
                }
            }
        }
        Some(m)
    }
}
