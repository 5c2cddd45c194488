//! Invariants that hold for any page: weight bounds, disjoint records,
//! stable disambiguation and connected patterns.

use boxmatch_core::analysis::{RelationAnalyzer, TagConnectionIndex};
use boxmatch_core::pattern::PatternGenerator;
use boxmatch_core::style::Disambiguator;
use boxmatch_core::{
    AreaId, AreaStyle, AreaTree, Attribute, AttributeGroup, AttributeGroupMatcher, Color, MinerParams, Rect,
    RelationSet, Tag,
};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// A product listing: a heading, then rows of title, price and a
/// bold badge, with irregular spacing.
fn listing(rows: usize) -> (AreaTree, Vec<AreaId>) {
    let mut tree = AreaTree::new(1000.0, 2000.0);
    let root = tree.root();
    let plain = AreaStyle::new(10.0, 0.0, 0.0, Color::BLACK);
    let bold = AreaStyle::new(10.0, 1.0, 0.0, Color(0x336699));
    let mut ids = Vec::new();
    let heading = tree
        .add_area(root, Rect::new(10.0, 5.0, 300.0, 25.0), AreaStyle::new(18.0, 1.0, 0.0, Color::BLACK), "Products")
        .unwrap();
    ids.push(heading);
    for i in 0..rows {
        let y = 40.0 + i as f64 * (30.0 + (i % 3) as f64 * 4.0);
        let title = tree
            .add_area(root, Rect::new(10.0, y, 200.0, y + 10.0), plain.clone(), format!("Item {i}"))
            .unwrap();
        let price = tree
            .add_area(root, Rect::new(10.0, y + 13.0, 80.0, y + 23.0), plain.clone(), format!("{i}.99"))
            .unwrap();
        let badge = tree
            .add_area(root, Rect::new(210.0, y, 260.0, y + 10.0), bold.clone(), "NEW")
            .unwrap();
        tree.add_tag(title, Tag::from("title"), 0.9).unwrap();
        tree.add_tag(price, Tag::from("price"), 1.0).unwrap();
        if i % 2 == 0 {
            tree.add_tag(badge, Tag::from("badge"), 0.8).unwrap();
        }
        // a weak, competing tag
        tree.add_tag(price, Tag::from("title"), 0.3).unwrap();
        ids.extend([title, price, badge]);
    }
    (tree, ids)
}

fn group() -> AttributeGroup {
    AttributeGroup::new(vec![
        Attribute::new("title").required(),
        Attribute::new("price").required(),
        Attribute::new("badge"),
    ])
}

#[test]
fn connection_weights_are_bounded() {
    let (tree, ids) = listing(8);
    for min in [0.05, 0.1, 0.5, 0.9] {
        let analyzer = RelationAnalyzer::new(&tree, &ids, &RelationSet::standard(), min);
        assert!(!analyzer.all_connections().is_empty());
        for c in analyzer.all_connections() {
            assert!(c.weight >= min && c.weight <= 1.0, "{c:?} outside [{min}, 1]");
            assert_ne!(c.a1, c.a2);
        }
    }
}

#[test]
fn records_do_not_share_areas() {
    let (tree, _) = listing(6);
    let mut matcher = AttributeGroupMatcher::new(group(), RelationSet::standard(), MinerParams::default()).unwrap();
    let ranked = matcher.configure(&tree, tree.root()).len();
    assert!(ranked > 0);
    for index in 0..ranked {
        matcher.set_used_conf(index).unwrap();
        let matches = matcher.try_match(&tree, tree.root()).unwrap();
        let mut seen = FxHashSet::default();
        for m in &matches {
            for area in m.areas() {
                assert!(seen.insert(area), "area {area:?} bound twice in configuration {index}");
            }
        }
    }
}

#[test]
fn disambiguation_is_idempotent() {
    let (mut tree, ids) = listing(5);
    let tags: IndexMap<Tag, f64> = [("title", 0.2), ("price", 0.2), ("badge", 0.2)]
        .into_iter()
        .map(|(t, s)| (Tag::from(t), s))
        .collect();
    let disambiguator = Disambiguator::new(tags);

    let first = disambiguator.apply(&mut tree, &ids).unwrap();
    let snapshot: Vec<_> = ids.iter().map(|id| tree[*id].tags().clone()).collect();
    let second = disambiguator.apply(&mut tree, &ids).unwrap();

    for id in &ids {
        assert_eq!(first.tag_of(*id), second.tag_of(*id));
    }
    let after: Vec<_> = ids.iter().map(|id| tree[*id].tags().clone()).collect();
    assert_eq!(snapshot, after);
    // the competing weak tag lost to the stronger one
    let price = Tag::from("price");
    for id in first.areas(&price) {
        assert_eq!(tree[*id].tag_support(&Tag::from("title")), 0.0);
    }
}

#[test]
fn generated_patterns_are_connected() {
    let (tree, ids) = listing(6);
    let set = RelationSet::standard();
    let analyzer = RelationAnalyzer::new(&tree, &ids, &set, 0.1);
    let tags: IndexMap<Tag, f64> = group().min_supports();
    let assignment = Disambiguator::new(tags).assign(&tree, &ids);
    let index = TagConnectionIndex::build(&analyzer, &|a| assignment.tag_of(a).cloned());

    let group = group();
    let patterns = PatternGenerator::new(&group, &index, &set, 0.1).generate();
    assert!(!patterns.is_empty());
    for p in &patterns {
        assert!(p.is_connected());
        assert_eq!(p.len() + 1, p.tags().len());
        assert!(p.tags().contains(&Tag::from("title")));
        assert!(p.tags().contains(&Tag::from("price")));
    }
}

#[test]
fn parallel_search_ranks_like_sequential() {
    let (tree, _) = listing(8);
    let run = |parallel| {
        let params = MinerParams {
            parallel,
            ..MinerParams::default()
        };
        let mut matcher = AttributeGroupMatcher::new(group(), RelationSet::standard(), params).unwrap();
        matcher.configure(&tree, tree.root());
        let ranked: Vec<_> = matcher
            .best_configurations()
            .iter()
            .map(|s| (s.configuration.clone(), s.score, s.measures.clone()))
            .collect();
        (ranked, matcher.statistics().clone())
    };

    let sequential = run(false);
    assert!(!sequential.0.is_empty());
    for _ in 0..3 {
        assert_eq!(run(true), sequential);
    }
}
