use boxmatch_core::{
    AreaStyle, AreaTree, Attribute, AttributeGroup, AttributeGroupMatcher, Color, MineError, MinerParams, Rect,
    RelationSet, Tag,
};

fn page() -> AreaTree {
    let mut tree = AreaTree::new(600.0, 400.0);
    let root = tree.root();
    let style = AreaStyle::new(10.0, 0.0, 0.0, Color::BLACK);
    for i in 0..3 {
        let y = 10.0 + i as f64 * 40.0;
        let name = tree
            .add_area(root, Rect::new(10.0, y, 110.0, y + 10.0), style.clone(), format!("name {i}"))
            .unwrap();
        let value = tree
            .add_area(root, Rect::new(10.0, y + 13.0, 110.0, y + 23.0), style.clone(), format!("{i}"))
            .unwrap();
        tree.add_tag(name, Tag::from("name"), 1.0).unwrap();
        tree.add_tag(value, Tag::from("value"), 1.0).unwrap();
    }
    tree
}

fn matcher() -> AttributeGroupMatcher {
    let group = AttributeGroup::new(vec![Attribute::new("name").required(), Attribute::new("value")]);
    AttributeGroupMatcher::new(group, RelationSet::standard(), MinerParams::default()).unwrap()
}

#[test]
fn matching_requires_configuration() {
    let tree = page();
    let m = matcher();
    assert!(matches!(m.try_match(&tree, tree.root()), Err(MineError::NotConfigured)));
    assert!(m.match_areas(&tree, tree.root()).is_empty());
    assert!(!m.is_configured());
}

#[test]
fn matching_requires_selection() {
    let tree = page();
    let mut m = matcher();
    m.configure(&tree, tree.root());
    assert!(m.is_configured());
    assert!(m.used_conf().is_none());
    assert!(matches!(
        m.try_match(&tree, tree.root()),
        Err(MineError::NoConfigurationSelected)
    ));
    assert!(m.match_areas(&tree, tree.root()).is_empty());
}

#[test]
fn selection_is_bounds_checked() {
    let tree = page();
    let mut m = matcher();
    assert!(matches!(m.set_used_conf(0), Err(MineError::NotConfigured)));
    let n = m.configure(&tree, tree.root()).len();
    assert!(n > 0);
    assert!(matches!(
        m.set_used_conf(n),
        Err(MineError::InvalidConfigurationIndex { index, len }) if index == n && len == n
    ));
    m.set_used_conf(n - 1).unwrap();
    assert!(m.used_conf().is_some());
    assert_eq!(m.match_areas(&tree, tree.root()).len(), m.try_match(&tree, tree.root()).unwrap().len());
}

#[test]
fn reconfiguring_clears_selection() {
    let tree = page();
    let mut m = matcher();
    m.configure(&tree, tree.root());
    m.set_used_conf(0).unwrap();
    m.configure(&tree, tree.root());
    assert!(m.used_conf().is_none());
}

#[test]
fn dependencies_are_validated() {
    let tree = page();
    let mut outer = AttributeGroupMatcher::new(
        AttributeGroup::new(vec![Attribute::new("title").required(), Attribute::new("entry").many()]),
        RelationSet::standard(),
        MinerParams::default(),
    )
    .unwrap();

    assert!(matches!(
        outer.add_dependency("missing", matcher()),
        Err(MineError::UnknownTag(t)) if t == "missing"
    ));
    assert!(matches!(
        outer.add_dependency("entry", matcher()),
        Err(MineError::DependencyNotReady(t)) if t == "entry"
    ));

    let mut inner = matcher();
    inner.configure(&tree, tree.root());
    inner.set_used_conf(0).unwrap();
    outer.add_dependency("entry", inner).unwrap();
    assert!(outer.is_tag_many(&Tag::from("entry")));
}

#[test]
fn invalid_params_are_rejected() {
    let params = MinerParams {
        min_relation_weight: 0.0,
        ..MinerParams::default()
    };
    let group = AttributeGroup::new(vec![Attribute::new("a")]);
    assert!(matches!(
        AttributeGroupMatcher::new(group, RelationSet::standard(), params),
        Err(MineError::InvalidParam { name: "min_relation_weight", .. })
    ));
}
