use std::fs;
use std::path::{Path, PathBuf};

use boxmatch_cli::document::DocumentFile;
use boxmatch_cli::task::TaskFile;
use boxmatch_core::Tag;
use tempfile::TempDir;

const TASK: &str = r#"{
    "attributes": [
        {"tag": "name", "required": true, "min_support": 0.5},
        {"tag": "price", "min_support": 0.5}
    ],
    "taggers": [{"tag": "price", "pattern": "^\\$\\d+\\.\\d{2}$"}]
}"#;

/// A page of `rows` products: a name with its price directly below it.
fn page(rows: usize, offset: f64) -> String {
    let areas: Vec<String> = (0..rows)
        .map(|i| {
            let y = offset + i as f64 * 40.0;
            format!(
                r##"{{"bounds": [10, {y}, 150, {y1}], "text": "Product {i}", "tags": {{"name": 1.0}},
                    "style": {{"font_size": 10, "font_weight": 1.0}}}},
                   {{"bounds": [10, {y2}, 150, {y3}], "text": "${i}.99",
                    "style": {{"font_size": 10, "color": "#333333"}}}}"##,
                y1 = y + 10.0,
                y2 = y + 13.0,
                y3 = y + 23.0,
            )
        })
        .collect();
    format!(r#"{{"width": 800, "height": 1000, "areas": [{}]}}"#, areas.join(","))
}

/// Like [`page`], with every price wrapped in a text-less box.
fn boxed_page(rows: usize, offset: f64) -> String {
    let areas: Vec<String> = (0..rows)
        .map(|i| {
            let y = offset + i as f64 * 40.0;
            format!(
                r##"{{"bounds": [10, {y}, 150, {y1}], "text": "Product {i}", "tags": {{"name": 1.0}},
                    "style": {{"font_size": 10, "font_weight": 1.0}}}},
                   {{"bounds": [10, {y2}, 150, {y3}], "children": [
                       {{"bounds": [10, {y2}, 150, {y3}], "text": "${i}.99",
                         "style": {{"font_size": 10, "color": "#333333"}}}}]}}"##,
                y1 = y + 10.0,
                y2 = y + 13.0,
                y3 = y + 23.0,
            )
        })
        .collect();
    format!(r#"{{"width": 800, "height": 1000, "areas": [{}]}}"#, areas.join(","))
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn document_builds_tree() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "page.json", &page(2, 10.0));
    let tree = DocumentFile::load(&path).unwrap().to_tree().unwrap();
    let leaves = tree.leaves(tree.root());
    assert_eq!(leaves.len(), 4);
    assert_eq!(tree[leaves[0]].tag_support(&Tag::from("name")), 1.0);
    assert_eq!(tree[leaves[1]].style().font_weight, 0.0);
}

#[test]
fn malformed_documents_are_reported() {
    let dir = TempDir::new().unwrap();
    let bad_color = write(
        &dir,
        "color.json",
        r#"{"width": 10, "height": 10, "areas": [{"bounds": [0, 0, 1, 1], "style": {"color": "red"}}]}"#,
    );
    assert!(DocumentFile::load(&bad_color).unwrap().to_tree().is_err());
    let inverted = write(
        &dir,
        "inverted.json",
        r#"{"width": 10, "height": 10, "areas": [{"bounds": [5, 5, 1, 1]}]}"#,
    );
    assert!(DocumentFile::load(&inverted).unwrap().to_tree().is_err());
    assert!(DocumentFile::load(Path::new("/nonexistent/page.json")).is_err());
}

#[test]
fn configure_then_extract() {
    let dir = TempDir::new().unwrap();
    let task_path = write(&dir, "task.json", TASK);
    let sample = write(&dir, "sample.json", &page(4, 10.0));
    let target = write(&dir, "target.json", &page(3, 100.0));
    let task = TaskFile::load(&task_path).unwrap();

    let ranked = boxmatch_cli::rank_configurations(&task, &sample, 3).unwrap();
    assert!(!ranked.is_empty() && ranked.len() <= 3);
    assert_eq!(ranked[0].index, 0);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));

    let pages = boxmatch_cli::extract(&task, &sample, 0, &[target.as_path()]).unwrap();
    assert_eq!(pages.len(), 1);
    let records = &pages[0];
    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        let name = record.fields.iter().find(|f| f.tag == "name").unwrap();
        assert_eq!(name.values, vec![format!("Product {i}")]);
    }

    let json = serde_json::to_value(&ranked).unwrap();
    assert!(json[0]["pattern"].as_str().is_some_and(|p| p.contains("name")));
}

#[test]
fn out_of_range_configuration_is_an_error() {
    let dir = TempDir::new().unwrap();
    let task_path = write(&dir, "task.json", TASK);
    let sample = write(&dir, "sample.json", &page(2, 10.0));
    let task = TaskFile::load(&task_path).unwrap();
    assert!(boxmatch_cli::extract(&task, &sample, 10_000, &[sample.as_path()]).is_err());
}

#[test]
fn whole_box_fields_carry_the_text_of_their_box() {
    let dir = TempDir::new().unwrap();
    let task_path = write(
        &dir,
        "task.json",
        r#"{
            "attributes": [
                {"tag": "name", "required": true, "min_support": 0.5},
                {"tag": "price", "min_support": 0.5, "hints": ["wholeBox"]}
            ],
            "taggers": [{"tag": "price", "pattern": "^\\$\\d+\\.\\d{2}$"}]
        }"#,
    );
    let sample = write(&dir, "sample.json", &boxed_page(4, 10.0));
    let target = write(&dir, "target.json", &boxed_page(3, 100.0));
    let task = TaskFile::load(&task_path).unwrap();

    let ranked = boxmatch_cli::rank_configurations(&task, &sample, 10).unwrap();
    assert!(!ranked.is_empty());
    let mut prices = 0;
    for conf in &ranked {
        let pages = boxmatch_cli::extract(&task, &sample, conf.index, &[target.as_path()]).unwrap();
        for record in &pages[0] {
            let Some(price) = record.fields.iter().find(|f| f.tag == "price") else {
                continue;
            };
            for value in &price.values {
                assert!(value.starts_with('$') && value.ends_with(".99"), "price field {value:?}");
                prices += 1;
            }
        }
    }
    assert!(prices > 0, "no configuration bound a price");
}
