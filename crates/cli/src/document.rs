//! JSON area documents.
//!
//! A document is a page size and a forest of areas:
//!
//! ```json
//! {
//!   "width": 800, "height": 600,
//!   "areas": [
//!     { "bounds": [10, 10, 200, 22], "text": "Title",
//!       "style": { "font_size": 14, "font_weight": 1.0, "color": "#000000" },
//!       "tags": { "title": 0.9 },
//!       "children": [] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use boxmatch_core::{AreaId, AreaStyle, AreaTree, Color, Rect, Tag};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DocumentFile {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub areas: Vec<AreaNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StyleNode {
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub font_style: Option<f64>,
    pub color: Option<String>,
    pub background: Option<String>,
    pub background_separated: bool,
}

#[derive(Debug, Deserialize)]
pub struct AreaNode {
    pub bounds: [f64; 4],
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: StyleNode,
    #[serde(default)]
    pub tags: BTreeMap<String, f64>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub children: Vec<AreaNode>,
}

fn color(value: Option<&str>, what: &str) -> Result<Option<Color>> {
    match value {
        None => Ok(None),
        Some(s) => match Color::from_hex(s) {
            Some(c) => Ok(Some(c)),
            None => bail!("invalid {what} color: {s}"),
        },
    }
}

impl StyleNode {
    fn to_style(&self) -> Result<AreaStyle> {
        let defaults = AreaStyle::default();
        let mut style = AreaStyle::new(
            self.font_size.unwrap_or(defaults.font_size),
            self.font_weight.unwrap_or(defaults.font_weight),
            self.font_style.unwrap_or(defaults.font_style),
            color(self.color.as_deref(), "text")?.unwrap_or(defaults.color),
        );
        if let Some(bg) = color(self.background.as_deref(), "background")? {
            style = style.with_background(bg, self.background_separated);
        }
        Ok(style)
    }
}

impl DocumentFile {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    /// Builds the area tree; the page itself is the root.
    pub fn to_tree(&self) -> Result<AreaTree> {
        let mut tree = AreaTree::new(self.width, self.height);
        let root = tree.root();
        for node in &self.areas {
            add_node(&mut tree, root, node)?;
        }
        Ok(tree)
    }
}

fn add_node(tree: &mut AreaTree, parent: AreaId, node: &AreaNode) -> Result<()> {
    let [x0, y0, x1, y1] = node.bounds;
    if x1 < x0 || y1 < y0 {
        bail!("area {:?} has inverted bounds", node.text);
    }
    let id = tree.add_area(parent, Rect::new(x0, y0, x1, y1), node.style.to_style()?, node.text.clone())?;
    for (tag, support) in &node.tags {
        tree.add_tag(id, Tag::new(tag), *support)?;
    }
    if let Some(line) = node.line {
        tree.set_logical_line(id, line)?;
    }
    for child in &node.children {
        add_node(tree, id, child)?;
    }
    Ok(())
}
