//! Command line front end for the boxmatch engine.
//!
//! Reads area documents and extraction tasks from JSON, configures an
//! [`AttributeGroupMatcher`] on a sample document and applies the selected
//! configuration to target documents.

pub mod document;
pub mod output;
pub mod task;

use std::path::Path;

use anyhow::Result;
use boxmatch_core::{AreaTree, AttributeGroupMatcher, tag_areas};

use document::DocumentFile;
use output::{ConfigurationView, RecordView};
use task::TaskFile;

/// Loads a document and assigns the task's weak tags to its leaves.
pub fn load_tagged(task: &TaskFile, path: &Path) -> Result<AreaTree> {
    let mut tree = DocumentFile::load(path)?.to_tree()?;
    let taggers = task.taggers()?;
    if !taggers.is_empty() {
        let leaves = tree.leaves(tree.root());
        tag_areas(&mut tree, &leaves, &taggers)?;
    }
    Ok(tree)
}

/// Builds a matcher for the task and configures it on `sample`.
pub fn configure(task: &TaskFile, sample: &Path) -> Result<AttributeGroupMatcher> {
    let tree = load_tagged(task, sample)?;
    let mut matcher = AttributeGroupMatcher::new(task.group()?, task.relations()?, task.params())?;
    let ranked = matcher.configure(&tree, tree.root()).len();
    tracing::info!(sample = %sample.display(), ranked, "sample configured");
    Ok(matcher)
}

/// The `top` best configurations found on `sample`.
pub fn rank_configurations(task: &TaskFile, sample: &Path, top: usize) -> Result<Vec<ConfigurationView>> {
    let matcher = configure(task, sample)?;
    Ok(matcher
        .best_configurations()
        .iter()
        .take(top)
        .enumerate()
        .map(|(i, scored)| ConfigurationView::new(i, scored, matcher.relations()))
        .collect())
}

/// Configures on `sample`, selects configuration `index` and extracts the
/// records of every target document.
pub fn extract(task: &TaskFile, sample: &Path, index: usize, targets: &[&Path]) -> Result<Vec<Vec<RecordView>>> {
    let mut matcher = configure(task, sample)?;
    matcher.set_used_conf(index)?;
    let mut out = Vec::with_capacity(targets.len());
    for path in targets {
        let tree = load_tagged(task, path)?;
        let records = matcher.try_match(&tree, tree.root())?;
        tracing::debug!(target = %path.display(), records = records.len(), "document matched");
        out.push(records.iter().map(|m| RecordView::new(m, &tree)).collect());
    }
    Ok(out)
}
