//! Heading detection: the underHeading relation.

use rustc_hash::FxHashSet;

use crate::model::{Area, AreaId, AreaTree};

use super::{RelationContext, em};

const LINE_SLACK: f64 = 0.25;

/// Areas whose markedness strictly exceeds every other area on their line.
pub(super) fn line_dominant_areas(tree: &AreaTree, areas: &[AreaId]) -> FxHashSet<AreaId> {
    let mut out = FxHashSet::default();
    for &aid in areas {
        let a = &tree[aid];
        let m = a.style().markedness();
        let dominated = areas.iter().any(|&cid| {
            let c = &tree[cid];
            cid != aid && c.bounds().is_same_line(a.bounds()) && c.style().markedness() >= m
        });
        if !dominated {
            out.insert(aid);
        }
    }
    out
}

/// `a1` is body content under heading `a2`.
///
/// The heading must be more marked than the body and dominate its own line;
/// the weight combines the normalized horizontal and vertical offsets.
pub(super) fn under_heading(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    if !ctx.is_line_dominant(a2.id()) {
        return 0.0;
    }
    if a2.style().markedness() <= a1.style().markedness() {
        return 0.0;
    }
    let (b1, b2) = (a1.bounds(), a2.bounds());
    let em = em(a1, a2);
    if b1.y0 < b2.y1 - LINE_SLACK * em || b1.is_same_line(b2) || b1.x0 < b2.x0 - em {
        return 0.0;
    }
    let wx = 1.0 - (b1.x0 - b2.x0).abs() / ctx.page_width();
    let wy = 1.0 - (b1.y0 - b2.y1).max(0.0) / ctx.page_height();
    wx * wy
}

/// Vertical offset of the body below the heading, in em.
pub(super) fn heading_offset(a1: &Area, a2: &Area) -> f64 {
    (a1.bounds().y0 - a2.bounds().y1) / em(a1, a2)
}
