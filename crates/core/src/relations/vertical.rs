//! Vertical relations: below, above, under and lineBelow.

use crate::model::{Area, AreaId};

use super::{RelationContext, em};

/// Maximum gap (in em) between vertically adjacent areas.
const MAX_VGAP: f64 = 0.8;
/// Maximum overlap (in em) tolerated by `under`.
const MAX_UNDER_OVERLAP: f64 = 0.5;
/// Slack (in em) when deciding whether an area starts below another one.
const LINE_SLACK: f64 = 0.25;

/// `a1` directly below `a2`: same parent, left-aligned in the grid, gap in `[0, 0.8em)`.
pub(super) fn below(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    if a1.parent() != a2.parent() {
        return 0.0;
    }
    let topo = ctx.topology();
    let (Some(p1), Some(p2)) = (topo.position(a1.id()), topo.position(a2.id())) else {
        return 0.0;
    };
    if p1.x1 != p2.x1 {
        return 0.0;
    }
    let gap = a1.bounds().y0 - a2.bounds().y1;
    if gap >= 0.0 && gap < MAX_VGAP * em(a1, a2) {
        1.0
    } else {
        0.0
    }
}

pub(super) fn above(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    below(ctx, a2, a1)
}

/// `a1` under `a2`: overlapping at least half of the narrower width, gap in `[-0.5em, 0.8em)`.
pub(super) fn under(_ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    let (b1, b2) = (a1.bounds(), a2.bounds());
    if b1.center_y() <= b2.center_y() {
        return 0.0;
    }
    let narrower = b1.width().min(b2.width());
    if narrower <= 0.0 || b1.hoverlap(b2) < narrower / 2.0 {
        return 0.0;
    }
    let em = em(a1, a2);
    let gap = b1.y0 - b2.y1;
    if gap >= -MAX_UNDER_OVERLAP * em && gap < MAX_VGAP * em {
        1.0
    } else {
        0.0
    }
}

/// `a1` sits on the line directly below `a2`.
///
/// For every area the single closest candidate below it is chosen by a
/// composite of vertical and horizontal closeness; every area sharing that
/// candidate's visual line, or its logical line when the layout model
/// provides one, is then attached with the candidate's weight.
pub(super) fn line_below(ctx: &RelationContext<'_>) -> Vec<(AreaId, AreaId, f64)> {
    let tree = ctx.tree();
    let areas = ctx.areas();
    let mut out = Vec::new();

    for &aid in areas {
        let a = &tree[aid];
        let ab = a.bounds();
        let mut best: Option<(AreaId, f64)> = None;
        for &cid in areas {
            if cid == aid {
                continue;
            }
            let c = &tree[cid];
            let cb = c.bounds();
            let em = em(a, c);
            if cb.y0 < ab.y1 - LINE_SLACK * em || ab.is_same_line(cb) {
                continue;
            }
            let vgap = (cb.y0 - ab.y1).max(0.0);
            let v = 1.0 / (1.0 + vgap / em);
            let h = 1.0 / (1.0 + ab.hdistance(cb) / em);
            let score = v * h;
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((cid, score));
            }
        }

        let Some((cid, score)) = best else {
            continue;
        };
        let c = &tree[cid];
        for &mid in areas {
            if mid == aid {
                continue;
            }
            let m = &tree[mid];
            let on_line = m.bounds().is_same_line(c.bounds())
                && m.bounds().y0 >= ab.y1 - LINE_SLACK * em(a, m);
            let logical = c.logical_line().is_some() && m.logical_line() == c.logical_line();
            if mid == cid || on_line || logical {
                out.push((mid, aid, score));
            }
        }
    }
    out
}

/// Gap between the top of `a1` and the bottom of `a2`, in em.
pub(super) fn vertical_gap(a1: &Area, a2: &Area) -> f64 {
    (a1.bounds().y0 - a2.bounds().y1) / em(a1, a2)
}

pub(super) fn vertical_gap_inverse(a1: &Area, a2: &Area) -> f64 {
    vertical_gap(a2, a1)
}
