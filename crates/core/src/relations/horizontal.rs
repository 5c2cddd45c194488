//! Horizontal relations: side, onLeft, onRight, after, before and sameLine.

use crate::model::Area;

use super::{RelationContext, em};

/// Horizontal slack (document units) for areas that touch.
const TOUCH_TOLERANCE: f64 = 0.5;
/// Overlap (in em) tolerated between consecutive areas on one line.
const LINE_OVERLAP: f64 = 0.1;

/// `a1` is the closest sibling left of `a2` within `a2`'s vertical band.
fn is_left_neighbor(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> bool {
    let (b1, b2) = (a1.bounds(), a2.bounds());
    if b1.x1 > b2.x0 + TOUCH_TOLERANCE || b1.voverlap(b2) <= 0.0 {
        return false;
    }
    let dist = b2.x0 - b1.x1;
    !ctx.siblings(a2).any(|c| {
        let cb = c.bounds();
        c.id() != a1.id()
            && cb.x1 <= b2.x0 + TOUCH_TOLERANCE
            && cb.voverlap(b2) > 0.0
            && b2.x0 - cb.x1 < dist
    })
}

/// `a1` is the closest sibling right of `a2` within `a2`'s vertical band.
fn is_right_neighbor(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> bool {
    let (b1, b2) = (a1.bounds(), a2.bounds());
    if b1.x0 < b2.x1 - TOUCH_TOLERANCE || b1.voverlap(b2) <= 0.0 {
        return false;
    }
    let dist = b1.x0 - b2.x1;
    !ctx.siblings(a2).any(|c| {
        let cb = c.bounds();
        c.id() != a1.id()
            && cb.x0 >= b2.x1 - TOUCH_TOLERANCE
            && cb.voverlap(b2) > 0.0
            && cb.x0 - b2.x1 < dist
    })
}

/// `a1` is on the left of `a2` and they are each other's closest neighbor on
/// that side from at least one point of view.
pub(super) fn on_left(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    if a1.parent() != a2.parent() {
        return 0.0;
    }
    if is_left_neighbor(ctx, a1, a2) || is_right_neighbor(ctx, a2, a1) {
        1.0
    } else {
        0.0
    }
}

pub(super) fn on_right(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    on_left(ctx, a2, a1)
}

pub(super) fn side(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    on_left(ctx, a1, a2).max(on_right(ctx, a1, a2))
}

/// `a1` follows `a2` on the same text line; decays with the gap relative to
/// the page width.
pub(super) fn after(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    let (b1, b2) = (a1.bounds(), a2.bounds());
    if !b1.is_same_line(b2) || b1.x0 < b2.x1 - LINE_OVERLAP * em(a1, a2) {
        return 0.0;
    }
    let gap = (b1.x0 - b2.x1).max(0.0);
    1.0 - gap / ctx.page_width()
}

pub(super) fn before(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    after(ctx, a2, a1)
}

pub(super) fn same_line(ctx: &RelationContext<'_>, a1: &Area, a2: &Area) -> f64 {
    let (b1, b2) = (a1.bounds(), a2.bounds());
    if !b1.is_same_line(b2) {
        return 0.0;
    }
    1.0 - b1.hdistance(b2) / ctx.page_width()
}

/// Horizontal distance between the areas, in em.
pub(super) fn horizontal_gap(a1: &Area, a2: &Area) -> f64 {
    a1.bounds().hdistance(a2.bounds()) / em(a1, a2)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{flat_page, weight_of};
    use crate::model::Rect;

    #[test]
    fn after_decays_with_gap() {
        let (tree, ids) = flat_page(&[
            (Rect::new(0.0, 100.0, 100.0, 112.0), 10.0),
            (Rect::new(110.0, 100.0, 150.0, 112.0), 10.0),
            (Rect::new(600.0, 101.0, 650.0, 111.0), 10.0),
            (Rect::new(110.0, 130.0, 150.0, 142.0), 10.0),
        ]);
        let near = weight_of(&tree, &ids, "after", ids[1], ids[0]);
        let far = weight_of(&tree, &ids, "after", ids[2], ids[0]);
        assert!((near - 0.99).abs() < 1e-9);
        assert!((far - 0.5).abs() < 1e-9);
        assert_eq!(weight_of(&tree, &ids, "after", ids[0], ids[1]), 0.0);
        assert_eq!(weight_of(&tree, &ids, "before", ids[0], ids[1]), near);
        assert_eq!(weight_of(&tree, &ids, "after", ids[3], ids[0]), 0.0);
        assert_eq!(
            weight_of(&tree, &ids, "sameLine", ids[0], ids[2]),
            weight_of(&tree, &ids, "sameLine", ids[2], ids[0])
        );
    }

    #[test]
    fn on_left_picks_closest_sibling() {
        let (tree, ids) = flat_page(&[
            (Rect::new(0.0, 0.0, 50.0, 12.0), 10.0),
            (Rect::new(60.0, 0.0, 100.0, 12.0), 10.0),
            (Rect::new(120.0, 0.0, 160.0, 12.0), 10.0),
        ]);
        assert_eq!(weight_of(&tree, &ids, "onLeft", ids[1], ids[2]), 1.0);
        assert_eq!(weight_of(&tree, &ids, "onLeft", ids[0], ids[2]), 0.0);
        assert_eq!(weight_of(&tree, &ids, "onRight", ids[2], ids[1]), 1.0);
        assert_eq!(weight_of(&tree, &ids, "side", ids[0], ids[1]), 1.0);
        assert_eq!(weight_of(&tree, &ids, "side", ids[1], ids[0]), 1.0);
        assert_eq!(weight_of(&tree, &ids, "side", ids[0], ids[2]), 0.0);
    }
}
