//! Axis-aligned rectangles in document space.
//!
//! Coordinates follow rendered-page conventions: the origin is the top-left
//! corner of the page and `y` grows downward, so `y0` is the top edge and
//! `y1` the bottom edge.

/// A rectangle defined by its top-left `(x0, y0)` and bottom-right `(x1, y1)` corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Creates a rectangle from its origin and size.
    pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Returns true if there is horizontal overlap with another rectangle.
    pub fn is_hoverlap(&self, other: &Rect) -> bool {
        other.x0 <= self.x1 && self.x0 <= other.x1
    }

    /// Returns the amount of horizontal overlap with another rectangle.
    pub fn hoverlap(&self, other: &Rect) -> f64 {
        if self.is_hoverlap(other) {
            self.x1.min(other.x1) - self.x0.max(other.x0)
        } else {
            0.0
        }
    }

    /// Returns the horizontal distance to another rectangle.
    /// Returns 0 if they overlap.
    pub fn hdistance(&self, other: &Rect) -> f64 {
        if self.is_hoverlap(other) {
            0.0
        } else {
            (self.x0 - other.x1).abs().min((self.x1 - other.x0).abs())
        }
    }

    /// Returns true if there is vertical overlap with another rectangle.
    pub fn is_voverlap(&self, other: &Rect) -> bool {
        other.y0 <= self.y1 && self.y0 <= other.y1
    }

    /// Returns the amount of vertical overlap with another rectangle.
    pub fn voverlap(&self, other: &Rect) -> f64 {
        if self.is_voverlap(other) {
            self.y1.min(other.y1) - self.y0.max(other.y0)
        } else {
            0.0
        }
    }

    /// Returns the vertical distance to another rectangle.
    /// Returns 0 if they overlap.
    pub fn vdistance(&self, other: &Rect) -> f64 {
        if self.is_voverlap(other) {
            0.0
        } else {
            (self.y0 - other.y1).abs().min((self.y1 - other.y0).abs())
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.x0 <= x && x <= self.x1 && self.y0 <= y && y <= self.y1
    }

    /// Smallest rectangle enclosing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Returns true if the vertical midpoint of either rectangle falls inside
    /// the vertical span of the other, i.e. both sit on one text line.
    pub fn is_same_line(&self, other: &Rect) -> bool {
        let (c0, c1) = (self.center_y(), other.center_y());
        (other.y0 <= c0 && c0 <= other.y1) || (self.y0 <= c1 && c1 <= self.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_handles_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 10.0);
        let inner = Rect::new(20.0, 2.0, 30.0, 8.0);
        assert_eq!(outer.hoverlap(&inner), 10.0);
        assert_eq!(inner.hoverlap(&outer), 10.0);
        assert_eq!(outer.voverlap(&inner), 6.0);
    }

    #[test]
    fn distances_are_zero_when_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 20.0, 15.0, 30.0);
        assert_eq!(a.hdistance(&b), 0.0);
        assert_eq!(a.vdistance(&b), 10.0);
        assert!(!a.is_same_line(&b));
    }

    #[test]
    fn same_line_uses_midpoints() {
        let word = Rect::new(0.0, 100.0, 40.0, 112.0);
        let tall = Rect::new(50.0, 98.0, 80.0, 120.0);
        let next_line = Rect::new(0.0, 114.0, 40.0, 126.0);
        assert!(word.is_same_line(&tall));
        assert!(!word.is_same_line(&next_line));
    }
}
