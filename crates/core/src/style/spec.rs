//! Style fingerprints with wildcard fields.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{AreaStyle, Color, Tag};
use crate::params::StyleTolerance;

/// One field of a style fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field<T> {
    /// Matches any value.
    Any,
    Is(T),
}

impl<T: PartialEq> Field<T> {
    fn covers(&self, other: &Field<T>) -> bool {
        match self {
            Field::Any => true,
            Field::Is(v) => matches!(other, Field::Is(o) if o == v),
        }
    }

    fn is_any(&self) -> bool {
        matches!(self, Field::Any)
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Any => f.write_str("*"),
            Field::Is(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// Tenths, the resolution of numeric style fields.
fn quantize(v: f64) -> i32 {
    (v * 10.0).round() as i32
}

fn unquantize(q: i32) -> f64 {
    q as f64 / 10.0
}

/// A visual-style fingerprint. Numeric fields are stored in tenths so that
/// fingerprints can be hashed and compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleSpec {
    pub font_size: Field<i32>,
    pub font_weight: Field<i32>,
    pub font_style: Field<i32>,
    pub color: Field<Color>,
    pub background: Field<Option<Color>>,
}

/// Representative style per tag.
pub type StyleMap = BTreeMap<Tag, StyleSpec>;

impl StyleSpec {
    pub const FIELD_COUNT: usize = 5;

    /// Fingerprint matching anything.
    pub fn any() -> Self {
        Self {
            font_size: Field::Any,
            font_weight: Field::Any,
            font_style: Field::Any,
            color: Field::Any,
            background: Field::Any,
        }
    }

    /// Exact fingerprint of an area style.
    pub fn exact(style: &AreaStyle) -> Self {
        Self {
            font_size: Field::Is(quantize(style.font_size)),
            font_weight: Field::Is(quantize(style.font_weight)),
            font_style: Field::Is(quantize(style.font_style)),
            color: Field::Is(style.color),
            background: Field::Is(style.background),
        }
    }

    /// Number of wildcard fields.
    pub fn wildcards(&self) -> usize {
        [
            self.font_size.is_any(),
            self.font_weight.is_any(),
            self.font_style.is_any(),
            self.color.is_any(),
            self.background.is_any(),
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }

    /// Number of fields whose values differ.
    pub fn differing_fields(&self, other: &StyleSpec) -> usize {
        [
            self.font_size != other.font_size,
            self.font_weight != other.font_weight,
            self.font_style != other.font_style,
            self.color != other.color,
            self.background != other.background,
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }

    /// Replaces every field that differs from `other` by a wildcard.
    pub fn generalize(&self, other: &StyleSpec) -> StyleSpec {
        fn pick<T: PartialEq + Copy>(a: Field<T>, b: Field<T>) -> Field<T> {
            if a == b { a } else { Field::Any }
        }
        StyleSpec {
            font_size: pick(self.font_size, other.font_size),
            font_weight: pick(self.font_weight, other.font_weight),
            font_style: pick(self.font_style, other.font_style),
            color: pick(self.color, other.color),
            background: pick(self.background, other.background),
        }
    }

    /// True if every fingerprint matched by `other` is matched by `self`.
    pub fn covers(&self, other: &StyleSpec) -> bool {
        self.font_size.covers(&other.font_size)
            && self.font_weight.covers(&other.font_weight)
            && self.font_style.covers(&other.font_style)
            && self.color.covers(&other.color)
            && self.background.covers(&other.background)
    }

    /// Tests an area style against this fingerprint within tolerance.
    pub fn matches(&self, style: &AreaStyle, tolerance: &StyleTolerance) -> bool {
        let close = |field: &Field<i32>, value: f64, tol: f64| match field {
            Field::Any => true,
            Field::Is(q) => (unquantize(*q) - value).abs() <= tol + 1e-9,
        };
        close(&self.font_size, style.font_size, tolerance.font_size)
            && close(&self.font_weight, style.font_weight, tolerance.font_weight)
            && close(&self.font_style, style.font_style, tolerance.font_style)
            && match self.color {
                Field::Any => true,
                Field::Is(c) => c == style.color,
            }
            && match self.background {
                Field::Any => true,
                Field::Is(bg) => bg == style.background,
            }
    }
}

impl fmt::Display for StyleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = |field: &Field<i32>| match field {
            Field::Any => "*".to_string(),
            Field::Is(q) => format!("{:.1}", unquantize(*q)),
        };
        let bg = match self.background {
            Field::Any => "*".to_string(),
            Field::Is(None) => "none".to_string(),
            Field::Is(Some(c)) => c.to_string(),
        };
        write!(
            f,
            "size={} weight={} style={} color={} bg={}",
            num(&self.font_size),
            num(&self.font_weight),
            num(&self.font_style),
            self.color,
            bg
        )
    }
}
