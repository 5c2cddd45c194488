//! Presentation hints attached to attributes.

use std::fmt;

use smallvec::SmallVec;

/// How the areas of a tag are expected to be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PresentationHint {
    /// The value fills a box of its own: a chunk is lifted to the
    /// outermost ancestor that has it as its only content.
    WholeBox,
    /// All areas bound to the tag in one record sit on one visual line.
    SingleLine,
}

impl PresentationHint {
    pub fn name(self) -> &'static str {
        match self {
            PresentationHint::WholeBox => "wholeBox",
            PresentationHint::SingleLine => "singleLine",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wholeBox" => Some(PresentationHint::WholeBox),
            "singleLine" => Some(PresentationHint::SingleLine),
            _ => None,
        }
    }
}

impl fmt::Display for PresentationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sorted, duplicate-free set of hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresentationHints {
    hints: SmallVec<[PresentationHint; 2]>,
}

impl PresentationHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hint: PresentationHint) {
        if let Err(pos) = self.hints.binary_search(&hint) {
            self.hints.insert(pos, hint);
        }
    }

    pub fn contains(&self, hint: PresentationHint) -> bool {
        self.hints.binary_search(&hint).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PresentationHint> + '_ {
        self.hints.iter().copied()
    }
}

impl FromIterator<PresentationHint> for PresentationHints {
    fn from_iter<I: IntoIterator<Item = PresentationHint>>(iter: I) -> Self {
        let mut out = Self::new();
        for hint in iter {
            out.insert(hint);
        }
        out
    }
}
