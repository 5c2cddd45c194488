//! Output labels assigned to areas.

use std::fmt;

use smol_str::SmolStr;

/// An opaque, equality-comparable label naming one field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(SmolStr);

impl Tag {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(SmolStr::new(value.as_ref()))
    }

    pub fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
