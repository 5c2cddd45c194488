//! Document layout model consumed by the pattern engine.
//!
//! The renderer produces an [`AreaTree`]; the engine only reads geometry and
//! style and adds or removes weak tags.

mod rect;
mod style;
mod tag;
mod tree;

pub use rect::Rect;
pub use style::{AreaStyle, Color};
pub use tag::Tag;
pub use tree::{Area, AreaId, AreaTree};
