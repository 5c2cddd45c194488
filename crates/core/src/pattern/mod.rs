//! Record schemas: attributes, cardinality rules and connection-pattern
//! enumeration.

mod attribute;
mod generator;
mod registry;

pub use attribute::{Attribute, AttributeGroup};
pub use generator::{PatternGenerator, TagPair};
pub use registry::ConfigurationRegistry;
