//! Geometry and topology over area lists.

mod clustering;
mod topology;

pub use clustering::cluster_list;
pub use topology::{AreaTopology, DEFAULT_GRID_TOLERANCE, GridPosition, GridTopology};
