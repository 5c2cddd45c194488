//! Grid topology over an area list.
//!
//! Every distinct left/right edge (after clustering) becomes a grid column
//! boundary and every distinct top/bottom edge a row boundary. An area's
//! [`GridPosition`] is the span of grid lines it occupies; two areas with the
//! same `x1` grid index are left-aligned.

use rstar::{AABB, RTree, RTreeObject};

use crate::model::{AreaId, AreaTree, Rect};

use super::clustering::{key_f64, make_cluster_dict};

/// Default tolerance (in document units) when merging edges into grid lines.
pub const DEFAULT_GRID_TOLERANCE: f64 = 1.0;

/// Position of an area in the topology grid: the grid lines of its left,
/// top, right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPosition {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

/// Spatial lookups the relation predicates need from the layout model.
pub trait AreaTopology {
    /// Areas this topology was built over, in document order.
    fn areas(&self) -> &[AreaId];

    /// Grid position of an area, None when the area is not part of the topology.
    fn position(&self, id: AreaId) -> Option<GridPosition>;

    /// Number of grid columns.
    fn grid_width(&self) -> usize;

    /// Number of grid rows.
    fn grid_height(&self) -> usize;

    /// Bounding extent of all areas.
    fn extent(&self) -> Rect;

    /// Areas whose bounds contain the given point, ordered by id.
    fn areas_at(&self, x: f64, y: f64) -> Vec<AreaId>;
}

#[derive(Clone)]
struct AreaNode {
    id: AreaId,
    bounds: Rect,
}

impl PartialEq for AreaNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl RTreeObject for AreaNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.x0, self.bounds.y0],
            [self.bounds.x1, self.bounds.y1],
        )
    }
}

/// Grid index over a fixed area list.
pub struct GridTopology {
    areas: Vec<AreaId>,
    positions: rustc_hash::FxHashMap<AreaId, GridPosition>,
    grid_width: usize,
    grid_height: usize,
    extent: Rect,
    tree: RTree<AreaNode>,
}

impl GridTopology {
    pub fn new(tree: &AreaTree, areas: &[AreaId]) -> Self {
        Self::with_tolerance(tree, areas, DEFAULT_GRID_TOLERANCE)
    }

    pub fn with_tolerance(tree: &AreaTree, areas: &[AreaId], tolerance: f64) -> Self {
        let areas: Vec<AreaId> = areas
            .iter()
            .copied()
            .filter(|id| tree.get(*id).is_some())
            .collect();

        let mut xs = Vec::with_capacity(areas.len() * 2);
        let mut ys = Vec::with_capacity(areas.len() * 2);
        let mut extent: Option<Rect> = None;
        for id in &areas {
            let b = tree[*id].bounds();
            xs.push(b.x0);
            xs.push(b.x1);
            ys.push(b.y0);
            ys.push(b.y1);
            extent = Some(match extent {
                Some(e) => e.union(b),
                None => *b,
            });
        }

        let xdict = make_cluster_dict(xs, tolerance);
        let ydict = make_cluster_dict(ys, tolerance);
        let grid_width = xdict.values().max().map_or(0, |m| m + 1);
        let grid_height = ydict.values().max().map_or(0, |m| m + 1);

        let mut positions = rustc_hash::FxHashMap::default();
        let mut nodes = Vec::with_capacity(areas.len());
        for id in &areas {
            let b = *tree[*id].bounds();
            let pos = GridPosition {
                x1: xdict[&key_f64(b.x0)],
                y1: ydict[&key_f64(b.y0)],
                x2: xdict[&key_f64(b.x1)],
                y2: ydict[&key_f64(b.y1)],
            };
            positions.insert(*id, pos);
            nodes.push(AreaNode { id: *id, bounds: b });
        }

        Self {
            areas,
            positions,
            grid_width,
            grid_height,
            extent: extent.unwrap_or_default(),
            tree: RTree::bulk_load(nodes),
        }
    }
}

impl AreaTopology for GridTopology {
    fn areas(&self) -> &[AreaId] {
        &self.areas
    }

    fn position(&self, id: AreaId) -> Option<GridPosition> {
        self.positions.get(&id).copied()
    }

    fn grid_width(&self) -> usize {
        self.grid_width
    }

    fn grid_height(&self) -> usize {
        self.grid_height
    }

    fn extent(&self) -> Rect {
        self.extent
    }

    fn areas_at(&self, x: f64, y: f64) -> Vec<AreaId> {
        let mut hits: Vec<AreaId> = self
            .tree
            .locate_in_envelope_intersecting(&AABB::from_point([x, y]))
            .map(|n| n.id)
            .collect();
        hits.sort();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AreaStyle;

    fn tree_with(rects: &[Rect]) -> (AreaTree, Vec<AreaId>) {
        let mut tree = AreaTree::new(500.0, 500.0);
        let ids = rects
            .iter()
            .map(|r| {
                tree.add_area(tree.root(), *r, AreaStyle::default(), "")
                    .unwrap()
            })
            .collect();
        (tree, ids)
    }

    #[test]
    fn left_aligned_areas_share_a_column() {
        let (tree, ids) = tree_with(&[
            Rect::new(10.0, 10.0, 100.0, 20.0),
            Rect::new(10.4, 25.0, 60.0, 35.0),
            Rect::new(120.0, 10.0, 200.0, 20.0),
        ]);
        let topo = GridTopology::new(&tree, &ids);
        let p0 = topo.position(ids[0]).unwrap();
        let p1 = topo.position(ids[1]).unwrap();
        let p2 = topo.position(ids[2]).unwrap();
        assert_eq!(p0.x1, p1.x1);
        assert_ne!(p0.x1, p2.x1);
        assert_eq!(p0.y1, p2.y1);
        assert_eq!(topo.extent(), Rect::new(10.0, 10.0, 200.0, 35.0));
        assert!(topo.grid_width() >= 4);
    }

    #[test]
    fn finds_areas_at_point() {
        let (tree, ids) = tree_with(&[
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(25.0, 25.0, 75.0, 75.0),
        ]);
        let topo = GridTopology::new(&tree, &ids);
        assert_eq!(topo.areas_at(30.0, 30.0), vec![ids[0], ids[1]]);
        assert_eq!(topo.areas_at(60.0, 60.0), vec![ids[1]]);
        assert!(topo.areas_at(90.0, 90.0).is_empty());
    }
}
