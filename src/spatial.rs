//! Uniform-grid spatial hashing for neighbor queries.
//!
//! Space is cut into cubes of edge `cell_size` keyed by the integer cell
//! coordinate `floor(position / cell_size)`. With `cell_size` equal to the
//! neighbor radius, every neighbor of an agent lies in its own cell or one of
//! the 26 adjacent cells, so a query only scans that 3×3×3 block and then
//! filters by exact distance.
//!
//! Only occupied cells are stored. The grid is rebuilt from scratch every
//! tick since agents move arbitrarily between cells.
//!
//! # Example
//!
//! ```
//! use shoal::{SpatialGrid, Vec3};
//!
//! let positions = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0)];
//! let grid = SpatialGrid::build(positions, 5.0).unwrap();
//! assert_eq!(grid.neighbors_of(0), vec![1]);
//! assert!(grid.neighbors_of(2).is_empty());
//! ```

use crate::error::ConfigError;
use glam::{IVec3, Vec3};
use std::collections::HashMap;

/// Offsets for the 27 cells of a 3×3×3 block (including the center).
const NEIGHBOR_OFFSETS: [IVec3; 27] = {
    let mut offsets = [IVec3::ZERO; 27];
    let mut i = 0;
    while i < 27 {
        offsets[i] = IVec3::new((i % 3) as i32 - 1, ((i / 3) % 3) as i32 - 1, (i / 9) as i32 - 1);
        i += 1;
    }
    offsets
};

/// Integer cell coordinate containing `position`.
///
/// Uses floor division on each axis, so negative coordinates round toward
/// negative infinity (`-0.1` lands in cell `-1`, not `0`).
#[inline]
pub fn cell_key(position: Vec3, cell_size: f32) -> IVec3 {
    (position / cell_size).floor().as_ivec3()
}

/// `cell + offset`, or `None` past the `i32` range. Cells at the limit have
/// no neighbor on that side, so the block must not wrap or repeat them.
#[inline]
fn offset_cell(cell: IVec3, offset: IVec3) -> Option<IVec3> {
    Some(IVec3::new(
        cell.x.checked_add(offset.x)?,
        cell.y.checked_add(offset.y)?,
        cell.z.checked_add(offset.z)?,
    ))
}

/// Bucketed agent positions supporting radius queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Occupied cells only. Indices within a bucket keep insertion order.
    buckets: HashMap<IVec3, Vec<usize>>,
    positions: Vec<Vec3>,
    cells: Vec<IVec3>,
}

impl SpatialGrid {
    /// Bucket every position into cells of edge `cell_size`.
    ///
    /// Fails if `cell_size` is not a finite positive number.
    pub fn build(
        positions: impl IntoIterator<Item = Vec3>,
        cell_size: f32,
    ) -> Result<Self, ConfigError> {
        let mut grid = Self {
            cell_size,
            ..Self::default()
        };
        grid.rebuild(positions, cell_size)?;
        Ok(grid)
    }

    /// Clear and refill the grid, reusing its allocations.
    pub fn rebuild(
        &mut self,
        positions: impl IntoIterator<Item = Vec3>,
        cell_size: f32,
    ) -> Result<(), ConfigError> {
        if !cell_size.is_finite() {
            return Err(ConfigError::NonFinite { name: "neighbor_radius" });
        }
        if cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveNeighborRadius(cell_size));
        }

        self.cell_size = cell_size;
        self.buckets.clear();
        self.positions.clear();
        self.cells.clear();

        for (index, position) in positions.into_iter().enumerate() {
            let cell = cell_key(position, cell_size);
            self.buckets.entry(cell).or_default().push(index);
            self.positions.push(position);
            self.cells.push(cell);
        }
        Ok(())
    }

    /// Edge length of each cell.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of indexed agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of cells holding at least one agent.
    #[inline]
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }

    /// Cell that agent `index` was bucketed into.
    #[inline]
    pub fn cell_of(&self, index: usize) -> Option<IVec3> {
        self.cells.get(index).copied()
    }

    /// Agent indices in `cell`, or `None` if the cell is empty.
    pub fn bucket(&self, cell: IVec3) -> Option<&[usize]> {
        self.buckets.get(&cell).map(Vec::as_slice)
    }

    /// Every agent in the 3×3×3 block around `cell`, in a fixed order.
    fn block_into(&self, cell: IVec3, out: &mut Vec<usize>) {
        out.clear();
        for offset in NEIGHBOR_OFFSETS {
            let Some(neighbor) = offset_cell(cell, offset) else {
                continue;
            };
            if let Some(bucket) = self.buckets.get(&neighbor) {
                out.extend_from_slice(bucket);
            }
        }
    }

    /// Candidate neighbors of agent `index`: everyone in the surrounding
    /// 3×3×3 block except the agent itself.
    ///
    /// This is a superset of the true neighbor set.
    pub fn candidates(&self, index: usize) -> Vec<usize> {
        let Some(cell) = self.cell_of(index) else {
            return Vec::new();
        };
        let mut block = Vec::new();
        self.block_into(cell, &mut block);
        block.retain(|&other| other != index);
        block
    }

    /// Agents strictly closer than `cell_size` to agent `index`, excluding itself.
    pub fn neighbors_of(&self, index: usize) -> Vec<usize> {
        let Some(&position) = self.positions.get(index) else {
            return Vec::new();
        };
        self.candidates(index)
            .into_iter()
            .filter(|&other| position.distance(self.positions[other]) < self.cell_size)
            .collect()
    }

    /// Exact neighbor lists for every agent.
    pub fn neighbor_graph(&self) -> NeighborGraph {
        let mut graph = NeighborGraph::default();
        self.neighbor_graph_into(&mut graph);
        graph
    }

    /// Fill `graph` with exact neighbor lists, reusing its allocations.
    ///
    /// The 3×3×3 union is gathered once per occupied cell and shared by all
    /// agents in that cell.
    pub fn neighbor_graph_into(&self, graph: &mut NeighborGraph) {
        graph.reset(self.positions.len());

        let mut block = Vec::new();
        for (&cell, members) in &self.buckets {
            self.block_into(cell, &mut block);

            for &index in members {
                let position = self.positions[index];
                let list = &mut graph.lists[index];
                for &other in &block {
                    if other == index {
                        continue;
                    }
                    if position.distance(self.positions[other]) < self.cell_size {
                        list.push(other);
                    }
                }
            }
        }
    }
}

/// Per-agent neighbor lists produced by [`SpatialGrid::neighbor_graph`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborGraph {
    lists: Vec<Vec<usize>>,
}

impl NeighborGraph {
    fn reset(&mut self, len: usize) {
        self.lists.truncate(len);
        for list in &mut self.lists {
            list.clear();
        }
        self.lists.resize_with(len, Vec::new);
    }

    /// Neighbors of agent `index` (empty for an unknown index).
    #[inline]
    pub fn neighbors_of(&self, index: usize) -> &[usize] {
        self.lists.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of agents covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of (agent, neighbor) entries. Each close pair counts twice.
    pub fn total_links(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

/// All-pairs neighbor query: indices strictly within `radius` of agent
/// `index`, excluding itself.
///
/// O(n) per agent; used as the reference the grid is checked against.
pub fn neighbors_brute_force(positions: &[Vec3], index: usize, radius: f32) -> Vec<usize> {
    let Some(&position) = positions.get(index) else {
        return Vec::new();
    };
    positions
        .iter()
        .enumerate()
        .filter(|&(other, &p)| other != index && position.distance(p) < radius)
        .map(|(other, _)| other)
        .collect()
}
