//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed 30x90x30 column of voxel cells,
//! its lifecycle flags, and the live/staged mesh buffers built from it.
//!
//! ## Storage
//!
//! Cells are stored densely as `Option<VoxelType>` (one byte each) in layer-major order
//! (y outer, then z, then x), so a horizontal layer is one contiguous run. This makes
//! the mesher's once-per-layer yield point and the generator's y-outer scans cache
//! friendly.
//!
//! ## Lifecycle
//!
//! * `generated` - set once the world generator has filled the cells, never cleared
//! * `dirty` - the live mesh is stale; set on creation, block removal, or neighbour creation
//! * `built` - a mesh has been committed at least once; gates rendering
//!
//! ## Two-phase meshing
//!
//! [`Chunk::build_mesh`] only needs `&self` and writes into a staging slot that holds at
//! most one pending mesh. [`Chunk::commit_mesh`] needs `&mut self` and swaps the staged
//! mesh into the live buffers, so readers of the live buffers never observe a partial
//! upload.

use std::sync::{Mutex, PoisonError};

use cgmath::{MetricSpace, Point3};

use super::voxel::voxel_type::VoxelType;
use crate::engine_state::rendering::meshing::{self, ChunkMesh, StagedMesh};
use chunk_iteration::OccupiedVoxels;
use neighborhood::ChunkNeighborhood;

pub mod chunk_iteration;
pub mod neighborhood;

/// Width of a chunk along X, in voxels.
pub const CHUNK_WIDTH: i32 = 30;
/// Height of a chunk along Y, in voxels.
pub const CHUNK_HEIGHT: i32 = 90;
/// Depth of a chunk along Z, in voxels.
pub const CHUNK_DEPTH: i32 = 30;
/// The number of cells in a single horizontal layer.
pub const CHUNK_LAYER_SIZE: usize = (CHUNK_WIDTH * CHUNK_DEPTH) as usize;
/// The total number of cells in a chunk.
pub const CHUNK_SIZE: usize = CHUNK_LAYER_SIZE * CHUNK_HEIGHT as usize;
/// Edge length of one voxel in world units.
pub const BLOCK_SIZE: f32 = 1.0;

/// Grid coordinates of a chunk within the world.
///
/// `i` runs along world X and `j` along world Z.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkIndex {
    /// Chunk column along X.
    pub i: i32,
    /// Chunk row along Z.
    pub j: i32,
}

impl ChunkIndex {
    /// Creates a chunk index.
    pub const fn new(i: i32, j: i32) -> Self {
        ChunkIndex { i, j }
    }

    /// The index `(di, dj)` chunks away.
    pub fn offset(self, di: i32, dj: i32) -> Self {
        ChunkIndex::new(self.i + di, self.j + dj)
    }

    /// Chebyshev distance in chunks, used for square view regions.
    pub fn chebyshev_distance(self, other: ChunkIndex) -> i32 {
        (self.i - other.i).abs().max((self.j - other.j).abs())
    }
}

/// What a call to [`Chunk::break_block`] removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBreak {
    /// Every cleared cell in local coordinates, starting with the targeted one.
    pub removed: Vec<(Point3<i32>, VoxelType)>,
    /// Offsets `(di, dj)` of neighbour chunks whose meshes read the changed boundary.
    pub neighbors_to_dirty: Vec<(i32, i32)>,
}

/// Represents a 30x90x30 column of voxel cells in the world.
pub struct Chunk {
    /// Position of this chunk in chunk coordinates.
    index: ChunkIndex,
    /// Dense cell storage, indexed by [`Chunk::cell_offset`].
    voxels: Vec<Option<VoxelType>>,
    generated: bool,
    dirty: bool,
    built: bool,
    /// Incremented every time the chunk is marked dirty.
    revision: u64,
    /// The mesh the renderer currently draws.
    mesh: ChunkMesh,
    /// Handoff slot between `build_mesh` and `commit_mesh`.
    staging: Mutex<Option<StagedMesh>>,
}

impl Chunk {
    /// Creates a new, completely empty chunk at the given index.
    ///
    /// The chunk starts dirty (it has no mesh) and not generated.
    pub fn new(index: ChunkIndex) -> Self {
        Chunk {
            index,
            voxels: vec![None; CHUNK_SIZE],
            generated: false,
            dirty: true,
            built: false,
            revision: 0,
            mesh: ChunkMesh::default(),
            staging: Mutex::new(None),
        }
    }

    /// This chunk's index in the world.
    pub fn index(&self) -> ChunkIndex {
        self.index
    }

    /// World-space position of local cell (0, 0, 0).
    pub fn origin(&self) -> Point3<f32> {
        Point3::new(
            (self.index.i * CHUNK_WIDTH) as f32 * BLOCK_SIZE,
            0.0,
            (self.index.j * CHUNK_DEPTH) as f32 * BLOCK_SIZE,
        )
    }

    /// World-space centre of the chunk's footprint at mid height.
    pub fn center(&self) -> Point3<f32> {
        let origin = self.origin();
        Point3::new(
            origin.x + (CHUNK_WIDTH as f32 - 1.0) * 0.5 * BLOCK_SIZE,
            (CHUNK_HEIGHT as f32 - 1.0) * 0.5 * BLOCK_SIZE,
            origin.z + (CHUNK_DEPTH as f32 - 1.0) * 0.5 * BLOCK_SIZE,
        )
    }

    /// Euclidean distance from the chunk centre to `point`.
    pub fn distance_to(&self, point: Point3<f32>) -> f32 {
        self.center().distance(point)
    }

    /// Whether the local coordinate lies inside this chunk.
    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_WIDTH).contains(&x)
            && (0..CHUNK_HEIGHT).contains(&y)
            && (0..CHUNK_DEPTH).contains(&z)
    }

    /// Offset of an in-bounds local coordinate into the cell storage.
    #[inline]
    fn cell_offset(x: i32, y: i32, z: i32) -> usize {
        x as usize + CHUNK_WIDTH as usize * z as usize + CHUNK_LAYER_SIZE * y as usize
    }

    /// Gets the voxel at the given local coordinates.
    ///
    /// # Returns
    /// `None` when the cell is empty or the coordinates are out of bounds.
    #[inline]
    pub fn voxel_at(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        self.voxels[Self::cell_offset(x, y, z)]
    }

    /// Like [`Chunk::voxel_at`] but also `None` for non-solid voxels.
    pub fn solid_voxel_at(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
        self.voxel_at(x, y, z)
            .filter(|voxel_type| voxel_type.is_solid())
    }

    /// Scans downward from `y` and returns the first layer holding a solid voxel.
    ///
    /// # Returns
    /// The layer index, or `CHUNK_HEIGHT` when no floor exists below `y`.
    pub fn depth_at(&self, x: i32, y: i32, z: i32) -> i32 {
        let start = y.min(CHUNK_HEIGHT - 1);
        (0..=start)
            .rev()
            .find(|&layer| self.solid_voxel_at(x, layer, z).is_some())
            .unwrap_or(CHUNK_HEIGHT)
    }

    /// Writes a cell. Out-of-bounds writes are ignored.
    ///
    /// # Returns
    /// `true` if the coordinate was in bounds.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, voxel: Option<VoxelType>) -> bool {
        if !Self::in_bounds(x, y, z) {
            return false;
        }
        self.voxels[Self::cell_offset(x, y, z)] = voxel;
        true
    }

    /// Reads a cell that may lie in a neighbouring chunk.
    ///
    /// Coordinates outside this chunk's X/Z range are resolved through `neighborhood`
    /// and wrapped into the neighbour's local space. When the neighbour has not been
    /// generated, `fallback` is returned. Y outside the column is always empty.
    pub fn cross_chunk_voxel_at(
        &self,
        neighborhood: &ChunkNeighborhood<'_>,
        x: i32,
        y: i32,
        z: i32,
        fallback: Option<VoxelType>,
    ) -> Option<VoxelType> {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return None;
        }

        let di = x.div_euclid(CHUNK_WIDTH);
        let dj = z.div_euclid(CHUNK_DEPTH);
        if di == 0 && dj == 0 {
            return self.voxel_at(x, y, z);
        }
        if di.abs() > 1 || dj.abs() > 1 {
            return fallback;
        }

        match neighborhood.neighbor(di, dj) {
            Some(neighbor) => neighbor.voxel_at(
                x.rem_euclid(CHUNK_WIDTH),
                y,
                z.rem_euclid(CHUNK_DEPTH),
            ),
            None => fallback,
        }
    }

    /// Iterates every occupied cell in layer order.
    pub fn occupied_voxels(&self) -> OccupiedVoxels<'_> {
        OccupiedVoxels::new(&self.voxels)
    }

    /// Whether the world generator has filled this chunk.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Records that generation finished. Never cleared.
    pub fn mark_generated(&mut self) {
        self.generated = true;
    }

    /// Whether the live mesh is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the live mesh as stale.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Whether a mesh has been committed at least once.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Counter bumped by every [`Chunk::mark_dirty`].
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes the voxel at the local coordinate, plus any support-dependent voxels
    /// stacked directly above it, then rebuilds and commits the mesh in place.
    ///
    /// # Returns
    /// `None` if the cell was already empty (or out of bounds). Otherwise the removed
    /// cells and the neighbour chunks that must be marked dirty by the caller.
    pub fn break_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        neighborhood: &ChunkNeighborhood<'_>,
    ) -> Option<BlockBreak> {
        let target = self.voxel_at(x, y, z)?;

        let mut removed = vec![(Point3::new(x, y, z), target)];
        let mut above = y + 1;
        while let Some(resting) = self
            .voxel_at(x, above, z)
            .filter(|voxel_type| voxel_type.is_support_dependent())
        {
            removed.push((Point3::new(x, above, z), resting));
            above += 1;
        }

        for (position, _) in &removed {
            self.set_voxel(position.x, position.y, position.z, None);
        }

        let mut neighbors_to_dirty = Vec::new();
        if x == 0 {
            neighbors_to_dirty.push((-1, 0));
        }
        if x == CHUNK_WIDTH - 1 {
            neighbors_to_dirty.push((1, 0));
        }
        if z == 0 {
            neighbors_to_dirty.push((0, -1));
        }
        if z == CHUNK_DEPTH - 1 {
            neighbors_to_dirty.push((0, 1));
        }

        self.mark_dirty();
        self.build_mesh(neighborhood);
        self.commit_mesh();

        Some(BlockBreak {
            removed,
            neighbors_to_dirty,
        })
    }

    /// Builds the mesh from current voxel data into the staging slot.
    ///
    /// Pure CPU work that only reads voxel state, so it may run on a worker thread
    /// while the main thread keeps drawing the previous mesh. A newer build replaces
    /// any mesh still waiting in the slot.
    ///
    /// # Returns
    /// The number of faces staged.
    pub fn build_mesh(&self, neighborhood: &ChunkNeighborhood<'_>) -> usize {
        let mesh = meshing::build_chunk_mesh(self, neighborhood);
        let face_count = mesh.face_count();
        let staged = StagedMesh {
            revision: self.revision,
            mesh,
        };
        *self
            .staging
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(staged);
        face_count
    }

    /// Whether a built mesh is waiting to be committed.
    pub fn has_staged_mesh(&self) -> bool {
        self.staging
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces both live buffers with the staged mesh.
    ///
    /// Must run on the thread that owns rendering resources. Clears `dirty` only if
    /// nothing marked the chunk dirty after the staged mesh was built.
    ///
    /// # Returns
    /// `false` when no mesh was staged.
    pub fn commit_mesh(&mut self) -> bool {
        let staged = self
            .staging
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(StagedMesh { revision, mesh }) = staged else {
            return false;
        };

        self.mesh = mesh;
        self.built = true;
        if revision == self.revision {
            self.dirty = false;
        }
        true
    }

    /// The live mesh.
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }
}
