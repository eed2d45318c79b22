//! Read access to the chunks surrounding one chunk.
//!
//! A `ChunkNeighborhood` holds read guards on up to eight horizontally adjacent chunks
//! (never the centre one), so a mesh build can resolve boundary lookups while the
//! centre chunk is borrowed separately, mutably if needed.

use std::ops::Deref;
use std::sync::RwLockReadGuard;

use super::{Chunk, ChunkIndex};
use crate::core::MtResource;

const SLOTS: usize = 9;

fn slot_of(di: i32, dj: i32) -> Option<usize> {
    if !(-1..=1).contains(&di) || !(-1..=1).contains(&dj) || (di == 0 && dj == 0) {
        return None;
    }
    Some(((dj + 1) * 3 + (di + 1)) as usize)
}

/// The eight chunks around `center`, each present only if it exists in the world.
pub struct ChunkNeighborhood<'a> {
    center: ChunkIndex,
    neighbors: [Option<RwLockReadGuard<'a, Chunk>>; SLOTS],
}

impl<'a> ChunkNeighborhood<'a> {
    /// A neighbourhood where every neighbour is missing.
    pub fn isolated(center: ChunkIndex) -> Self {
        ChunkNeighborhood {
            center,
            neighbors: std::array::from_fn(|_| None),
        }
    }

    /// Collects guards by asking `lookup` for each of the eight offsets.
    pub fn gather<F>(center: ChunkIndex, mut lookup: F) -> Self
    where
        F: FnMut(ChunkIndex) -> Option<RwLockReadGuard<'a, Chunk>>,
    {
        let mut neighborhood = Self::isolated(center);
        for dj in -1..=1 {
            for di in -1..=1 {
                if let Some(slot) = slot_of(di, dj) {
                    neighborhood.neighbors[slot] = lookup(center.offset(di, dj));
                }
            }
        }
        neighborhood
    }

    /// Locks the chunks behind `handles`, as returned by `World::neighbor_handles`.
    ///
    /// Handles that are not adjacent to `center` are ignored.
    pub fn from_handles(center: ChunkIndex, handles: &'a [(ChunkIndex, MtResource<Chunk>)]) -> Self {
        Self::gather(center, |index| {
            handles
                .iter()
                .find(|(neighbor, _)| *neighbor == index)
                .map(|(_, chunk)| chunk.get())
        })
    }

    /// Index of the chunk this neighbourhood surrounds.
    pub fn center(&self) -> ChunkIndex {
        self.center
    }

    /// The neighbour `(di, dj)` chunks away, if it exists.
    ///
    /// Offsets outside the ring, and `(0, 0)`, are always `None`.
    pub fn neighbor(&self, di: i32, dj: i32) -> Option<&Chunk> {
        slot_of(di, dj)
            .and_then(|slot| self.neighbors[slot].as_ref())
            .map(Deref::deref)
    }

    /// Number of neighbours present.
    pub fn len(&self) -> usize {
        self.neighbors.iter().flatten().count()
    }

    /// Whether no neighbour is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
