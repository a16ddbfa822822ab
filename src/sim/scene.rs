//! Renderable block instances derived from the lane grid
//!
//! A ring of depth slots, each holding the instances for one slice. This is
//! a projection of the grid and is only ever mutated through `Track`, which
//! keeps it in step with the cells it mirrors.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::item::Item;
use crate::consts::*;
use crate::{Lane, lane_center};

/// Renderable instance types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Cube,
    Coin,
    /// Halo drawn around a coin
    Ring,
    ScoreGem,
    SpeedGem,
    BonusGem,
    ReversedGem,
    Wall,
}

/// One renderable instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBlock {
    pub kind: BlockKind,
    pub position: Vec3,
    pub size: f32,
}

/// Instances for one cell item. Positions are world-space for the slice's
/// absolute index.
pub fn blocks_for(item: Item, lane: Lane, slice_id: u64) -> Vec<SceneBlock> {
    let position = lane_center(lane, slice_id);
    let block = |kind, size| SceneBlock {
        kind,
        position,
        size,
    };
    match item {
        Item::Empty => Vec::new(),
        Item::Obstacle => vec![block(BlockKind::Cube, CUBE_SIZE)],
        Item::Coin => vec![
            block(BlockKind::Coin, COIN_SIZE),
            block(BlockKind::Ring, RING_RADIUS),
        ],
        Item::ScoreGem => vec![block(BlockKind::ScoreGem, GEM_SIZE)],
        Item::SpeedGem => vec![block(BlockKind::SpeedGem, GEM_SIZE)],
        Item::BonusGem => vec![block(BlockKind::BonusGem, GEM_SIZE)],
        Item::ReversedGem => vec![block(BlockKind::ReversedGem, GEM_SIZE)],
        Item::Border => vec![block(BlockKind::Wall, CUBE_SIZE)],
    }
}

type SliceBlocks = [[Vec<SceneBlock>; GRID_COLUMNS]; LANES_Y_COUNT];

fn empty_slice() -> SliceBlocks {
    std::array::from_fn(|_| std::array::from_fn(|_| Vec::new()))
}

/// [depth-slot][row][column] -> instances
#[derive(Debug, Clone)]
pub struct SceneBlockCache {
    slots: Vec<SliceBlocks>,
    /// Physical slot holding logical depth 0
    front: usize,
}

impl Default for SceneBlockCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBlockCache {
    pub fn new() -> Self {
        Self {
            slots: (0..LANES_Z_COUNT).map(|_| empty_slice()).collect(),
            front: 0,
        }
    }

    #[inline]
    fn physical(&self, depth: usize) -> usize {
        (self.front + depth) % LANES_Z_COUNT
    }

    /// Physical index of the front slot
    pub fn front_index(&self) -> usize {
        self.front
    }

    pub fn cell(&self, depth: usize, lane: Lane) -> &[SceneBlock] {
        &self.slots[self.physical(depth)][lane.row][lane.col]
    }

    pub(crate) fn rebuild_cell(&mut self, depth: usize, lane: Lane, item: Item, slice_id: u64) {
        let idx = self.physical(depth);
        self.slots[idx][lane.row][lane.col] = blocks_for(item, lane, slice_id);
    }

    pub(crate) fn clear_cell(&mut self, depth: usize, lane: Lane) {
        let idx = self.physical(depth);
        self.slots[idx][lane.row][lane.col].clear();
    }

    /// Tear down the front slot and make it the (empty) back slot
    pub(crate) fn rotate(&mut self) {
        let front = self.front;
        for row in self.slots[front].iter_mut() {
            for cell in row.iter_mut() {
                cell.clear();
            }
        }
        self.front = (self.front + 1) % LANES_Z_COUNT;
    }

    pub(crate) fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = empty_slice();
        }
        self.front = 0;
    }

    /// All instances, front slice first
    pub fn iter(&self) -> impl Iterator<Item = &SceneBlock> + '_ {
        (0..LANES_Z_COUNT).flat_map(move |depth| {
            self.slots[self.physical(depth)]
                .iter()
                .flat_map(|row| row.iter().flatten())
        })
    }

    pub fn block_count(&self) -> usize {
        self.iter().count()
    }
}
