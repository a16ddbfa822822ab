//! Sliding-window lane grid
//!
//! `LaneGrid` keeps one front-to-back queue of items per (row, column).
//! `Track` pairs it with the `SceneBlockCache` so every grid mutation and the
//! matching cache update happen in one call.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::generator::SliceGenerator;
use super::item::Item;
use super::scene::SceneBlockCache;
use crate::Lane;
use crate::consts::*;

/// One depth cross-section: [row][column]
pub type Slice = [[Item; GRID_COLUMNS]; LANES_Y_COUNT];

/// An all-empty slice
pub fn empty_slice() -> Slice {
    [[Item::Empty; GRID_COLUMNS]; LANES_Y_COUNT]
}

/// Per-lane queues of upcoming items, depth 0 at the front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneGrid {
    /// Indexed row * GRID_COLUMNS + col
    lanes: Vec<VecDeque<Item>>,
}

impl Default for LaneGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl LaneGrid {
    pub fn new() -> Self {
        Self {
            lanes: (0..LANES_Y_COUNT * GRID_COLUMNS)
                .map(|_| VecDeque::with_capacity(LANES_Z_COUNT + 1))
                .collect(),
        }
    }

    /// Queue index of a lane; `None` outside the grid
    #[inline]
    fn index(lane: Lane) -> Option<usize> {
        (lane.row < LANES_Y_COUNT && lane.col < GRID_COLUMNS)
            .then_some(lane.row * GRID_COLUMNS + lane.col)
    }

    /// Queue of an in-range lane, as produced by `lanes()`
    #[inline]
    fn slot(lane: Lane) -> usize {
        lane.row * GRID_COLUMNS + lane.col
    }

    fn lanes() -> impl Iterator<Item = Lane> {
        (0..LANES_Y_COUNT).flat_map(|row| (0..GRID_COLUMNS).map(move |col| Lane::new(row, col)))
    }

    /// Item at a depth slot, if materialized
    pub fn get(&self, depth: usize, lane: Lane) -> Option<Item> {
        self.lanes
            .get(Self::index(lane)?)
            .and_then(|q| q.get(depth))
            .copied()
    }

    /// Queue length of a lane (0 outside the grid)
    pub fn queue_len(&self, lane: Lane) -> usize {
        Self::index(lane).map_or(0, |i| self.lanes[i].len())
    }

    /// Depth of the materialized window (all queues share it)
    pub fn depth(&self) -> usize {
        self.lanes[0].len()
    }

    /// Every queue holds exactly a full window
    pub fn is_full(&self) -> bool {
        self.lanes.iter().all(|q| q.len() == LANES_Z_COUNT)
    }

    pub fn slice(&self, depth: usize) -> Option<Slice> {
        if depth >= self.depth() {
            return None;
        }
        let mut slice = empty_slice();
        for lane in Self::lanes() {
            slice[lane.row][lane.col] = self.lanes[Self::slot(lane)][depth];
        }
        Some(slice)
    }

    fn push_back(&mut self, slice: &Slice) {
        for lane in Self::lanes() {
            self.lanes[Self::slot(lane)].push_back(slice[lane.row][lane.col]);
        }
    }

    fn pop_front(&mut self) -> Slice {
        let mut slice = empty_slice();
        for lane in Self::lanes() {
            if let Some(item) = self.lanes[Self::slot(lane)].pop_front() {
                slice[lane.row][lane.col] = item;
            }
        }
        slice
    }

    fn set(&mut self, depth: usize, lane: Lane, item: Item) -> Option<Item> {
        let cell = self.lanes.get_mut(Self::index(lane)?)?.get_mut(depth)?;
        Some(std::mem::replace(cell, item))
    }

    fn clear(&mut self) {
        for q in self.lanes.iter_mut() {
            q.clear();
        }
    }
}

/// Lane grid plus its derived scene cache and slice counters
#[derive(Debug, Clone, Default)]
pub struct Track {
    grid: LaneGrid,
    scene: SceneBlockCache,
    /// Slices ever generated this run (absolute id of the next slice)
    slices_generated: u64,
    /// Slices retired this run (absolute id of the front slice)
    slices_retired: u64,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> &LaneGrid {
        &self.grid
    }

    pub fn scene(&self) -> &SceneBlockCache {
        &self.scene
    }

    pub fn slices_generated(&self) -> u64 {
        self.slices_generated
    }

    pub fn slices_retired(&self) -> u64 {
        self.slices_retired
    }

    /// World z where the front slice begins
    pub fn window_start_z(&self) -> f32 {
        self.slices_retired as f32 * LANE_DEPTH
    }

    pub fn cell(&self, depth: usize, lane: Lane) -> Item {
        self.grid.get(depth, lane).unwrap_or(Item::Empty)
    }

    /// Append a slice at the back of the window and project it into the cache
    fn push_slice(&mut self, slice: &Slice) {
        let depth = self.grid.depth();
        let slice_id = self.slices_generated;
        self.grid.push_back(slice);
        for row in 0..LANES_Y_COUNT {
            for col in 0..GRID_COLUMNS {
                self.scene
                    .rebuild_cell(depth, Lane::new(row, col), slice[row][col], slice_id);
            }
        }
        self.slices_generated += 1;
    }

    /// Drop everything and generate a full window
    pub fn refill(&mut self, generator: &mut SliceGenerator) {
        self.grid.clear();
        self.scene.clear();
        self.slices_generated = 0;
        self.slices_retired = 0;
        for _ in 0..LANES_Z_COUNT {
            let slice = generator.next_slice();
            self.push_slice(&slice);
        }
        debug_assert!(self.grid.is_full());
    }

    /// Retire the front slice and append a freshly generated one. Returns the
    /// retired slice.
    pub fn advance_window(&mut self, generator: &mut SliceGenerator) -> Slice {
        self.scene.rotate();
        let retired = self.grid.pop_front();
        self.slices_retired += 1;
        let slice = generator.next_slice();
        self.push_slice(&slice);
        debug_assert!(self.grid.is_full());
        retired
    }

    /// Clear a cell to empty, returning what it held
    pub fn consume(&mut self, depth: usize, lane: Lane) -> Item {
        match self.grid.set(depth, lane, Item::Empty) {
            Some(item) => {
                self.scene.clear_cell(depth, lane);
                item
            }
            None => Item::Empty,
        }
    }

    /// Put an item into a materialized cell (scripted layouts)
    #[cfg(test)]
    pub(crate) fn place(&mut self, depth: usize, lane: Lane, item: Item) {
        if self.grid.set(depth, lane, item).is_some() {
            let slice_id = self.slices_retired + depth as u64;
            self.scene.rebuild_cell(depth, lane, item, slice_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_border_column;
    use crate::sim::scene::blocks_for;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn filled(seed: u64) -> (Track, SliceGenerator) {
        let mut generator = SliceGenerator::new(seed, &Tuning::default());
        let mut track = Track::new();
        track.refill(&mut generator);
        (track, generator)
    }

    #[test]
    fn test_refill_fills_every_queue() {
        let (track, _) = filled(1);
        assert!(track.grid().is_full());
        assert_eq!(track.slices_generated(), LANES_Z_COUNT as u64);
        assert_eq!(track.slices_retired(), 0);
    }

    #[test]
    fn test_advance_keeps_window_aligned() {
        let (mut track, mut generator) = filled(2);
        let second = track.grid().slice(1).expect("full window");
        let front = track.grid().slice(0).expect("full window");
        let retired = track.advance_window(&mut generator);
        assert_eq!(retired, front);
        assert_eq!(track.grid().slice(0), Some(second));
        assert!(track.grid().is_full());
        assert_eq!(track.slices_retired(), 1);
        assert_eq!(track.slices_generated(), LANES_Z_COUNT as u64 + 1);
        assert!((track.window_start_z() - LANE_DEPTH).abs() < 1e-6);
    }

    #[test]
    fn test_consume_clears_grid_and_cache() {
        let (mut track, _) = filled(3);
        let lane = Lane::start();
        track.place(5, lane, Item::Coin);
        assert_eq!(track.scene().cell(5, lane).len(), 2);

        assert_eq!(track.consume(5, lane), Item::Coin);
        assert_eq!(track.cell(5, lane), Item::Empty);
        assert!(track.scene().cell(5, lane).is_empty());
        assert_eq!(track.consume(5, lane), Item::Empty);
    }

    #[test]
    fn test_cache_mirrors_grid_after_advances() {
        let (mut track, mut generator) = filled(4);
        for _ in 0..45 {
            track.advance_window(&mut generator);
        }
        for depth in 0..LANES_Z_COUNT {
            for row in 0..LANES_Y_COUNT {
                for col in 0..GRID_COLUMNS {
                    let lane = Lane::new(row, col);
                    let expected = blocks_for(
                        track.cell(depth, lane),
                        lane,
                        track.slices_retired() + depth as u64,
                    );
                    assert_eq!(track.scene().cell(depth, lane), expected.as_slice());
                }
            }
        }
    }

    #[test]
    fn test_out_of_grid_lane_touches_nothing() {
        let (mut track, _) = filled(6);
        // would alias (1, 2) with a flat row-major index
        let outside = Lane::new(0, GRID_COLUMNS + 2);
        let aliased = Lane::new(1, 2);
        track.place(3, aliased, Item::Coin);

        assert_eq!(track.grid().get(3, outside), None);
        assert_eq!(track.grid().queue_len(outside), 0);
        assert_eq!(track.cell(3, Lane::new(LANES_Y_COUNT, 0)), Item::Empty);
        assert_eq!(track.consume(3, outside), Item::Empty);
        assert_eq!(track.cell(3, aliased), Item::Coin);
        assert_eq!(track.scene().cell(3, aliased).len(), 2);
    }

    #[test]
    fn test_consume_out_of_window_is_noop() {
        let (mut track, _) = filled(5);
        assert_eq!(track.consume(LANES_Z_COUNT + 3, Lane::start()), Item::Empty);
        assert!(track.grid().is_full());
    }

    proptest! {
        #[test]
        fn prop_window_length_invariant(seed in any::<u64>(), advances in 0usize..200) {
            let (mut track, mut generator) = filled(seed);
            for _ in 0..advances {
                track.advance_window(&mut generator);
                for row in 0..LANES_Y_COUNT {
                    for col in 0..GRID_COLUMNS {
                        prop_assert_eq!(track.grid().queue_len(Lane::new(row, col)), LANES_Z_COUNT);
                    }
                }
            }
        }

        #[test]
        fn prop_borders_stay_pure(seed in any::<u64>(), advances in 0usize..100) {
            let (mut track, mut generator) = filled(seed);
            for _ in 0..advances {
                track.advance_window(&mut generator);
            }
            for depth in 0..LANES_Z_COUNT {
                for row in 0..LANES_Y_COUNT {
                    for col in (0..GRID_COLUMNS).filter(|c| is_border_column(*c)) {
                        prop_assert_eq!(track.cell(depth, Lane::new(row, col)), Item::Border);
                    }
                }
            }
        }
    }
}
