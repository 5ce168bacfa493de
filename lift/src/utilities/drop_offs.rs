use std::collections::BTreeSet;

use shared_resources::direction::Direction;

/// Destination floors of the passengers currently in one car.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOffs {
    floors: BTreeSet<u32>,
}

impl DropOffs {
    pub fn new() -> Self {
        DropOffs { floors: BTreeSet::new() }
    }

    pub fn insert(&mut self, floor: u32) -> bool {
        self.floors.insert(floor)
    }

    pub fn remove(&mut self, floor: u32) -> bool {
        self.floors.remove(&floor)
    }

    pub fn contains(&self, floor: u32) -> bool {
        self.floors.contains(&floor)
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn floors(&self) -> Vec<u32> {
        self.floors.iter().copied().collect()
    }

    /// Nearest drop-off on or ahead of `floor`.
    pub fn nearest(&self, floor: u32, direction: Direction) -> Option<u32> {
        match direction {
            Direction::Up => self.floors.range(floor..).next().copied(),
            Direction::Down => self.floors.range(..=floor).next_back().copied(),
        }
    }

    /// Nearest drop-off strictly ahead of `floor`.
    pub fn nearest_beyond(&self, floor: u32, direction: Direction) -> Option<u32> {
        match direction {
            Direction::Up => self.floors.range(floor.saturating_add(1)..).next().copied(),
            Direction::Down => self.floors.range(..floor).next_back().copied(),
        }
    }
}
