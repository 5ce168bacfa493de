/// ----- PICKUP REQUESTS -----
/// The set of floors where some car should stop to try a pickup. One instance
/// is shared by every car in a group. Every access goes through a single lock,
/// and cars idling in `Wait` sleep on the condition variable beside it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::direction::Direction;
use crate::error::{Result, SimulationError};

#[derive(Debug)]
pub struct PickupRequests {
    floors: Mutex<BTreeSet<u32>>,
    work_available: Condvar,
    min_floor: u32,
    max_floor: u32,
}

impl PickupRequests {
    pub fn new(min_floor: u32, max_floor: u32) -> Self {
        PickupRequests {
            floors: Mutex::new(BTreeSet::new()),
            work_available: Condvar::new(),
            min_floor: min_floor,
            max_floor: max_floor,
        }
    }

    /// Inserts `floor` and wakes every waiting car. Returns `false` if the
    /// floor was already pending.
    pub fn publish(&self, floor: u32) -> Result<bool> {
        if floor < self.min_floor || floor > self.max_floor {
            return Err(SimulationError::FloorNotFound(floor));
        }
        let mut floors = self.floors.lock();
        let inserted = floors.insert(floor);
        self.work_available.notify_all();
        Ok(inserted)
    }

    pub fn remove(&self, floor: u32) -> bool {
        self.floors.lock().remove(&floor)
    }

    /// Claims `floor` for the calling car. Only the first caller after a
    /// publication gets `true`.
    pub fn commit(&self, floor: u32) -> bool {
        self.remove(floor)
    }

    /// Nearest pending floor on or ahead of `floor` in `direction`. Does not
    /// claim it.
    pub fn peek_nearest(&self, floor: u32, direction: Direction) -> Option<u32> {
        let floors = self.floors.lock();
        match direction {
            Direction::Up => floors.range(floor..).next().copied(),
            Direction::Down => floors.range(..=floor).next_back().copied(),
        }
    }

    pub fn contains(&self, floor: u32) -> bool {
        self.floors.lock().contains(&floor)
    }

    pub fn is_empty(&self) -> bool {
        self.floors.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.floors.lock().len()
    }

    pub fn floors(&self) -> Vec<u32> {
        self.floors.lock().iter().copied().collect()
    }

    /// Blocks until a floor is pending or `running` is cleared. With `block`
    /// unset an empty set returns at once instead of waiting. The emptiness
    /// check and the wait happen under the same lock. Returns whether a floor
    /// is pending.
    pub fn wait_for_work(&self, running: &AtomicBool, block: bool) -> bool {
        let mut floors = self.floors.lock();
        while floors.is_empty() && running.load(Ordering::SeqCst) {
            if !block {
                return false;
            }
            self.work_available.wait(&mut floors);
        }
        !floors.is_empty()
    }

    /// Wakes every waiting car so it can notice a cleared running flag.
    pub fn wake_all(&self) {
        let _floors = self.floors.lock();
        self.work_available.notify_all();
    }
}
