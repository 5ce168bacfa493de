use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::passenger::Passenger;

/// Passengers waiting on one floor, in arrival order. A passenger turned away
/// by a full car goes back to the front.
#[derive(Debug)]
pub struct FloorQueue {
    floor: u32,
    passengers: Mutex<VecDeque<Passenger>>,
}

impl FloorQueue {
    pub fn new(floor: u32) -> Self {
        FloorQueue {
            floor: floor,
            passengers: Mutex::new(VecDeque::new()),
        }
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn add_passenger(&self, passenger: Passenger) {
        self.passengers.lock().push_back(passenger);
    }

    pub fn return_passenger(&self, passenger: Passenger) {
        self.passengers.lock().push_front(passenger);
    }

    pub fn next_passenger(&self) -> Option<Passenger> {
        self.passengers.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.passengers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.lock().is_empty()
    }

    pub fn waiting(&self) -> Vec<Passenger> {
        self.passengers.lock().iter().copied().collect()
    }
}
