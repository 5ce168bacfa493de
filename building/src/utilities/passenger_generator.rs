use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shared_resources::config::SimulationConfig;
use shared_resources::error::{Result, SimulationError};
use shared_resources::passenger::Passenger;

/// Random passengers that always fit in a car of the configured capacity.
#[derive(Debug, Clone)]
pub struct PassengerGenerator {
    rng: StdRng,
    min_floor: u32,
    max_floor: u32,
    min_weight: u32,
    max_weight: u32,
}

impl PassengerGenerator {
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.passengers.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        PassengerGenerator {
            rng: rng,
            min_floor: config.building.min_floor,
            max_floor: config.building.max_floor(),
            min_weight: config.passengers.min_weight,
            max_weight: config.passengers.max_weight.min(config.elevator.capacity),
        }
    }

    pub fn next_passenger(&mut self) -> Result<Passenger> {
        if self.min_floor == self.max_floor {
            return Err(SimulationError::InvalidConfig(String::from(
                "passengers need at least two floors to travel between",
            )));
        }
        let source = self.rng.gen_range(self.min_floor..=self.max_floor);
        // skip the source floor
        let mut destination = self.rng.gen_range(self.min_floor..self.max_floor);
        if destination >= source {
            destination += 1;
        }
        let weight = self.rng.gen_range(self.min_weight..=self.max_weight);
        Passenger::new(weight, source, destination)
    }

    pub fn generate(&mut self, count: u32) -> Result<Vec<Passenger>> {
        (0..count).map(|_| self.next_passenger()).collect()
    }
}
