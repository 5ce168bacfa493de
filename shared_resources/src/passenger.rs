use std::fmt;

use crate::error::{Result, SimulationError};

/// A rider waiting on a floor or travelling in a car.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Passenger {
    weight: u32,
    source_floor: u32,
    destination_floor: u32,
}

impl Passenger {
    pub fn new(weight: u32, source_floor: u32, destination_floor: u32) -> Result<Self> {
        if weight == 0 {
            return Err(SimulationError::InvalidPassenger(String::from("weight must be positive")));
        }
        if source_floor == destination_floor {
            return Err(SimulationError::InvalidPassenger(format!(
                "source and destination are both floor {}",
                source_floor
            )));
        }
        Ok(Passenger {
            weight: weight,
            source_floor: source_floor,
            destination_floor: destination_floor,
        })
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn source_floor(&self) -> u32 {
        self.source_floor
    }

    pub fn destination_floor(&self) -> u32 {
        self.destination_floor
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kg {}->{}", self.weight, self.source_floor, self.destination_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_by_value() {
        let a = Passenger::new(70, 1, 5).unwrap();
        let b = Passenger::new(70, 1, 5).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Passenger::new(71, 1, 5).unwrap());
    }

    #[test]
    fn rejects_weightless_and_stationary_passengers() {
        assert!(matches!(Passenger::new(0, 1, 5), Err(SimulationError::InvalidPassenger(_))));
        assert!(matches!(Passenger::new(80, 3, 3), Err(SimulationError::InvalidPassenger(_))));
    }

    #[test]
    fn display_is_compact() {
        let p = Passenger::new(60, 3, 8).unwrap();
        assert_eq!(p.to_string(), "60kg 3->8");
    }
}
