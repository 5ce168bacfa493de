use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Result, SimulationError};

const CONFIG_FILE: &str = "config.json";
const FALLBACK_CONFIG_FILE: &str = "_config.json";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    pub num_floors: u32,
    pub min_floor: u32,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            num_floors: 10,
            min_floor: 1,
        }
    }
}

impl BuildingConfig {
    pub fn max_floor(&self) -> u32 {
        self.min_floor + self.num_floors - 1
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub num_cars: u32,
    pub capacity: u32,
    /// Idle cars wait for new pickups instead of shutting down.
    pub idle_capable: bool,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            num_cars: 2,
            capacity: 500,
            idle_capable: false,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PassengerConfig {
    pub count: u32,
    pub min_weight: u32,
    pub max_weight: u32,
    pub seed: Option<u64>,
    pub feed_interval_ms: u64,
}

impl Default for PassengerConfig {
    fn default() -> Self {
        PassengerConfig {
            count: 10,
            min_weight: 50,
            max_weight: 169,
            seed: None,
            feed_interval_ms: 250,
        }
    }
}

/// Settings for a single car, derived from the building and elevator sections.
#[derive(Debug, Clone, PartialEq)]
pub struct CarConfig {
    pub min_floor: u32,
    pub max_floor: u32,
    pub capacity: u32,
    pub idle_capable: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    pub passengers: PassengerConfig,
}

fn read_config_file(path: Option<&Path>) -> Result<Option<String>> {
    if let Some(path) = path {
        return Ok(Some(fs::read_to_string(path)?));
    }
    for file_path in [CONFIG_FILE, FALLBACK_CONFIG_FILE] {
        if let Ok(content) = fs::read_to_string(file_path) {
            return Ok(Some(content));
        }
    }
    Ok(None)
}

impl SimulationConfig {
    /// Reads `path`, or `config.json`/`_config.json` from the working
    /// directory when no path is given. Missing files give the defaults.
    pub fn get(path: Option<&Path>) -> Result<Self> {
        let config = match read_config_file(path)? {
            Some(contents) => serde_json::from_str::<SimulationConfig>(&contents)?,
            None => {
                info!("No configuration file provided, using default settings...");
                SimulationConfig::default()
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.building.num_floors == 0 {
            return Err(SimulationError::InvalidConfig(String::from("a building needs at least one floor")));
        }
        if self.building.min_floor.checked_add(self.building.num_floors).is_none() {
            return Err(SimulationError::InvalidConfig(String::from("floor numbers overflow")));
        }
        if self.elevator.num_cars == 0 {
            return Err(SimulationError::InvalidConfig(String::from("a building needs at least one car")));
        }
        if self.passengers.min_weight == 0 {
            return Err(SimulationError::InvalidConfig(String::from("passenger weight must be positive")));
        }
        if self.passengers.min_weight > self.passengers.max_weight {
            return Err(SimulationError::InvalidConfig(format!(
                "passenger weight range {}..={} is empty",
                self.passengers.min_weight, self.passengers.max_weight
            )));
        }
        if self.elevator.capacity < self.passengers.min_weight {
            return Err(SimulationError::InvalidConfig(format!(
                "car capacity {} cannot admit a passenger of {}",
                self.elevator.capacity, self.passengers.min_weight
            )));
        }
        Ok(())
    }

    pub fn car_config(&self) -> CarConfig {
        CarConfig {
            min_floor: self.building.min_floor,
            max_floor: self.building.max_floor(),
            capacity: self.elevator.capacity,
            idle_capable: self.elevator.idle_capable,
        }
    }
}
