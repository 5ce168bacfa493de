use shared_resources::passenger::Passenger;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarCounters {
    pub floors_travelled: u32,
    pub boarded: u32,
    pub alighted: u32,
}

/// Snapshot of a car, taken between steps or when its worker exits.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct CarReport {
    pub name: String,
    pub floor: u32,
    pub capacity: u32,
    pub remaining_capacity: u32,
    pub passengers: Vec<Passenger>,
    pub drop_offs: Vec<u32>,
    pub counters: CarCounters,
}

impl CarReport {
    pub fn onboard_weight(&self) -> u32 {
        self.passengers.iter().map(|p| p.weight()).sum()
    }
}
