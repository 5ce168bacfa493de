use std::fmt;

use lift::CarReport;

/// Final state of every car once the simulation is over.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub cars: Vec<CarReport>,
    pub waiting_passengers: usize,
}

impl SimulationReport {
    pub fn new(cars: Vec<CarReport>, waiting_passengers: usize) -> Self {
        SimulationReport {
            cars: cars,
            waiting_passengers: waiting_passengers,
        }
    }

    pub fn car(&self, name: &str) -> Option<&CarReport> {
        self.cars.iter().find(|c| c.name == name)
    }

    pub fn floors_travelled(&self) -> u64 {
        self.cars.iter().map(|c| c.counters.floors_travelled as u64).sum()
    }

    pub fn boarded(&self) -> u64 {
        self.cars.iter().map(|c| c.counters.boarded as u64).sum()
    }

    pub fn alighted(&self) -> u64 {
        self.cars.iter().map(|c| c.counters.alighted as u64).sum()
    }

    /// Floors travelled per delivered passenger and car. Zero until someone
    /// has been delivered.
    pub fn cost(&self) -> f64 {
        let delivered = self.alighted() * self.cars.len() as u64;
        if delivered == 0 {
            return 0.0;
        }
        self.floors_travelled() as f64 / delivered as f64
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+-----------------+------------+------------+------------+------------+")?;
        writeln!(f, "| {0:<15} | {1:<10} | {2:<10} | {3:<10} | {4:<10} |", "CAR", "FLOOR", "TRAVELLED", "BOARDED", "ALIGHTED")?;
        writeln!(f, "+-----------------+------------+------------+------------+------------+")?;
        for car in &self.cars {
            writeln!(f, "| {0:<15} | {1:<10} | {2:<10} | {3:<10} | {4:<10} |",
                car.name,
                car.floor,
                car.counters.floors_travelled,
                car.counters.boarded,
                car.counters.alighted)?;
        }
        writeln!(f, "+-----------------+------------+------------+------------+------------+")?;
        writeln!(f, "| {0:<15} | {1:<10} | {2:<10} | {3:<10} | {4:<10} |",
            "TOTAL", "", self.floors_travelled(), self.boarded(), self.alighted())?;
        writeln!(f, "+-----------------+------------+------------+------------+------------+")?;
        writeln!(f, "Still waiting: {}", self.waiting_passengers)?;
        write!(f, "Cost: {:.3}", self.cost())
    }
}
