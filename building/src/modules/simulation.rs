/// ----- SIMULATION MODULE -----
/// Runs every car of a building on its own named thread and collects their
/// reports once they are done.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{info, warn};

use lift::{Car, CarHandle, CarReport};
use shared_resources::config::CarConfig;
use shared_resources::error::{Result, SimulationError};

use crate::modules::building::Building;
use crate::utilities::report::SimulationReport;

struct Worker {
    handle: CarHandle,
    thread: JoinHandle<CarReport>,
}

pub struct Simulation {
    building: Arc<Building>,
    workers: Vec<Worker>,
}

impl Simulation {
    /// Starts cars `Lift-1` to `Lift-n` sharing the building's pickups.
    pub fn start(building: Arc<Building>) -> Result<Self> {
        let car_config = building.config().car_config();
        let mut simulation = Simulation {
            building: building.clone(),
            workers: Vec::new(),
        };

        for number in 1..=building.config().elevator.num_cars {
            if let Err(e) = simulation.spawn(format!("Lift-{}", number), &car_config) {
                if let Err(shutdown_error) = simulation.shutdown() {
                    warn!("Could not shut down started cars: {}", shutdown_error);
                }
                return Err(e);
            }
        }
        info!("Simulation started with {} cars", simulation.workers.len());
        Ok(simulation)
    }

    fn spawn(&mut self, name: String, car_config: &CarConfig) -> Result<()> {
        let car = Car::new(name.clone(), car_config, self.building.pickups().clone())?;
        let handle = car.handle();
        let listener = self.building.clone();
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || car.run(&*listener))?;
        self.workers.push(Worker { handle: handle, thread: thread });
        Ok(())
    }

    pub fn building(&self) -> &Arc<Building> {
        &self.building
    }

    pub fn car_names(&self) -> Vec<&str> {
        self.workers.iter().map(|w| w.handle.name()).collect()
    }

    pub fn stop_car(&self, name: &str) -> Result<()> {
        let worker = self
            .workers
            .iter()
            .find(|w| w.handle.name() == name)
            .ok_or_else(|| SimulationError::CarNotFound(name.to_string()))?;
        info!("Stopping {}", name);
        worker.handle.stop();
        Ok(())
    }

    pub fn stop(&self) {
        for worker in &self.workers {
            worker.handle.stop();
        }
    }

    /// Stops every car and waits for all of them.
    pub fn shutdown(self) -> Result<SimulationReport> {
        self.stop();
        self.join()
    }

    /// True once every car has left its loop.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(|w| w.thread.is_finished())
    }

    /// Waits for every car to stop. Cars that are not idle-capable stop on
    /// their own once there is no work left, others need `stop` first.
    pub fn join(self) -> Result<SimulationReport> {
        let mut cars = Vec::with_capacity(self.workers.len());
        let mut panicked = None;
        for worker in self.workers {
            let name = worker.handle.name().to_string();
            match worker.thread.join() {
                Ok(report) => cars.push(report),
                Err(_) => {
                    warn!("{} panicked", name);
                    panicked.get_or_insert(name);
                },
            }
        }
        if let Some(name) = panicked {
            return Err(SimulationError::WorkerPanicked(name));
        }
        Ok(SimulationReport::new(cars, self.building.waiting_passengers()))
    }
}
