/// ----- BUILDING MODULE -----
/// The dispatch coordinator. Owns one passenger queue per floor and the
/// pickup requests shared by its cars, and answers every car callback.

use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, info, trace};

use lift::CarListener;
use shared_resources::car_event::CarEvent;
use shared_resources::config::SimulationConfig;
use shared_resources::direction::Direction;
use shared_resources::error::{Result, SimulationError};
use shared_resources::floor_queue::FloorQueue;
use shared_resources::passenger::Passenger;
use shared_resources::pickup_requests::PickupRequests;

#[derive(Debug)]
pub struct Building {
    config: SimulationConfig,
    floors: Vec<FloorQueue>,
    pickups: Arc<PickupRequests>,
    events_tx: Option<Sender<CarEvent>>,
}

impl Building {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let min_floor = config.building.min_floor;
        let max_floor = config.building.max_floor();
        Ok(Building {
            floors: (min_floor..=max_floor).map(FloorQueue::new).collect(),
            pickups: Arc::new(PickupRequests::new(min_floor, max_floor)),
            config: config,
            events_tx: None,
        })
    }

    /// Forwards every car event to `events_tx` from now on.
    pub fn with_event_channel(mut self, events_tx: Sender<CarEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn pickups(&self) -> &Arc<PickupRequests> {
        &self.pickups
    }

    pub fn floor(&self, floor: u32) -> Result<&FloorQueue> {
        floor
            .checked_sub(self.config.building.min_floor)
            .and_then(|index| self.floors.get(index as usize))
            .ok_or(SimulationError::FloorNotFound(floor))
    }

    /// Queues `passenger` on its source floor and requests a pickup there.
    pub fn add_passenger(&self, passenger: Passenger) -> Result<()> {
        let capacity = self.config.elevator.capacity;
        if passenger.weight() > capacity {
            return Err(SimulationError::PassengerTooHeavy {
                weight: passenger.weight(),
                capacity: capacity,
            });
        }
        self.floor(passenger.destination_floor())?;
        self.floor(passenger.source_floor())?.add_passenger(passenger);
        self.pickups.publish(passenger.source_floor())?;
        debug!("New passenger {}", passenger);
        Ok(())
    }

    pub fn waiting_passengers(&self) -> usize {
        self.floors.iter().map(|f| f.len()).sum()
    }

    fn emit(&self, event: CarEvent) {
        if let Some(events_tx) = &self.events_tx {
            if events_tx.send(event).is_err() {
                trace!("Event dropped, nobody is listening");
            }
        }
    }

    fn moved(&self, car: &str, direction: Direction, from_floor: u32, distance: u32) {
        debug!("{} moving {} {} floors from {}", car, direction.as_string(), distance, from_floor);
        self.emit(CarEvent::Moved {
            car: car.to_string(),
            direction: direction,
            from_floor: from_floor,
            distance: distance,
        });
    }
}

impl CarListener for Building {
    fn started(&self, car: &str) {
        info!("{} in service", car);
        self.emit(CarEvent::Started { car: car.to_string() });
    }

    fn stopped(&self, car: &str) {
        info!("{} out of service", car);
        self.emit(CarEvent::Stopped { car: car.to_string() });
    }

    fn moved_up(&self, car: &str, from_floor: u32, distance: u32) -> Result<()> {
        self.moved(car, Direction::Up, from_floor, distance);
        Ok(())
    }

    fn moved_down(&self, car: &str, from_floor: u32, distance: u32) -> Result<()> {
        self.moved(car, Direction::Down, from_floor, distance);
        Ok(())
    }

    fn door_opened(&self, car: &str, floor: u32) -> Result<()> {
        debug!("{} opened its doors on floor {}", car, floor);
        self.emit(CarEvent::DoorOpened { car: car.to_string(), floor: floor });
        Ok(())
    }

    fn door_closed(&self, car: &str, floor: u32) -> Result<()> {
        debug!("{} closed its doors on floor {}", car, floor);
        self.emit(CarEvent::DoorClosed { car: car.to_string(), floor: floor });
        Ok(())
    }

    fn passenger_alighted(&self, car: &str, floor: u32, passenger: &Passenger) -> Result<()> {
        info!("{} dropped off {} on floor {}", car, passenger, floor);
        self.emit(CarEvent::PassengerAlighted {
            car: car.to_string(),
            floor: floor,
            passenger: *passenger,
        });
        Ok(())
    }

    fn next_boarding_candidate(
        &self,
        car: &str,
        floor: u32,
        last: Option<Passenger>,
        rejected: bool,
    ) -> Result<Option<Passenger>> {
        let queue = self.floor(floor)?;
        match (last, rejected) {
            (Some(passenger), true) => {
                debug!("{} is full, {} waits on floor {}", car, passenger, floor);
                queue.return_passenger(passenger);
                self.pickups.publish(floor)?;
                self.emit(CarEvent::PassengerReturned {
                    car: car.to_string(),
                    floor: floor,
                    passenger: passenger,
                });
                return Ok(None);
            },
            (None, true) => return Ok(None),
            (Some(passenger), false) => {
                info!("{} picked up {} on floor {}", car, passenger, floor);
                self.emit(CarEvent::PassengerBoarded {
                    car: car.to_string(),
                    floor: floor,
                    passenger: passenger,
                });
            },
            (None, false) => {},
        }
        Ok(queue.next_passenger())
    }
}
