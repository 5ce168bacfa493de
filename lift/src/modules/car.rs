/// ----- CAR MODULE -----
/// The dispatch engine of a single elevator car. The car runs its state
/// machine on its own thread until it is stopped, claiming floors from the
/// pickup requests it shares with the rest of its group and reporting every
/// move, door and passenger event to its listener.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, trace, warn};

use shared_resources::config::CarConfig;
use shared_resources::direction::Direction;
use shared_resources::error::{Result, SimulationError};
use shared_resources::passenger::Passenger;
use shared_resources::pickup_requests::PickupRequests;

use crate::utilities::car_mode::CarMode;
use crate::utilities::car_report::{CarCounters, CarReport};
use crate::utilities::drop_offs::DropOffs;
use crate::utilities::listener::CarListener;
use crate::utilities::scan::{self, Target};

/// Lets other threads stop a car after it has been moved onto its worker.
#[derive(Debug, Clone)]
pub struct CarHandle {
    name: String,
    running: Arc<AtomicBool>,
    pickups: Arc<PickupRequests>,
}

impl CarHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.pickups.wake_all();
    }
}

#[derive(Debug)]
pub struct Car {
    name: String,
    floor: u32,
    min_floor: u32,
    max_floor: u32,
    capacity: u32,
    remaining_capacity: u32,
    idle_capable: bool,
    mode: CarMode,
    direction: Direction,
    passengers: Vec<Passenger>,
    drop_offs: DropOffs,
    counters: CarCounters,
    reached_top: bool,
    reached_bottom: bool,
    full: bool,
    pickups: Arc<PickupRequests>,
    running: Arc<AtomicBool>,
}

impl Car {
    pub fn new(name: impl Into<String>, config: &CarConfig, pickups: Arc<PickupRequests>) -> Result<Self> {
        if config.min_floor > config.max_floor {
            return Err(SimulationError::InvalidConfig(format!(
                "minimum floor {} is above maximum floor {}",
                config.min_floor, config.max_floor
            )));
        }
        if config.capacity == 0 {
            return Err(SimulationError::InvalidConfig(String::from("car capacity must be positive")));
        }
        Ok(Car {
            name: name.into(),
            floor: config.min_floor,
            min_floor: config.min_floor,
            max_floor: config.max_floor,
            capacity: config.capacity,
            remaining_capacity: config.capacity,
            idle_capable: config.idle_capable,
            mode: if config.idle_capable { CarMode::Wait } else { CarMode::Up },
            direction: Direction::Up,
            passengers: Vec::new(),
            drop_offs: DropOffs::new(),
            counters: CarCounters::default(),
            reached_top: false,
            reached_bottom: false,
            full: false,
            pickups: pickups,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn handle(&self) -> CarHandle {
        CarHandle {
            name: self.name.clone(),
            running: self.running.clone(),
            pickups: self.pickups.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn mode(&self) -> CarMode {
        self.mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn report(&self) -> CarReport {
        CarReport {
            name: self.name.clone(),
            floor: self.floor,
            capacity: self.capacity,
            remaining_capacity: self.remaining_capacity,
            passengers: self.passengers.clone(),
            drop_offs: self.drop_offs.floors(),
            counters: self.counters,
        }
    }

    /// Runs the state machine until the car is stopped. A failing step is
    /// logged and the loop carries on with the next one.
    pub fn run(mut self, listener: &dyn CarListener) -> CarReport {
        info!("{} started on floor {}", self.name, self.floor);
        listener.started(&self.name);

        while self.is_running() {
            trace!("{} mode: {}", self.name, self.mode.as_string());
            if let Err(e) = self.step(listener) {
                error!("{} failed in mode {}: {}", self.name, self.mode.as_string(), e);
            }
        }

        listener.stopped(&self.name);
        info!(
            "{} stopped on floor {} after travelling {} floors",
            self.name, self.floor, self.counters.floors_travelled
        );
        self.report()
    }

    /// Executes the transition of the current mode once.
    pub fn step(&mut self, listener: &dyn CarListener) -> Result<()> {
        let result = match self.mode {
            CarMode::Wait => {
                self.wait();
                Ok(())
            },
            CarMode::Up => self.travel(listener, Direction::Up),
            CarMode::Down => self.travel(listener, Direction::Down),
            CarMode::Open => self.open(listener),
            CarMode::Alight => self.alight(listener),
            CarMode::Board => self.board(listener),
            CarMode::Close => self.close(listener),
            CarMode::Full => self.unload(listener),
        };
        // a full sweep without a single stop
        if self.reached_top && self.reached_bottom {
            self.mode = CarMode::Wait;
        }
        result
    }

    /// Only idle-capable cars block here. Any other car with nothing aboard
    /// stops as soon as the pickup set is empty, checked under the set's lock.
    fn wait(&mut self) {
        if self.drop_offs.is_empty() && self.passengers.is_empty() {
            debug!("{} waiting on floor {}", self.name, self.floor);
            let work = self.pickups.wait_for_work(&self.running, self.idle_capable);
            if !work && !self.idle_capable {
                info!("{} has no work left", self.name);
                self.stop();
                return;
            }
        }
        self.reset_boundaries();
        self.mode = CarMode::Up;
    }

    fn travel(&mut self, listener: &dyn CarListener, direction: Direction) -> Result<()> {
        let boundary = self.boundary(direction);
        if self.floor == boundary {
            self.mark_boundary(direction);
            self.mode = CarMode::travelling(direction.opposite());
            return Ok(());
        }

        match self.scan(direction) {
            Some(target) => {
                if let Err(e) = self.move_to(listener, direction, target.floor()) {
                    if let Target::Pickup(floor) = target {
                        self.restore_pickup(floor);
                    }
                    return Err(e);
                }
                self.direction = direction;
                self.mode = CarMode::Open;
            },
            None if self.is_idle() => {
                if self.idle_capable {
                    self.mode = CarMode::Wait;
                } else {
                    info!("{} has no work left", self.name);
                    self.stop();
                }
            },
            None => {
                self.move_to(listener, direction, boundary)?;
                self.mark_boundary(direction);
                self.mode = CarMode::travelling(direction.opposite());
            },
        }
        Ok(())
    }

    fn open(&mut self, listener: &dyn CarListener) -> Result<()> {
        self.reset_boundaries();
        listener.door_opened(&self.name, self.floor)?;
        self.mode = CarMode::Alight;
        Ok(())
    }

    fn alight(&mut self, listener: &dyn CarListener) -> Result<()> {
        let floor = self.floor;
        while let Some(index) = self.passengers.iter().position(|p| p.destination_floor() == floor) {
            let passenger = self.passengers.remove(index);
            self.remaining_capacity += passenger.weight();
            self.counters.alighted += 1;
            listener.passenger_alighted(&self.name, floor, &passenger)?;
        }
        self.drop_offs.remove(floor);
        self.mode = CarMode::Board;
        Ok(())
    }

    fn board(&mut self, listener: &dyn CarListener) -> Result<()> {
        self.full = false;
        let mut candidate = listener.next_boarding_candidate(&self.name, self.floor, None, false)?;
        while let Some(passenger) = candidate {
            if passenger.weight() > self.remaining_capacity {
                debug!(
                    "{} is too full for {} ({}kg left)",
                    self.name, passenger, self.remaining_capacity
                );
                self.full = true;
                if let Some(skipped) = listener.next_boarding_candidate(&self.name, self.floor, Some(passenger), true)? {
                    warn!("{} was offered {} after turning someone away", self.name, skipped);
                }
                break;
            }
            self.remaining_capacity -= passenger.weight();
            self.drop_offs.insert(passenger.destination_floor());
            self.passengers.push(passenger);
            self.counters.boarded += 1;
            candidate = listener.next_boarding_candidate(&self.name, self.floor, Some(passenger), false)?;
        }
        self.mode = CarMode::Close;
        Ok(())
    }

    fn close(&mut self, listener: &dyn CarListener) -> Result<()> {
        listener.door_closed(&self.name, self.floor)?;
        self.reset_boundaries();
        self.mode = if self.full { CarMode::Full } else { CarMode::travelling(self.direction) };
        Ok(())
    }

    /// Full cars only head for drop-offs until someone gets out.
    fn unload(&mut self, listener: &dyn CarListener) -> Result<()> {
        if self.drop_offs.is_empty() {
            self.full = false;
            self.mode = CarMode::travelling(self.direction);
            return Ok(());
        }
        match self.drop_offs.nearest_beyond(self.floor, self.direction) {
            None => self.direction = self.direction.opposite(),
            Some(floor) => {
                self.move_to(listener, self.direction, floor)?;
                if self.pickups.remove(floor) {
                    debug!("{} takes the pending pickup at floor {}", self.name, floor);
                }
                self.full = false;
                self.mode = CarMode::Open;
            },
        }
        Ok(())
    }

    /// Nearest target ahead. A pickup is only returned once this car has
    /// committed it, so no other car will stop there for the same request.
    fn scan(&self, direction: Direction) -> Option<Target> {
        loop {
            let pickup = self.pickups.peek_nearest(self.floor, direction);
            let drop_off = self.drop_offs.nearest(self.floor, direction);
            match scan::choose(pickup, drop_off, self.floor, direction) {
                Some(Target::Pickup(floor)) if !self.pickups.commit(floor) => {
                    trace!("{} lost the pickup at floor {} to another car", self.name, floor);
                },
                target => return target,
            }
        }
    }

    fn move_to(&mut self, listener: &dyn CarListener, direction: Direction, floor: u32) -> Result<()> {
        let distance = direction.distance(self.floor, floor);
        match direction {
            Direction::Up => listener.moved_up(&self.name, self.floor, distance)?,
            Direction::Down => listener.moved_down(&self.name, self.floor, distance)?,
        }
        debug!("{} moving {} from {} to {}", self.name, direction.as_string(), self.floor, floor);
        self.floor = floor;
        self.counters.floors_travelled += distance;
        Ok(())
    }

    fn restore_pickup(&self, floor: u32) {
        if let Err(e) = self.pickups.publish(floor) {
            warn!("{} could not restore the pickup at floor {}: {}", self.name, floor, e);
        }
    }

    fn is_idle(&self) -> bool {
        self.passengers.is_empty()
            && self.counters.boarded == self.counters.alighted
            && self.drop_offs.is_empty()
            && self.pickups.is_empty()
    }

    fn boundary(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Up => self.max_floor,
            Direction::Down => self.min_floor,
        }
    }

    fn mark_boundary(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.reached_top = true,
            Direction::Down => self.reached_bottom = true,
        }
    }

    fn reset_boundaries(&mut self) {
        self.reached_top = false;
        self.reached_bottom = false;
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    use proptest::prelude::*;
    use shared_resources::floor_queue::FloorQueue;

    use super::*;

    const TOP: u32 = 10;

    /// Minimal coordinator recording every callback as a line of text.
    struct TestBuilding {
        pickups: Arc<PickupRequests>,
        floors: Vec<FloorQueue>,
        events: Mutex<Vec<String>>,
        fail_next_move: AtomicBool,
    }

    impl TestBuilding {
        fn new(top: u32) -> Self {
            TestBuilding {
                pickups: Arc::new(PickupRequests::new(1, top)),
                floors: (1..=top).map(FloorQueue::new).collect(),
                events: Mutex::new(Vec::new()),
                fail_next_move: AtomicBool::new(false),
            }
        }

        fn add(&self, weight: u32, from: u32, to: u32) {
            self.floors[from as usize - 1].add_passenger(Passenger::new(weight, from, to).unwrap());
            self.pickups.publish(from).unwrap();
        }

        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn moved(&self, event: String) -> Result<()> {
            if self.fail_next_move.swap(false, Ordering::SeqCst) {
                return Err(SimulationError::Listener(String::from("motor fault")));
            }
            self.record(event);
            Ok(())
        }
    }

    impl CarListener for TestBuilding {
        fn started(&self, _car: &str) {
            self.record(String::from("started"));
        }

        fn stopped(&self, _car: &str) {
            self.record(String::from("stopped"));
        }

        fn moved_up(&self, _car: &str, from_floor: u32, distance: u32) -> Result<()> {
            self.moved(format!("up {} {}", from_floor, distance))
        }

        fn moved_down(&self, _car: &str, from_floor: u32, distance: u32) -> Result<()> {
            self.moved(format!("down {} {}", from_floor, distance))
        }

        fn door_opened(&self, _car: &str, floor: u32) -> Result<()> {
            self.record(format!("open {}", floor));
            Ok(())
        }

        fn door_closed(&self, _car: &str, floor: u32) -> Result<()> {
            self.record(format!("close {}", floor));
            Ok(())
        }

        fn passenger_alighted(&self, _car: &str, floor: u32, passenger: &Passenger) -> Result<()> {
            self.record(format!("alight {} {}", floor, passenger));
            Ok(())
        }

        fn next_boarding_candidate(
            &self,
            _car: &str,
            floor: u32,
            last: Option<Passenger>,
            rejected: bool,
        ) -> Result<Option<Passenger>> {
            let queue = &self.floors[floor as usize - 1];
            if rejected {
                if let Some(passenger) = last {
                    queue.return_passenger(passenger);
                    self.pickups.publish(floor)?;
                }
                return Ok(None);
            }
            Ok(queue.next_passenger())
        }
    }

    fn car_config(capacity: u32, idle_capable: bool) -> CarConfig {
        CarConfig {
            min_floor: 1,
            max_floor: TOP,
            capacity: capacity,
            idle_capable: idle_capable,
        }
    }

    fn assert_conserved(car: &Car) {
        let report = car.report();
        assert_eq!(report.remaining_capacity + report.onboard_weight(), report.capacity);
        assert_eq!(
            (report.counters.boarded - report.counters.alighted) as usize,
            report.passengers.len()
        );
    }

    #[test]
    fn rejects_inverted_floor_range() {
        let config = CarConfig { min_floor: 5, max_floor: 2, capacity: 100, idle_capable: false };
        let pickups = Arc::new(PickupRequests::new(1, TOP));
        assert!(matches!(Car::new("Lift-1", &config, pickups), Err(SimulationError::InvalidConfig(_))));
    }

    #[test]
    fn carries_passenger_from_3_to_8() {
        let building = TestBuilding::new(TOP);
        building.add(60, 3, 8);
        let car = Car::new("Lift-1", &car_config(100, false), building.pickups.clone()).unwrap();

        let report = car.run(&building);

        assert_eq!(
            building.events(),
            vec![
                "started", "up 1 2", "open 3", "close 3", "up 3 5", "open 8",
                "alight 8 60kg 3->8", "close 8", "stopped",
            ]
        );
        assert_eq!(report.floor, 8);
        assert_eq!(report.counters, CarCounters { floors_travelled: 7, boarded: 1, alighted: 1 });
        assert_eq!(report.remaining_capacity, 100);
        assert!(building.pickups.is_empty());
    }

    #[test]
    fn too_heavy_passenger_is_returned_to_the_front() {
        let building = TestBuilding::new(TOP);
        building.add(60, 2, 5);
        building.add(30, 2, 6);
        let mut car = Car::new("Lift-1", &car_config(50, false), building.pickups.clone()).unwrap();

        for _ in 0..4 {
            car.step(&building).unwrap();
        }

        assert_eq!(car.mode(), CarMode::Close);
        assert!(car.is_full());
        assert_eq!(car.report().counters.boarded, 0);
        assert_eq!(
            building.floors[1].waiting(),
            vec![Passenger::new(60, 2, 5).unwrap(), Passenger::new(30, 2, 6).unwrap()]
        );
        assert!(building.pickups.contains(2));

        car.step(&building).unwrap();
        assert_eq!(car.mode(), CarMode::Full);
        assert_eq!(building.events(), vec!["up 1 1", "open 2", "close 2"]);
    }

    #[test]
    fn nearest_pickup_ahead_is_claimed_first() {
        let building = TestBuilding::new(TOP);
        building.add(70, 4, 1);
        building.add(70, 9, 1);
        let mut car = Car::new("Lift-1", &car_config(500, false), building.pickups.clone()).unwrap();

        car.step(&building).unwrap();

        assert_eq!(car.floor(), 4);
        assert_eq!(car.mode(), CarMode::Open);
        assert_eq!(building.pickups.floors(), vec![9]);
    }

    #[test]
    fn drop_off_before_farther_pickup() {
        let building = TestBuilding::new(TOP);
        building.add(70, 2, 5);
        let mut car = Car::new("Lift-1", &car_config(500, false), building.pickups.clone()).unwrap();
        for _ in 0..4 {
            car.step(&building).unwrap();
        }
        assert_eq!((car.floor(), car.mode()), (2, CarMode::Up));
        building.add(70, 7, 9);

        car.step(&building).unwrap();

        assert_eq!(car.floor(), 5);
        assert!(building.pickups.contains(7));
    }

    #[test]
    fn turns_at_the_top_without_moving() {
        let building = TestBuilding::new(3);
        building.add(70, 3, 1);
        let config = CarConfig { min_floor: 1, max_floor: 3, capacity: 500, idle_capable: false };
        let mut car = Car::new("Lift-1", &config, building.pickups.clone()).unwrap();
        for _ in 0..4 {
            car.step(&building).unwrap();
        }
        assert_eq!((car.floor(), car.mode()), (3, CarMode::Up));

        car.step(&building).unwrap();

        assert_eq!((car.floor(), car.mode()), (3, CarMode::Down));
        assert_eq!(building.events().last().unwrap(), "close 3");
    }

    #[test]
    fn sweeps_to_the_top_when_work_is_only_below() {
        let building = TestBuilding::new(TOP);
        building.add(70, 1, 2);
        let mut car = Car::new("Lift-1", &car_config(500, false), building.pickups.clone()).unwrap();
        // board on floor 1, ride to 2 and drop the passenger off
        for _ in 0..8 {
            car.step(&building).unwrap();
        }
        assert_eq!((car.floor(), car.mode()), (2, CarMode::Up));
        building.add(70, 1, 3);

        car.step(&building).unwrap();
        assert_eq!((car.floor(), car.mode()), (TOP, CarMode::Down));

        car.step(&building).unwrap();
        assert_eq!((car.floor(), car.mode()), (1, CarMode::Open));
        assert_eq!(car.report().counters.floors_travelled, 1 + (TOP - 2) + (TOP - 1));
    }

    #[test]
    fn failed_move_keeps_the_pickup() {
        let building = TestBuilding::new(TOP);
        building.add(70, 6, 2);
        let mut car = Car::new("Lift-1", &car_config(500, false), building.pickups.clone()).unwrap();
        building.fail_next_move.store(true, Ordering::SeqCst);

        assert!(matches!(car.step(&building), Err(SimulationError::Listener(_))));
        assert_eq!((car.floor(), car.mode()), (1, CarMode::Up));
        assert!(building.pickups.contains(6));

        car.step(&building).unwrap();
        assert_eq!((car.floor(), car.mode()), (6, CarMode::Open));
    }

    #[test]
    fn car_without_idle_mode_stops_when_last_pickup_is_taken() {
        let building = TestBuilding::new(TOP);
        building.add(70, 5, 1);
        let mut car = Car::new("Lift-1", &car_config(500, false), building.pickups.clone()).unwrap();
        car.mode = CarMode::Wait;

        car.step(&building).unwrap();
        assert_eq!(car.mode(), CarMode::Up);
        assert!(car.is_running());

        // another car claims the only pickup before this one waits again
        assert!(building.pickups.commit(5));
        car.mode = CarMode::Wait;
        car.step(&building).unwrap();

        assert!(!car.is_running());
        assert!(building.events().is_empty());
    }

    #[test]
    fn car_with_riders_leaves_wait_without_blocking() {
        let building = TestBuilding::new(TOP);
        building.add(70, 1, 6);
        let mut car = Car::new("Lift-1", &car_config(500, false), building.pickups.clone()).unwrap();
        for _ in 0..4 {
            car.step(&building).unwrap();
        }
        assert!(building.pickups.is_empty());
        car.mode = CarMode::Wait;

        car.step(&building).unwrap();

        assert!(car.is_running());
        assert_eq!(car.mode(), CarMode::Up);
        car.step(&building).unwrap();
        assert_eq!(car.floor(), 6);
    }

    #[test]
    fn full_car_only_heads_for_drop_offs() {
        let building = TestBuilding::new(TOP);
        building.add(60, 5, 2);
        building.add(60, 5, 9);
        let mut car = Car::new("Lift-1", &car_config(100, false), building.pickups.clone()).unwrap();
        for _ in 0..4 {
            car.step(&building).unwrap();
        }
        assert_eq!((car.floor(), car.mode(), car.direction()), (5, CarMode::Full, Direction::Up));
        building.add(30, 8, 9);
        building.add(30, 2, 1);

        // nothing to drop off above: turn around on the spot
        car.step(&building).unwrap();
        assert_eq!((car.floor(), car.mode(), car.direction()), (5, CarMode::Full, Direction::Down));
        assert_eq!(building.events().last().unwrap(), "close 5");

        car.step(&building).unwrap();
        assert_eq!((car.floor(), car.mode()), (2, CarMode::Open));
        assert!(!car.is_full());
        assert_eq!(building.events().last().unwrap(), "down 5 3");
        assert_eq!(building.pickups.floors(), vec![5, 8]);
    }

    #[test]
    fn idle_capable_car_waits_for_work_until_stopped() {
        let building = Arc::new(TestBuilding::new(TOP));
        let car = Car::new("Lift-1", &car_config(500, true), building.pickups.clone()).unwrap();
        assert_eq!(car.mode(), CarMode::Wait);
        let handle = car.handle();
        let worker = {
            let building = building.clone();
            thread::spawn(move || car.run(&*building))
        };

        building.add(80, 5, 2);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !building.events().iter().any(|e| e == "alight 2 80kg 5->2") {
            assert!(Instant::now() < deadline, "passenger never delivered");
            thread::sleep(Duration::from_millis(5));
        }
        handle.stop();
        let report = worker.join().unwrap();

        assert!(!handle.is_running());
        assert_eq!(building.events().last().unwrap(), "stopped");
        assert_eq!(report.counters.boarded, 1);
        assert_eq!(report.counters.alighted, 1);
    }

    fn passengers() -> impl Strategy<Value = Vec<(u32, u32, u32)>> {
        prop::collection::vec((1u32..=80, 1u32..=6, 1u32..=6), 1..8)
            .prop_map(|v| v.into_iter().filter(|(_, from, to)| from != to).collect())
    }

    proptest! {
        #[test]
        fn delivers_everyone_and_conserves_weight(riders in passengers()) {
            let building = TestBuilding::new(6);
            for (weight, from, to) in &riders {
                building.add(*weight, *from, *to);
            }
            let config = CarConfig { min_floor: 1, max_floor: 6, capacity: 100, idle_capable: false };
            let mut car = Car::new("Lift-1", &config, building.pickups.clone()).unwrap();

            let mut steps = 0;
            while car.is_running() {
                car.step(&building).unwrap();
                assert_conserved(&car);
                prop_assert!((1..=6).contains(&car.floor()));
                steps += 1;
                prop_assert!(steps < 10_000);
            }

            let report = car.report();
            prop_assert_eq!(report.counters.alighted as usize, riders.len());
            prop_assert_eq!(report.counters.boarded as usize, riders.len());
            prop_assert!(building.floors.iter().all(|f| f.is_empty()));
        }
    }
}
