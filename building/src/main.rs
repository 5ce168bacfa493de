use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::unbounded;
use env_logger::Env;
use log::{error, info};

use building::modules::{debug, feeder};
use building::{Building, PassengerGenerator, Simulation};
use shared_resources::config::SimulationConfig;
use shared_resources::error::Result;

#[derive(Debug, Parser)]
#[command(version, about = "Simulates a bank of elevator cars serving passengers")]
struct Args {
    /// Configuration file, defaults to config.json or _config.json
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long)]
    floors: Option<u32>,

    #[arg(long)]
    cars: Option<u32>,

    #[arg(long)]
    capacity: Option<u32>,

    /// Passengers waiting before the cars start
    #[arg(long, short)]
    passengers: Option<u32>,

    /// Keep idle cars waiting and feed new passengers for `duration` seconds
    #[arg(long)]
    idle_capable: bool,

    #[arg(long, short, default_value_t = 10)]
    duration: u64,

    #[arg(long)]
    seed: Option<u64>,

    /// Draw a live status table instead of waiting silently
    #[arg(long)]
    status: bool,
}

impl Args {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(floors) = self.floors {
            config.building.num_floors = floors;
        }
        if let Some(cars) = self.cars {
            config.elevator.num_cars = cars;
        }
        if let Some(capacity) = self.capacity {
            config.elevator.capacity = capacity;
        }
        if let Some(passengers) = self.passengers {
            config.passengers.count = passengers;
        }
        if self.idle_capable {
            config.elevator.idle_capable = true;
        }
        if self.seed.is_some() {
            config.passengers.seed = self.seed;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // READ CONFIGURATION
    let mut config = SimulationConfig::get(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    // INITIALIZE BUILDING
    let (events_tx, events_rx) = unbounded();
    let mut building = Building::new(config.clone())?;
    if args.status {
        building = building.with_event_channel(events_tx);
    }
    let building = Arc::new(building);

    let mut generator = PassengerGenerator::new(&config);
    for passenger in generator.generate(config.passengers.count)? {
        building.add_passenger(passenger)?;
    }
    info!("{} passengers waiting", building.waiting_passengers());

    // INITIALIZE THREAD FOR STATUS TABLE
    let (status_done_tx, status_done_rx) = unbounded();
    let status = if args.status {
        Some(thread::Builder::new()
            .name(String::from("Status"))
            .spawn(move || debug::main(events_rx, status_done_rx))?)
    } else {
        None
    };

    // INITIALIZE CARS
    let simulation = Simulation::start(building.clone())?;

    if config.elevator.idle_capable {
        let (feeder_stop_tx, feeder_stop_rx) = unbounded();
        let interval = Duration::from_millis(config.passengers.feed_interval_ms);
        let feeder = {
            let building = building.clone();
            thread::Builder::new()
                .name(String::from("Feeder"))
                .spawn(move || feeder::main(building, generator, interval, feeder_stop_rx))?
        };

        thread::sleep(Duration::from_secs(args.duration));
        drop(feeder_stop_tx);
        match feeder.join() {
            Ok(added) => info!("{} passengers arrived while running", added),
            Err(_) => error!("Feeder panicked"),
        }
        simulation.stop();
    }

    let report = simulation.join()?;

    drop(status_done_tx);
    if let Some(status) = status {
        match status.join() {
            Ok(Err(e)) => error!("Status table failed: {}", e),
            Err(_) => error!("Status table panicked"),
            Ok(Ok(())) => {},
        }
    }

    println!("{}", report);
    Ok(())
}
