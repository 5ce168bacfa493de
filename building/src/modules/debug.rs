use std::collections::BTreeMap;
use std::io::{stdout, Stdout, Write};

use crossbeam_channel::{select, Receiver};
use crossterm::{cursor, terminal, ExecutableCommand, Result};

use shared_resources::car_event::CarEvent;
use shared_resources::direction::Direction;

const STATUS_SIZE: u16 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct CarStatus {
    pub floor: Option<u32>,
    pub direction: Direction,
    pub doors_open: bool,
    pub onboard: u32,
    pub delivered: u32,
    pub in_service: bool,
}

impl Default for CarStatus {
    fn default() -> Self {
        CarStatus {
            floor: None,
            direction: Direction::Up,
            doors_open: false,
            onboard: 0,
            delivered: 0,
            in_service: false,
        }
    }
}

/// Folds one event into the status table.
pub fn apply(cars: &mut BTreeMap<String, CarStatus>, event: &CarEvent) {
    let status = cars.entry(event.car().to_string()).or_default();
    match event {
        CarEvent::Started { .. } => status.in_service = true,
        CarEvent::Stopped { .. } => status.in_service = false,
        CarEvent::Moved { direction, from_floor, distance, .. } => {
            status.direction = *direction;
            status.floor = Some(match direction {
                Direction::Up => from_floor + distance,
                Direction::Down => from_floor - distance,
            });
        },
        CarEvent::DoorOpened { floor, .. } => {
            status.floor = Some(*floor);
            status.doors_open = true;
        },
        CarEvent::DoorClosed { .. } => status.doors_open = false,
        CarEvent::PassengerBoarded { .. } => status.onboard += 1,
        CarEvent::PassengerAlighted { .. } => {
            status.onboard = status.onboard.saturating_sub(1);
            status.delivered += 1;
        },
        CarEvent::PassengerReturned { .. } => {},
    }
}

/// Redraws the car table on every event until `done_rx` fires or the event
/// channel closes.
pub fn main(events_rx: Receiver<CarEvent>, done_rx: Receiver<()>) -> Result<()> {
    let mut stdout = stdout();
    let mut cars: BTreeMap<String, CarStatus> = BTreeMap::new();

    loop {
        select! {
            recv(events_rx) -> msg => {
                match msg {
                    Ok(event) => {
                        apply(&mut cars, &event);
                        printstatus(&mut stdout, &cars)?;
                    },
                    Err(_) => break,
                }
            },
            recv(done_rx) -> _ => break,
        }
    }
    stdout.execute(cursor::MoveDown(STATUS_SIZE + cars.len() as u16))?;
    Ok(())
}

fn printstatus(stdout: &mut Stdout, cars: &BTreeMap<String, CarStatus>) -> Result<()> {
    stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

    writeln!(stdout, "+-----------------+------------+------------+------------+------------+------------+")?;
    writeln!(stdout, "| {0:<15} | {1:<10} | {2:<10} | {3:<10} | {4:<10} | {5:<10} |", "CAR", "FLOOR", "DIRECTION", "DOORS", "ONBOARD", "DELIVERED")?;
    writeln!(stdout, "+-----------------+------------+------------+------------+------------+------------+")?;
    for (name, car) in cars {
        let floor = car.floor.map(|f| f.to_string()).unwrap_or_else(|| String::from("-"));
        let doors = if car.doors_open { "open" } else { "closed" };
        let name = if car.in_service { name.clone() } else { format!("{} (off)", name) };
        writeln!(stdout, "| {0:<15} | {1:<10} | {2:<10} | {3:<10} | {4:<10} | {5:<10} |",
            name,
            floor,
            car.direction.as_string(),
            doors,
            car.onboard,
            car.delivered)?;
    }
    writeln!(stdout, "+-----------------+------------+------------+------------+------------+------------+")?;

    stdout.execute(cursor::MoveUp(STATUS_SIZE + cars.len() as u16))?;
    Ok(())
}
