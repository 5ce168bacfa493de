use crate::direction::Direction;
use crate::passenger::Passenger;

/// What the coordinator observed a car doing. Sent to the status view and
/// to anything else listening on the building's event channel.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum CarEvent {
    Started { car: String },
    Stopped { car: String },
    Moved { car: String, direction: Direction, from_floor: u32, distance: u32 },
    DoorOpened { car: String, floor: u32 },
    DoorClosed { car: String, floor: u32 },
    PassengerAlighted { car: String, floor: u32, passenger: Passenger },
    PassengerBoarded { car: String, floor: u32, passenger: Passenger },
    PassengerReturned { car: String, floor: u32, passenger: Passenger },
}

impl CarEvent {
    pub fn car(&self) -> &str {
        match self {
            CarEvent::Started { car }
            | CarEvent::Stopped { car }
            | CarEvent::Moved { car, .. }
            | CarEvent::DoorOpened { car, .. }
            | CarEvent::DoorClosed { car, .. }
            | CarEvent::PassengerAlighted { car, .. }
            | CarEvent::PassengerBoarded { car, .. }
            | CarEvent::PassengerReturned { car, .. } => car,
        }
    }
}
