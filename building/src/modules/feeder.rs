use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{select, tick, Receiver};
use log::{debug, warn};

use crate::modules::building::Building;
use crate::utilities::passenger_generator::PassengerGenerator;

/// Adds one generated passenger to the building per tick until `stop_rx`
/// fires or is disconnected. Returns how many passengers were added.
pub fn main(
    building: Arc<Building>,
    mut generator: PassengerGenerator,
    interval: Duration,
    stop_rx: Receiver<()>,
) -> u32 {
    let ticker = tick(interval);
    let mut added = 0;

    loop {
        select! {
            recv(ticker) -> _ => {
                match generator.next_passenger().and_then(|p| building.add_passenger(p)) {
                    Ok(()) => added += 1,
                    Err(e) => warn!("Could not add passenger: {}", e),
                }
            },
            recv(stop_rx) -> _ => {
                debug!("Feeder stopped after {} passengers", added);
                return added;
            },
        }
    }
}
