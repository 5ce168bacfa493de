use shared_resources::error::Result;
use shared_resources::passenger::Passenger;

/// Callbacks a car makes into its coordinator, one per event, synchronously
/// on the car's own thread. Every call names the car it comes from.
pub trait CarListener: Send + Sync {
    fn started(&self, car: &str);

    fn stopped(&self, car: &str);

    /// Called before the car's floor changes.
    fn moved_up(&self, car: &str, from_floor: u32, distance: u32) -> Result<()>;

    /// Called before the car's floor changes.
    fn moved_down(&self, car: &str, from_floor: u32, distance: u32) -> Result<()>;

    fn door_opened(&self, car: &str, floor: u32) -> Result<()>;

    fn door_closed(&self, car: &str, floor: u32) -> Result<()>;

    fn passenger_alighted(&self, car: &str, floor: u32, passenger: &Passenger) -> Result<()>;

    /// Hands out the next passenger waiting on `floor`, or `None` once the
    /// queue is empty. When `rejected` is set, `last` did not fit and has to
    /// go back to the front of the queue; the car takes no one else at this
    /// stop.
    fn next_boarding_candidate(
        &self,
        car: &str,
        floor: u32,
        last: Option<Passenger>,
        rejected: bool,
    ) -> Result<Option<Passenger>>;
}
