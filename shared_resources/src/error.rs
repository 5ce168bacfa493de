use thiserror::Error;

/// Every failure the simulator reports. Capacity rejections while boarding
/// are a normal branch of the state machine and never show up here.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration can never produce a working simulation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid passenger: {0}")]
    InvalidPassenger(String),

    /// The passenger could never fit in any car of the group.
    #[error("passenger weighing {weight} exceeds car capacity {capacity}")]
    PassengerTooHeavy { weight: u32, capacity: u32 },

    #[error("no car named {0}")]
    CarNotFound(String),

    #[error("no floor numbered {0}")]
    FloorNotFound(u32),

    /// A callback into the coordinator failed in the middle of a stop.
    #[error("listener failed: {0}")]
    Listener(String),

    #[error("car worker {0} panicked")]
    WorkerPanicked(String),

    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
