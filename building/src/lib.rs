pub mod modules;
pub mod utilities;

pub use modules::building::Building;
pub use modules::simulation::Simulation;
pub use utilities::passenger_generator::PassengerGenerator;
pub use utilities::report::SimulationReport;
