pub mod building;
pub mod debug;
pub mod feeder;
pub mod simulation;
