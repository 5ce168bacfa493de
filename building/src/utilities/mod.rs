pub mod passenger_generator;
pub mod report;
