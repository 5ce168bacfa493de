pub mod car_event;
pub mod config;
pub mod direction;
pub mod error;
pub mod floor_queue;
pub mod passenger;
pub mod pickup_requests;
