pub mod modules;
pub mod utilities;

pub use modules::car::{Car, CarHandle};
pub use utilities::car_mode::CarMode;
pub use utilities::car_report::{CarCounters, CarReport};
pub use utilities::listener::CarListener;
