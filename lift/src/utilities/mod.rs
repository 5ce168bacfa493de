pub mod car_mode;
pub mod car_report;
pub mod drop_offs;
pub mod listener;
pub mod scan;
