pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod obstacle;
pub mod params;
pub mod programs;
pub mod schedule;
pub mod types;
