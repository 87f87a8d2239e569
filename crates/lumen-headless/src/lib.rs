pub mod device;
pub mod report;
pub mod runner;
