pub mod config;
pub mod error;
pub mod sources;
pub mod storage;
pub mod telemetry;
pub mod vacancy;
