//! Probebench runner: configuration, logging bootstrap, the fixed probe
//! registry and the run driver that ties them together.

pub mod config;
pub mod driver;
pub mod registry;
pub mod summary;
pub mod telemetry;

pub use config::{HarnessConfig, LogFormat};
pub use driver::{DriverReport, RunDriver};
pub use registry::build_plan;
