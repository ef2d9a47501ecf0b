// Probebench Core - Domain Logic & Ports
// NO infrastructure dependencies: concrete probes, sinks and the scratch workspace live in infra crates

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{HarnessError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
