// Probebench Infrastructure - System Adapters
// Implements: Probe (every concrete surface), scratch workspace, host fingerprint

pub mod host_info;
pub mod probes;
pub mod scratch;
pub mod subprocess;

pub use host_info::HostFingerprint;
pub use scratch::ScratchWorkspace;
pub use subprocess::{run_command, CommandOutput, CommandSpec};
