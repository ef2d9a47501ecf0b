// Host fingerprint logged at run start
// reason: sysinfo for cross-platform OS facts, nix for uid/arch on unix
use serde::Serialize;
use sysinfo::System;
use tracing::debug;

/// Identity of the machine a run executed on
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostFingerprint {
    pub hostname: Option<String>,
    pub os: Option<String>,
    pub kernel: Option<String>,
    pub arch: Option<String>,
    pub uid: Option<u32>,
}

impl HostFingerprint {
    pub fn collect() -> Self {
        let fingerprint = Self {
            hostname: System::host_name(),
            os: System::long_os_version(),
            kernel: System::kernel_version(),
            arch: machine_arch(),
            uid: current_uid(),
        };

        debug!(
            hostname = ?fingerprint.hostname,
            os = ?fingerprint.os,
            uid = ?fingerprint.uid,
            "Host fingerprint collected"
        );

        fingerprint
    }
}

#[cfg(unix)]
fn machine_arch() -> Option<String> {
    nix::sys::utsname::uname()
        .ok()
        .map(|uts| uts.machine().to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn machine_arch() -> Option<String> {
    Some(std::env::consts::ARCH.to_string())
}

#[cfg(unix)]
fn current_uid() -> Option<u32> {
    Some(nix::unistd::getuid().as_raw())
}

#[cfg(not(unix))]
fn current_uid() -> Option<u32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect() {
        let fingerprint = HostFingerprint::collect();

        // Basic sanity checks
        assert!(fingerprint.arch.is_some());
        #[cfg(unix)]
        assert!(fingerprint.uid.is_some());

        let value = serde_json::to_value(&fingerprint).unwrap();
        assert!(value.get("hostname").is_some());
    }
}
