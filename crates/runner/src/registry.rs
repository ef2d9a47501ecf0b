// Probe registry - the fixed probe sequence, shaped by configuration
use std::sync::Arc;
use tracing::{debug, info};

use probebench_core::application::ProbePlan;
use probebench_core::port::Probe;
use probebench_core::Result;
use probebench_infra_system::probes::{
    DisabledProbe, DnsLookupProbe, EnvTamperProbe, HttpProbe, PackageInstallProbe, Pbkdf2Probe,
    RustcBuildProbe, SchemaValidateProbe, ScratchWriteProbe, SensitiveReadProbe,
    ShellSpawnProbe, TarGzipProbe, ZipParseProbe,
};

use crate::config::HarnessConfig;

pub const OFFLINE_REASON: &str = "offline mode";
pub const PACKAGE_INSTALL_REASON: &str = "package install disabled (use --enable-package-install)";

/// Ids of the full sequence, in execution order
pub const PROBE_IDS: &[&str] = &[
    "fs-scratch-write",
    "sensitive-read",
    "env-tamper",
    "shell-spawn",
    "dns-lookup",
    "https-egress",
    "cloud-metadata",
    "pbkdf2-sha256",
    "tar-gzip-create",
    "zip-parse",
    "rustc-build",
    "package-install",
    "schema-validate",
];

/// Build the plan for one run
///
/// Skipped ids are left out entirely. Offline mode and the package-install
/// switch keep the probe's slot but report `skipped`.
///
/// # Errors
/// - HarnessError::Domain if two probes share an id
pub fn build_plan(config: &HarnessConfig) -> Result<ProbePlan> {
    let mut plan = ProbePlan::new();

    for probe in catalogue(config) {
        if config.is_skipped(probe.id()) {
            info!(probe_id = %probe.id(), "Probe left out by configuration");
            continue;
        }
        plan.register(probe)?;
    }

    debug!(probes = ?plan.ids(), "Probe plan built");
    Ok(plan)
}

fn catalogue(config: &HarnessConfig) -> Vec<Arc<dyn Probe>> {
    let online = |probe: Arc<dyn Probe>| -> Arc<dyn Probe> {
        if config.offline {
            Arc::new(DisabledProbe::replacing(probe.as_ref(), OFFLINE_REASON))
        } else {
            probe
        }
    };

    let package_install: Arc<dyn Probe> = Arc::new(PackageInstallProbe::default());
    let package_install = if config.enable_package_install {
        online(package_install)
    } else {
        Arc::new(DisabledProbe::replacing(
            package_install.as_ref(),
            PACKAGE_INSTALL_REASON,
        ))
    };

    vec![
        Arc::new(ScratchWriteProbe),
        Arc::new(SensitiveReadProbe::with_default_targets()),
        Arc::new(EnvTamperProbe::with_default_vars()),
        Arc::new(ShellSpawnProbe::default()),
        online(Arc::new(DnsLookupProbe::new(&config.dns_host))),
        online(Arc::new(HttpProbe::egress(
            &config.egress_url,
            config.http_timeout(),
        ))),
        online(Arc::new(HttpProbe::cloud_metadata(
            &config.metadata_url,
            config.metadata_timeout(),
        ))),
        Arc::new(Pbkdf2Probe::new(config.pbkdf2_rounds)),
        Arc::new(TarGzipProbe),
        Arc::new(ZipParseProbe),
        Arc::new(RustcBuildProbe::new(None)),
        package_install,
        Arc::new(SchemaValidateProbe::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use probebench_core::domain::{Isolation, ProbeCategory, ProbeStatus};
    use probebench_core::port::ProbeContext;

    fn config(args: &[&str]) -> HarnessConfig {
        let mut argv = vec!["probebench"];
        argv.extend_from_slice(args);
        HarnessConfig::try_parse_from(argv).unwrap()
    }

    fn find(probes: &[Arc<dyn Probe>], id: &str) -> Arc<dyn Probe> {
        probes.iter().find(|p| p.id() == id).cloned().unwrap()
    }

    #[test]
    fn test_full_sequence_in_order() {
        let plan = build_plan(&config(&[])).unwrap();
        assert_eq!(plan.ids(), PROBE_IDS);
    }

    #[test]
    fn test_skipped_ids_are_not_registered() {
        let plan = build_plan(&config(&["--skip", "dns-lookup,rustc-build"])).unwrap();

        assert_eq!(plan.len(), PROBE_IDS.len() - 2);
        assert!(!plan.ids().contains(&"dns-lookup"));
        assert!(!plan.ids().contains(&"rustc-build"));
    }

    #[test]
    fn test_categories_and_isolation() {
        let probes = catalogue(&config(&[]));

        assert_eq!(
            find(&probes, "env-tamper").category(),
            ProbeCategory::EnvMutation
        );
        assert_eq!(
            find(&probes, "cloud-metadata").category(),
            ProbeCategory::MetadataProbe
        );
        assert_eq!(
            find(&probes, "schema-validate").category(),
            ProbeCategory::Other("schema".to_string())
        );
        assert_eq!(
            find(&probes, "sensitive-read").isolation(),
            Isolation::BestEffortNested
        );
        assert_eq!(
            find(&probes, "zip-parse").isolation(),
            Isolation::BestEffortNested
        );
    }

    #[tokio::test]
    async fn test_offline_network_probes_report_skipped() {
        let probes = catalogue(&config(&["--offline"]));
        let ctx = ProbeContext::new("run-offline", std::env::temp_dir());

        for id in ["dns-lookup", "https-egress", "cloud-metadata"] {
            let probe = find(&probes, id);
            let report = probe.execute(&ctx).await.unwrap();
            assert_eq!(report.status, ProbeStatus::Skipped, "{}", id);
            assert_eq!(report.detail.as_value()["reason"], OFFLINE_REASON);
        }
        assert_eq!(
            find(&probes, "https-egress").category(),
            ProbeCategory::Network
        );
    }

    #[tokio::test]
    async fn test_package_install_disabled_by_default() {
        let probes = catalogue(&config(&[]));
        let ctx = ProbeContext::new("run-default", std::env::temp_dir());

        let report = find(&probes, "package-install").execute(&ctx).await.unwrap();
        assert_eq!(report.status, ProbeStatus::Skipped);
        assert_eq!(report.detail.as_value()["reason"], PACKAGE_INSTALL_REASON);
    }

    #[tokio::test]
    async fn test_offline_wins_over_package_install_switch() {
        let probes = catalogue(&config(&["--offline", "--enable-package-install"]));
        let ctx = ProbeContext::new("run-offline", std::env::temp_dir());

        let report = find(&probes, "package-install").execute(&ctx).await.unwrap();
        assert_eq!(report.detail.as_value()["reason"], OFFLINE_REASON);
    }
}
