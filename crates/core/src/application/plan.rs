// Probe Plan - the ordered, validated probe sequence for one run

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::error::Result as DomainResult;
use crate::domain::DomainError;
use crate::error::Result;
use crate::port::Probe;

/// Ordered probe registry
///
/// Registration order is execution order. The plan is consumed by
/// `Orchestrator::run`, so nothing can mutate it once a run starts.
#[derive(Default)]
pub struct ProbePlan {
    probes: Vec<Arc<dyn Probe>>,
    ids: HashSet<String>,
}

impl ProbePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe
    ///
    /// # Errors
    /// - DomainError::InvalidProbeId if the id is blank
    /// - DomainError::DuplicateProbe if the id is already registered
    pub fn register(&mut self, probe: Arc<dyn Probe>) -> Result<()> {
        self.validate_id(probe.id())?;
        self.ids.insert(probe.id().to_string());
        self.probes.push(probe);
        Ok(())
    }

    /// Builder-style `register`
    pub fn with(mut self, probe: impl Probe + 'static) -> Result<Self> {
        self.register(Arc::new(probe))?;
        Ok(self)
    }

    fn validate_id(&self, id: &str) -> DomainResult<()> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidProbeId(id.to_string()));
        }
        if self.ids.contains(id) {
            return Err(DomainError::DuplicateProbe(id.to_string()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Registered ids in execution order
    pub fn ids(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.id()).collect()
    }

    pub(crate) fn into_probes(self) -> Vec<Arc<dyn Probe>> {
        self.probes
    }
}
