pub mod collect;
pub mod decide;
pub mod extract;
pub mod protocol;

pub use collect::{Candidate, Invocation, NetworkTools};
pub use decide::decide;
pub use extract::{extract_host, ExtractedHost, NoHost};

use crate::policy::config::GateConfig;
use crate::policy::{parser, PolicyEngine, PolicySet};
use crate::policy::types::Decision;
use std::path::{Path, PathBuf};

/// Everything one decision needs, loaded fresh from a gate home.
#[derive(Debug, Clone)]
pub struct Gate {
    home: PathBuf,
    config: GateConfig,
    engine: PolicyEngine,
    tools: NetworkTools,
}

impl Gate {
    /// Read the lists and configuration under `home`. Never fails: missing or
    /// broken files fall back to empty lists and default settings.
    pub fn load(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref();
        let config = parser::load_config(home);
        let policy = parser::load_policy_set(home);
        Self::new(home, policy, config)
    }

    pub fn new(home: impl Into<PathBuf>, policy: PolicySet, config: GateConfig) -> Self {
        let tools = NetworkTools::with_extra(&config.extra_network_tools);
        let engine = PolicyEngine::new(policy, config.on_unparsable_host);
        Self {
            home: home.into(),
            config,
            engine,
            tools,
        }
    }

    pub fn decide(&self, invocation: &Invocation) -> Decision {
        decide(invocation, &self.engine, &self.tools)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }

    pub fn tools(&self) -> &NetworkTools {
        &self.tools
    }
}
