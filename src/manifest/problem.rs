use std::path::PathBuf;

use serde::Deserialize;

/// Template path used when a manifest doesn't name one
pub static DEFAULT_TEMPLATE: &str = "hpc_launcher.template";

/// One unit of work, submitted as its own scheduler job
///
/// Entries are switched off with `enabled: false` rather than removed, so a manifest keeps the
/// full problem set of a benchmark suite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProblemSpec {
    pub id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[cfg(test)]
impl ProblemSpec {
    pub fn new(id: &str) -> ProblemSpec {
        ProblemSpec { id: id.to_string(), enabled: true }
    }

    pub fn disabled(id: &str) -> ProblemSpec {
        ProblemSpec { id: id.to_string(), enabled: false }
    }
}

fn default_template() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE)
}

#[derive(Debug, Deserialize)]
pub struct LaunchManifest {
    #[serde(default = "default_template")]
    pub template: PathBuf,
    #[serde(default)]
    pub name_suffix: String,
    pub problems: Vec<ProblemSpec>,
}

impl LaunchManifest {
    pub fn active_count(&self) -> usize {
        self.problems.iter().filter(|p| p.enabled).count()
    }
}
