//! Load the job template and render one job descriptor per problem

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

/// Replaced with the scheduler job name (problem id + suffix)
pub static NAME_TOKEN: &str = "#qsub-name#";

/// Replaced with the bare problem id
pub static NAMESPACE_TOKEN: &str = "#namespace#";

/// A job template, read once per run
///
/// The template is plain text. Only the two placeholder tokens carry meaning and they're replaced
/// literally wherever they occur, so the template can be a PBS, SGE or SLURM script alike.
#[derive(Debug)]
pub struct LauncherTemplate {
    pub path: PathBuf,
    content: String,
}

/// A rendered job descriptor, ready to be written to a job file
#[derive(Debug, PartialEq, Eq)]
pub struct RenderedJob {
    pub name: String,
    pub namespace: String,
    pub content: String,
}

impl LauncherTemplate {
    pub fn load(path: &Path) -> Result<LauncherTemplate> {
        info!("Reading job template {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Can't read job template {}", path.display()))?;
        Ok(LauncherTemplate::from_string(path, content))
    }

    pub fn from_string(path: &Path, content: String) -> LauncherTemplate {
        LauncherTemplate { path: path.to_path_buf(), content }
    }

    /// Substitute the job name first, then the namespace
    ///
    /// Problem ids and suffixes never contain `#` (manifest schema and CLI checks), so the first
    /// substitution can't create a namespace token.
    pub fn render(&self, problem: &str, name_suffix: &str) -> RenderedJob {
        let name = format!("{problem}{name_suffix}");
        let content = self.content
            .replace(NAME_TOKEN, &name)
            .replace(NAMESPACE_TOKEN, problem);
        debug!("Rendered job {name}:\n{content}");

        RenderedJob { name, namespace: problem.to_string(), content }
    }
}
