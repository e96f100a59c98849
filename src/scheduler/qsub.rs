use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

use crate::scheduler::{Scheduler, SubmitError, Submission};

/// Submits job files by running `<program> <job file>`, where program is usually `qsub`
#[derive(Debug)]
pub struct QsubCli {
    pub program: PathBuf,
}

impl Scheduler for QsubCli {
    fn submit(&self, script: &Path) -> Result<Submission, SubmitError> {
        let mut qsub = Command::new(&self.program);
        let cmd = qsub.arg(script);
        info!("Running submission process");
        info!("{:?}", &cmd);

        let output = cmd.output().map_err(|source| SubmitError::SpawnError {
            program: self.program.display().to_string(),
            source,
        })?;

        Submission::from_output(output)
    }
}
