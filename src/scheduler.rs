//! Hand job files to the batch scheduler
//!
//! The launcher only needs one operation from a scheduler: take a job file, return a job id or
//! say why it couldn't. `QsubCli` does that by running the scheduler's submission command.

use std::path::Path;

/// Submission results and failures
pub mod submission;

/// Submit through the `qsub` command line tool
pub mod qsub;

pub use submission::{SubmitError, Submission};

pub trait Scheduler {
    /// Submit the job file at `script` and wait for the scheduler to accept or reject it
    fn submit(&self, script: &Path) -> Result<Submission, SubmitError>;
}
