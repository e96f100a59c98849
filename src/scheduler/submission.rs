use std::{fmt, io};
use std::process::Output;

/// A job accepted by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Whatever the submission command printed on stdout, e.g. `1234.pbs-server`
    pub job_id: String,
}

#[derive(Debug)]
pub enum SubmitError {
    /// The submission command couldn't be started (not on PATH, not executable, ...)
    SpawnError { program: String, source: io::Error },
    /// The submission command ran and exited unsuccessfully
    Rejected { code: Option<i32>, stderr: String },
    /// The job file couldn't be written before submission
    JobFileError(io::Error),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubmitError::SpawnError { program, source } => write!(f, "can't run {program}: {source}"),
            SubmitError::Rejected { code: Some(code), stderr } => {
                write!(f, "scheduler exited with status {code}: {}", stderr.trim())
            }
            SubmitError::Rejected { code: None, stderr } => {
                write!(f, "scheduler killed by signal: {}", stderr.trim())
            }
            SubmitError::JobFileError(err) => write!(f, "can't write job file: {err}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::SpawnError { source, .. } => Some(source),
            SubmitError::JobFileError(err) => Some(err),
            SubmitError::Rejected { .. } => None,
        }
    }
}

impl Submission {
    /// Classify a finished submission command: exit status 0 is accepted, anything else rejected
    pub fn from_output(output: Output) -> Result<Submission, SubmitError> {
        if output.status.success() {
            let job_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok(Submission { job_id })
        } else {
            Err(SubmitError::Rejected {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}
