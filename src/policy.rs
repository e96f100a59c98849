use std::fmt;
use clap::ValueEnum;

/// What the launcher does after a submission fails
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum FailurePolicy {
    /// Report the failure and keep submitting the remaining problems
    Continue,
    /// Report the failure and stop; remaining problems are not attempted
    Abort
}

impl fmt::Display for FailurePolicy {
      fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Abort => write!(f, "abort")
        }
    }
}
