use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tinytemplate::{format_unescaped, TinyTemplate};

#[derive(Debug, Serialize)]
pub struct SubmittedJob {
    pub name: String,
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct FailedJob {
    pub name: String,
    pub reason: String,
}

/// Everything that happened to every problem in one run
///
/// Job names are used for submitted, failed and dry run entries, problem ids for the rest.
#[derive(Debug, Default)]
pub struct LaunchReport {
    pub template: String,
    pub submitted: Vec<SubmittedJob>,
    pub failed: Vec<FailedJob>,
    pub skipped: Vec<String>,
    pub rendered: Vec<String>,
    pub not_attempted: Vec<String>,
}

/// Rendering context for the run summary
#[derive(Serialize)]
struct SummaryContext<'a> {
    time_now: String,
    template: &'a str,
    submitted_count: usize,
    active_count: usize,
    failed_count: usize,
    skipped_count: usize,
    submitted: &'a [SubmittedJob],
    failed: &'a [FailedJob],
    rendered: &'a [String],
    not_attempted: &'a [String],
    skipped: &'a [String],
}

impl LaunchReport {
    pub fn new(template: &Path) -> LaunchReport {
        LaunchReport { template: template.display().to_string(), ..Default::default() }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Problems that were enabled, whether or not they got as far as the scheduler
    pub fn active_count(&self) -> usize {
        self.submitted.len() + self.failed.len() + self.rendered.len() + self.not_attempted.len()
    }

    /// Render the run summary using TinyTemplate
    pub fn summary(&self) -> Result<String> {
        /// included summary template
        static SUMMARY: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/summary.txt"));
        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&format_unescaped);
        tt.add_template("summary", SUMMARY)?;

        let context = SummaryContext {
            time_now: Utc::now().to_string(),
            template: &self.template,
            submitted_count: self.submitted.len(),
            active_count: self.active_count(),
            failed_count: self.failed.len(),
            skipped_count: self.skipped.len(),
            submitted: &self.submitted,
            failed: &self.failed,
            rendered: &self.rendered,
            not_attempted: &self.not_attempted,
            skipped: &self.skipped,
        };

        Ok(tt.render("summary", &context)?)
    }
}
