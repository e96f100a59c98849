//! The launch loop: render, write a job file, submit, clean up, once per problem
//!
//! Problems are submitted strictly in manifest order, one at a time, each submission waiting for
//! the scheduler command to return. A failed submission is recorded in the report and, under the
//! default policy, doesn't stop the run.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::launch::job_file::JobFile;
use crate::launch::report::{FailedJob, LaunchReport, SubmittedJob};
use crate::manifest::problem::ProblemSpec;
use crate::policy::FailurePolicy;
use crate::scheduler::{Scheduler, SubmitError, Submission};
use crate::template::{LauncherTemplate, RenderedJob};

/// Scoped temporary job files
pub mod job_file;

/// Collect submission outcomes and render the run summary
pub mod report;

#[derive(Debug)]
pub struct LaunchOptions {
    pub name_suffix: String,
    pub scratch_dir: PathBuf,
    pub on_failure: FailurePolicy,
    pub dry_run: bool,
}

pub fn run(
    problems: &[ProblemSpec],
    template: &LauncherTemplate,
    scheduler: &dyn Scheduler,
    options: &LaunchOptions,
) -> LaunchReport {
    let mut report = LaunchReport::new(&template.path);
    let mut remaining = problems.iter();

    while let Some(problem) = remaining.next() {
        if !problem.enabled {
            info!("Skipping disabled problem {}", problem.id);
            report.skipped.push(problem.id.clone());
            continue;
        }

        let job = template.render(&problem.id, &options.name_suffix);

        if options.dry_run {
            info!("--dry-run set, not submitting {}", job.name);
            report.rendered.push(job.name);
            continue;
        }

        match submit_job(&job, scheduler, &options.scratch_dir) {
            Ok(submission) => {
                info!("Submitted {} with job id {}", job.name, submission.job_id);
                report.submitted.push(SubmittedJob { name: job.name, job_id: submission.job_id });
            }
            Err(err) => {
                warn!("Submitting {} failed: {}", job.name, err);
                report.failed.push(FailedJob { name: job.name, reason: err.to_string() });

                if options.on_failure == FailurePolicy::Abort {
                    warn!("--on-failure {} set, not attempting remaining problems", options.on_failure);
                    for rest in remaining.by_ref() {
                        match rest.enabled {
                            true => report.not_attempted.push(rest.id.clone()),
                            false => report.skipped.push(rest.id.clone()),
                        }
                    }
                }
            }
        }
    }

    report
}

/// Write one job file, submit it, and remove it whatever the scheduler said
fn submit_job(job: &RenderedJob, scheduler: &dyn Scheduler, scratch_dir: &Path) -> Result<Submission, SubmitError> {
    let job_file = JobFile::create(scratch_dir, job).map_err(SubmitError::JobFileError)?;
    let result = scheduler.submit(job_file.path());
    job_file.remove();
    result
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    /// Records every submission and fails the jobs it's told to
    #[derive(Default)]
    struct FakeScheduler {
        fail: Vec<String>,
        calls: RefCell<Vec<SeenJob>>,
    }

    struct SeenJob {
        path: PathBuf,
        content: String,
        /// entries in the scratch directory while this job was being submitted
        files_in_scratch: usize,
    }

    impl Scheduler for FakeScheduler {
        fn submit(&self, script: &Path) -> Result<Submission, SubmitError> {
            let content = fs::read_to_string(script).expect("job file exists during submission");
            let files_in_scratch = fs::read_dir(script.parent().unwrap()).unwrap().count();
            let n = self.calls.borrow().len();
            self.calls.borrow_mut().push(SeenJob { path: script.to_path_buf(), content: content.clone(), files_in_scratch });

            match self.fail.iter().any(|name| content.contains(name.as_str())) {
                true => Err(SubmitError::Rejected { code: Some(1), stderr: "qsub: job rejected".to_string() }),
                false => Ok(Submission { job_id: format!("{n}.pbs") }),
            }
        }
    }

    fn template() -> LauncherTemplate {
        LauncherTemplate::from_string(
            Path::new("hpc_launcher.template"),
            "#!/bin/sh\n#PBS -N #qsub-name#\ncd #namespace#\n./run.sh\n".to_string(),
        )
    }

    fn options(scratch: &TempDir, on_failure: FailurePolicy) -> LaunchOptions {
        LaunchOptions {
            name_suffix: "-HumanDS".to_string(),
            scratch_dir: scratch.path().to_path_buf(),
            on_failure,
            dry_run: false,
        }
    }

    fn scratch_is_empty(scratch: &TempDir) -> bool {
        fs::read_dir(scratch.path()).unwrap().next().is_none()
    }

    #[test]
    fn submits_enabled_problems_in_order() {
        let scratch = TempDir::new().unwrap();
        let scheduler = FakeScheduler::default();
        let problems = vec![
            ProblemSpec::new("psb2.fizz-buzz"),
            ProblemSpec::disabled("psb2.number-io"),
            ProblemSpec::new("psb2.gcd"),
        ];

        let report = run(&problems, &template(), &scheduler, &options(&scratch, FailurePolicy::Continue));

        let calls = scheduler.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].content, "#!/bin/sh\n#PBS -N psb2.fizz-buzz-HumanDS\ncd psb2.fizz-buzz\n./run.sh\n");
        assert_eq!(calls[1].content, "#!/bin/sh\n#PBS -N psb2.gcd-HumanDS\ncd psb2.gcd\n./run.sh\n");

        let names: Vec<&str> = report.submitted.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, vec!["psb2.fizz-buzz-HumanDS", "psb2.gcd-HumanDS"]);
        assert_eq!(report.submitted[1].job_id, "1.pbs");
        assert_eq!(report.skipped, vec!["psb2.number-io"]);
        assert!(!report.has_failures());
    }

    #[test]
    fn job_files_are_unique_and_removed() {
        let scratch = TempDir::new().unwrap();
        let scheduler = FakeScheduler::default();
        let problems = vec![ProblemSpec::new("a"), ProblemSpec::new("b"), ProblemSpec::new("c")];

        run(&problems, &template(), &scheduler, &options(&scratch, FailurePolicy::Continue));

        let calls = scheduler.calls.borrow();
        assert_eq!(calls.len(), 3);
        for (i, call) in calls.iter().enumerate() {
            assert_eq!(call.files_in_scratch, 1, "earlier job files left behind at job {i}");
            assert!(!call.path.exists());
            assert_eq!(call.path.parent(), Some(scratch.path()));
            assert!(calls[..i].iter().all(|earlier| earlier.path != call.path));
        }
        assert!(scratch_is_empty(&scratch));
    }

    #[test]
    fn failures_are_reported_and_run_continues() {
        let scratch = TempDir::new().unwrap();
        let scheduler = FakeScheduler { fail: vec!["psb2.gcd".to_string()], ..Default::default() };
        let problems = vec![ProblemSpec::new("psb2.gcd"), ProblemSpec::new("psb2.grade")];

        let report = run(&problems, &template(), &scheduler, &options(&scratch, FailurePolicy::Continue));

        assert_eq!(scheduler.calls.borrow().len(), 2);
        assert!(report.has_failures());
        assert_eq!(report.failed[0].name, "psb2.gcd-HumanDS");
        assert!(report.failed[0].reason.contains("qsub: job rejected"));
        assert_eq!(report.submitted.len(), 1);
        assert!(scratch_is_empty(&scratch));
    }

    #[test]
    fn abort_policy_stops_after_first_failure() {
        let scratch = TempDir::new().unwrap();
        let scheduler = FakeScheduler { fail: vec!["psb2.gcd".to_string()], ..Default::default() };
        let problems = vec![
            ProblemSpec::new("psb2.gcd"),
            ProblemSpec::new("psb2.grade"),
            ProblemSpec::disabled("psb2.median"),
        ];

        let report = run(&problems, &template(), &scheduler, &options(&scratch, FailurePolicy::Abort));

        assert_eq!(scheduler.calls.borrow().len(), 1);
        assert_eq!(report.not_attempted, vec!["psb2.grade"]);
        assert_eq!(report.skipped, vec!["psb2.median"]);
        assert!(scratch_is_empty(&scratch));
    }

    #[test]
    fn empty_problem_list_submits_nothing() {
        let scratch = TempDir::new().unwrap();
        let scheduler = FakeScheduler::default();

        let report = run(&[], &template(), &scheduler, &options(&scratch, FailurePolicy::Continue));

        assert!(scheduler.calls.borrow().is_empty());
        assert!(report.submitted.is_empty());
        assert!(scratch_is_empty(&scratch));
    }

    #[test]
    fn dry_run_never_touches_scheduler_or_disk() {
        let scratch = TempDir::new().unwrap();
        let scheduler = FakeScheduler::default();
        let mut opts = options(&scratch, FailurePolicy::Continue);
        opts.dry_run = true;

        let report = run(&[ProblemSpec::new("psb2.gcd")], &template(), &scheduler, &opts);

        assert!(scheduler.calls.borrow().is_empty());
        assert_eq!(report.rendered, vec!["psb2.gcd-HumanDS"]);
        assert!(scratch_is_empty(&scratch));
    }

    #[test]
    fn unwritable_scratch_dir_fails_the_job() {
        let scratch = TempDir::new().unwrap();
        let scheduler = FakeScheduler::default();
        let mut opts = options(&scratch, FailurePolicy::Continue);
        opts.scratch_dir = scratch.path().join("missing");

        let report = run(&[ProblemSpec::new("psb2.gcd")], &template(), &scheduler, &opts);

        assert!(scheduler.calls.borrow().is_empty());
        assert!(report.failed[0].reason.starts_with("can't write job file"));
    }
}
