use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use crate::launch::LaunchOptions;
use crate::launch::report::LaunchReport;
use crate::manifest::problem::LaunchManifest;
use crate::manifest::read::ManifestFile;
use crate::manifest::schema::load_schema;
use crate::policy::FailurePolicy;
use crate::scheduler::qsub::QsubCli;
use crate::template::{LauncherTemplate, NAMESPACE_TOKEN};

/// Render and submit one batch job per problem
mod launch;
/// Read and validate launch manifests
mod manifest;
/// What to do when a submission fails
mod policy;
/// Submit job files to the batch scheduler
mod scheduler;
/// Job template loading and rendering
mod template;

/// Render a job template once per problem in a manifest and submit each job with qsub
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a launch manifest (JSON) listing the problems to submit
    #[arg(short, long)]
    manifest: PathBuf,

    /// Job template, overrides the manifest
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Appended to each problem id to form the job name, overrides the manifest
    #[arg(short, long)]
    suffix: Option<String>,

    /// Command used to submit job files
    #[arg(long, default_value = "qsub")]
    qsub: PathBuf,

    /// Directory where temporary job files are written
    #[arg(long, default_value = ".")]
    scratch_dir: PathBuf,

    /// Keep going or stop after the first failed submission
    #[arg(long, value_enum, default_value_t = FailurePolicy::Continue)]
    on_failure: FailurePolicy,

    /// Render jobs and print a summary without writing or submitting anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting up");

    let args = Args::parse();

    let manifest = read_manifest(&args)?;
    let template_path = args.template.clone().unwrap_or_else(|| manifest.template.clone());
    let template = LauncherTemplate::load(&template_path)?;

    let name_suffix = args.suffix.clone().unwrap_or_else(|| manifest.name_suffix.clone());
    check_suffix(&name_suffix)?;

    let options = LaunchOptions {
        name_suffix,
        scratch_dir: args.scratch_dir.clone(),
        on_failure: args.on_failure,
        dry_run: args.dry_run,
    };
    info!("Launching {} of {} problems", manifest.active_count(), manifest.problems.len());

    let scheduler = QsubCli { program: args.qsub.clone() };
    let report = launch::run(&manifest.problems, &template, &scheduler, &options);

    println!("{}", report.summary()?);
    outcome(&report)
}

/// Suffixes are substituted before the namespace token, so they can't be allowed to spell it
fn check_suffix(name_suffix: &str) -> Result<()> {
    if name_suffix.contains('#') || name_suffix.contains(char::is_whitespace) {
        bail!("Job name suffix {name_suffix:?} can't contain '#' or whitespace (would clash with {NAMESPACE_TOKEN})");
    }
    Ok(())
}

/// Fail the run if any submission failed
fn outcome(report: &LaunchReport) -> Result<()> {
    if report.has_failures() {
        bail!("{} of {} submissions failed", report.failed.len(), report.active_count());
    }
    Ok(())
}

fn read_manifest(args: &Args) -> Result<LaunchManifest> {
    let compiled_schema = load_schema()?;
    let file = ManifestFile { path: args.manifest.clone(), compiled_schema };
    file.read().with_context(|| format!("Can't load manifest {}", args.manifest.display()))
}
