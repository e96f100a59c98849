use std::io;
use std::io::Write;
use std::path::Path;

use log::{debug, info, warn};
use tempfile::{Builder, NamedTempFile};

use crate::template::RenderedJob;

static JOB_FILE_PREFIX: &str = "temp_launcher.";
static JOB_FILE_SUFFIX: &str = ".run";

/// A rendered job written to a uniquely named file in the scratch directory
///
/// The file lives until [`JobFile::remove`] is called or the value is dropped, so it's gone before
/// the next job is written even when submission bails out early.
pub struct JobFile {
    file: NamedTempFile,
}

impl JobFile {
    pub fn create(scratch_dir: &Path, job: &RenderedJob) -> io::Result<JobFile> {
        let mut file = Builder::new()
            .prefix(JOB_FILE_PREFIX)
            .suffix(JOB_FILE_SUFFIX)
            .tempfile_in(scratch_dir)?;

        file.write_all(job.content.as_bytes())?;
        file.flush()?;
        info!("Writing job {} for {} to {}", job.name, job.namespace, file.path().display());

        Ok(JobFile { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the job file, logging instead of failing if that doesn't work
    pub fn remove(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(_) => debug!("Removed job file {}", path.display()),
            Err(err) => warn!("Can't remove job file {}: {}", path.display(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn job() -> RenderedJob {
        RenderedJob {
            name: "psb2.gcd-HumanDS".to_string(),
            namespace: "psb2.gcd".to_string(),
            content: "#PBS -N psb2.gcd-HumanDS\n".to_string(),
        }
    }

    #[test]
    fn writes_rendered_content() {
        let scratch = TempDir::new().unwrap();
        let job_file = JobFile::create(scratch.path(), &job()).unwrap();

        let name = job_file.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with(JOB_FILE_PREFIX));
        assert!(name.ends_with(JOB_FILE_SUFFIX));
        assert_eq!(fs::read_to_string(job_file.path()).unwrap(), job().content);
    }

    #[test]
    fn remove_deletes_file() {
        let scratch = TempDir::new().unwrap();
        let job_file = JobFile::create(scratch.path(), &job()).unwrap();
        let path = job_file.path().to_path_buf();

        job_file.remove();
        assert!(!path.exists());
    }

    #[test]
    fn drop_deletes_file() {
        let scratch = TempDir::new().unwrap();
        let path = {
            let job_file = JobFile::create(scratch.path(), &job()).unwrap();
            job_file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn removal_of_vanished_file_is_not_fatal() {
        let scratch = TempDir::new().unwrap();
        let job_file = JobFile::create(scratch.path(), &job()).unwrap();
        fs::remove_file(job_file.path()).unwrap();

        job_file.remove();
    }
}
