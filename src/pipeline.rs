// src/pipeline.rs

use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use crate::clean::{clean, CleanSummary};
use crate::error::{PipelineError, WriteError};
use crate::process::{read_table, write_table};
use crate::schema::{detect_profile, DatasetProfile, ReadOptions};
use crate::table::Table;
use crate::validate::{validate_cleaned, ValidationMode, ValidationReport};

/// Outcome of one successful read → clean → validate → write run.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub dataset: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub clean: CleanSummary,
    pub validation: ValidationReport,
}

/// One dataset's result, labelled for logging.
#[derive(Debug)]
pub struct Outcome {
    pub label: String,
    pub result: Result<DatasetReport, PipelineError>,
}

/// What to run: a known profile's default file, or an explicit file whose
/// profile is detected from its header.
#[derive(Debug, Clone)]
pub enum Job {
    Profile(usize),
    File(PathBuf),
}

pub struct Pipeline {
    input_dir: PathBuf,
    output_dir: PathBuf,
    profiles: Vec<DatasetProfile>,
    mode: ValidationMode,
}

impl Pipeline {
    /// Construct a pipeline writing into `output_dir`, creating the directory if needed.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        profiles: Vec<DatasetProfile>,
        mode: ValidationMode,
    ) -> Result<Self, WriteError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| WriteError::Io {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self {
            input_dir: input_dir.into(),
            output_dir,
            profiles,
            mode,
        })
    }

    /// Jobs for every profile's default input file, in profile order.
    pub fn default_jobs(&self) -> Vec<Job> {
        (0..self.profiles.len()).map(Job::Profile).collect()
    }

    /// Run `profile` against `<input_dir>/<input_file>`.
    pub fn run_profile(&self, profile: &DatasetProfile) -> Result<DatasetReport, PipelineError> {
        let input = self.input_dir.join(&profile.input_file);
        let table = read_table(&input, &profile.read)?;
        self.finish(table, profile, input, self.profile_output(profile))
    }

    /// Run an explicit file; the delimiter is inferred and the profile detected
    /// from the header columns.
    pub fn run_file(&self, input: &Path) -> Result<DatasetReport, PipelineError> {
        let table = read_table(input, &ReadOptions::default())?;
        let profile = detect_profile(&table, &self.profiles).ok_or_else(|| {
            PipelineError::UnknownDataset {
                path: input.to_path_buf(),
            }
        })?;
        self.finish(table, profile, input.to_path_buf(), self.file_output(input))
    }

    fn profile_output(&self, profile: &DatasetProfile) -> PathBuf {
        self.output_dir.join(profile.output_file_name())
    }

    fn file_output(&self, input: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!("cleaned_{}", file_name))
    }

    fn job_output(&self, job: &Job) -> PathBuf {
        match job {
            Job::Profile(i) => self.profile_output(&self.profiles[*i]),
            Job::File(path) => self.file_output(path),
        }
    }

    /// Run every job, sequentially or on the rayon pool. A failed job does not
    /// stop the others; outcomes come back in job order. A job whose output
    /// path was already claimed by an earlier job fails without running.
    pub fn run_all(&self, jobs: &[Job], parallel: bool) -> Vec<Outcome> {
        let mut seen = HashSet::new();
        let duplicate: Vec<Option<PathBuf>> = jobs
            .iter()
            .map(|job| {
                let out = self.job_output(job);
                if seen.insert(out.clone()) {
                    None
                } else {
                    Some(out)
                }
            })
            .collect();

        let run = |(i, job): (usize, &Job)| -> Outcome {
            let label = match job {
                Job::Profile(p) => self.profiles[*p].name.clone(),
                Job::File(path) => path.display().to_string(),
            };
            let result = match (&duplicate[i], job) {
                (Some(path), _) => Err(PipelineError::DuplicateOutput { path: path.clone() }),
                (None, Job::Profile(p)) => self.run_profile(&self.profiles[*p]),
                (None, Job::File(path)) => self.run_file(path),
            };
            match &result {
                Ok(report) => info!(
                    dataset = %label,
                    rows = report.validation.rows,
                    violations = report.validation.violations.len(),
                    output = %report.output.display(),
                    "saved"
                ),
                Err(err) => error!(dataset = %label, "{}", err),
            }
            Outcome { label, result }
        };

        if parallel {
            jobs.par_iter().enumerate().map(run).collect()
        } else {
            jobs.iter().enumerate().map(run).collect()
        }
    }

    #[tracing::instrument(level = "info", skip_all, fields(dataset = %profile.name))]
    fn finish(
        &self,
        mut table: Table,
        profile: &DatasetProfile,
        input: PathBuf,
        output: PathBuf,
    ) -> Result<DatasetReport, PipelineError> {
        let clean = clean(&mut table, profile);

        let validation = validate_cleaned(&table, clean.before_policies.clone(), &profile.rules);
        validation.log(&profile.name);
        if !validation.is_clean() {
            match self.mode {
                ValidationMode::Advisory => warn!(
                    violations = validation.violations.len(),
                    "validation reported problems; writing anyway"
                ),
                ValidationMode::Strict => {
                    return Err(PipelineError::ValidationFailed {
                        dataset: profile.name.clone(),
                        violations: validation.violations.len(),
                    })
                }
            }
        }

        write_table(&table, &output)?;
        Ok(DatasetReport {
            dataset: profile.name.clone(),
            input,
            output,
            clean,
            validation,
        })
    }
}

/// Write all reports as pretty JSON with a trailing newline.
pub fn write_reports<P: AsRef<Path>>(path: P, reports: &[&DatasetReport]) -> Result<(), WriteError> {
    let path = path.as_ref();
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut f = fs::File::create(path).map_err(io_err)?;
    serde_json::to_writer_pretty(&mut f, reports)
        .map_err(|e| io_err(io::Error::new(io::ErrorKind::Other, format!("serializing JSON: {}", e))))?;
    f.write_all(b"\n").map_err(io_err)?;
    Ok(())
}
