use crate::{
    args::ArgNames,
    build_flags::{BuildFlags, GridType},
    jobs::{build_job_dirs, Job, JobDir},
    steps::{MaxSteps, StepStrategy},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

#[cfg(test)]
mod sweep_test;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Step spacing must be a positive number, got {0}")]
    InvalidSpacing(f64),
    #[error("No system size was given")]
    EmptySizes,
    #[error("System sizes must be positive, entry {index} is 0")]
    ZeroSize { index: usize },
    #[error("Size range step cannot be 0")]
    ZeroSizeStep,
    #[error("Grid type '{0}' is not one of 3 (tri), 4 (sqr) or 6 (hex)")]
    InvalidGridType(String),
    #[error("Renyi index '{0}' must be a positive integer")]
    InvalidRenyiIndex(String),
    #[error("Build flag '{0}' is not of the form -D<KEY>[:<TYPE>]=<VALUE>")]
    MalformedBuildFlag(String),
    #[error("Oracle has no maximum step count for size {size}")]
    MissingMaxSteps { size: u32 },
    #[error("Size {size} would produce more than {} steps", crate::steps::MAX_STEPS_PER_SIZE)]
    TooManySteps { size: u32 },
    #[error("Invalid argument names: {}", .0.join("; "))]
    InvalidArgNames(Vec<String>),
}

/// Complete, validated description of one sweep
///
/// Only `SweepBuilder::compose` creates these, so every instance upholds the
/// sweep invariants and nothing can change it afterwards.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    shift_input_file: String,
    strategy: StepStrategy,
    sizes: Vec<u32>,
    job_dirs: Vec<JobDir>,
    arg_names: ArgNames,
    launcher_args: String,
    resource_request: String,
    executables: Vec<PathBuf>,
    build_flags: BuildFlags,
}

impl SweepConfig {
    pub fn builder() -> SweepBuilder {
        SweepBuilder::new()
    }

    pub fn shift_input_file(&self) -> &str {
        &self.shift_input_file
    }

    pub fn strategy(&self) -> &StepStrategy {
        &self.strategy
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn job_dirs(&self) -> &[JobDir] {
        &self.job_dirs
    }

    pub fn arg_names(&self) -> &ArgNames {
        &self.arg_names
    }

    pub fn launcher_args(&self) -> &str {
        &self.launcher_args
    }

    pub fn resource_request(&self) -> &str {
        &self.resource_request
    }

    pub fn executables(&self) -> &[PathBuf] {
        &self.executables
    }

    pub fn build_flags(&self) -> &BuildFlags {
        &self.build_flags
    }

    /// one job per (size, step) pair, sizes in input order, steps ascending
    pub fn jobs(&self) -> Vec<Job> {
        self.job_dirs
            .iter()
            .flat_map(|dir| dir.jobs(&self.arg_names, &self.launcher_args))
            .collect()
    }

    pub fn plan(&self) -> SweepPlan {
        SweepPlan {
            shift_input_file: self.shift_input_file.clone(),
            resource_request: self.resource_request.clone(),
            executables: self.executables.clone(),
            build_flags: self.build_flags.to_string(),
            grid: self.build_flags.grid(),
            jobs: self.jobs(),
        }
    }
}

/// What a launcher needs to materialize the sweep
#[derive(Serialize, Clone, Debug)]
pub struct SweepPlan {
    pub shift_input_file: String,
    pub resource_request: String,
    pub executables: Vec<PathBuf>,
    pub build_flags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridType>,
    pub jobs: Vec<Job>,
}

/// Collects the sweep parameters, validation only happens in `compose`
#[derive(Clone, Debug)]
pub struct SweepBuilder {
    shift_input_file: String,
    strategy: StepStrategy,
    sizes: Vec<u32>,
    arg_names: ArgNames,
    launcher_args: String,
    resource_request: String,
    executables: Vec<PathBuf>,
    build_flags: String,
}

impl Default for SweepBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepBuilder {
    pub fn new() -> Self {
        Self {
            shift_input_file: String::from("shift.txt"),
            strategy: StepStrategy::fixed_spacing(1.0),
            sizes: Vec::new(),
            arg_names: ArgNames::default(),
            launcher_args: String::new(),
            resource_request: String::new(),
            executables: Vec::new(),
            build_flags: String::new(),
        }
    }

    pub fn shift_input_file(mut self, name: impl Into<String>) -> Self {
        self.shift_input_file = name.into();
        self
    }

    pub fn strategy(mut self, strategy: StepStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn fixed_spacing(self, spacing: f64) -> Self {
        self.strategy(StepStrategy::fixed_spacing(spacing))
    }

    pub fn oracle_bounded<O>(self, oracle: O) -> Self
    where
        O: MaxSteps + Send + Sync + 'static,
    {
        self.strategy(StepStrategy::oracle_bounded(oracle))
    }

    pub fn sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.sizes = sizes.into_iter().collect();
        self
    }

    pub fn arg_names(mut self, arg_names: ArgNames) -> Self {
        self.arg_names = arg_names;
        self
    }

    pub fn launcher_args(mut self, args: impl Into<String>) -> Self {
        self.launcher_args = args.into();
        self
    }

    pub fn resource_request(mut self, request: impl Into<String>) -> Self {
        self.resource_request = request.into();
        self
    }

    pub fn executables<P: AsRef<Path>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.executables = paths
            .into_iter()
            .map(|path| path.as_ref().to_path_buf())
            .collect();
        self
    }

    pub fn build_flags(mut self, flags: impl Into<String>) -> Self {
        self.build_flags = flags.into();
        self
    }

    /// Validate everything and enumerate the job directories
    ///
    /// Either returns a complete config or the first problem found, nothing
    /// is written or spawned in either case.
    pub fn compose(self) -> Result<SweepConfig, ConfigurationError> {
        if let StepStrategy::FixedSpacing { spacing } = self.strategy {
            if !(spacing.is_finite() && spacing > 0.0) {
                error!(spacing, "Rejected step spacing");
                return Err(ConfigurationError::InvalidSpacing(spacing));
            }
        }

        if self.sizes.is_empty() {
            error!("No sizes were given, unable to build any job");
            return Err(ConfigurationError::EmptySizes);
        }

        if let Some(index) = self.sizes.iter().position(|size| *size == 0) {
            error!(index, "Rejected zero system size");
            return Err(ConfigurationError::ZeroSize { index });
        }

        let problems = self.arg_names.problems();
        if !problems.is_empty() {
            return Err(ConfigurationError::InvalidArgNames(problems));
        }

        let build_flags = self.build_flags.parse::<BuildFlags>()?;
        if build_flags.grid().is_none() {
            debug!("No grid type in build flags, the binary default applies");
        }

        let job_dirs = build_job_dirs(&self.sizes, &self.strategy)?;

        info!(
            sizes = self.sizes.len(),
            jobs = job_dirs.iter().map(|dir| dir.steps.len()).sum::<usize>(),
            "Composed sweep"
        );

        Ok(SweepConfig {
            shift_input_file: self.shift_input_file,
            strategy: self.strategy,
            sizes: self.sizes,
            job_dirs,
            arg_names: self.arg_names,
            launcher_args: self.launcher_args,
            resource_request: self.resource_request,
            executables: self.executables,
            build_flags,
        })
    }
}
