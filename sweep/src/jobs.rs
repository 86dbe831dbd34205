use crate::{args::ArgNames, steps::StepStrategy, sweep::ConfigurationError};
use itertools::Itertools;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;


/// A system size together with all step values swept for it
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct JobDir {
    pub size: u32,
    pub steps: Vec<f64>,
}

/// Everything a launcher needs for a single invocation
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Job {
    /// relative to the sweep root
    pub dir: PathBuf,
    pub size: u32,
    pub step: f64,
    pub args: Vec<String>,
}

/// Pair every size with its steps, keeps the given order and duplicates.
/// Fails on the first size the strategy cannot enumerate.
pub fn build_job_dirs(
    sizes: &[u32],
    strategy: &StepStrategy,
) -> Result<Vec<JobDir>, ConfigurationError> {
    sizes
        .iter()
        .map(|&size| {
            let steps = strategy.steps_for_size(size)?;
            debug!(size, steps = steps.len(), "Enumerated steps");

            Ok(JobDir { size, steps })
        })
        .collect()
}

/// `<flag><value>` for every flag, joined with `_`
fn dir_name(bindings: &[(&str, String)]) -> String {
    bindings
        .iter()
        .map(|(flag, value)| format!("{flag}{value}"))
        .join("_")
}

impl JobDir {
    /// directory holding all step directories of this size
    pub fn path(&self, arg_names: &ArgNames) -> PathBuf {
        let bindings = arg_names
            .size_flags()
            .iter()
            .map(|flag| (flag.as_str(), self.size.to_string()))
            .collect_vec();

        PathBuf::from(dir_name(&bindings))
    }

    pub fn jobs(&self, arg_names: &ArgNames, launcher_args: &str) -> Vec<Job> {
        let root = self.path(arg_names);
        let size_flags = arg_names.size_flags().len();

        self.steps
            .iter()
            .map(|&step| {
                let bindings = arg_names.bind(self.size, step);

                let args = launcher_args
                    .split_whitespace()
                    .map(str::to_owned)
                    .chain(
                        bindings
                            .iter()
                            .flat_map(|(flag, value)| [format!("-{flag}"), value.clone()]),
                    )
                    .collect();

                Job {
                    dir: root.join(dir_name(&bindings[size_flags..])),
                    size: self.size,
                    step,
                    args,
                }
            })
            .collect()
    }
}
