pub mod args;
pub mod build_flags;
pub mod config;
pub mod jobs;
pub mod probe;
pub mod steps;
pub mod sweep;

pub use crate::{
    args::{ArgAxis, ArgNames},
    build_flags::{BuildFlags, GridType},
    jobs::{build_job_dirs, Job, JobDir},
    steps::{generate_step_range, MaxSteps, StepStrategy},
    sweep::{ConfigurationError, SweepBuilder, SweepConfig, SweepPlan},
};
