use crate::{
    args::ArgNames,
    probe::{probe, Probe},
    steps::MaxStepsTable,
    sweep::{ConfigurationError, SweepBuilder, SweepConfig},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::Error,
    os::unix::fs::MetadataExt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, warn};


// check if a file is executable
pub fn check_executable(path: &Path) -> Result<bool, ConfigErrors> {
    if !path.is_file() {
        Err(ConfigErrors::FileNotFound(path.to_path_buf()))
    } else {
        match File::open(path).map(|file| file.metadata()) {
            Ok(Ok(metadata)) => Ok((metadata.mode() & 0o111) != 0),
            Ok(Err(e)) | Err(e) => Err(ConfigErrors::MetadataNotFound(e)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read sweep file: {0}")]
    Io(#[from] Error),
    #[error("Failed to parse sweep file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid sweep: {0}")]
    Invalid(#[from] ConfigurationError),
    #[error("File not found: {}", .0.to_string_lossy())]
    FileNotFound(PathBuf),
    #[error("Metadata not found")]
    MetadataNotFound(#[source] Error),
    #[error("Not executable: {}", .0.to_string_lossy())]
    NotExecutable(PathBuf),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct SweepFile {
    // input for generating the per job shift files, consumed by the launcher
    #[serde(alias = "shift", default = "default_shift_input_file")]
    pub shift_input_file: String,
    pub steps: StepsConfig,
    pub sizes: SizesConfig,
    #[serde(alias = "args", default)]
    pub arg_names: ArgNames,
    // passed verbatim in front of the per job flags
    #[serde(alias = "bash", default)]
    pub launcher_args: String,
    // scheduler specific, passed verbatim to the submission
    #[serde(alias = "sq", default)]
    pub resource_request: String,
    #[serde(alias = "files", default)]
    pub executables: Vec<PathBuf>,
    #[serde(alias = "cmake", default)]
    pub build_flags: String,
}

// selected by the `mode` key, e.g. `{ mode: fixed_spacing, spacing: 1.0 }`
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum StepsConfig {
    FixedSpacing { spacing: f64 },
    OracleBounded { max_steps: BTreeMap<u32, u32> },
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum SizesConfig {
    List(Vec<u32>),
    Range(SizeRange),
}

// half open, like `start..end` stepping by `step`
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SizeRange {
    pub start: u32,
    pub end: u32,
    #[serde(default = "default_size_step")]
    pub step: u32,
}

impl SizesConfig {
    pub fn expand(&self) -> Result<Vec<u32>, ConfigurationError> {
        match self {
            Self::List(sizes) => Ok(sizes.clone()),
            Self::Range(SizeRange { step: 0, .. }) => Err(ConfigurationError::ZeroSizeStep),
            Self::Range(SizeRange { start, end, step }) => {
                Ok((*start..*end).step_by(*step as usize).collect())
            }
        }
    }
}

impl SweepFile {
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        debug!(path = ?path, "Loading sweep file");

        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }

    pub fn builder(&self) -> Result<SweepBuilder, ConfigurationError> {
        let builder = SweepBuilder::new()
            .shift_input_file(self.shift_input_file.clone())
            .sizes(self.sizes.expand()?)
            .arg_names(self.arg_names.clone())
            .launcher_args(self.launcher_args.clone())
            .resource_request(self.resource_request.clone())
            .executables(self.executables.iter())
            .build_flags(self.build_flags.clone());

        Ok(match self.steps {
            StepsConfig::FixedSpacing { spacing } => builder.fixed_spacing(spacing),
            StepsConfig::OracleBounded { ref max_steps } => {
                builder.oracle_bounded(MaxStepsTable(max_steps.clone()))
            }
        })
    }

    pub fn compose(&self) -> Result<SweepConfig, ConfigurationError> {
        self.builder()?.compose()
    }
}

/// First candidate that exists and carries an execute bit, relative
/// candidates are taken relative to `root`
pub fn resolve_executable(config: &SweepConfig, root: &Path) -> Probe<PathBuf> {
    probe(
        "executable",
        config.executables().iter().map(|path| root.join(path)),
        |path| match check_executable(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ConfigErrors::NotExecutable(path.clone())),
            Err(e) => Err(e),
        },
    )
}

/// Environment checks that do not affect the composed sweep itself.
/// Returns true if any of them failed.
pub fn preflight_checks(config: &SweepConfig, root: &Path) -> bool {
    // attempt to catch all errors instead of piece-by-piece to make debugging easier for users
    let mut contains_error = false;

    let shift = root.join(config.shift_input_file());
    if !shift.is_file() {
        warn!(
            "Shift input file {} not found, the launcher will fail to generate shift files",
            shift.to_string_lossy()
        );
    }

    if config.executables().is_empty() {
        error!("No executable was defined, nothing could run the jobs");
        contains_error = true;
    } else if !resolve_executable(config, root).is_available() {
        contains_error = true;
    }

    if config.resource_request().trim().is_empty() {
        warn!("Resource request is empty, the scheduler defaults apply");
    }

    match config.build_flags().grid() {
        Some(grid) => debug!(
            ?grid,
            "Make sure the binary was built with these flags: {}",
            config.build_flags()
        ),
        None => warn!("Build flags do not select a grid type"),
    }

    contains_error
}

fn default_shift_input_file() -> String {
    String::from("shift.txt")
}

fn default_size_step() -> u32 {
    1
}
