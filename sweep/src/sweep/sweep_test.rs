use super::{ConfigurationError, SweepBuilder, SweepConfig};
use crate::{
    args::ArgNames,
    build_flags::GridType,
    jobs::JobDir,
    steps::MaxStepsTable,
};
use std::{collections::BTreeMap, path::PathBuf};

fn big_sweep() -> SweepBuilder {
    SweepConfig::builder()
        .shift_input_file("shift1.txt")
        .fixed_spacing(1.0)
        .sizes(16..17)
        .arg_names(ArgNames::default())
        .launcher_args("-shift shift.txt -mult 1 ")
        .resource_request("-r 4h --mpp 500m")
        .executables(["../../build/examples/sim"])
        .build_flags("-DUSE_S:STRING=2 -DUSE_GRID:STRING=3")
}

#[test]
pub fn composes_the_reference_sweep() {
    let config = big_sweep().compose().unwrap();

    assert_eq!(
        config.job_dirs(),
        &[JobDir {
            size: 16,
            steps: (0..=17).map(f64::from).collect(),
        }]
    );
    assert_eq!(config.shift_input_file(), "shift1.txt");
    assert_eq!(config.resource_request(), "-r 4h --mpp 500m");
    assert_eq!(config.launcher_args(), "-shift shift.txt -mult 1 ");
    assert_eq!(
        config.executables(),
        &[PathBuf::from("../../build/examples/sim")]
    );
    assert_eq!(config.build_flags().renyi_index(), Some(2));
    assert_eq!(config.strategy().spacing(), 1.0);
}

#[test]
pub fn rejects_non_positive_spacing() {
    for spacing in [0.0, -1.0, f64::INFINITY] {
        assert_eq!(
            big_sweep().fixed_spacing(spacing).compose().unwrap_err(),
            ConfigurationError::InvalidSpacing(spacing)
        );
    }

    assert!(matches!(
        big_sweep().fixed_spacing(f64::NAN).compose(),
        Err(ConfigurationError::InvalidSpacing(_))
    ));
}

#[test]
pub fn rejects_missing_or_zero_sizes() {
    assert_eq!(
        big_sweep().sizes(Vec::new()).compose().unwrap_err(),
        ConfigurationError::EmptySizes
    );
    assert_eq!(
        big_sweep().sizes([8, 0]).compose().unwrap_err(),
        ConfigurationError::ZeroSize { index: 1 }
    );
}

#[test]
pub fn rejects_unknown_grid_type() {
    let result = big_sweep()
        .build_flags("-DUSE_S:STRING=2 -DUSE_GRID:STRING=5")
        .compose();

    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::InvalidGridType("5".to_string())
    );
}

#[test]
pub fn accepts_every_known_grid_type() {
    for (code, grid) in [
        (3, GridType::Triangular),
        (4, GridType::Square),
        (6, GridType::Hexagonal),
    ] {
        let config = big_sweep()
            .build_flags(format!("-DUSE_GRID:STRING={code}"))
            .compose()
            .unwrap();

        assert_eq!(config.build_flags().grid(), Some(grid));
    }
}

#[test]
pub fn rejects_unusable_arg_names() {
    let result = big_sweep().arg_names(ArgNames::new("L", "L")).compose();

    assert!(matches!(result, Err(ConfigurationError::InvalidArgNames(_))));
}

#[test]
pub fn oracle_skips_spacing_validation() {
    let config = big_sweep()
        .oracle_bounded(|size: u32| size / 4)
        .sizes([16, 8])
        .compose()
        .unwrap();

    assert_eq!(config.job_dirs()[0].steps.len(), 5);
    assert_eq!(config.job_dirs()[1].steps.len(), 3);
}

#[test]
pub fn plan_lists_every_job() {
    let plan = big_sweep().sizes([4, 8]).compose().unwrap().plan();

    assert_eq!(plan.jobs.len(), 6 + 10);
    assert_eq!(plan.jobs[0].dir, PathBuf::from("L4_H4/g0"));
    assert_eq!(plan.jobs[6].dir, PathBuf::from("L8_H8/g0"));
    assert_eq!(plan.build_flags, "-DUSE_S:STRING=2 -DUSE_GRID:STRING=3");
    assert_eq!(plan.grid, Some(GridType::Triangular));

    let rendered = serde_yaml::to_string(&plan).unwrap();
    assert!(rendered.contains("grid: 3"));
    assert!(rendered.contains("L8_H8/g9"));
}

#[test]
pub fn composed_config_can_be_shared_across_threads() {
    let config = big_sweep().compose().unwrap();

    let handle = std::thread::spawn(move || config.jobs().len());

    assert_eq!(handle.join().unwrap(), 18);
}

#[test]
pub fn rejects_flag_names_with_spaces() {
    let result = big_sweep()
        .arg_names(ArgNames::new(["L H"], "g"))
        .compose();

    assert!(matches!(result, Err(ConfigurationError::InvalidArgNames(_))));
}

#[test]
pub fn rejects_sizes_missing_from_the_oracle_table() {
    let result = big_sweep()
        .oracle_bounded(MaxStepsTable(BTreeMap::from([(18, 3)])))
        .compose();

    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::MissingMaxSteps { size: 16 }
    );
}

#[test]
pub fn rejects_spacing_that_explodes_the_step_count() {
    assert_eq!(
        big_sweep().fixed_spacing(1e-12).compose().unwrap_err(),
        ConfigurationError::TooManySteps { size: 16 }
    );
}
