use super::{generate_step_range, MaxStepsTable, StepStrategy, EPSILON, MAX_STEPS_PER_SIZE};
use crate::sweep::ConfigurationError;
use std::collections::BTreeMap;

#[test]
pub fn unit_spacing_reaches_one_past_size() {
    let steps = generate_step_range(16.0, 1.0);

    assert_eq!(steps.len(), 18);
    assert_eq!(steps.first(), Some(&0.0));
    assert_eq!(steps.last(), Some(&17.0));
    assert!(!steps.contains(&18.0));
}

#[test]
pub fn steps_stay_in_bounds_and_increase_uniformly() {
    for (size, spacing) in [(16.0, 1.0), (4.0, 0.3), (7.0, 0.25), (1.0, 2.5), (10.0, 0.1)] {
        let steps = generate_step_range(size, spacing);

        assert!(!steps.is_empty(), "size {size} spacing {spacing}");
        for value in steps.iter() {
            assert!(*value >= 0.0);
            assert!(*value <= size + spacing + EPSILON);
        }
        for pair in steps.windows(2) {
            assert!((pair[1] - pair[0] - spacing).abs() < 1e-9);
        }
    }
}

#[test]
pub fn non_dividing_spacing_overshoots_size() {
    // 0, 0.3, ..., 4.2 since 4.2 < 4.3 + eps
    let steps = generate_step_range(4.0, 0.3);

    assert_eq!(steps.len(), 15);
    assert!(*steps.last().unwrap() > 4.0);
}

#[test]
pub fn repeated_generation_is_identical() {
    let first = generate_step_range(12.0, 0.1);
    let second = generate_step_range(12.0, 0.1);

    assert_eq!(
        first.iter().map(|value| value.to_bits()).collect::<Vec<_>>(),
        second.iter().map(|value| value.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
pub fn degenerate_spacing_is_empty() {
    assert!(generate_step_range(16.0, 0.0).is_empty());
    assert!(generate_step_range(16.0, -1.0).is_empty());
    assert!(generate_step_range(16.0, f64::NAN).is_empty());
}

#[test]
pub fn oracle_closure_bounds_steps() {
    let strategy = StepStrategy::oracle_bounded(|size: u32| size / 2);

    assert_eq!(
        strategy.steps_for_size(8).unwrap(),
        vec![0.0, 1.0, 2.0, 3.0, 4.0]
    );
    assert_eq!(strategy.spacing(), 1.0);
}

#[test]
pub fn oracle_table_rejects_unknown_sizes() {
    let strategy = StepStrategy::oracle_bounded(MaxStepsTable(BTreeMap::from([(18, 3)])));

    assert_eq!(
        strategy.steps_for_size(16),
        Err(ConfigurationError::MissingMaxSteps { size: 16 })
    );
    assert_eq!(strategy.steps_for_size(18).unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
pub fn tiny_spacing_is_refused_before_generating() {
    let strategy = StepStrategy::fixed_spacing(1e-12);

    assert_eq!(
        strategy.steps_for_size(16),
        Err(ConfigurationError::TooManySteps { size: 16 })
    );
}

#[test]
pub fn huge_oracle_bound_is_refused() {
    let strategy = StepStrategy::oracle_bounded(|_: u32| u32::MAX);

    assert_eq!(
        strategy.step_count(4),
        Err(ConfigurationError::TooManySteps { size: 4 })
    );
}

#[test]
pub fn step_count_matches_generated_range() {
    let strategy = StepStrategy::fixed_spacing(1.0);

    assert_eq!(strategy.step_count(16).unwrap(), 18);
    assert!(StepStrategy::fixed_spacing(0.001).step_count(16).unwrap() < MAX_STEPS_PER_SIZE);
}
