use crate::sweep::ConfigurationError;
use std::{collections::BTreeMap, fmt, sync::Arc};
use tracing::{error, trace};

#[cfg(test)]
mod steps_test;

/// Tolerance added to the upper bound of a fixed spacing range, so the
/// boundary value survives floating point accumulation
pub const EPSILON: f64 = 0.000001;

/// Upper limit of step values generated for a single size
pub const MAX_STEPS_PER_SIZE: usize = 1_000_000;

/// Answers "how many steps does a system of this size have", `None` if the
/// size is unknown to the oracle
pub trait MaxSteps {
    fn max_steps(&self, size: u32) -> Option<u32>;
}

impl<F> MaxSteps for F
where
    F: Fn(u32) -> u32,
{
    fn max_steps(&self, size: u32) -> Option<u32> {
        Some(self(size))
    }
}

/// Lookup table oracle, only knows the sizes it has an entry for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxStepsTable(pub BTreeMap<u32, u32>);

impl MaxSteps for MaxStepsTable {
    fn max_steps(&self, size: u32) -> Option<u32> {
        self.0.get(&size).copied()
    }
}

pub type Oracle = Arc<dyn MaxSteps + Send + Sync>;

/// How the step values of a single size are produced
#[derive(Clone)]
pub enum StepStrategy {
    /// `0, spacing, 2 * spacing, ...` up to and slightly past the size
    FixedSpacing { spacing: f64 },
    /// `0, 1, ..., max_steps(size)`
    OracleBounded { oracle: Oracle },
}

impl fmt::Debug for StepStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedSpacing { spacing } => f
                .debug_struct("FixedSpacing")
                .field("spacing", spacing)
                .finish(),
            Self::OracleBounded { .. } => f.debug_struct("OracleBounded").finish_non_exhaustive(),
        }
    }
}

impl StepStrategy {
    pub fn fixed_spacing(spacing: f64) -> Self {
        Self::FixedSpacing { spacing }
    }

    pub fn oracle_bounded<O>(oracle: O) -> Self
    where
        O: MaxSteps + Send + Sync + 'static,
    {
        Self::OracleBounded {
            oracle: Arc::new(oracle),
        }
    }

    /// spacing between consecutive steps, the oracle mode always uses unit steps
    pub fn spacing(&self) -> f64 {
        match self {
            Self::FixedSpacing { spacing } => *spacing,
            Self::OracleBounded { .. } => 1.0,
        }
    }

    /// Number of step values `steps_for_size` would produce
    pub fn step_count(&self, size: u32) -> Result<usize, ConfigurationError> {
        let count = match self {
            Self::FixedSpacing { spacing } => {
                if !(spacing.is_finite() && *spacing > 0.0) {
                    return Err(ConfigurationError::InvalidSpacing(*spacing));
                }

                // the float estimate can be off by one at the boundary, close enough for a limit
                ((f64::from(size) + spacing + EPSILON) / spacing).ceil()
            }
            Self::OracleBounded { oracle } => match oracle.max_steps(size) {
                Some(max_steps) => f64::from(max_steps) + 1.0,
                None => {
                    error!(size, "Oracle has no step bound for size");
                    return Err(ConfigurationError::MissingMaxSteps { size });
                }
            },
        };

        if count > MAX_STEPS_PER_SIZE as f64 {
            error!(size, count, "Too many steps for size");
            return Err(ConfigurationError::TooManySteps { size });
        }

        Ok(count as usize)
    }

    pub fn steps_for_size(&self, size: u32) -> Result<Vec<f64>, ConfigurationError> {
        self.step_count(size)?;

        Ok(match self {
            Self::FixedSpacing { spacing } => generate_step_range(f64::from(size), *spacing),
            Self::OracleBounded { oracle } => {
                let max_steps = oracle
                    .max_steps(size)
                    .ok_or(ConfigurationError::MissingMaxSteps { size })?;
                trace!(size, max_steps, "Asked oracle for step bound");

                (0..=max_steps).map(f64::from).collect()
            }
        })
    }
}

/// Ascending values from zero in increments of `spacing`, while below
/// `size + spacing + EPSILON`.
///
/// The values are accumulated rather than multiplied out, so a spacing that
/// does not divide the size can overshoot it by less than one spacing.
/// A non positive or non finite spacing yields an empty range instead of
/// looping forever, `SweepBuilder::compose` rejects those before they get here.
/// The length is not bounded here, see `StepStrategy::step_count`.
pub fn generate_step_range(size: f64, spacing: f64) -> Vec<f64> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }

    let stop = size + spacing + EPSILON;
    let mut steps = Vec::new();
    let mut value = 0.0;

    while value < stop {
        steps.push(value);
        value += spacing;
    }

    steps
}
