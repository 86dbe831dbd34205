use std::fmt::{Debug, Display};
use tracing::{debug, error, info};


/// Outcome of trying interchangeable candidates in order of preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Found { index: usize, candidate: T },
    Unavailable,
}

impl<T> Probe<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found { candidate, .. } => Some(candidate),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Try each candidate until `attempt` succeeds
///
/// Candidates after the first success are never touched. Failures are only
/// logged, running out of candidates is reported as `Probe::Unavailable`.
pub fn probe<T, E, I, F>(what: &str, candidates: I, mut attempt: F) -> Probe<T>
where
    T: Debug,
    E: Display,
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Result<(), E>,
{
    for (index, candidate) in candidates.into_iter().enumerate() {
        match attempt(&candidate) {
            Ok(()) => {
                info!(index, candidate = ?candidate, "Using {what}");
                return Probe::Found { index, candidate };
            }
            Err(error) => {
                debug!(index, candidate = ?candidate, "Skipped {what}: {error}");
            }
        }
    }

    error!("No usable {what} found");

    Probe::Unavailable
}
