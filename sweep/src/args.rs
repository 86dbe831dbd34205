use itertools::Itertools;
use serde::{Deserialize, Serialize};


/// Flag names that receive the value of one sweep axis
///
/// Written either as a single name (`g`) or as a group (`[L, H]`), where every
/// member of the group is passed the same value.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ArgAxis {
    Single(String),
    Group(Vec<String>),
}

impl ArgAxis {
    pub fn flags(&self) -> &[String] {
        match self {
            Self::Single(flag) => std::slice::from_ref(flag),
            Self::Group(flags) => flags,
        }
    }
}

impl From<&str> for ArgAxis {
    fn from(flag: &str) -> Self {
        Self::Single(flag.to_owned())
    }
}

impl<const N: usize> From<[&str; N]> for ArgAxis {
    fn from(flags: [&str; N]) -> Self {
        Self::Group(flags.iter().map(|flag| flag.to_string()).collect())
    }
}

/// Binding of the sweep axes to command line flags: the first axis receives
/// the system size, the second one the step value
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct ArgNames(pub Vec<ArgAxis>);

impl Default for ArgNames {
    fn default() -> Self {
        Self(vec![ArgAxis::from(["L", "H"]), ArgAxis::from("g")])
    }
}

impl ArgNames {
    pub fn new(size: impl Into<ArgAxis>, step: impl Into<ArgAxis>) -> Self {
        Self(vec![size.into(), step.into()])
    }

    /// problems with the binding, an empty list means the binding is usable
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.0.len() != 2 {
            problems.push(format!(
                "expected a size axis and a step axis, found {} axes",
                self.0.len()
            ));
        }

        for (index, axis) in self.0.iter().enumerate() {
            if axis.flags().is_empty() {
                problems.push(format!("axis {index} binds no flag"));
            }
            if axis.flags().iter().any(|flag| flag.is_empty()) {
                problems.push(format!("axis {index} contains an empty flag name"));
            }
            // a flag has to survive as a single argv token and a single path component
            for flag in axis.flags() {
                if flag.chars().any(|c| c.is_whitespace() || c == '/') {
                    problems.push(format!("axis {index} flag '{flag}' contains whitespace or '/'"));
                }
            }
        }

        let duplicates = self
            .0
            .iter()
            .flat_map(ArgAxis::flags)
            .duplicates()
            .collect_vec();
        if !duplicates.is_empty() {
            problems.push(format!(
                "flags bound more than once: {}",
                duplicates.iter().join(", ")
            ));
        }

        problems
    }

    pub fn size_flags(&self) -> &[String] {
        self.0.first().map(ArgAxis::flags).unwrap_or_default()
    }

    pub fn step_flags(&self) -> &[String] {
        self.0.get(1).map(ArgAxis::flags).unwrap_or_default()
    }

    /// `(flag, value)` pairs for one job, size flags first
    pub fn bind(&self, size: u32, step: f64) -> Vec<(&str, String)> {
        bind_axis(self.size_flags(), size.to_string())
            .chain(bind_axis(self.step_flags(), step.to_string()))
            .collect()
    }
}

fn bind_axis(flags: &[String], value: String) -> impl Iterator<Item = (&str, String)> + '_ {
    flags.iter().map(move |flag| (flag.as_str(), value.clone()))
}
