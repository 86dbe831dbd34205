use crate::sweep::ConfigurationError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::{fmt, str::FromStr};


pub const RENYI_INDEX_KEY: &str = "USE_S";
pub const GRID_KEY: &str = "USE_GRID";

/// Lattice of the simulation binary, a compile time constant
#[derive(Serialize_repr, Deserialize_repr, PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord)]
#[repr(u8)]
pub enum GridType {
    Triangular = 3,
    Square = 4,
    Hexagonal = 6,
}

impl GridType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GridType {
    type Error = ConfigurationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            3 => Ok(Self::Triangular),
            4 => Ok(Self::Square),
            6 => Ok(Self::Hexagonal),
            _ => Err(ConfigurationError::InvalidGridType(code.to_string())),
        }
    }
}

impl FromStr for GridType {
    type Err = ConfigurationError;

    /// accepts the numeric code or the short lattice name
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "tri" => Ok(Self::Triangular),
            "sqr" => Ok(Self::Square),
            "hex" => Ok(Self::Hexagonal),
            _ => value
                .parse::<u8>()
                .map_err(|_| ConfigurationError::InvalidGridType(value.to_owned()))
                .and_then(GridType::try_from),
        }
    }
}

/// A single `-D<KEY>[:<TYPE>]=<VALUE>` definition
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub key: String,
    pub kind: Option<String>,
    pub value: String,
}

impl FromStr for Definition {
    type Err = ConfigurationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigurationError::MalformedBuildFlag(token.to_owned());

        let (name, value) = token
            .strip_prefix("-D")
            .and_then(|definition| definition.split_once('='))
            .ok_or_else(malformed)?;
        let (key, kind) = match name.split_once(':') {
            Some((key, kind)) => (key, Some(kind.to_owned())),
            None => (name, None),
        };

        if key.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            key: key.to_owned(),
            kind,
            value: value.to_owned(),
        })
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(ref kind) => write!(f, "-D{}:{}={}", self.key, kind, self.value),
            None => write!(f, "-D{}={}", self.key, self.value),
        }
    }
}

/// Build configuration of the simulation binary
///
/// Only `USE_S` and `USE_GRID` are interpreted, every other definition is kept
/// as given. Changing any of them requires the binary to be rebuilt before the
/// sweep runs.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BuildFlags {
    definitions: Vec<Definition>,
    renyi_index: Option<u32>,
    grid: Option<GridType>,
}

impl BuildFlags {
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn renyi_index(&self) -> Option<u32> {
        self.renyi_index
    }

    pub fn grid(&self) -> Option<GridType> {
        self.grid
    }
}

impl FromStr for BuildFlags {
    type Err = ConfigurationError;

    fn from_str(flags: &str) -> Result<Self, Self::Err> {
        let definitions = flags
            .split_whitespace()
            .map(Definition::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        let mut renyi_index = None;
        let mut grid = None;

        // later definitions win, like they do on a cmake command line
        for definition in definitions.iter() {
            match definition.key.as_str() {
                RENYI_INDEX_KEY => match definition.value.parse::<u32>() {
                    Ok(index) if index > 0 => renyi_index = Some(index),
                    _ => {
                        return Err(ConfigurationError::InvalidRenyiIndex(
                            definition.value.clone(),
                        ))
                    }
                },
                GRID_KEY => grid = Some(definition.value.parse::<GridType>()?),
                _ => {}
            }
        }

        Ok(Self {
            definitions,
            renyi_index,
            grid,
        })
    }
}

impl fmt::Display for BuildFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definitions.iter().join(" "))
    }
}
