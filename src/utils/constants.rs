use std::str::FromStr;

use crate::utils::errors::ParseError;

/// State of a simulation after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Running,
    Complete,
    Missed,
}

/// Outcome of a schedulability decision, doubling as the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingCode {
    SchedulableSimulated = 0,
    SchedulableShortcut = 1,
    UnschedulableSimulated = 2,
    UnschedulableShortcut = 3,
    CannotTell = 4,
}

impl SchedulingCode {
    pub fn is_schedulable(self) -> bool {
        matches!(self, Self::SchedulableSimulated | Self::SchedulableShortcut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EDFVersion {
    Global,
    Partitioned,
    EDFk(usize),
}

impl FromStr for EDFVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "partitioned" => Ok(Self::Partitioned),
            other => match other.parse::<usize>() {
                Ok(k) if k >= 1 => Ok(Self::EDFk(k)),
                _ => Err(ParseError::Version(other.to_string())),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    FirstFit,
    NextFit,
    BestFit,
    WorstFit,
}

impl FromStr for Heuristic {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ff" => Ok(Self::FirstFit),
            "nf" => Ok(Self::NextFit),
            "bf" => Ok(Self::BestFit),
            "wf" => Ok(Self::WorstFit),
            other => Err(ParseError::Heuristic(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sorting {
    IncreasingUtilization,
    DecreasingUtilization,
}

impl FromStr for Sorting {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iu" => Ok(Self::IncreasingUtilization),
            "du" => Ok(Self::DecreasingUtilization),
            other => Err(ParseError::Sorting(other.to_string())),
        }
    }
}
