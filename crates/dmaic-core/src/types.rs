use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Define,
    Measure,
    Analyze,
    Improve,
    Control,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Define,
            Phase::Measure,
            Phase::Analyze,
            Phase::Improve,
            Phase::Control,
        ]
    }

    /// Position in the cycle, 1 for Define through 5 for Control.
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Define => "define",
            Phase::Measure => "measure",
            Phase::Analyze => "analyze",
            Phase::Improve => "improve",
            Phase::Control => "control",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Define => "Define",
            Phase::Measure => "Measure",
            Phase::Analyze => "Analyze",
            Phase::Improve => "Improve",
            Phase::Control => "Control",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::error::DmaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = if name == "analyse" { "analyze" } else { name.as_str() };
        Phase::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| crate::error::DmaicError::InvalidPhase(s.to_string()))
    }
}

/// Rank of a phase name, or 0 when the name does not resolve.
///
/// Comparisons against an unresolved name therefore treat it as earlier than
/// every real phase. Two unresolved names compare equal.
pub fn phase_rank(name: &str) -> u8 {
    name.parse::<Phase>().map(Phase::rank).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Low => "low",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ToolStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolStatus::NotStarted => "not_started",
            ToolStatus::InProgress => "in_progress",
            ToolStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_ordering() {
        assert!(Phase::Define < Phase::Measure);
        assert!(Phase::Analyze < Phase::Improve);
        assert!(Phase::Control > Phase::Improve);
    }

    #[test]
    fn phase_ranks_are_one_based() {
        let ranks: Vec<u8> = Phase::all().iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn phase_parse_is_case_insensitive() {
        assert_eq!("Improve".parse::<Phase>().unwrap(), Phase::Improve);
        assert_eq!("ANALYZE".parse::<Phase>().unwrap(), Phase::Analyze);
        assert_eq!("define".parse::<Phase>().unwrap(), Phase::Define);
        assert!("verify".parse::<Phase>().is_err());
    }

    #[test]
    fn unknown_phase_ranks_zero() {
        assert_eq!(phase_rank("Measure"), 2);
        assert_eq!(phase_rank("control"), 5);
        assert_eq!(phase_rank("Deploy"), 0);
        assert_eq!(phase_rank(""), 0);
    }

    #[test]
    fn tool_status_defaults_to_not_started() {
        assert_eq!(ToolStatus::default(), ToolStatus::NotStarted);
    }

    #[test]
    fn tool_status_serde_names() {
        let yaml = serde_yaml::to_string(&ToolStatus::InProgress).unwrap();
        assert_eq!(yaml.trim(), "in_progress");
        let parsed: ToolStatus = serde_yaml::from_str("completed").unwrap();
        assert_eq!(parsed, ToolStatus::Completed);
    }
}
