//! Core type definitions for the refinement pipeline

use serde::{Deserialize, Serialize};

/// Refinement cycle, ordered by analytical depth
///
/// The ordering is semantic: `Third` is always the most comprehensive cycle
/// and downstream labeling (basic / detailed / complete) relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CycleNumber {
    First = 1,
    Second = 2,
    Third = 3,
}

impl CycleNumber {
    /// All cycles in execution order
    pub const ALL: [CycleNumber; 3] = [Self::First, Self::Second, Self::Third];

    /// Numeric value (1, 2 or 3)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Position of this cycle in `PipelineResult::cycles`
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Short name of the depth level
    pub fn depth(self) -> &'static str {
        match self {
            Self::First => "direct",
            Self::Second => "detailed",
            Self::Third => "comprehensive",
        }
    }
}

impl std::fmt::Display for CycleNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl TryFrom<u8> for CycleNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            _ => Err(format!("Invalid cycle number: {}. Use 1, 2 or 3.", value)),
        }
    }
}

impl From<CycleNumber> for u8 {
    fn from(cycle: CycleNumber) -> Self {
        cycle.as_u8()
    }
}

/// Pipeline stage that talks to the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Intent,
    Prompt,
    Response,
    Synthesis,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intent => write!(f, "intent"),
            Self::Prompt => write!(f, "prompt"),
            Self::Response => write!(f, "response"),
            Self::Synthesis => write!(f, "synthesis"),
        }
    }
}

/// Language of templates, fallback messages and shell labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ru")]
    Russian,
}

impl Locale {
    /// Word that ends an interactive session (compared case-insensitively)
    pub fn exit_sentinel(&self) -> &'static str {
        match self {
            Self::English => "exit",
            Self::Russian => "выход",
        }
    }

    /// Check whether a line of user input asks to end the session
    pub fn is_exit_command(&self, line: &str) -> bool {
        line.trim().to_lowercase() == self.exit_sentinel()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::English => write!(f, "en"),
            Self::Russian => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ru" | "russian" => Ok(Self::Russian),
            _ => Err(format!("Invalid locale: {}. Use en or ru.", s)),
        }
    }
}

/// Output of one refinement cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Intent formulated by the intent-analysis stage
    pub intent: String,
    /// Normalized, validated prompt
    pub prompt: String,
    /// Response text (may be a degraded error placeholder)
    pub response: String,
}

/// Output of one pipeline turn
///
/// `cycles` is either empty (short-circuited turn) or holds exactly three
/// results where index `i` belongs to cycle `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub cycles: Vec<CycleResult>,
    pub synthesis: String,
}

impl PipelineResult {
    /// Result for a turn that made no generation calls
    pub fn short_circuit(message: impl Into<String>) -> Self {
        Self {
            cycles: Vec::new(),
            synthesis: message.into(),
        }
    }

    /// Whether the turn was short-circuited
    pub fn is_short_circuit(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Result of a given cycle, if the turn ran the cycles
    pub fn cycle(&self, cycle: CycleNumber) -> Option<&CycleResult> {
        self.cycles.get(cycle.index())
    }
}
