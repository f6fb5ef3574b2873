// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Risk dimensions, levels and assessment results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Independent axis of danger
///
/// Patterns in the same dimension describe the same kind of danger, so only
/// the strongest one in each dimension counts toward the score.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskDimension {
    /// Deletion, permission changes, writes to system paths
    FileOperation,
    /// Services, kernel modules, power state, raw devices
    SystemOperation,
    /// Transfers, listeners, firewall changes
    NetworkOperation,
    /// sudo, user/group changes, sudoers
    PrivilegeEscalation,
    /// Removes data or state without confirmation
    Destructive,
    /// Cannot be undone by ordinary means
    Irreversible,
}

impl RiskDimension {
    /// All dimensions in display order
    pub const ALL: [RiskDimension; 6] = [
        RiskDimension::FileOperation,
        RiskDimension::SystemOperation,
        RiskDimension::NetworkOperation,
        RiskDimension::PrivilegeEscalation,
        RiskDimension::Destructive,
        RiskDimension::Irreversible,
    ];

    /// Stable kebab-case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskDimension::FileOperation => "file-operation",
            RiskDimension::SystemOperation => "system-operation",
            RiskDimension::NetworkOperation => "network-operation",
            RiskDimension::PrivilegeEscalation => "privilege-escalation",
            RiskDimension::Destructive => "destructive",
            RiskDimension::Irreversible => "irreversible",
        }
    }
}

impl fmt::Display for RiskDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| format!("unknown risk dimension '{}'", s))
    }
}

/// Overall risk level derived from the score
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// score < 20
    Low = 0,
    /// 20 ≤ score < 50
    Medium = 1,
    /// 50 ≤ score < 80
    High = 2,
    /// score ≥ 80
    Critical = 3,
}

impl RiskLevel {
    /// Maps a score to its level
    ///
    /// The thresholds are fixed at this layer.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=19 => RiskLevel::Low,
            20..=49 => RiskLevel::Medium,
            50..=79 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    /// Human-readable level name
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Critical => "Critical",
        }
    }

    /// One-line execution advice for this level
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Low => "No elevated risk found; safe to run as written.",
            RiskLevel::Medium => "Modifies files or system state; review the arguments first.",
            RiskLevel::High => "Significant risk; confirm the target carefully before running.",
            RiskLevel::Critical => "May cause serious, possibly unrecoverable damage. Do NOT run.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            _ => Err(format!("unknown risk level '{}'", s)),
        }
    }
}

/// A pattern that fired and counted toward the score
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RiskFactor {
    pub dimension: RiskDimension,
    pub pattern_id: String,
    pub description: String,
    pub weight: u8,
}

/// Result of assessing one command
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Level derived from `score`
    pub level: RiskLevel,
    /// Sum of per-dimension maxima, clamped to 0-100
    pub score: u8,
    /// Per-dimension winning patterns, heaviest first
    pub factors: Vec<RiskFactor>,
    /// One-line synthesis for display
    pub summary: String,
}

impl RiskAssessment {
    /// True when no pattern fired
    pub fn is_clean(&self) -> bool {
        self.factors.is_empty()
    }

    /// The heaviest factor, if any
    pub fn top_factor(&self) -> Option<&RiskFactor> {
        self.factors.first()
    }

    /// Whether `dimension` contributed to the score
    pub fn involves(&self, dimension: RiskDimension) -> bool {
        self.factors.iter().any(|f| f.dimension == dimension)
    }

    /// Execution advice for the assessed level
    pub fn recommendation(&self) -> &'static str {
        self.level.recommendation()
    }
}
