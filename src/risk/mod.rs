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

//! Multi-dimensional risk assessment
//!
//! Scores a [`ParsedCommand`] against a [`PatternLibrary`]:
//!
//! 1. Every pattern is tested against the command
//! 2. Per dimension, only the heaviest firing pattern counts
//! 3. The per-dimension maxima are summed and clamped to 100
//! 4. The score maps to a [`RiskLevel`]
//!
//! Taking the max inside a dimension keeps overlapping patterns
//! (`rm -rf` fires both "recursive delete" and "recursive force delete")
//! from double counting, while summing across dimensions lets independent
//! dangers compound.
//!
//! # Example
//!
//! ```
//! use cmd_risk_inspector::core::parse;
//! use cmd_risk_inspector::risk::{assess, RiskLevel};
//!
//! let parsed = parse("rm -rf /")?;
//! let assessment = assess(&parsed);
//! assert_eq!(assessment.level, RiskLevel::Critical);
//! assert_eq!(assessment.score, 100);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod patterns;
pub mod types;

pub use patterns::{LibraryBuilder, Matcher, PatternLibrary, RiskPattern, TokenRule};
pub use types::{RiskAssessment, RiskDimension, RiskFactor, RiskLevel};

use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::core::ParsedCommand;

const MAX_SCORE: u32 = 100;
const NO_FACTORS_SUMMARY: &str = "No elevated risk indicators";

static DEFAULT_ENGINE: LazyLock<RiskEngine> = LazyLock::new(RiskEngine::default);

/// Assesses a command with the built-in pattern library
pub fn assess(parsed: &ParsedCommand) -> RiskAssessment {
    DEFAULT_ENGINE.assess(parsed)
}

/// Scores commands against an immutable pattern library
///
/// The engine holds no mutable state, so one instance can be shared across
/// threads and assess any number of commands concurrently.
#[derive(Clone, Debug, Default)]
pub struct RiskEngine {
    library: PatternLibrary,
}

impl RiskEngine {
    pub fn new(library: PatternLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Assesses one parsed command
    ///
    /// Deterministic: the same command and library always produce the same
    /// assessment, factor order included.
    pub fn assess(&self, parsed: &ParsedCommand) -> RiskAssessment {
        let mut winners: BTreeMap<_, &RiskPattern> = BTreeMap::new();

        for pattern in self.library.iter().filter(|p| p.matches(parsed)) {
            debug!(
                pattern = %pattern.id,
                dimension = %pattern.dimension,
                weight = pattern.weight,
                "pattern matched"
            );

            winners
                .entry(pattern.dimension)
                .and_modify(|current: &mut &RiskPattern| {
                    if outranks(pattern, current) {
                        *current = pattern;
                    }
                })
                .or_insert(pattern);
        }

        let total: u32 = winners.values().map(|p| u32::from(p.weight)).sum();
        let score = u8::try_from(total.min(MAX_SCORE)).unwrap_or(u8::MAX);
        let level = RiskLevel::from_score(score);

        let mut factors: Vec<RiskFactor> = winners
            .into_values()
            .map(|p| RiskFactor {
                dimension: p.dimension,
                pattern_id: p.id.clone(),
                description: p.description.clone(),
                weight: p.weight,
            })
            .collect();
        factors.sort_by(|a, b| {
            b.weight
                .cmp(&a.weight)
                .then(a.dimension.cmp(&b.dimension))
                .then_with(|| a.pattern_id.cmp(&b.pattern_id))
        });

        let summary = summarize(level, &factors);
        debug!(command = %parsed.raw, score, %level, "assessment complete");

        RiskAssessment {
            level,
            score,
            factors,
            summary,
        }
    }
}

/// Heavier wins; equal weights go to the lexicographically smaller id
fn outranks(candidate: &RiskPattern, current: &RiskPattern) -> bool {
    candidate.weight > current.weight
        || (candidate.weight == current.weight && candidate.id < current.id)
}

fn summarize(level: RiskLevel, factors: &[RiskFactor]) -> String {
    match factors {
        [] => NO_FACTORS_SUMMARY.to_string(),
        [top] => format!("{}: {}", level.display_name(), top.description),
        [top, rest @ ..] => format!(
            "{}: {} (+{} more)",
            level.display_name(),
            top.description,
            rest.len()
        ),
    }
}

#[cfg(test)]
mod tests;
