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

//! Natural-language explanation boundary
//!
//! Explanations are optional enrichment layered on top of an assessment.
//! A generator (typically a language-model client) implements [`Explainer`];
//! [`enrich`] calls it and swallows any failure so the structural result is
//! always delivered.
//!
//! [`LocalExplainer`] is an offline generator built from the parsed command
//! and its risk factors.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ExplainerSettings;
use crate::core::ParsedCommand;
use crate::risk::RiskAssessment;

/// Everything an explanation generator gets to see
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ExplanationRequest<'a> {
    pub command: &'a ParsedCommand,
    pub assessment: &'a RiskAssessment,
    pub recommendation: &'static str,
}

impl<'a> ExplanationRequest<'a> {
    pub fn new(command: &'a ParsedCommand, assessment: &'a RiskAssessment) -> Self {
        Self {
            command,
            assessment,
            recommendation: assessment.recommendation(),
        }
    }

    /// Serialises the request as the JSON payload sent to a generator
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Generated explanation
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Explanation {
    pub summary: String,
    pub description: String,
    pub purpose: String,
    pub parameters: Vec<String>,
    pub examples: Vec<String>,
    pub warnings: Vec<String>,
    pub alternatives: Vec<String>,
}

impl Explanation {
    /// Parses a generator's JSON response; missing fields default to empty
    pub fn from_json(response: &str) -> Result<Self, ExplainError> {
        serde_json::from_str(response).map_err(|e| ExplainError::Failed(e.to_string()))
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ExplainError {
    #[error("Explanation service unavailable")]
    Unavailable,

    #[error("Explanation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Explanation failed: {0}")]
    Failed(String),
}

/// An explanation generator
///
/// Implementations must give up once `timeout` has elapsed and report
/// [`ExplainError::Timeout`].
pub trait Explainer: Send + Sync {
    fn explain(
        &self,
        request: &ExplanationRequest<'_>,
        timeout: Duration,
    ) -> Result<Explanation, ExplainError>;

    /// Whether the generator can be called at all
    fn is_available(&self) -> bool {
        true
    }
}

/// Asks `explainer` for an explanation, never failing
///
/// Returns `None` when explanations are disabled, the generator is
/// unavailable, or the call fails. Failures are logged at warn level.
pub fn enrich(
    explainer: &dyn Explainer,
    request: &ExplanationRequest<'_>,
    settings: &ExplainerSettings,
) -> Option<Explanation> {
    if !settings.enabled {
        debug!("Explanations disabled");
        return None;
    }
    if !explainer.is_available() {
        warn!("Explanation skipped: {}", ExplainError::Unavailable);
        return None;
    }

    match explainer.explain(request, settings.timeout()) {
        Ok(explanation) => Some(explanation),
        Err(e) => {
            warn!(command = %request.command.raw, "Explanation skipped: {}", e);
            None
        }
    }
}

/// Offline explainer that describes a command from its structure
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalExplainer;

impl Explainer for LocalExplainer {
    fn explain(
        &self,
        request: &ExplanationRequest<'_>,
        _timeout: Duration,
    ) -> Result<Explanation, ExplainError> {
        let command = request.command.effective();
        let assessment = request.assessment;

        let mut description = format!(
            "Runs `{}` ({} command)",
            command.full_command(),
            command.category
        );
        if !command.args.is_empty() {
            description.push_str(&format!(" on {}", command.args.join(", ")));
        }
        if !std::ptr::eq(command, request.command) {
            description.push_str(&format!(", launched through `{}`", request.command.name));
        }
        if !request.command.chained.is_empty() {
            let next: Vec<String> = request
                .command
                .chained
                .iter()
                .map(|cmd| format!("`{}`", cmd.effective().full_command()))
                .collect();
            description.push_str(&format!(", then {}", next.join(", ")));
        }

        Ok(Explanation {
            summary: assessment.summary.clone(),
            description,
            purpose: request.recommendation.to_string(),
            parameters: command.flags.iter().cloned().collect(),
            examples: Vec::new(),
            warnings: assessment
                .factors
                .iter()
                .map(|f| format!("[{}] {}", f.dimension, f.description))
                .collect(),
            alternatives: Vec::new(),
        })
    }
}
