// Copyright 2025 bakri (tidynest@proton.me)
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

//! Command Risk Inspector
//!
//! Inspects a shell command line before it runs and reports how dangerous
//! it is. Nothing is ever executed.
//!
//! # Features
//!
//! - **Structural Parsing:** Quote-aware tokenizer, subcommands, flags,
//!   arguments and command categories
//! - **Wrapper Unwrapping:** `sudo`, `nohup`, `env` and friends are seen
//!   through, so `sudo rm -rf /` is judged as `rm -rf /`
//! - **Command Chains:** Every command after `;`, `&&`, `||` or `|` is
//!   judged too, so `cd / && rm -rf *` is caught
//! - **Multi-Dimensional Scoring:** Six independent risk dimensions,
//!   strongest pattern per dimension, summed and clamped to 0-100
//! - **Declarative Patterns:** Built-in table plus custom regex and
//!   token-rule patterns from a TOML config file
//! - **Optional Explanations:** Pluggable natural-language generator that
//!   never blocks the structural result
//!
//! # Architecture
//!
//! - **`core`:** Types, command registry and parser
//! - **`risk`:** Risk types, pattern library and scoring engine
//! - **`config`:** TOML configuration and merging into built-ins
//! - **`explain`:** Explanation generator boundary
//! - **`logging`:** tracing subscriber setup for the binary
//!
//! The registry and pattern library are immutable once built, so a parser
//! and an engine can be shared freely between threads.
//!
//! # Examples
//!
//! ## Assessing a command
//!
//! ```
//! use cmd_risk_inspector::core::parse;
//! use cmd_risk_inspector::risk::{assess, RiskDimension, RiskLevel};
//!
//! let parsed = parse("sudo rm -rf /")?;
//! let assessment = assess(&parsed);
//!
//! assert_eq!(assessment.level, RiskLevel::Critical);
//! assert!(assessment.involves(RiskDimension::PrivilegeEscalation));
//! println!("{}", assessment.summary);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Using a config file
//!
//! ```no_run
//! use cmd_risk_inspector::config::AppConfig;
//! use std::path::Path;
//!
//! let config = AppConfig::load(Some(Path::new("~/.config/cmd-risk-inspector/config.toml")))?;
//! let parser = config.parser();
//! let engine = config.engine()?;
//!
//! for line in ["git status", "terraform destroy"] {
//!     let parsed = parser.parse(line)?;
//!     println!("{}: {}", line, engine.assess(&parsed).level);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod explain;
pub mod logging;
pub mod risk;

// Re-export commonly used types for convenience
pub use self::core::{parse, CommandCategory, CommandParser, ParseError, ParsedCommand};
pub use risk::{assess, RiskAssessment, RiskDimension, RiskEngine, RiskLevel};
