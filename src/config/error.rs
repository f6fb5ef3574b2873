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

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration or building the
/// pattern library.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    /// Configuration file is not valid TOML or has the wrong shape.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    /// A pattern's regular expression does not compile.
    #[error("Pattern '{id}' has an invalid regex: {source}")]
    InvalidRegex {
        id: String,
        #[source]
        source: regex::Error,
    },
    /// Pattern weight outside 1-100.
    #[error("Pattern '{id}' has weight {weight}; weights must be between 1 and 100")]
    InvalidWeight { id: String, weight: u32 },
    /// Two patterns share an id.
    #[error("Duplicate pattern id: {0}")]
    DuplicatePatternId(String),
    /// A token rule with no constraints would match every command.
    #[error("Pattern '{0}' has an empty token rule")]
    EmptyRule(String),
    /// A pattern declares neither or both of `regex` and `tokens`.
    #[error("Pattern '{0}' must declare exactly one of `regex` or `tokens`")]
    AmbiguousMatcher(String),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
