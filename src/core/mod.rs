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

//! src/core/mod.rs
//!
//! Structural parsing of command lines
//!
//! This module contains the leaf component of the pipeline:
//! - Type definitions for parsed commands and command categories
//! - The static name → category registry
//! - The nom-based tokenizer and parser
//!
//! Nothing here performs I/O, so every piece is unit-testable in isolation.

pub mod parser;
pub mod registry;
pub mod types;

pub use parser::{parse, split_commands, tokenize, CommandParser, ParseError};
pub use registry::{CommandRegistry, RegistryBuilder};
pub use types::*;

#[cfg(test)]
mod tests;
