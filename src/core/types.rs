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

//! src/core/types.rs
//!
//! Core type definitions for command inspection
//!
//! This module defines the structured view of a command line:
//! - `CommandCategory`: Coarse classification of a command name
//! - `ParsedCommand`: Tokenized command (name, subcommand, flags, args),
//!   plus the commands it wraps or is chained with
//!
//! Both types are plain immutable values. They serialise to JSON so the
//! explanation and presentation layers can consume them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coarse classification of a command name
///
/// Resolved through a static registry lookup. `Unknown` is not an error,
/// it only narrows which heuristics apply.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandCategory {
    /// Built into the shell (cd, echo, export)
    ShellBuiltin,
    /// Installs or removes software (apt, npm, pip)
    PackageManager,
    /// Source control (git, svn, hg)
    VersionControl,
    /// Talks to other hosts (curl, ssh, nc)
    NetworkTool,
    /// Administers the machine (systemctl, mount, useradd)
    SystemAdmin,
    /// Reads or changes files (ls, cp, rm)
    Filesystem,
    /// Not present in the registry
    Unknown,
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CommandCategory::ShellBuiltin => "shell-builtin",
            CommandCategory::PackageManager => "package-manager",
            CommandCategory::VersionControl => "version-control",
            CommandCategory::NetworkTool => "network-tool",
            CommandCategory::SystemAdmin => "system-admin",
            CommandCategory::Filesystem => "filesystem",
            CommandCategory::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// A command line broken into its structural parts
///
/// Produced once per input by [`crate::core::CommandParser`]. The parser
/// guarantees `raw` is non-empty and single-line and `name` is non-empty.
///
/// # Example
/// ```
/// use cmd_risk_inspector::core::{parse, CommandCategory};
///
/// let parsed = parse("git push --force origin main").unwrap();
/// assert_eq!(parsed.name, "git");
/// assert_eq!(parsed.subcommand.as_deref(), Some("push"));
/// assert!(parsed.has_flag("--force"));
/// assert_eq!(parsed.args, vec!["origin", "main"]);
/// assert_eq!(parsed.category, CommandCategory::VersionControl);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ParsedCommand {
    /// Original input, trimmed
    pub raw: String,
    /// First token, lower-cased
    pub name: String,
    /// Second token for multi-word command families (`git push`)
    pub subcommand: Option<String>,
    /// Tokens starting with `-`
    pub flags: BTreeSet<String>,
    /// Remaining tokens in their original order
    pub args: Vec<String>,
    /// Registry classification of `name`
    pub category: CommandCategory,
    /// Command launched by a wrapper such as `sudo` or `nohup`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<Box<ParsedCommand>>,
    /// Commands that follow on the same line after `;`, `&&`, `||` or `|`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chained: Vec<ParsedCommand>,
}

impl ParsedCommand {
    /// Program name without any leading directory (`/bin/rm` → `rm`)
    pub fn program(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Command name including the subcommand, if any (`git push`)
    pub fn full_command(&self) -> String {
        match &self.subcommand {
            Some(sub) => format!("{} {}", self.name, sub),
            None => self.name.clone(),
        }
    }

    /// Checks whether a flag is present
    ///
    /// Understands the usual spellings:
    /// - exact match (`--force`, `-f`)
    /// - clustered short flags (`-rf` contains `-r` and `-f`)
    /// - long flags carrying a value (`--output=file` contains `--output`)
    pub fn has_flag(&self, flag: &str) -> bool {
        if self.flags.contains(flag) {
            return true;
        }

        if let Some(long) = flag.strip_prefix("--") {
            return self.flags.iter().any(|f| {
                f.strip_prefix("--")
                    .and_then(|rest| rest.split_once('='))
                    .is_some_and(|(name, _)| name == long)
            });
        }

        let mut chars = flag.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('-'), Some(short), None) if short != '-' => self.flags.iter().any(|f| {
                f.strip_prefix('-')
                    .is_some_and(|cluster| !cluster.starts_with('-') && cluster.contains(short))
            }),
            _ => false,
        }
    }

    /// Positional argument at `index`, if present
    pub fn arg_at(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Innermost command after unwrapping `sudo`, `nohup` and friends
    pub fn effective(&self) -> &ParsedCommand {
        let mut current = self;
        while let Some(inner) = &current.wrapped {
            current = inner;
        }
        current
    }

    /// Iterates over every command the line runs
    ///
    /// Yields this command and the commands it wraps, outermost first, then
    /// the same for each chained command in line order.
    pub fn layers(&self) -> impl Iterator<Item = &ParsedCommand> {
        let mut layers = Vec::new();
        self.collect_layers(&mut layers);
        layers.into_iter()
    }

    fn collect_layers<'a>(&'a self, out: &mut Vec<&'a ParsedCommand>) {
        out.extend(std::iter::successors(Some(self), |cmd| cmd.wrapped.as_deref()));
        for next in &self.chained {
            next.collect_layers(out);
        }
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
