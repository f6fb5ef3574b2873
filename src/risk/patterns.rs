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

//! Risk pattern definitions
//!
//! This module contains the pattern library used by [`crate::risk::RiskEngine`].
//! A pattern is pure data: id, dimension, weight, description and a matcher.
//! Matchers come in two forms:
//! - **Regex** over the raw command string (catches pipes, redirects and
//!   anything the tokenizer does not model). Case is ignored, like command
//!   names, unless a custom pattern opts out.
//! - **Token rules** over every command in the line: wrapped commands and
//!   commands chained with `;`, `&&`, `||` or `|` included
//!
//! # Weight Calibration
//!
//! | Dimension            | Typical range | Top of range                     |
//! |----------------------|---------------|----------------------------------|
//! | file-operation       | 15-40         | recursive forced rm              |
//! | system-operation     | 10-80         | fork bomb                        |
//! | network-operation    | 10-60         | reverse shell                    |
//! | privilege-escalation | 25-45         | sudoers edits                    |
//! | destructive          | 15-40         | SQL DROP                         |
//! | irreversible         | 40-70         | disk format, raw device writes   |

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::error;

use crate::config::ConfigError;
use crate::core::ParsedCommand;
use crate::risk::types::RiskDimension;

/// A single risk detection rule
#[derive(Clone, Debug)]
pub struct RiskPattern {
    pub id: String,
    pub dimension: RiskDimension,
    pub matcher: Matcher,
    /// Contribution to the score, 1-100
    pub weight: u8,
    pub description: String,
}

impl RiskPattern {
    /// Builds a regex pattern that ignores case
    ///
    /// # Errors
    /// `ConfigError::InvalidRegex` if `expr` does not compile.
    pub fn regex(
        id: &str,
        dimension: RiskDimension,
        weight: u8,
        description: &str,
        expr: &str,
    ) -> Result<Self, ConfigError> {
        Self::compiled(id, dimension, weight, description, expr, true)
    }

    /// Builds a regex pattern that matches case exactly
    ///
    /// # Errors
    /// `ConfigError::InvalidRegex` if `expr` does not compile.
    pub fn regex_case_sensitive(
        id: &str,
        dimension: RiskDimension,
        weight: u8,
        description: &str,
        expr: &str,
    ) -> Result<Self, ConfigError> {
        Self::compiled(id, dimension, weight, description, expr, false)
    }

    fn compiled(
        id: &str,
        dimension: RiskDimension,
        weight: u8,
        description: &str,
        expr: &str,
        ignore_case: bool,
    ) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(expr)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|source| ConfigError::InvalidRegex {
                id: id.to_string(),
                source,
            })?;

        Ok(Self {
            id: id.to_string(),
            dimension,
            matcher: Matcher::Regex(regex),
            weight,
            description: description.to_string(),
        })
    }

    /// Builds a token-rule pattern
    pub fn tokens(
        id: &str,
        dimension: RiskDimension,
        weight: u8,
        description: &str,
        rule: TokenRule,
    ) -> Self {
        Self {
            id: id.to_string(),
            dimension,
            matcher: Matcher::Tokens(rule),
            weight,
            description: description.to_string(),
        }
    }

    /// Returns true when the pattern fires for `parsed`
    pub fn matches(&self, parsed: &ParsedCommand) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(&parsed.raw),
            Matcher::Tokens(rule) => parsed.layers().any(|layer| rule.matches(layer)),
        }
    }
}

/// Predicate over a parsed command
#[derive(Clone, Debug)]
pub enum Matcher {
    /// Matches anywhere in the raw command string
    Regex(Regex),
    /// Matches the structure of any command the line runs
    Tokens(TokenRule),
}

/// Declarative token-level rule
///
/// Every non-empty field must be satisfied; empty fields are unconstrained.
///
/// ```toml
/// commands = ["rm"]
/// flags = [["-r", "-R", "--recursive"], ["-f", "--force"]]
/// args = ["/"]
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TokenRule {
    /// Program name is one of these
    pub commands: Vec<String>,
    /// Subcommand is one of these
    pub subcommands: Vec<String>,
    /// Each group needs at least one of its flags present
    pub flags: Vec<Vec<String>>,
    /// Some argument equals one of these
    pub args: Vec<String>,
    /// Some argument is one of these paths or lies below it
    /// (`/dev` covers `/dev` and `/dev/sda`, not `/development`)
    pub arg_prefixes: Vec<String>,
}

impl TokenRule {
    /// Rule with no constraints
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.subcommands.is_empty()
            && self.flags.is_empty()
            && self.args.is_empty()
            && self.arg_prefixes.is_empty()
    }

    /// Tests this rule against one command layer
    pub fn matches(&self, cmd: &ParsedCommand) -> bool {
        let program = cmd.program();

        (self.commands.is_empty() || self.commands.iter().any(|c| c == program))
            && (self.subcommands.is_empty()
                || cmd
                    .subcommand
                    .as_ref()
                    .is_some_and(|sub| self.subcommands.contains(sub)))
            && self
                .flags
                .iter()
                .all(|group| group.iter().any(|flag| cmd.has_flag(flag)))
            && (self.args.is_empty() || cmd.args.iter().any(|a| self.args.contains(a)))
            && (self.arg_prefixes.is_empty()
                || cmd
                    .args
                    .iter()
                    .any(|a| self.arg_prefixes.iter().any(|p| is_under(a, p))))
    }
}

/// `path` equals `dir` or continues with a `/` after it
fn is_under(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || dir.ends_with('/'))
}

/// Immutable, ordered set of risk patterns
#[derive(Clone, Debug)]
pub struct PatternLibrary {
    patterns: Vec<RiskPattern>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternLibrary {
    /// The built-in library
    ///
    /// Built-in expressions are fixed at compile time; one that fails to
    /// compile is logged and left out.
    pub fn builtin() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .filter_map(|spec| match spec.to_pattern() {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    error!("Skipping built-in pattern: {}", e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    /// Starts a builder seeded with the built-in patterns
    pub fn builder() -> LibraryBuilder {
        let library = Self::builtin();
        let ids = library.patterns.iter().map(|p| p.id.clone()).collect();
        LibraryBuilder {
            patterns: library.patterns,
            ids,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RiskPattern> {
        self.patterns.iter()
    }

    pub fn get(&self, id: &str) -> Option<&RiskPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Collects and validates patterns before freezing the library
#[derive(Debug, Default)]
pub struct LibraryBuilder {
    patterns: Vec<RiskPattern>,
    ids: HashSet<String>,
}

impl LibraryBuilder {
    /// Builder with no patterns at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a pattern
    ///
    /// # Errors
    /// - `ConfigError::InvalidWeight` when the weight is outside 1-100
    /// - `ConfigError::EmptyRule` for a token rule with no constraints
    /// - `ConfigError::DuplicatePatternId` when the id is already taken
    pub fn pattern(mut self, pattern: RiskPattern) -> Result<Self, ConfigError> {
        if !(1..=100).contains(&pattern.weight) {
            return Err(ConfigError::InvalidWeight {
                id: pattern.id,
                weight: u32::from(pattern.weight),
            });
        }
        if let Matcher::Tokens(rule) = &pattern.matcher {
            if rule.is_empty() {
                return Err(ConfigError::EmptyRule(pattern.id));
            }
        }
        if !self.ids.insert(pattern.id.clone()) {
            return Err(ConfigError::DuplicatePatternId(pattern.id));
        }

        self.patterns.push(pattern);
        Ok(self)
    }

    /// Freezes the library
    pub fn build(self) -> PatternLibrary {
        PatternLibrary {
            patterns: self.patterns,
        }
    }
}

// ========================================================================
// Built-in pattern table
// ========================================================================

pub(crate) struct BuiltinPattern {
    pub(crate) id: &'static str,
    pub(crate) dimension: RiskDimension,
    pub(crate) weight: u8,
    pub(crate) description: &'static str,
    pub(crate) matcher: BuiltinMatcher,
}

pub(crate) enum BuiltinMatcher {
    Regex(&'static str),
    Tokens(Rule),
}

/// Compile-time form of [`TokenRule`]
#[derive(Clone, Copy)]
pub(crate) struct Rule {
    commands: &'static [&'static str],
    subcommands: &'static [&'static str],
    flags: &'static [&'static [&'static str]],
    args: &'static [&'static str],
    arg_prefixes: &'static [&'static str],
}

const fn cmd(commands: &'static [&'static str]) -> Rule {
    Rule {
        commands,
        subcommands: &[],
        flags: &[],
        args: &[],
        arg_prefixes: &[],
    }
}

impl Rule {
    const fn sub(self, subcommands: &'static [&'static str]) -> Self {
        Rule { subcommands, ..self }
    }

    const fn flags(self, flags: &'static [&'static [&'static str]]) -> Self {
        Rule { flags, ..self }
    }

    const fn args(self, args: &'static [&'static str]) -> Self {
        Rule { args, ..self }
    }

    const fn prefixes(self, arg_prefixes: &'static [&'static str]) -> Self {
        Rule { arg_prefixes, ..self }
    }

    fn to_token_rule(self) -> TokenRule {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        TokenRule {
            commands: owned(self.commands),
            subcommands: owned(self.subcommands),
            flags: self.flags.iter().map(|group| owned(group)).collect(),
            args: owned(self.args),
            arg_prefixes: owned(self.arg_prefixes),
        }
    }
}

impl BuiltinPattern {
    fn to_pattern(&self) -> Result<RiskPattern, ConfigError> {
        match &self.matcher {
            BuiltinMatcher::Regex(expr) => RiskPattern::regex(
                self.id,
                self.dimension,
                self.weight,
                self.description,
                expr,
            ),
            BuiltinMatcher::Tokens(rule) => Ok(RiskPattern::tokens(
                self.id,
                self.dimension,
                self.weight,
                self.description,
                rule.to_token_rule(),
            )),
        }
    }
}

const RECURSIVE: &[&str] = &["-r", "-R", "--recursive"];
const FORCE: &[&str] = &["-f", "--force"];
const MODIFYING: &[&str] = &[
    "rm", "mv", "cp", "chmod", "chown", "chgrp", "ln", "tee", "truncate", "touch", "rmdir",
    "shred",
];
const SYSTEM_DIRS: &[&str] = &[
    "/etc", "/boot", "/usr", "/bin", "/sbin", "/lib", "/var", "/root", "/sys", "/proc", "/dev",
];

macro_rules! builtin {
    ($id:literal, $dim:ident, $weight:literal, $desc:literal, regex $expr:expr) => {
        BuiltinPattern {
            id: $id,
            dimension: RiskDimension::$dim,
            weight: $weight,
            description: $desc,
            matcher: BuiltinMatcher::Regex($expr),
        }
    };
    ($id:literal, $dim:ident, $weight:literal, $desc:literal, tokens $rule:expr) => {
        BuiltinPattern {
            id: $id,
            dimension: RiskDimension::$dim,
            weight: $weight,
            description: $desc,
            matcher: BuiltinMatcher::Tokens($rule),
        }
    };
}

/// Built-in patterns, grouped by dimension
pub(crate) const BUILTIN_PATTERNS: &[BuiltinPattern] = &[
    // --- file-operation ---
    builtin!("file.recursive-force-delete", FileOperation, 40,
        "Recursively force-deletes files without prompting",
        tokens cmd(&["rm"]).flags(&[RECURSIVE, FORCE])),
    builtin!("file.recursive-delete", FileOperation, 30,
        "Recursively deletes a directory tree",
        tokens cmd(&["rm"]).flags(&[RECURSIVE])),
    builtin!("file.delete", FileOperation, 15,
        "Deletes files or directories",
        tokens cmd(&["rm", "rmdir", "unlink", "del", "erase"])),
    builtin!("file.world-writable", FileOperation, 35,
        "Makes files writable by every user on the system",
        regex r"(?:^|[\s;&|(])chmod\s+(?:-\S+\s+)*(?:0?777|a\+rwx|[ao]\+w)(?:\s|$)"),
    builtin!("file.recursive-ownership", FileOperation, 25,
        "Recursively changes ownership or permissions",
        tokens cmd(&["chmod", "chown", "chgrp"]).flags(&[&["-R", "--recursive"]])),
    builtin!("file.system-path-modify", FileOperation, 30,
        "Modifies files under a system directory",
        tokens cmd(MODIFYING).prefixes(SYSTEM_DIRS)),
    builtin!("file.system-path-redirect", FileOperation, 30,
        "Redirects output over a file in a system directory",
        regex r">\s*/(?:etc|boot|usr|bin|sbin|lib)/"),
    builtin!("file.permission-lockout", FileOperation, 35,
        "Removes every permission, locking all users out of the files",
        regex r"(?:^|[\s;&|(])chmod\s+(?:-\S+\s+)*(?:0?000|a-rwx|[augo]*=)(?:\s|$)"),
    builtin!("file.home-path-modify", FileOperation, 20,
        "Modifies files in users' home directories",
        tokens cmd(MODIFYING).prefixes(&["/home", "/Users"])),
    builtin!("file.windows-system-path", FileOperation, 30,
        "Touches the Windows system or program directories",
        regex r"\b[a-z]:[\\/]+(?:windows|program files(?: \(x86\))?)\b"),

    // --- destructive ---
    builtin!("destructive.recursive-delete", Destructive, 35,
        "Deletes a whole directory tree in one step, with no undo",
        tokens cmd(&["rm"]).flags(&[RECURSIVE])),
    builtin!("destructive.forced-delete", Destructive, 30,
        "Deletes files without confirmation, ignoring errors",
        tokens cmd(&["rm"]).flags(&[FORCE])),
    builtin!("destructive.sql-drop", Destructive, 40,
        "Drops or truncates database objects",
        regex r"\b(?:drop\s+(?:table|database|schema)|truncate\s+table)\b"),
    builtin!("destructive.sql-delete", Destructive, 30,
        "Deletes rows from a database table",
        regex r"\bdelete\s+from\b"),
    builtin!("destructive.sql-update", Destructive, 25,
        "Rewrites rows of a database table in place",
        regex r"\bupdate\s+\S+\s+set\b"),
    builtin!("destructive.git-reset-hard", Destructive, 35,
        "Discards uncommitted changes in the working tree",
        tokens cmd(&["git"]).sub(&["reset"]).flags(&[&["--hard"]])),
    builtin!("destructive.git-clean", Destructive, 35,
        "Deletes untracked files from the working tree",
        tokens cmd(&["git"]).sub(&["clean"]).flags(&[FORCE])),
    builtin!("destructive.git-branch-force-delete", Destructive, 20,
        "Force-deletes a branch even if it is not merged",
        tokens cmd(&["git"]).sub(&["branch"]).flags(&[&["-D"]])),
    builtin!("destructive.container-force-remove", Destructive, 30,
        "Force-removes containers or images",
        tokens cmd(&["docker", "podman"]).sub(&["rm", "rmi"]).flags(&[FORCE])),
    builtin!("destructive.container-prune", Destructive, 30,
        "Prunes container resources in bulk",
        tokens cmd(&["docker", "podman"]).sub(&["system", "volume", "image", "container",
            "network"]).args(&["prune"])),
    builtin!("destructive.kubectl-delete", Destructive, 30,
        "Deletes Kubernetes resources",
        tokens cmd(&["kubectl"]).sub(&["delete"])),
    builtin!("destructive.package-removal", Destructive, 20,
        "Removes installed system packages",
        tokens cmd(&["apt", "apt-get", "yum", "dnf", "zypper", "apk", "snap", "brew"])
            .sub(&["remove", "purge", "autoremove", "erase", "uninstall", "del"])),
    builtin!("destructive.package-uninstall", Destructive, 15,
        "Uninstalls language packages",
        tokens cmd(&["npm", "pip", "pip3", "yarn", "pnpm", "cargo", "gem"])
            .sub(&["uninstall", "remove", "rm"])),
    builtin!("destructive.forced-reinstall", Destructive, 20,
        "Forces packages over the installed versions",
        tokens cmd(&["pip", "pip3", "npm", "pnpm"]).sub(&["install", "i"])
            .flags(&[&["--force-reinstall", "--force"]])),
    builtin!("destructive.crontab-remove", Destructive, 30,
        "Removes the user's entire crontab",
        tokens cmd(&["crontab"]).flags(&[&["-r"]])),
    builtin!("destructive.find-delete", Destructive, 30,
        "Deletes every file matched by find",
        regex r"\bfind\b.*(?:\s-delete\b|\s-exec\s+rm\b)"),
    builtin!("destructive.truncate", Destructive, 20,
        "Truncates file contents",
        tokens cmd(&["truncate"])),

    // --- irreversible ---
    builtin!("irreversible.root-delete", Irreversible, 60,
        "Recursively deletes the entire filesystem from the root directory",
        tokens cmd(&["rm"]).flags(&[RECURSIVE]).args(&["/", "/*"])),
    builtin!("irreversible.workdir-delete", Irreversible, 50,
        "Recursively deletes the current, parent or home directory",
        tokens cmd(&["rm"]).flags(&[RECURSIVE])
            .args(&[".", "./", "./*", "..", "*", "~", "~/", "~/*", "$HOME"])),
    builtin!("irreversible.root-permission-change", Irreversible, 60,
        "Recursively changes permissions across the entire filesystem",
        tokens cmd(&["chmod", "chown", "chgrp"]).flags(&[&["-R", "--recursive"]]).args(&["/"])),
    builtin!("irreversible.disk-format", Irreversible, 70,
        "Formats a device, destroying all data on it",
        regex r"(?:^|[\s;&|(])(?:mkfs(?:\.\w+)?|wipefs|mkswap)\b"),
    builtin!("irreversible.disk-overwrite", Irreversible, 70,
        "Writes raw data over a disk device",
        regex concat!(r"\bdd\b.*\bof=", r"/dev/(?:sd[a-z]|nvme\d|hd[a-z]|vd[a-z]|xvd[a-z]|mmcblk\d|disk\d)")),
    builtin!("irreversible.device-redirect", Irreversible, 70,
        "Redirects output onto a raw disk device",
        regex concat!(r">\s*", r"/dev/(?:sd[a-z]|nvme\d|hd[a-z]|vd[a-z]|xvd[a-z]|mmcblk\d|disk\d)")),
    builtin!("irreversible.partition-table", Irreversible, 40,
        "Edits the disk partition table",
        tokens cmd(&["fdisk", "sfdisk", "gdisk", "parted"])),
    builtin!("irreversible.secure-wipe", Irreversible, 45,
        "Overwrites file contents so they cannot be recovered",
        tokens cmd(&["shred", "srm", "wipe"])),
    builtin!("irreversible.git-force-push", Irreversible, 55,
        "Force-push overwrites history on the remote",
        tokens cmd(&["git"]).sub(&["push"]).flags(&[FORCE])),
    builtin!("irreversible.git-force-refspec", Irreversible, 55,
        "Pushes a forced (+) refspec, overwriting history on the remote",
        regex r"\bgit\s+push\b.*\s\+\S+"),
    builtin!("irreversible.git-history-rewrite", Irreversible, 40,
        "Rewrites repository history",
        tokens cmd(&["git"]).sub(&["filter-branch", "filter-repo"])),
    builtin!("irreversible.windows-format", Irreversible, 70,
        "Formats a Windows drive",
        regex r"\bformat\s+[a-z]:"),
    builtin!("irreversible.windows-recursive-delete", Irreversible, 45,
        "Recursively deletes files on Windows without confirmation",
        regex r"\b(?:del|erase|rd|rmdir)\b.*\s/[sq]\b"),

    // --- system-operation ---
    builtin!("system.fork-bomb", SystemOperation, 80,
        "Fork bomb: spawns processes until the system hangs",
        regex r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:"),
    builtin!("system.power-state", SystemOperation, 35,
        "Shuts down or restarts the machine",
        tokens cmd(&["shutdown", "reboot", "halt", "poweroff"])),
    builtin!("system.runlevel-change", SystemOperation, 35,
        "Switches the init runlevel to halt or reboot",
        regex r"\b(?:init|telinit)\s+[06]\b"),
    builtin!("system.service-control", SystemOperation, 25,
        "Stops, restarts or disables system services",
        tokens cmd(&["systemctl"]).sub(&["stop", "disable", "mask", "kill", "restart", "isolate"])),
    builtin!("system.service-stop", SystemOperation, 25,
        "Stops or restarts a system service",
        regex r"\bservice\s+\S+\s+(?:stop|restart)\b"),
    builtin!("system.kernel-module", SystemOperation, 30,
        "Loads or unloads kernel modules",
        tokens cmd(&["insmod", "rmmod", "modprobe"])),
    builtin!("system.kernel-parameter", SystemOperation, 25,
        "Changes kernel parameters at runtime",
        tokens cmd(&["sysctl"]).flags(&[&["-w", "--write"]])),
    builtin!("system.raw-device-access", SystemOperation, 30,
        "Accesses a raw block or memory device",
        regex r"/dev/(?:sd[a-z]|nvme\d|hd[a-z]|vd[a-z]|xvd[a-z]|mmcblk\d|disk\d|mem\b|kmem\b|port\b)"),
    builtin!("system.kill-everything", SystemOperation, 40,
        "Signals every process the user can reach",
        regex r"\bkill\s+(?:-9\s+|-KILL\s+|-s\s+KILL\s+)?-1\b"),
    builtin!("system.mass-kill", SystemOperation, 20,
        "Kills processes by name pattern",
        tokens cmd(&["killall", "pkill"])),
    builtin!("system.mount", SystemOperation, 20,
        "Mounts or unmounts filesystems",
        tokens cmd(&["mount", "umount"])),
    builtin!("system.package-install", SystemOperation, 15,
        "Installs or upgrades system packages",
        tokens cmd(&["apt", "apt-get", "yum", "dnf", "zypper", "apk", "snap", "brew"])
            .sub(&["install", "upgrade", "dist-upgrade", "full-upgrade", "add"])),
    builtin!("system.global-package-install", SystemOperation, 15,
        "Installs a language package globally",
        tokens cmd(&["npm", "yarn", "pnpm"]).sub(&["install", "i", "add"])
            .flags(&[&["-g", "--global"]])),
    builtin!("system.language-package-install", SystemOperation, 10,
        "Installs language packages and runs their install hooks",
        tokens cmd(&["pip", "pip3", "pipx", "gem", "cargo"]).sub(&["install"])),
    builtin!("system.cluster-apply", SystemOperation, 20,
        "Applies configuration changes to a Kubernetes cluster",
        tokens cmd(&["kubectl"]).sub(&["apply", "replace", "patch", "scale"])),

    // --- network-operation ---
    builtin!("network.pipe-to-shell", NetworkOperation, 50,
        "Downloads a script and executes it immediately",
        regex r"\b(?:curl|wget|fetch)\b.*\|\s*(?:sudo\s+)?(?:ba|z|k|da|fi)?sh\b"),
    builtin!("network.reverse-shell", NetworkOperation, 60,
        "Possible reverse shell: connects a shell to a remote host",
        regex r"/dev/tcp/|\b(?:nc|ncat|netcat)\b.*\s-[ec]\s"),
    builtin!("network.firewall-disable", NetworkOperation, 45,
        "Disables firewall or mandatory access control protection",
        regex r"\biptables\s+(?:-t\s+\S+\s+)?(?:-F|--flush|-X)\b|\bufw\s+disable\b|\bsetenforce\s+0\b|\bsystemctl\s+(?:stop|disable)\s+(?:firewalld|ufw|nftables|iptables)\b|\bnft\s+flush\s+ruleset\b"),
    builtin!("network.data-upload", NetworkOperation, 30,
        "Sends local data to a remote host",
        tokens cmd(&["curl"]).flags(&[&["-d", "--data", "--data-binary", "--data-raw",
            "-F", "--form", "-T", "--upload-file"]])),
    builtin!("network.listener", NetworkOperation, 30,
        "Opens a listening network socket",
        tokens cmd(&["nc", "ncat", "netcat"]).flags(&[&["-l", "--listen"]])),
    builtin!("network.http-server", NetworkOperation, 25,
        "Serves the current directory over HTTP",
        regex r"\bpython3?\s+-m\s+http\.server\b"),
    builtin!("network.file-transfer", NetworkOperation, 20,
        "Transfers files to or from another host",
        tokens cmd(&["scp", "rsync", "sftp", "ftp"])),
    builtin!("network.download", NetworkOperation, 10,
        "Downloads content from the network",
        tokens cmd(&["curl", "wget", "aria2c"])),
    builtin!("network.repository-fetch", NetworkOperation, 10,
        "Fetches code from a remote repository",
        tokens cmd(&["git"]).sub(&["clone", "pull", "fetch"])),
    builtin!("network.remote-url", NetworkOperation, 10,
        "Contacts a remote URL",
        regex r"\b(?:https?|ftps?)://"),
    builtin!("network.remote-login", NetworkOperation, 10,
        "Opens a remote login session",
        tokens cmd(&["ssh", "telnet"])),

    // --- privilege-escalation ---
    builtin!("privilege.elevation", PrivilegeEscalation, 25,
        "Runs with administrator privileges",
        tokens cmd(&["sudo", "doas", "pkexec", "su", "runas"])),
    builtin!("privilege.user-management", PrivilegeEscalation, 30,
        "Modifies user accounts or group membership",
        tokens cmd(&["useradd", "usermod", "userdel", "adduser", "deluser", "groupadd",
            "groupdel", "gpasswd", "passwd", "chpasswd"])),
    builtin!("privilege.sudoers", PrivilegeEscalation, 45,
        "Modifies sudo privilege configuration",
        regex r"/etc/sudoers|\bvisudo\b"),
    builtin!("privilege.setuid", PrivilegeEscalation, 40,
        "Sets the setuid or setgid bit",
        regex r"\bchmod\s+(?:-\S+\s+)*(?:[ugoa]*\+[rwxt]*s|[2467][0-7]{3})\b"),
    builtin!("privilege.privileged-container", PrivilegeEscalation, 35,
        "Runs a container with full host privileges",
        regex r"\b(?:docker|podman)\s+run\b.*--privileged"),
    builtin!("privilege.shadow-files", PrivilegeEscalation, 35,
        "Touches password hash files",
        regex r"/etc/g?shadow\b"),
    builtin!("privilege.ssh-authorized-keys", PrivilegeEscalation, 30,
        "Touches SSH authorized keys",
        regex r"authorized_keys"),
];
