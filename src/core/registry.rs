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

//! src/core/registry.rs
//!
//! Static command name registry
//!
//! Maps command names to a [`CommandCategory`] and records two properties
//! the parser needs:
//! - **Multi-word families**: tools whose second token is a subcommand
//!   (`git push`, `apt install`, `docker run`)
//! - **Wrappers**: commands whose arguments form another command
//!   (`sudo rm ...`, `nohup ./server`), and which of their options consume
//!   the following token (`sudo -u admin ...`)
//!
//! The registry is built once (built-ins plus any custom entries from the
//! config file) and is read-only afterwards. Every lookup is a single
//! HashMap or HashSet access.

use std::collections::{HashMap, HashSet};

use crate::core::types::CommandCategory;

/// Immutable name → category lookup table
#[derive(Clone, Debug)]
pub struct CommandRegistry {
    categories: HashMap<String, CommandCategory>,
    multi_word: HashSet<String>,
    wrappers: HashSet<String>,
    wrapper_value_options: HashMap<String, HashSet<String>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommandRegistry {
    /// Registry containing only the built-in tables
    pub fn builtin() -> Self {
        Self {
            categories: build_categories(),
            multi_word: to_set(MULTI_WORD_FAMILIES),
            wrappers: to_set(WRAPPERS),
            wrapper_value_options: WRAPPER_VALUE_OPTIONS
                .iter()
                .map(|(wrapper, options)| (wrapper.to_string(), to_set(options)))
                .collect(),
        }
    }

    /// Starts a builder seeded with the built-in tables
    ///
    /// Custom entries are merged here, during initialisation. Once
    /// [`RegistryBuilder::build`] returns, the registry cannot change.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            registry: Self::builtin(),
        }
    }

    /// Resolves the category of a command name
    ///
    /// Tries the name as given, then its basename (`/usr/bin/curl`), then
    /// the part before the first dot (`mkfs.ext4` → `mkfs`).
    pub fn category_of(&self, name: &str) -> CommandCategory {
        candidates(name)
            .find_map(|c| self.categories.get(c))
            .copied()
            .unwrap_or(CommandCategory::Unknown)
    }

    /// Returns true when the second token of `name` is a subcommand
    pub fn is_multi_word(&self, name: &str) -> bool {
        candidates(name).any(|c| self.multi_word.contains(c))
    }

    /// Returns true when `name` launches the command given in its arguments
    pub fn is_wrapper(&self, name: &str) -> bool {
        candidates(name).any(|c| self.wrappers.contains(c))
    }

    /// Returns true when `option` of `wrapper` takes the next token as its value
    ///
    /// `sudo -u admin rm` launches `rm`, not `admin`. Attached values
    /// (`-uadmin`, `--user=admin`) are a single token and never match.
    pub fn takes_value(&self, wrapper: &str, option: &str) -> bool {
        candidates(wrapper)
            .find_map(|c| self.wrapper_value_options.get(c))
            .is_some_and(|options| options.contains(option))
    }

    /// Number of names with a known category
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true when no categories are registered
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Collects custom registry entries before freezing the table
#[derive(Debug)]
pub struct RegistryBuilder {
    registry: CommandRegistry,
}

impl RegistryBuilder {
    /// Adds or overrides the category of a command name
    pub fn category(mut self, name: &str, category: CommandCategory) -> Self {
        self.registry
            .categories
            .insert(name.trim().to_lowercase(), category);
        self
    }

    /// Registers a multi-word command family
    pub fn multi_word(mut self, name: &str) -> Self {
        self.registry.multi_word.insert(name.trim().to_lowercase());
        self
    }

    /// Registers a wrapper command
    pub fn wrapper(mut self, name: &str) -> Self {
        self.registry.wrappers.insert(name.trim().to_lowercase());
        self
    }

    /// Marks an option of a wrapper as consuming the following token
    pub fn wrapper_option(mut self, wrapper: &str, option: &str) -> Self {
        self.registry
            .wrapper_value_options
            .entry(wrapper.trim().to_lowercase())
            .or_default()
            .insert(option.trim().to_string());
        self
    }

    /// Freezes the registry
    pub fn build(self) -> CommandRegistry {
        self.registry
    }
}

/// Lookup candidates for a name: as given, basename, stem before first dot
fn candidates(name: &str) -> impl Iterator<Item = &str> {
    let base = name.rsplit('/').next().unwrap_or(name);
    let stem = base.split('.').next().unwrap_or(base);
    [name, base, stem].into_iter().filter(|c| !c.is_empty())
}

fn to_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn build_categories() -> HashMap<String, CommandCategory> {
    let groups: [(&[&str], CommandCategory); 6] = [
        (SHELL_BUILTINS, CommandCategory::ShellBuiltin),
        (PACKAGE_MANAGERS, CommandCategory::PackageManager),
        (VERSION_CONTROL, CommandCategory::VersionControl),
        (NETWORK_TOOLS, CommandCategory::NetworkTool),
        (SYSTEM_ADMIN, CommandCategory::SystemAdmin),
        (FILESYSTEM, CommandCategory::Filesystem),
    ];

    groups
        .into_iter()
        .flat_map(|(names, category)| names.iter().map(move |n| (n.to_string(), category)))
        .collect()
}

const SHELL_BUILTINS: &[&str] = &[
    "alias", "bg", "cd", "clear", "echo", "eval", "exec", "exit", "export", "false", "fg",
    "history", "jobs", "printf", "pwd", "read", "set", "source", "test", "time", "true",
    "type", "ulimit", "umask", "unalias", "unset", "wait",
];

const PACKAGE_MANAGERS: &[&str] = &[
    "apk", "apt", "apt-get", "brew", "cargo", "composer", "conda", "dnf", "flatpak", "gem",
    "go", "npm", "npx", "pacman", "pip", "pip3", "pipx", "pnpm", "poetry", "snap", "yarn",
    "yum", "zypper",
];

const VERSION_CONTROL: &[&str] = &["gh", "git", "hg", "svn"];

const NETWORK_TOOLS: &[&str] = &[
    "aria2c", "curl", "dig", "ftp", "nc", "ncat", "netcat", "nmap", "nslookup", "ping",
    "rsync", "scp", "sftp", "socat", "ssh", "telnet", "wget",
];

const SYSTEM_ADMIN: &[&str] = &[
    "chpasswd", "chroot", "crontab", "docker", "docker-compose", "doas", "fdisk",
    "firewall-cmd", "gpasswd", "groupadd", "groupdel", "halt", "helm", "init", "insmod",
    "iptables", "journalctl", "kill", "killall", "kubectl", "launchctl", "mkfs", "modprobe",
    "mount", "nice", "nohup", "parted", "passwd", "pkexec", "pkill", "podman", "poweroff",
    "reboot", "rmmod", "service", "setenforce", "shutdown", "su", "sudo", "sysctl",
    "systemctl", "umount", "ufw", "useradd", "userdel", "usermod", "visudo", "wipefs",
];

const FILESYSTEM: &[&str] = &[
    "awk", "basename", "cat", "chgrp", "chmod", "chown", "cp", "dd", "df", "diff", "dirname",
    "du", "file", "find", "grep", "gunzip", "gzip", "head", "less", "ln", "ls", "mkdir",
    "more", "mv", "realpath", "rm", "rmdir", "sed", "shred", "sort", "srm", "stat", "tail",
    "tar", "tee", "touch", "tree", "truncate", "uniq", "unlink", "unzip", "wc", "wipe",
    "xargs", "zip",
];

const MULTI_WORD_FAMILIES: &[&str] = &[
    "apk", "apt", "apt-get", "brew", "cargo", "composer", "conda", "dnf", "docker",
    "docker-compose", "flatpak", "gem", "gh", "git", "go", "helm", "hg", "kubectl", "npm",
    "pip", "pip3", "pipx", "pnpm", "podman", "poetry", "snap", "svn", "systemctl", "ufw",
    "yarn", "yum", "zypper",
];

const WRAPPERS: &[&str] = &[
    "doas", "env", "nice", "nohup", "pkexec", "sudo", "time", "xargs",
];

const WRAPPER_VALUE_OPTIONS: &[(&str, &[&str])] = &[
    (
        "sudo",
        &[
            "-u", "-g", "-C", "-D", "-h", "-p", "-r", "-t", "-U", "--user", "--group",
            "--close-from", "--chdir", "--host", "--prompt", "--role", "--type",
            "--other-user",
        ],
    ),
    ("doas", &["-u", "-C"]),
    ("nice", &["-n", "--adjustment"]),
    ("env", &["-u", "-C", "-S", "--unset", "--chdir", "--split-string"]),
    ("pkexec", &["--user"]),
    (
        "xargs",
        &[
            "-a", "-d", "-E", "-I", "-L", "-n", "-P", "-s", "--arg-file", "--delimiter",
            "--max-args", "--max-procs", "--max-chars",
        ],
    ),
];
