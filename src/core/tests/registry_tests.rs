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

use crate::core::{registry::CommandRegistry, types::CommandCategory};

#[test]
fn test_builtin_lookups() {
    let registry = CommandRegistry::builtin();

    assert_eq!(registry.category_of("echo"), CommandCategory::ShellBuiltin);
    assert_eq!(registry.category_of("npm"), CommandCategory::PackageManager);
    assert_eq!(registry.category_of("git"), CommandCategory::VersionControl);
    assert_eq!(registry.category_of("ssh"), CommandCategory::NetworkTool);
    assert_eq!(registry.category_of("shutdown"), CommandCategory::SystemAdmin);
    assert_eq!(registry.category_of("dd"), CommandCategory::Filesystem);
    assert_eq!(registry.category_of("definitely-not-a-tool"), CommandCategory::Unknown);
    assert!(!registry.is_empty());
}

#[test]
fn test_lookup_by_path_and_stem() {
    let registry = CommandRegistry::builtin();

    assert_eq!(registry.category_of("/bin/rm"), CommandCategory::Filesystem);
    assert_eq!(registry.category_of("./git"), CommandCategory::VersionControl);
    assert_eq!(registry.category_of("mkfs.vfat"), CommandCategory::SystemAdmin);
}

#[test]
fn test_multi_word_and_wrappers() {
    let registry = CommandRegistry::builtin();

    assert!(registry.is_multi_word("git"));
    assert!(registry.is_multi_word("kubectl"));
    assert!(!registry.is_multi_word("rm"));

    assert!(registry.is_wrapper("sudo"));
    assert!(registry.is_wrapper("/usr/bin/sudo"));
    assert!(registry.is_wrapper("nohup"));
    assert!(!registry.is_wrapper("bash"));
}

#[test]
fn test_builder_merges_and_normalizes() {
    let registry = CommandRegistry::builder()
        .category("  Terraform ", CommandCategory::SystemAdmin)
        .multi_word("Terraform")
        .wrapper("firejail")
        .build();

    assert_eq!(registry.category_of("terraform"), CommandCategory::SystemAdmin);
    assert!(registry.is_multi_word("terraform"));
    assert!(registry.is_wrapper("firejail"));
    assert_eq!(registry.len(), CommandRegistry::builtin().len() + 1);
}

#[test]
fn test_builder_overrides_builtin_category() {
    let registry = CommandRegistry::builder()
        .category("docker", CommandCategory::PackageManager)
        .build();

    assert_eq!(registry.category_of("docker"), CommandCategory::PackageManager);
    assert_eq!(registry.len(), CommandRegistry::builtin().len());
}

#[test]
fn test_wrapper_value_options() {
    let registry = CommandRegistry::builtin();

    assert!(registry.takes_value("sudo", "-u"));
    assert!(registry.takes_value("/usr/bin/sudo", "--user"));
    assert!(registry.takes_value("doas", "-C"));
    assert!(registry.takes_value("nice", "-n"));
    assert!(registry.takes_value("env", "-S"));
    assert!(registry.takes_value("xargs", "-I"));

    assert!(!registry.takes_value("sudo", "-E"));
    assert!(!registry.takes_value("sudo", "-uroot"));
    assert!(!registry.takes_value("nohup", "-u"));
    assert!(!registry.takes_value("rm", "-u"));
}

#[test]
fn test_builder_adds_wrapper_option() {
    let registry = CommandRegistry::builder()
        .wrapper("firejail")
        .wrapper_option(" Firejail ", "--profile")
        .build();

    assert!(registry.takes_value("firejail", "--profile"));
    assert!(!registry.takes_value("firejail", "--private"));
}
