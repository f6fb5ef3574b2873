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

//! src/core/parser.rs
//!
//! Shell command line parser
//!
//! This module turns a raw command string into a [`ParsedCommand`].
//! It handles:
//! - Whitespace tokenization with single and double quotes
//! - Backslash escapes outside quotes
//! - Command chaining on unquoted `;`, `&&`, `||`, `|` and `&`
//! - Subcommand extraction for multi-word families (`git push`)
//! - Flag / argument bucketing
//! - Wrapper unwrapping (`sudo rm -rf /` also yields `rm -rf /`),
//!   skipping wrapper options that take a value (`sudo -u admin ...`)
//!
//! # Architecture
//! Tokenization uses nom combinators. Everything after tokenization is a
//! single pass over the token list, driven by the injected
//! [`CommandRegistry`].
//!
//! # Security
//! The parser only reads and structures data. It never executes commands.
//! Input shapes other than empty and multi-line always parse.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{anychar, char},
    combinator::{map, not, opt, recognize},
    multi::{many0, many1},
    sequence::{preceded, terminated},
    IResult, Parser,
};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::trace;

use crate::core::registry::CommandRegistry;
use crate::core::types::ParsedCommand;

/// Parse errors
///
/// These are the only two ways parsing can fail. Unknown command names are
/// not an error; they resolve to `CommandCategory::Unknown`.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    #[error("Command is empty")]
    EmptyInput,

    #[error("Command spans multiple lines; submit one command at a time")]
    MultiLineInput,
}

static DEFAULT_PARSER: LazyLock<CommandParser> = LazyLock::new(CommandParser::default);

/// Parses a command with the built-in registry
///
/// # Example
/// ```
/// use cmd_risk_inspector::core::{parse, ParseError};
///
/// let parsed = parse("rm -rf /tmp/test").unwrap();
/// assert_eq!(parsed.name, "rm");
/// assert!(parsed.has_flag("-r"));
///
/// assert_eq!(parse("   "), Err(ParseError::EmptyInput));
/// assert_eq!(parse("ls\ncat file"), Err(ParseError::MultiLineInput));
/// ```
pub fn parse(raw: &str) -> Result<ParsedCommand, ParseError> {
    DEFAULT_PARSER.parse(raw)
}

/// Command parser bound to a registry
#[derive(Clone, Debug, Default)]
pub struct CommandParser {
    registry: CommandRegistry,
}

impl CommandParser {
    /// Creates a parser that classifies names through `registry`
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// The registry used for classification
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parses a single command line
    ///
    /// # Errors
    /// - `ParseError::EmptyInput` when the input is empty after trimming,
    ///   or contains nothing but empty quotes and control operators
    /// - `ParseError::MultiLineInput` when the input contains a line break
    pub fn parse(&self, raw: &str) -> Result<ParsedCommand, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(ParseError::MultiLineInput);
        }

        let segments = split_commands(trimmed);
        trace!(?segments, "tokenized command");

        let mut segments = segments.into_iter();
        let first = segments.next().ok_or(ParseError::EmptyInput)?;
        let mut parsed = self
            .build(trimmed.to_string(), first)
            .ok_or(ParseError::EmptyInput)?;

        parsed.chained = segments
            .filter_map(|tokens| self.build(tokens.join(" "), tokens))
            .collect();

        Ok(parsed)
    }

    fn build(&self, raw: String, tokens: Vec<String>) -> Option<ParsedCommand> {
        let mut tokens = tokens.into_iter();
        let name = tokens.next()?.to_lowercase();
        let rest: Vec<String> = tokens.collect();

        let wrapped = if self.registry.is_wrapper(&name) {
            self.unwrap_command(&name, &rest)
        } else {
            None
        };

        let mut rest = rest.into_iter().peekable();
        let subcommand = if self.registry.is_multi_word(&name) {
            rest.next_if(|token| !token.starts_with('-'))
        } else {
            None
        };

        let mut flags = BTreeSet::new();
        let mut args = Vec::new();
        for token in rest {
            if token.starts_with('-') {
                flags.insert(token);
            } else {
                args.push(token);
            }
        }

        let category = self.registry.category_of(&name);

        Some(ParsedCommand {
            raw,
            name,
            subcommand,
            flags,
            args,
            category,
            wrapped,
            chained: Vec::new(),
        })
    }

    /// Parses the command a wrapper launches
    ///
    /// Leading wrapper options, the values of options that take one
    /// (`sudo -u admin`), bare numbers and environment assignments
    /// (`env FOO=1`) are skipped.
    fn unwrap_command(&self, wrapper: &str, rest: &[String]) -> Option<Box<ParsedCommand>> {
        let mut tokens = rest.iter().enumerate();
        let start = loop {
            let (index, token) = tokens.next()?;
            if token.starts_with('-') {
                if self.registry.takes_value(wrapper, token) {
                    tokens.next();
                }
            } else if !is_assignment(token) && !is_number(token) {
                break index;
            }
        };
        let inner = rest[start..].to_vec();
        let raw = inner.join(" ");

        self.build(raw, inner).map(Box::new)
    }
}

/// Splits a command line into tokens
///
/// Quotes group text into one token and are stripped. Quoted and bare
/// segments written back to back join into a single token
/// (`--msg="a b"` → `--msg=a b`). An unterminated quote extends to the end
/// of the input. Empty tokens (`""`) are dropped, and so are the control
/// operators between commands; [`split_commands`] keeps those boundaries.
pub fn tokenize(input: &str) -> Vec<String> {
    split_commands(input).into_iter().flatten().collect()
}

/// Splits a command line into the token lists of each command it runs
///
/// Unquoted, unescaped `;`, `&&`, `||`, `|`, `|&` and `&` end a command.
/// Redirections (`2>&1`, `&> log`) stay inside their word. Empty commands
/// (`ls ;; pwd`) are dropped.
///
/// # Example
/// ```
/// use cmd_risk_inspector::core::split_commands;
///
/// let commands = split_commands("cd /tmp && rm -rf 'a;b'");
/// assert_eq!(commands, vec![vec!["cd", "/tmp"], vec!["rm", "-rf", "a;b"]]);
/// ```
pub fn split_commands(input: &str) -> Vec<Vec<String>> {
    let mut commands = Vec::new();
    let mut current = Vec::new();

    for lexeme in lex(input) {
        match lexeme {
            Lexeme::Word(word) if word.is_empty() => {}
            Lexeme::Word(word) => current.push(word),
            Lexeme::Separator => commands.push(std::mem::take(&mut current)),
        }
    }
    commands.push(current);

    commands.retain(|tokens| !tokens.is_empty());
    commands
}

/// A token or a control operator between two commands
#[derive(Debug)]
enum Lexeme {
    Word(String),
    Separator,
}

fn lex(input: &str) -> Vec<Lexeme> {
    let result: IResult<&str, Vec<Lexeme>> =
        terminated(many0(preceded(blanks, lexeme)), blanks).parse(input);

    match result {
        Ok((_, lexemes)) => lexemes,
        Err(_) => input
            .split_whitespace()
            .map(|word| Lexeme::Word(word.to_string()))
            .collect(),
    }
}

fn lexeme(input: &str) -> IResult<&str, Lexeme> {
    alt((
        map(control_operator, |_| Lexeme::Separator),
        map(word, Lexeme::Word),
    ))
    .parse(input)
}

/// `&` directly before `>` is the `&>` redirection, not a background job
fn control_operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag("&&"),
        tag("||"),
        tag("|&"),
        tag("|"),
        tag(";"),
        terminated(tag("&"), not(char('>'))),
    ))
    .parse(input)
}

/// One token: adjacent quoted, escaped, redirection and bare segments
fn word(input: &str) -> IResult<&str, String> {
    map(
        many1(alt((single_quoted, double_quoted, escaped_char, redirection, bare))),
        |parts: Vec<String>| parts.concat(),
    )
    .parse(input)
}

fn single_quoted(input: &str) -> IResult<&str, String> {
    map(
        terminated(preceded(char('\''), take_till(|c: char| c == '\'')), opt(char('\''))),
        String::from,
    )
    .parse(input)
}

fn double_quoted(input: &str) -> IResult<&str, String> {
    map(
        terminated(preceded(char('"'), take_till(|c: char| c == '"')), opt(char('"'))),
        String::from,
    )
    .parse(input)
}

/// `\x` → `x`; a trailing lone backslash yields nothing
fn escaped_char(input: &str) -> IResult<&str, String> {
    map(preceded(char('\\'), opt(anychar)), |c: Option<char>| {
        c.map(String::from).unwrap_or_default()
    })
    .parse(input)
}

/// `>`, `>>`, `<`, `>&`, `&>` and friends
fn redirection(input: &str) -> IResult<&str, String> {
    map(
        recognize((
            opt(char('&')),
            take_while1(|c: char| matches!(c, '<' | '>')),
            opt(char('&')),
        )),
        String::from,
    )
    .parse(input)
}

fn bare(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| {
            !c.is_whitespace()
                && !matches!(c, '\'' | '"' | '\\' | ';' | '|' | '&' | '<' | '>')
        }),
        String::from,
    )
    .parse(input)
}

fn blanks(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace()).parse(input)
}

fn is_assignment(token: &str) -> bool {
    token.split_once('=').is_some_and(|(key, _)| {
        !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}
