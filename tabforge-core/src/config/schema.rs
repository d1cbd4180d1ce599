//! Description file schema types
//!
//! A command tree is described in YAML and deserialized into these types,
//! which are then converted into the read-only [`crate::model`] tree. The
//! schema keeps serde concerns out of the model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{
    ArgArity, Argument, Command, CommandOption, CompletionCandidate, CustomGenerator,
};

// ============================================================================
// Commands
// ============================================================================

/// One command node of a description file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Command name (unique among siblings)
    pub name: String,

    /// Help text, shown by fish next to subcommand suggestions
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,

    /// Whether positional tokens may be mixed with options
    #[serde(default = "default_true")]
    pub allow_interspersed_args: bool,

    /// Options accepted by this command
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,

    /// Positional arguments accepted by this command
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentSpec>,

    /// Alias name to expansion tokens
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, Vec<String>>,

    /// Child commands
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<Self>,
}

const fn default_true() -> bool {
    true
}

// ============================================================================
// Options and Arguments
// ============================================================================

/// An option declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionSpec {
    /// Accepted names, including their prefix (`-o`, `--output`)
    pub names: Vec<String>,

    /// Number of values consumed (0 for a flag)
    #[serde(default)]
    pub arity: usize,

    /// Candidate source for the value
    #[serde(default)]
    pub complete: CandidateSpec,

    /// Help text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,

    /// Hidden options are never completed
    #[serde(default)]
    pub hidden: bool,
}

/// A positional argument declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentSpec {
    /// Argument name
    pub name: String,

    /// Number of values consumed; negative means every remaining token
    #[serde(default = "default_arg_arity")]
    pub arity: i32,

    /// Candidate source
    #[serde(default)]
    pub complete: CandidateSpec,

    /// Help text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
}

const fn default_arg_arity() -> i32 {
    1
}

// ============================================================================
// Candidates
// ============================================================================

/// Candidate source as written in a description file.
///
/// Unit variants are plain strings (`complete: path`); the others are
/// single-key maps (`complete: { fixed: [a, b] }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSpec {
    /// No suggestions
    #[default]
    None,
    /// Filesystem paths
    Path,
    /// Known hostnames
    Hostname,
    /// Local user names
    Username,
    /// Literal word list
    Fixed(Vec<String>),
    /// Literal per-shell snippets
    Custom(CustomSnippets),
}

/// Per-shell snippets for a custom candidate source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomSnippets {
    /// Body of a bash completion function (`COMPREPLY` producer), also used for zsh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash: Option<String>,

    /// fish command whose output lines are the candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fish: Option<String>,
}

// ============================================================================
// Conversion
// ============================================================================

impl From<&CandidateSpec> for CompletionCandidate {
    fn from(spec: &CandidateSpec) -> Self {
        match spec {
            CandidateSpec::None => Self::None,
            CandidateSpec::Path => Self::Path,
            CandidateSpec::Hostname => Self::Hostname,
            CandidateSpec::Username => Self::Username,
            CandidateSpec::Fixed(words) => Self::Fixed(words.clone()),
            CandidateSpec::Custom(snippets) => Self::Custom(CustomGenerator::from_snippets(
                snippets.bash.clone(),
                snippets.fish.clone(),
            )),
        }
    }
}

impl From<&OptionSpec> for CommandOption {
    fn from(spec: &OptionSpec) -> Self {
        Self::new(spec.names.iter().cloned())
            .with_arity(spec.arity)
            .with_candidates((&spec.complete).into())
            .with_help(spec.help.clone())
            .with_hidden(spec.hidden)
    }
}

impl From<&ArgumentSpec> for Argument {
    fn from(spec: &ArgumentSpec) -> Self {
        Self::new(spec.name.clone())
            .with_arity(ArgArity::from_nvalues(spec.arity))
            .with_candidates((&spec.complete).into())
            .with_help(spec.help.clone())
    }
}

impl From<&CommandSpec> for Command {
    fn from(spec: &CommandSpec) -> Self {
        let mut command = Self::new(spec.name.clone())
            .with_help(spec.help.clone())
            .with_interspersed_args(spec.allow_interspersed_args);
        for option in &spec.options {
            command = command.with_option(option.into());
        }
        for argument in &spec.arguments {
            command = command.with_argument(argument.into());
        }
        for (alias, tokens) in &spec.aliases {
            command = command.with_alias(alias.clone(), tokens.iter().cloned());
        }
        for subcommand in &spec.subcommands {
            command = command.with_subcommand(subcommand.into());
        }
        command
    }
}
