//! Shell completion script generation.
//!
//! Turns a [`Command`] tree into a completion script for bash, zsh or fish.
//! Generation is pure: the same tree always yields the same text, nothing is
//! read from the environment and nothing is written anywhere.
//!
//! - bash: one completion function per command, registered with `complete -F`
//! - zsh: the bash functions behind a `bashcompinit` preamble
//! - fish: declarative `complete` statements keyed on seen subcommands

pub mod bash;
pub mod candidates;
pub mod escape;
pub mod fish;
pub mod names;

pub use tabforge_core::{
    ArgArity, Argument, Command, CommandOption, CompletionCandidate, CustomGenerator, ShellKind,
};

/// Marker written into every generated script header.
pub(crate) const GENERATED_BY: &str = "Generated by tabforge";

/// Generates a completion script for one shell.
pub trait ScriptGenerator {
    /// Renders the script for `root`.
    ///
    /// Returns an empty string when the tree offers nothing the shell can
    /// complete.
    fn generate(&self, root: &Command) -> String;

    /// Returns the shell this generator targets.
    fn shell(&self) -> ShellKind;
}

/// Create a generator for the given shell.
#[must_use]
pub fn create_generator(shell: ShellKind) -> Box<dyn ScriptGenerator> {
    match shell {
        ShellKind::Bash => Box::new(bash::BashGenerator),
        ShellKind::Zsh => Box::new(bash::ZshGenerator),
        ShellKind::Fish => Box::new(fish::FishGenerator),
    }
}

/// Generates the completion script for `root` in `shell`'s dialect.
#[must_use]
pub fn generate(shell: ShellKind, root: &Command) -> String {
    create_generator(shell).generate(root)
}

/// bash completion script for `root`.
#[must_use]
pub fn generate_bash_completion(root: &Command) -> String {
    generate(ShellKind::Bash, root)
}

/// zsh completion script for `root`.
#[must_use]
pub fn generate_zsh_completion(root: &Command) -> String {
    generate(ShellKind::Zsh, root)
}

/// fish completion script for `root`.
#[must_use]
pub fn generate_fish_completion(root: &Command) -> String {
    generate(ShellKind::Fish, root)
}
