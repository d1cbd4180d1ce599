//! Shell identifier derivation.
//!
//! Every generated function and variable name is a pure function of the
//! command's ancestor chain (root first), so identical trees always produce
//! identical identifiers. Names contain only `[A-Za-z0-9_]`.

/// Replaces every character outside `[A-Za-z0-9_]` with an underscore.
///
/// Hyphens in command names (`git-lfs`) become underscores (`git_lfs`), as
/// does any other punctuation a command or parameter name might carry.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Completion function name for a command: `_root_sub_subsub`.
#[must_use]
pub fn function_name<S: AsRef<str>>(ancestors: &[S]) -> String {
    let mut name = String::from("_");
    name.push_str(&join_sanitized(ancestors));
    name
}

/// Name of the stub wrapping a custom bash snippet for one parameter.
///
/// `_git` and `--format` give `__git_complete___format`.
#[must_use]
pub fn custom_stub_name(function_name: &str, param: &str) -> String {
    format!("_{function_name}_complete_{}", sanitize_identifier(param))
}

/// fish variable listing a command's direct subcommands: `git_remote_subcommands`.
#[must_use]
pub fn subcommands_var_name<S: AsRef<str>>(ancestors: &[S]) -> String {
    format!("{}_subcommands", join_sanitized(ancestors))
}

fn join_sanitized<S: AsRef<str>>(ancestors: &[S]) -> String {
    ancestors
        .iter()
        .map(|name| sanitize_identifier(name.as_ref()))
        .collect::<Vec<_>>()
        .join("_")
}
