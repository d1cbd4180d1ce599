//! Candidate source resolution.
//!
//! Maps a [`CompletionCandidate`] to the shell text that produces its
//! suggestions. Every match here is exhaustive so a new candidate kind cannot
//! be silently ignored by one backend.

use tabforge_core::{CompletionCandidate, ShellKind};

use crate::escape::{bash_word_list, fish_double_quote};

/// Returns the custom snippet `candidate` yields for `shell`, if any.
///
/// Only [`CompletionCandidate::Custom`] produces snippets; bash and zsh wrap
/// them in a stub function, fish splices them inline. A blank snippet counts
/// as no snippet, since an empty function body is a bash syntax error.
#[must_use]
pub fn custom_snippet(candidate: &CompletionCandidate, shell: ShellKind) -> Option<String> {
    match candidate {
        CompletionCandidate::Custom(generator) => generator
            .snippet(shell)
            .filter(|snippet| !snippet.trim().is_empty()),
        CompletionCandidate::None
        | CompletionCandidate::Path
        | CompletionCandidate::Hostname
        | CompletionCandidate::Username
        | CompletionCandidate::Fixed(_) => None,
    }
}

/// `COMPREPLY` assignment for a bash or zsh dispatch branch.
///
/// zsh runs the bash functions through `bashcompinit`, so custom generators
/// are always asked for their bash snippet. `stub_name` is the function
/// emitted for that snippet and is only referenced when one exists. Returns
/// `None` when the parameter gets no suggestions.
#[must_use]
pub fn bash_completion(candidate: &CompletionCandidate, stub_name: &str) -> Option<String> {
    match candidate {
        CompletionCandidate::None => None,
        CompletionCandidate::Path => {
            Some(r#"COMPREPLY=($(compgen -o default -- "${word}"))"#.to_string())
        }
        CompletionCandidate::Hostname => {
            Some(r#"COMPREPLY=($(compgen -A hostname -- "${word}"))"#.to_string())
        }
        CompletionCandidate::Username => {
            Some(r#"COMPREPLY=($(compgen -A user -- "${word}"))"#.to_string())
        }
        CompletionCandidate::Fixed(words) => Some(format!(
            r#"COMPREPLY=($(compgen -W {} -- "${{word}}"))"#,
            bash_word_list(words)
        )),
        // compgen warns that -F "might not do what you expect"; the stub
        // fills COMPREPLY itself, so the warning is discarded.
        CompletionCandidate::Custom(_) => custom_snippet(candidate, ShellKind::Bash)
            .map(|_| format!("COMPREPLY=($(compgen -F {stub_name} 2>/dev/null))")),
    }
}

/// `-a` clause for a fish `complete` statement, or `None` for no suggestions.
#[must_use]
pub fn fish_completion(candidate: &CompletionCandidate) -> Option<String> {
    match candidate {
        CompletionCandidate::None => None,
        CompletionCandidate::Path => Some(r#"-a "(__fish_complete_path)""#.to_string()),
        CompletionCandidate::Hostname => Some(r#"-a "(__fish_print_hostnames)""#.to_string()),
        CompletionCandidate::Username => Some(r#"-a "(__fish_complete_users)""#.to_string()),
        CompletionCandidate::Fixed(words) => {
            Some(format!("-a {}", fish_double_quote(&words.join(" "))))
        }
        CompletionCandidate::Custom(_) => custom_snippet(candidate, ShellKind::Fish)
            .map(|snippet| format!("-a {}", fish_double_quote(&format!("({})", snippet.trim())))),
    }
}
