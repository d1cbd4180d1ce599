//! Property-based tests over generated command trees.

use proptest::prelude::*;
use tabforge_script::{
    Argument, Command, CommandOption, CompletionCandidate, ShellKind, generate,
    generate_bash_completion,
};

// ============================================================================
// Strategies
// ============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,7}"
}

fn shell_strategy() -> impl Strategy<Value = ShellKind> {
    prop_oneof![Just(ShellKind::Bash), Just(ShellKind::Zsh), Just(ShellKind::Fish)]
}

fn candidate_strategy() -> impl Strategy<Value = CompletionCandidate> {
    prop_oneof![
        Just(CompletionCandidate::None),
        Just(CompletionCandidate::Path),
        Just(CompletionCandidate::Hostname),
        Just(CompletionCandidate::Username),
        prop::collection::vec("[a-z]{1,6}", 1..4).prop_map(|words| CompletionCandidate::fixed(words)),
        (any::<bool>(), prop_oneof![Just("COMPREPLY=(x y)"), Just("  \n"), Just("")]).prop_map(
            |(everywhere, snippet)| {
                CompletionCandidate::custom(move |shell| {
                    (everywhere || shell == ShellKind::Bash).then(|| snippet.to_string())
                })
            }
        ),
    ]
}

fn option_strategy() -> impl Strategy<Value = CommandOption> {
    (
        prop::collection::vec("-{1,2}[a-z][a-z0-9-]{0,5}", 1..3),
        0usize..3,
        candidate_strategy(),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(names, arity, candidates, hidden)| {
            CommandOption::new(names)
                .with_arity(arity)
                .with_candidates(candidates)
                .with_hidden(hidden)
        })
}

fn argument_strategy() -> impl Strategy<Value = Argument> {
    (name_strategy(), -1i32..3, candidate_strategy()).prop_map(|(name, nvalues, candidates)| {
        Argument::new(name)
            .with_nvalues(nvalues)
            .with_candidates(candidates)
    })
}

fn leaf_strategy() -> impl Strategy<Value = Command> {
    (
        name_strategy(),
        prop::collection::vec(option_strategy(), 0..3),
        prop::collection::vec(argument_strategy(), 0..3),
        any::<bool>(),
    )
        .prop_map(|(name, options, arguments, interspersed)| {
            let mut command = Command::new(name).with_interspersed_args(interspersed);
            for option in options {
                command = command.with_option(option);
            }
            for argument in arguments {
                command = command.with_argument(argument);
            }
            command
        })
}

fn command_strategy() -> impl Strategy<Value = Command> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        (leaf_strategy(), prop::collection::vec(inner, 0..4)).prop_map(|(mut command, subs)| {
            for sub in subs {
                command = command.with_subcommand(sub);
            }
            command
        })
    })
}

/// A tree in which no node has anything to complete.
fn empty_tree_strategy() -> impl Strategy<Value = Command> {
    name_strategy()
        .prop_map(|name| Command::new(name).with_option(CommandOption::new(["--hidden"]).with_hidden(true)))
}

// ============================================================================
// Helpers
// ============================================================================

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names of every function defined in a bash or zsh script.
fn defined_functions(script: &str) -> Vec<&str> {
    script
        .lines()
        .filter_map(|line| line.strip_suffix("() {"))
        .collect()
}

/// Names of every variable declared in a fish script.
fn declared_variables(script: &str) -> Vec<&str> {
    script
        .lines()
        .filter_map(|line| line.strip_prefix("set -l "))
        .filter_map(|rest| rest.split_whitespace().next())
        .collect()
}

/// Lines of the root function, from its opening line to its closing brace.
fn root_function(script: &str, root: &str) -> Vec<String> {
    let header = format!("{}() {{", tabforge_script::names::function_name(&[root]));
    script
        .lines()
        .skip_while(|line| *line != header)
        .take_while(|line| *line != "}")
        .map(str::to_string)
        .collect()
}

/// Branches of the word-classification `case` in the scan loop.
fn scan_branches(function: &[String]) -> usize {
    function
        .iter()
        .filter(|line| {
            line.starts_with("      ")
                && !line.starts_with("       ")
                && line.ends_with(')')
                && !line.trim_start().starts_with("COMPREPLY")
                && line.trim() != "*)"
        })
        .count()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generation_is_deterministic(cmd in command_strategy(), shell in shell_strategy()) {
        prop_assert_eq!(generate(shell, &cmd), generate(shell, &cmd));
    }

    #[test]
    fn prop_zsh_body_matches_bash(cmd in command_strategy()) {
        let bash = generate(ShellKind::Bash, &cmd);
        let zsh = generate(ShellKind::Zsh, &cmd);
        let start = "__skip_opt_eq() {";
        match (bash.find(start), zsh.find(start)) {
            (Some(b), Some(z)) => prop_assert_eq!(&bash[b..], &zsh[z..]),
            (None, None) => prop_assert_eq!(&bash, &zsh),
            _ => prop_assert!(false, "only one dialect emitted a body"),
        }
    }

    #[test]
    fn prop_no_empty_function_bodies(cmd in command_strategy()) {
        let script = generate_bash_completion(&cmd);
        prop_assert!(!script.contains("() {\n}"), "script contains an empty function body");
    }

    #[test]
    fn prop_identifiers_are_safe(cmd in command_strategy()) {
        for shell in [ShellKind::Bash, ShellKind::Zsh] {
            let script = generate(shell, &cmd);
            for name in defined_functions(&script) {
                prop_assert!(is_identifier(name), "bad function name {:?}", name);
            }
        }

        let fish = generate(ShellKind::Fish, &cmd);
        for name in declared_variables(&fish) {
            prop_assert!(is_identifier(name), "bad variable name {:?}", name);
        }
    }

    #[test]
    fn prop_empty_tree_generates_nothing(cmd in empty_tree_strategy(), shell in shell_strategy()) {
        prop_assert_eq!(generate(shell, &cmd), "");
    }

    #[test]
    fn prop_empty_subtree_has_no_function(
        root in "[a-z]{1,6}",
        sub in "[a-z]{1,6}",
    ) {
        let cmd = Command::new(root.as_str())
            .with_argument(Argument::new("file"))
            .with_subcommand(Command::new(sub.as_str()));
        let script = generate_bash_completion(&cmd);
        let sub_function = format!("_{root}_{sub}() {{");
        prop_assert!(!script.contains(&sub_function));
    }

    #[test]
    fn prop_one_branch_per_subcommand(
        names in prop::collection::btree_set("[a-z][a-z0-9-]{0,7}", 0..6),
        options in prop::collection::vec(option_strategy(), 0..3),
    ) {
        let mut cmd = Command::new("root").with_argument(Argument::new("target"));
        for option in options {
            cmd = cmd.with_option(option);
        }
        for name in &names {
            cmd = cmd.with_subcommand(Command::new(name.as_str()).with_argument(Argument::new("x")));
        }

        let script = generate_bash_completion(&cmd);
        prop_assert_eq!(scan_branches(&root_function(&script, "root")), names.len());
    }

    #[test]
    fn prop_alias_splices_exactly_k_tokens(
        tokens in prop::collection::vec("[a-z][a-z0-9-]{0,5}", 1..6),
    ) {
        let cmd = Command::new("tool")
            .with_argument(Argument::new("x"))
            .with_alias("al", tokens.clone());
        let script = generate_bash_completion(&cmd);

        let splice = script
            .lines()
            .find(|line| line.trim_start().starts_with("COMP_WORDS=("))
            .unwrap_or_default();
        let spliced: Vec<&str> = splice
            .split_whitespace()
            .filter(|word| word.starts_with('\''))
            .collect();
        prop_assert_eq!(spliced.len(), tokens.len());

        let advance = format!("(( COMP_CWORD = COMP_CWORD + {} ))", tokens.len());
        prop_assert!(script.contains(&advance));
    }

    #[test]
    fn prop_custom_without_snippet_is_suppressed(
        param in "[a-z]{1,6}",
        shell in shell_strategy(),
    ) {
        let silent = CompletionCandidate::custom(|_| None);
        let cmd = Command::new("tool")
            .with_argument(Argument::new(param.as_str()).with_candidates(silent.clone()))
            .with_option(
                CommandOption::new([format!("--{param}")])
                    .with_arity(1)
                    .with_candidates(silent),
            );
        let script = generate(shell, &cmd);

        prop_assert!(!script.contains("_complete_"));
        prop_assert!(!script.contains("compgen -F"));
        prop_assert!(!script.contains(" -a "));
    }
}
