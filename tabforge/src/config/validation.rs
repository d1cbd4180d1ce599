//! Description validation
//!
//! Semantic checks on a deserialized [`CommandSpec`] tree. Serde already
//! rejects unknown fields and malformed candidate sources; this pass catches
//! what the shape of the data cannot express, such as duplicate siblings,
//! badly placed unbounded arguments and aliases that shadow subcommands. It
//! also warns when two commands sanitize to the same shell function name.
//!
//! Validation collects ALL issues rather than stopping at the first, each
//! tagged with a dotted path (`subcommands[1].options[0]`).

use std::collections::{HashMap, HashSet};

use tabforge_core::CommandOption;
use tabforge_core::config::{CandidateSpec, CommandSpec, OptionSpec};
use tabforge_core::error::{Severity, ValidationIssue};
use tabforge_script::names::{function_name, sanitize_identifier};

use crate::config::loader::ConfigLimits;

// ============================================================================
// Public API
// ============================================================================

/// Result of description validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent generation).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Moves every warning into the error list.
    pub fn promote_warnings(&mut self) {
        for mut issue in self.warnings.drain(..) {
            issue.severity = Severity::Error;
            self.errors.push(issue);
        }
    }
}

/// Command-tree validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
    /// Completion function name to the command chain that first claimed it.
    function_names: HashMap<String, String>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a description tree and returns the result.
    pub fn validate(&mut self, spec: &CommandSpec, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();
        self.function_names.clear();

        self.validate_command(spec, "", 1, &mut Vec::new(), limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn validate_command(
        &mut self,
        command: &CommandSpec,
        path: &str,
        depth: usize,
        ancestors: &mut Vec<String>,
        limits: &ConfigLimits,
    ) {
        if command.name.trim().is_empty() {
            self.add_error(&join(path, "name"), "Command name is required");
        } else if command
            .name
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            self.add_warning(
                &join(path, "name"),
                &format!(
                    "Command name '{}' contains characters that are replaced with '_' in shell identifiers",
                    command.name
                ),
            );
        }

        if depth > limits.max_depth {
            self.add_error(
                path,
                &format!(
                    "Command tree is too deep: {depth} levels (maximum: {}). \
                     Set TABFORGE_MAX_DEPTH to increase the limit.",
                    limits.max_depth
                ),
            );
            return;
        }

        ancestors.push(command.name.clone());
        self.validate_function_name(ancestors, path);

        if command.subcommands.len() > limits.max_subcommands {
            self.add_error(
                &join(path, "subcommands"),
                &format!(
                    "Too many subcommands: {} (maximum: {}). \
                     Set TABFORGE_MAX_SUBCOMMANDS to increase the limit.",
                    command.subcommands.len(),
                    limits.max_subcommands
                ),
            );
        }

        for (idx, option) in command.options.iter().enumerate() {
            self.validate_option(option, &join(path, &format!("options[{idx}]")));
        }

        self.validate_arguments(command, path);
        self.validate_aliases(command, path);
        self.validate_stub_names(command, path);

        let mut names = HashSet::new();
        for (idx, sub) in command.subcommands.iter().enumerate() {
            let sub_path = join(path, &format!("subcommands[{idx}]"));
            if !sub.name.is_empty() && !names.insert(sub.name.as_str()) {
                self.add_error(
                    &join(&sub_path, "name"),
                    &format!("Duplicate subcommand name: '{}'", sub.name),
                );
            }
            self.validate_command(sub, &sub_path, depth + 1, ancestors, limits);
        }

        ancestors.pop();
    }

    /// Warns when `ancestors` maps to a function name another chain already has.
    ///
    /// `git lfs` and `git-lfs` both become `_git_lfs`; the later definition
    /// would replace the earlier one in the generated script.
    fn validate_function_name(&mut self, ancestors: &[String], path: &str) {
        let chain = ancestors.join(" ");
        let function = function_name(ancestors);

        if let Some(existing) = self.function_names.get(&function).cloned() {
            // Identical chains are duplicate siblings, reported as an error.
            if existing != chain {
                self.add_warning(
                    &join(path, "name"),
                    &format!(
                        "Command '{chain}' gets completion function '{function}', already used by '{existing}'"
                    ),
                );
            }
        } else {
            self.function_names.insert(function, chain);
        }
    }

    /// Warns when two custom-completed parameters of one command share a stub name.
    fn validate_stub_names(&mut self, command: &CommandSpec, path: &str) {
        let options = command
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| !option.hidden)
            .map(|(idx, option)| {
                let longest = CommandOption::from(option).longest_name().to_string();
                (format!("options[{idx}]"), longest, &option.complete)
            });
        let arguments = command
            .arguments
            .iter()
            .enumerate()
            .map(|(idx, arg)| (format!("arguments[{idx}]"), arg.name.clone(), &arg.complete));

        let mut seen: HashMap<String, String> = HashMap::new();
        for (segment, name, complete) in options.chain(arguments) {
            if !matches!(complete, CandidateSpec::Custom(_)) {
                continue;
            }
            let stub = sanitize_identifier(&name);
            match seen.get(&stub) {
                Some(first) if *first != name => self.add_warning(
                    &join(path, &segment),
                    &format!("'{name}' and '{first}' share the custom completion function suffix '{stub}'"),
                ),
                Some(_) => {}
                None => {
                    seen.insert(stub, name);
                }
            }
        }
    }

    // ========================================================================
    // Options
    // ========================================================================

    fn validate_option(&mut self, option: &OptionSpec, path: &str) {
        if option.names.is_empty() {
            self.add_error(&join(path, "names"), "Option must have at least one name");
            return;
        }

        for (idx, name) in option.names.iter().enumerate() {
            if !is_prefixed(name) {
                self.add_error(
                    &join(path, &format!("names[{idx}]")),
                    &format!("Option name '{name}' must start with a prefix character such as '-'"),
                );
            }
        }

        self.validate_candidates(&option.complete, path);

        let is_custom = matches!(option.complete, CandidateSpec::Custom(_));
        if option.hidden && is_custom {
            self.add_warning(
                &join(path, "complete"),
                "Hidden option has a custom candidate source that is never emitted",
            );
        }

        if option.arity == 0 && option.complete != CandidateSpec::None {
            self.add_warning(
                &join(path, "complete"),
                "Option takes no value, so its candidate source is never used",
            );
        }

        if !option.hidden {
            let model = CommandOption::from(option);
            let (short, long) = model.short_and_long_names();
            if short.is_empty() && long.is_empty() {
                self.add_warning(
                    &join(path, "names"),
                    "No name has a '-x' or '--long' form; fish completion skips this option",
                );
            }
        }
    }

    // ========================================================================
    // Arguments and Aliases
    // ========================================================================

    fn validate_arguments(&mut self, command: &CommandSpec, path: &str) {
        let unbounded: Vec<usize> = command
            .arguments
            .iter()
            .enumerate()
            .filter(|(_, arg)| arg.arity < 0)
            .map(|(idx, _)| idx)
            .collect();

        if unbounded.len() > 1 {
            self.add_error(
                &join(path, "arguments"),
                &format!(
                    "Only one argument may take every remaining token, found {}",
                    unbounded.len()
                ),
            );
        }

        let last = command.arguments.len().saturating_sub(1);
        for idx in unbounded.into_iter().filter(|&idx| idx != last) {
            self.add_error(
                &join(path, &format!("arguments[{idx}]")),
                "An argument taking every remaining token must be declared last",
            );
        }

        for (idx, arg) in command.arguments.iter().enumerate() {
            let arg_path = join(path, &format!("arguments[{idx}]"));
            if arg.name.trim().is_empty() {
                self.add_error(&join(&arg_path, "name"), "Argument name is required");
            }
            self.validate_candidates(&arg.complete, &arg_path);
        }
    }

    /// Warns about custom snippets that are present but blank.
    fn validate_candidates(&mut self, complete: &CandidateSpec, path: &str) {
        let CandidateSpec::Custom(snippets) = complete else {
            return;
        };
        for (shell, snippet) in [("bash", &snippets.bash), ("fish", &snippets.fish)] {
            if snippet.as_deref().is_some_and(|text| text.trim().is_empty()) {
                self.add_warning(
                    &join(path, &format!("complete.custom.{shell}")),
                    &format!("Custom {shell} snippet is blank and completes nothing"),
                );
            }
        }
    }

    fn validate_aliases(&mut self, command: &CommandSpec, path: &str) {
        let subcommands: HashSet<&str> =
            command.subcommands.iter().map(|sub| sub.name.as_str()).collect();

        for (alias, tokens) in &command.aliases {
            let alias_path = join(path, &format!("aliases.{alias}"));
            if subcommands.contains(alias.as_str()) {
                self.add_error(
                    &alias_path,
                    &format!("Alias '{alias}' has the same name as a subcommand"),
                );
            }
            if tokens.is_empty() {
                self.add_error(&alias_path, &format!("Alias '{alias}' expands to nothing"));
            }
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Appends a path segment; the root node has the empty path.
fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}

/// An option name is a punctuation prefix followed by at least one character.
fn is_prefixed(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_punctuation()) && chars.next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tabforge_core::config::{ArgumentSpec, CustomSnippets};

    fn limits() -> ConfigLimits {
        ConfigLimits {
            max_config_size: 1024,
            max_depth: 4,
            max_subcommands: 8,
        }
    }

    fn command(name: &str) -> CommandSpec {
        CommandSpec {
            name: name.to_string(),
            help: String::new(),
            allow_interspersed_args: true,
            options: Vec::new(),
            arguments: Vec::new(),
            aliases: IndexMap::new(),
            subcommands: Vec::new(),
        }
    }

    fn option(names: &[&str]) -> OptionSpec {
        OptionSpec {
            names: names.iter().map(ToString::to_string).collect(),
            arity: 0,
            complete: CandidateSpec::None,
            help: String::new(),
            hidden: false,
        }
    }

    fn argument(name: &str, arity: i32) -> ArgumentSpec {
        ArgumentSpec {
            name: name.to_string(),
            arity,
            complete: CandidateSpec::None,
            help: String::new(),
        }
    }

    fn validate(spec: &CommandSpec) -> ValidationResult {
        Validator::new().validate(spec, &limits())
    }

    fn has_issue(issues: &[ValidationIssue], path: &str, fragment: &str) -> bool {
        issues
            .iter()
            .any(|issue| issue.path == path && issue.message.contains(fragment))
    }

    #[test]
    fn test_validate_minimal() {
        let result = validate(&command("git"));
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_empty_name() {
        let result = validate(&command(""));
        assert!(has_issue(&result.errors, "name", "required"));
    }

    #[test]
    fn test_validate_duplicate_subcommands() {
        let mut spec = command("git");
        spec.subcommands = vec![command("add"), command("add")];
        let result = validate(&spec);
        assert!(has_issue(&result.errors, "subcommands[1].name", "Duplicate"));
    }

    #[test]
    fn test_validate_option_without_names() {
        let mut spec = command("git");
        spec.options = vec![option(&[])];
        let result = validate(&spec);
        assert!(has_issue(&result.errors, "options[0].names", "at least one"));
    }

    #[test]
    fn test_validate_unprefixed_option_name() {
        let mut spec = command("git");
        spec.options = vec![option(&["--ok", "verbose", "-"])];
        let result = validate(&spec);
        assert!(has_issue(&result.errors, "options[0].names[1]", "prefix"));
        assert!(has_issue(&result.errors, "options[0].names[2]", "prefix"));
        assert!(!has_issue(&result.errors, "options[0].names[0]", "prefix"));
    }

    #[test]
    fn test_validate_unbounded_arguments() {
        let mut spec = command("cp");
        spec.arguments = vec![argument("src", -1), argument("dst", 1), argument("rest", -1)];
        let result = validate(&spec);
        assert!(has_issue(&result.errors, "arguments", "Only one"));
        assert!(has_issue(&result.errors, "arguments[0]", "declared last"));
        assert!(!has_issue(&result.errors, "arguments[2]", "declared last"));
    }

    #[test]
    fn test_validate_alias_collisions() {
        let mut spec = command("git");
        spec.subcommands = vec![command("status")];
        spec.aliases.insert("status".to_string(), vec!["status".to_string()]);
        spec.aliases.insert("nothing".to_string(), Vec::new());
        let result = validate(&spec);
        assert!(has_issue(&result.errors, "aliases.status", "same name"));
        assert!(has_issue(&result.errors, "aliases.nothing", "expands to nothing"));
    }

    #[test]
    fn test_validate_depth_limit() {
        let mut spec = command("l5");
        for name in ["l4", "l3", "l2", "l1"] {
            let mut parent = command(name);
            parent.subcommands = vec![spec];
            spec = parent;
        }
        let result = validate(&spec);
        assert!(
            result
                .errors
                .iter()
                .any(|issue| issue.message.contains("too deep"))
        );
    }

    #[test]
    fn test_validate_subcommand_limit() {
        let mut spec = command("git");
        spec.subcommands = (0..9).map(|i| command(&format!("s{i}"))).collect();
        let result = validate(&spec);
        assert!(has_issue(&result.errors, "subcommands", "Too many"));
    }

    #[test]
    fn test_validate_warnings() {
        let mut hidden_custom = option(&["--secret"]);
        hidden_custom.hidden = true;
        hidden_custom.arity = 1;
        hidden_custom.complete = CandidateSpec::Custom(CustomSnippets::default());

        let mut flag_with_candidates = option(&["--flag"]);
        flag_with_candidates.complete = CandidateSpec::Path;

        let mut spec = command("tool.v2");
        spec.options = vec![hidden_custom, flag_with_candidates, option(&["-name"])];

        let result = validate(&spec);
        assert!(result.is_valid());
        assert!(has_issue(&result.warnings, "name", "replaced"));
        assert!(has_issue(&result.warnings, "options[0].complete", "never emitted"));
        assert!(has_issue(&result.warnings, "options[1].complete", "no value"));
        assert!(has_issue(&result.warnings, "options[2].names", "fish"));
    }

    #[test]
    fn test_validate_sanitized_sibling_collision() {
        let mut spec = command("r");
        spec.subcommands = vec![command("a-b"), command("a_b")];
        let result = validate(&spec);
        assert!(result.is_valid());
        assert!(has_issue(&result.warnings, "subcommands[1].name", "_r_a_b"));
    }

    #[test]
    fn test_validate_collision_across_depths() {
        let mut nested = command("a");
        nested.subcommands = vec![command("b")];
        let mut spec = command("r");
        spec.subcommands = vec![nested, command("a.b")];
        let result = validate(&spec);
        assert!(has_issue(&result.warnings, "subcommands[1].name", "already used by 'r a b'"));
    }

    #[test]
    fn test_validate_duplicate_sibling_not_double_reported() {
        let mut spec = command("r");
        spec.subcommands = vec![command("x"), command("x")];
        let result = validate(&spec);
        assert!(has_issue(&result.errors, "subcommands[1].name", "Duplicate"));
        assert!(!has_issue(&result.warnings, "subcommands[1].name", "completion function"));
    }

    #[test]
    fn test_validate_stub_name_collision() {
        let custom = || {
            CandidateSpec::Custom(CustomSnippets {
                bash: Some("COMPREPLY=(x)".to_string()),
                fish: None,
            })
        };
        let mut opt = option(&["--a-b"]);
        opt.arity = 1;
        opt.complete = custom();
        let mut arg = argument("__a_b", 1);
        arg.complete = custom();
        let mut spec = command("tool");
        spec.options = vec![opt];
        spec.arguments = vec![arg];
        let result = validate(&spec);
        assert!(has_issue(&result.warnings, "arguments[0]", "suffix '__a_b'"));
    }

    #[test]
    fn test_validate_blank_custom_snippet() {
        let mut opt = option(&["--ref"]);
        opt.arity = 1;
        opt.complete = CandidateSpec::Custom(CustomSnippets {
            bash: Some("  \n".to_string()),
            fish: Some("git branch".to_string()),
        });
        let mut arg = argument("file", 1);
        arg.complete = CandidateSpec::Custom(CustomSnippets {
            bash: None,
            fish: Some(String::new()),
        });
        let mut spec = command("git");
        spec.options = vec![opt];
        spec.arguments = vec![arg];

        let result = validate(&spec);
        assert!(result.is_valid());
        assert!(has_issue(&result.warnings, "options[0].complete.custom.bash", "blank"));
        assert!(!has_issue(&result.warnings, "options[0].complete.custom.fish", "blank"));
        assert!(has_issue(&result.warnings, "arguments[0].complete.custom.fish", "blank"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut spec = command("");
        spec.options = vec![option(&[]), option(&["bad"])];
        spec.subcommands = vec![command(""), command("x"), command("x")];
        let result = validate(&spec);
        assert!(result.errors.len() >= 4);
    }

    #[test]
    fn test_promote_warnings() {
        let mut result = validate(&command("tool.v2"));
        assert!(result.is_valid());
        result.promote_warnings();
        assert!(result.has_errors());
        assert!(result.warnings.is_empty());
        assert_eq!(result.errors[0].severity, Severity::Error);
    }
}
