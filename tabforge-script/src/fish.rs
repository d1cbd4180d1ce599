//! fish completion script emitter.
//!
//! fish scans the command line itself, so the output is purely declarative:
//! `set` declarations recording each node's subcommand names and `complete`
//! statements conditioned on which subcommands have been seen.

use tabforge_core::{Command, CommandOption, ShellKind};
use tracing::{debug, trace};

use crate::candidates::fish_completion;
use crate::escape::{fish_double_quote_inner, fish_single_quote, fish_word};
use crate::names::subcommands_var_name;
use crate::{GENERATED_BY, ScriptGenerator};

/// fish completion script generator.
pub struct FishGenerator;

impl ScriptGenerator for FishGenerator {
    fn generate(&self, root: &Command) -> String {
        if !has_fish_requirements(root) {
            trace!(command = root.name(), "no options or subcommands for fish");
            return String::new();
        }

        let mut lines = Vec::new();
        let mut ancestors = Vec::new();
        let root_word = fish_word(root.name());
        emit_command(root, None, &mut ancestors, &root_word, &mut lines);

        let mut script = lines.join("\n");
        script.push('\n');
        script
    }

    fn shell(&self) -> ShellKind {
        ShellKind::Fish
    }
}

/// fish output needs a visible prefixed option or a subcommand at the root.
fn has_fish_requirements(root: &Command) -> bool {
    !root.subcommands().is_empty()
        || root
            .visible_options()
            .any(|option| option.names().iter().any(|name| name.starts_with('-')))
}

/// The parent of a non-root node: its name and its subcommand variable.
struct Parent<'p> {
    name: &'p str,
    var_name: &'p str,
}

fn emit_command<'a>(
    command: &'a Command,
    parent: Option<&Parent<'_>>,
    ancestors: &mut Vec<&'a str>,
    root_word: &str,
    lines: &mut Vec<String>,
) {
    ancestors.push(command.name());
    let var_name = subcommands_var_name(ancestors.as_slice());
    let subcommand_list = command
        .subcommands()
        .iter()
        .map(|sub| fish_word(sub.name()))
        .collect::<Vec<_>>()
        .join(" ");

    debug!(
        command = command.name(),
        variable = %var_name,
        subcommands = command.subcommands().len(),
        "emitting fish completions"
    );

    match parent {
        None => {
            lines.push(format!("# Command completion for {}", command.name()));
            lines.push(format!("# {GENERATED_BY}"));
            lines.push(String::new());

            if !command.subcommands().is_empty() {
                lines.push("### Declaring root subcommands".to_string());
                lines.push(format!("set -l {var_name} {subcommand_list}"));
                lines.push(String::new());
            }
        }
        Some(parent) => {
            lines.push(String::new());
            lines.push(format!("### Declaring {}", command.name()));

            if !command.subcommands().is_empty() {
                lines.push(format!("set -l {var_name} {subcommand_list}"));
            }

            // Direct children of the root only need "no subcommand yet"; deeper
            // nodes need the parent seen and none of its subcommands yet. The
            // parent's list expands when the statement is registered.
            let condition = if ancestors.len() == 2 {
                "__fish_use_subcommand".to_string()
            } else {
                format!(
                    "\"__fish_seen_subcommand_from {}; and not __fish_seen_subcommand_from ${}\"",
                    fish_double_quote_inner(parent.name),
                    parent.var_name
                )
            };

            let mut statement = format!(
                "complete -f -c {root_word} -n {condition} -a {}",
                fish_word(command.name())
            );
            if !command.help().trim().is_empty() {
                statement.push_str(" -d ");
                statement.push_str(&fish_single_quote(command.help()));
            }
            lines.push(statement);
        }
    }

    let option_condition = match parent {
        None if command.subcommands().is_empty() => None,
        None => Some(format!("\"not __fish_seen_subcommand_from ${var_name}\"")),
        Some(_) => Some(format!(
            "\"__fish_seen_subcommand_from {}\"",
            fish_double_quote_inner(command.name())
        )),
    };

    let option_lines: Vec<String> = command
        .visible_options()
        .filter_map(|option| option_statement(option, root_word, option_condition.as_deref()))
        .collect();

    if !option_lines.is_empty() {
        if parent.is_none() {
            lines.push("### Adding top level options".to_string());
        }
        lines.extend(option_lines);
    }

    let this = Parent {
        name: command.name(),
        var_name: &var_name,
    };
    for subcommand in command.subcommands() {
        emit_command(subcommand, Some(&this), ancestors, root_word, lines);
    }

    ancestors.pop();
}

/// One `complete` statement for an option, or `None` when fish cannot
/// register any of its names.
fn option_statement(
    option: &CommandOption,
    root_word: &str,
    condition: Option<&str>,
) -> Option<String> {
    let (short, long) = option.short_and_long_names();
    if short.is_empty() && long.is_empty() {
        trace!(names = ?option.names(), "option has no short or long form, skipping");
        return None;
    }

    let mut parts = vec![format!("complete -f -c {root_word}")];
    if let Some(condition) = condition {
        parts.push(format!("-n {condition}"));
    }
    parts.extend(short.iter().map(|name| format!("-s {}", fish_word(name))));
    parts.extend(long.iter().map(|name| format!("-l {}", fish_word(name))));
    if option.arity() > 0 {
        parts.push("--require-parameter".to_string());
    }
    if let Some(candidates) = fish_completion(option.candidates()) {
        parts.push(candidates);
    }
    if !option.help().trim().is_empty() {
        parts.push(format!("-d {}", fish_single_quote(option.help())));
    }

    Some(parts.join(" "))
}
