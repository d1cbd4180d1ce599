//! Conversion of a clap command definition into the completion model.
//!
//! `tabforge completions` runs tabforge's own parser definition through the
//! same generators as user-supplied descriptions.

use clap::ValueHint;
use tabforge_core::{ArgArity, Argument, Command, CommandOption, CompletionCandidate};

/// Converts a built clap command (see [`clap::Command::build`]) into a
/// [`Command`] tree.
///
/// Hidden subcommands are dropped; hidden options are kept but marked hidden.
#[must_use]
pub fn command_from_clap(cmd: &clap::Command) -> Command {
    let mut command = Command::new(cmd.get_name());
    if let Some(about) = cmd.get_about() {
        command = command.with_help(about.to_string());
    }

    for arg in cmd.get_arguments() {
        if arg.is_positional() {
            command = command.with_argument(argument_from_clap(arg));
        } else if let Some(option) = option_from_clap(arg) {
            command = command.with_option(option);
        }
    }

    for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        for alias in sub.get_visible_aliases() {
            command = command.with_alias(alias, [sub.get_name()]);
        }
        command = command.with_subcommand(command_from_clap(sub));
    }

    command
}

/// Named argument, or `None` when it has neither a short nor a long name.
fn option_from_clap(arg: &clap::Arg) -> Option<CommandOption> {
    let shorts = arg
        .get_short_and_visible_aliases()
        .unwrap_or_default()
        .into_iter()
        .map(|c| format!("-{c}"));
    let longs = arg
        .get_long_and_visible_aliases()
        .unwrap_or_default()
        .into_iter()
        .map(|name| format!("--{name}"));
    let names: Vec<String> = shorts.chain(longs).collect();
    if names.is_empty() {
        return None;
    }

    let arity = if arg.get_action().takes_values() {
        arg.get_num_args().map_or(1, |range| range.min_values())
    } else {
        0
    };

    let mut option = CommandOption::new(names)
        .with_arity(arity)
        .with_candidates(candidates_from_clap(arg))
        .with_hidden(arg.is_hide_set());
    if let Some(help) = arg.get_help() {
        option = option.with_help(help.to_string());
    }
    Some(option)
}

fn argument_from_clap(arg: &clap::Arg) -> Argument {
    let arity = match arg.get_num_args() {
        Some(range) if range.max_values() == usize::MAX => ArgArity::Unbounded,
        Some(range) => ArgArity::Fixed(range.min_values().max(1)),
        None => ArgArity::Fixed(1),
    };

    let mut argument = Argument::new(arg.get_id().as_str())
        .with_arity(arity)
        .with_candidates(candidates_from_clap(arg));
    if let Some(help) = arg.get_help() {
        argument = argument.with_help(help.to_string());
    }
    argument
}

/// Possible values win over value hints.
fn candidates_from_clap(arg: &clap::Arg) -> CompletionCandidate {
    let values: Vec<String> = arg
        .get_possible_values()
        .iter()
        .filter(|value| !value.is_hide_set())
        .map(|value| value.get_name().to_string())
        .collect();
    if !values.is_empty() {
        return CompletionCandidate::Fixed(values);
    }

    match arg.get_value_hint() {
        ValueHint::AnyPath | ValueHint::FilePath | ValueHint::DirPath | ValueHint::ExecutablePath => {
            CompletionCandidate::Path
        }
        ValueHint::Hostname => CompletionCandidate::Hostname,
        ValueHint::Username => CompletionCandidate::Username,
        _ => CompletionCandidate::None,
    }
}
