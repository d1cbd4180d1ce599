//! bash and zsh completion script emitter.
//!
//! Emits one completion function per command node. Each function scans the
//! words before the cursor to work out what is being completed (an option's
//! value, a positional slot, the unbounded argument, or nothing in
//! particular), then dispatches on that parameter. Subcommand words hand off
//! to the subcommand's own function.
//!
//! zsh output is the same bash code behind a `bashcompinit` preamble.

use tabforge_core::{Command, CompletionCandidate, ShellKind};
use tracing::{debug, trace};

use crate::candidates::{bash_completion, custom_snippet};
use crate::escape::{bash_bracket_class, bash_single_quote, bash_word, bash_word_list};
use crate::names::{custom_stub_name, function_name};
use crate::{GENERATED_BY, ScriptGenerator};

/// bash completion script generator.
pub struct BashGenerator;

impl ScriptGenerator for BashGenerator {
    fn generate(&self, root: &Command) -> String {
        generate_script(root, ShellKind::Bash)
    }

    fn shell(&self) -> ShellKind {
        ShellKind::Bash
    }
}

/// zsh completion script generator (bash functions under `bashcompinit`).
pub struct ZshGenerator;

impl ScriptGenerator for ZshGenerator {
    fn generate(&self, root: &Command) -> String {
        generate_script(root, ShellKind::Zsh)
    }

    fn shell(&self) -> ShellKind {
        ShellKind::Zsh
    }
}

/// Builds the full script for `root` in the bash dialect.
///
/// `shell` selects the preamble only; it must be [`ShellKind::Bash`] or
/// [`ShellKind::Zsh`]. Everything after the preamble is identical for both.
fn generate_script(root: &Command, shell: ShellKind) -> String {
    let mut lines = Vec::new();
    let mut ancestors = Vec::new();
    emit_command(root, &mut ancestors, shell, &mut lines);

    if lines.is_empty() {
        return String::new();
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Parameter name and candidate source for one dispatch branch.
struct Param<'a> {
    name: &'a str,
    candidates: &'a CompletionCandidate,
}

fn emit_command<'a>(
    command: &'a Command,
    ancestors: &mut Vec<&'a str>,
    shell: ShellKind,
    lines: &mut Vec<String>,
) {
    if command.is_empty_for_completion() {
        trace!(command = command.name(), "nothing to complete, skipping");
        return;
    }

    ancestors.push(command.name());
    let is_root = ancestors.len() == 1;
    let func_name = function_name(ancestors.as_slice());

    debug!(
        command = command.name(),
        function = %func_name,
        options = command.visible_options().count(),
        arguments = command.arguments().len(),
        subcommands = command.subcommands().len(),
        "emitting {shell} completion function"
    );

    if is_root {
        emit_preamble(command, shell, lines);
    }

    let params: Vec<Param<'a>> = command
        .visible_options()
        .map(|option| Param {
            name: option.longest_name(),
            candidates: option.candidates(),
        })
        .chain(command.arguments().iter().map(|arg| Param {
            name: arg.name(),
            candidates: arg.candidates(),
        }))
        .collect();

    emit_custom_stubs(&func_name, &params, lines);

    lines.push(String::new());
    lines.push(format!("{func_name}() {{"));
    emit_locals(command, is_root, lines);
    emit_scan_loop(command, ancestors, lines);
    emit_dispatch(command, &func_name, &params, lines);
    lines.push("}".to_string());

    for subcommand in command.subcommands() {
        emit_command(subcommand, ancestors, shell, lines);
    }

    ancestors.pop();

    if is_root {
        lines.push(String::new());
        lines.push(format!("complete -F {func_name} {}", bash_word(command.name())));
    }
}

fn emit_preamble(root: &Command, shell: ShellKind, lines: &mut Vec<String>) {
    lines.push(format!("#!/usr/bin/env {shell}"));
    lines.push(format!("# Command completion for {}", root.name()));
    lines.push(format!("# {GENERATED_BY}"));
    lines.push(String::new());

    if shell == ShellKind::Zsh {
        lines.push("autoload bashcompinit".to_string());
        lines.push("bashcompinit".to_string());
        lines.push(String::new());
    }

    // Writes through to the caller's local `i`: skips the option word and a
    // detached `=` so `--opt value` and `--opt=value` scan alike.
    lines.push("__skip_opt_eq() {".to_string());
    lines.push("    (( i = i + 1 ))".to_string());
    lines.push(r#"    if [[ "${COMP_WORDS[$i]}" == '=' ]]; then"#.to_string());
    lines.push("        (( i = i + 1 ))".to_string());
    lines.push("    fi".to_string());
    lines.push("}".to_string());
}

fn emit_custom_stubs(func_name: &str, params: &[Param<'_>], lines: &mut Vec<String>) {
    for param in params {
        let Some(body) = custom_snippet(param.candidates, ShellKind::Bash) else {
            if matches!(param.candidates, CompletionCandidate::Custom(_)) {
                trace!(param = param.name, "custom generator has no bash snippet");
            }
            continue;
        };

        lines.push(String::new());
        lines.push(format!("{}() {{", custom_stub_name(func_name, param.name)));
        lines.extend(indent_body(&body));
        lines.push("}".to_string());
    }
}

fn emit_locals(command: &Command, is_root: bool, lines: &mut Vec<String>) {
    let fixed_arg_names = command
        .fixed_arg_names()
        .into_iter()
        .map(bash_single_quote)
        .collect::<Vec<_>>()
        .join(" ");
    let vararg_name = bash_single_quote(command.vararg_name().unwrap_or_default());

    lines.push(format!("  local i={}", if is_root { "1" } else { "$1" }));
    lines.push("  local in_param=''".to_string());
    lines.push(format!("  local fixed_arg_names=({fixed_arg_names})"));
    lines.push(format!("  local vararg_name={vararg_name}"));
    lines.push("  local can_parse_options=1".to_string());
    lines.push(String::new());
}

fn emit_scan_loop(command: &Command, ancestors: &[&str], lines: &mut Vec<String>) {
    lines.push("  while [[ ${i} -lt $COMP_CWORD ]]; do".to_string());
    lines.push("    if [[ ${can_parse_options} -eq 1 ]]; then".to_string());
    lines.push(r#"      case "${COMP_WORDS[$i]}" in"#.to_string());
    lines.push("        --)".to_string());
    lines.push("          can_parse_options=0".to_string());
    lines.push("          (( i = i + 1 ))".to_string());
    lines.push("          continue".to_string());
    lines.push("          ;;".to_string());

    for option in command.visible_options() {
        let pattern = option
            .names()
            .iter()
            .map(|name| bash_word(name))
            .collect::<Vec<_>>()
            .join("|");
        lines.push(format!("        {pattern})"));
        lines.push("          __skip_opt_eq".to_string());
        if option.arity() > 0 {
            lines.push(format!("          (( i = i + {} ))", option.arity()));
            lines.push(format!(
                "          [[ ${{i}} -gt COMP_CWORD ]] && in_param={} || in_param=''",
                bash_single_quote(option.longest_name())
            ));
        } else {
            lines.push("          in_param=''".to_string());
        }
        lines.push("          continue".to_string());
        lines.push("          ;;".to_string());
    }

    lines.push("      esac".to_string());
    lines.push("    fi".to_string());
    lines.push(r#"    case "${COMP_WORDS[$i]}" in"#.to_string());

    for (alias, tokens) in command.aliases() {
        let spliced = tokens
            .iter()
            .map(|token| bash_single_quote(token))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("      {})", bash_word(alias)));
        lines.push("        (( i = i + 1 ))".to_string());
        lines.push(format!(
            r#"        COMP_WORDS=( "${{COMP_WORDS[@]:0:i}}" {spliced} "${{COMP_WORDS[@]:${{i}}}}" )"#
        ));
        lines.push(format!("        (( COMP_CWORD = COMP_CWORD + {} ))", tokens.len()));
        if !command.allows_interspersed_args() {
            lines.push("        can_parse_options=0".to_string());
        }
        lines.push("        ;;".to_string());
    }

    for subcommand in command.subcommands() {
        lines.push(format!("      {})", bash_word(subcommand.name())));
        if subcommand.is_empty_for_completion() {
            // No function is emitted for it; stop here with no suggestions.
            lines.push("        return".to_string());
        } else {
            let mut chain = ancestors.to_vec();
            chain.push(subcommand.name());
            lines.push(format!("        {} $(( i + 1 ))", function_name(&chain)));
            lines.push("        return".to_string());
        }
        lines.push("        ;;".to_string());
    }

    lines.push("      *)".to_string());
    lines.push("        (( i = i + 1 ))".to_string());
    lines.push("        # consume the next positional slot".to_string());
    lines.push(r#"        fixed_arg_names=("${fixed_arg_names[@]:1}")"#.to_string());
    if !command.allows_interspersed_args() {
        lines.push("        can_parse_options=0".to_string());
    }
    lines.push("        ;;".to_string());
    lines.push("    esac".to_string());
    lines.push("  done".to_string());
    lines.push(r#"  local word="${COMP_WORDS[$COMP_CWORD]}""#.to_string());
}

fn emit_dispatch(
    command: &Command,
    func_name: &str,
    params: &[Param<'_>],
    lines: &mut Vec<String>,
) {
    let option_names: Vec<&str> = command
        .visible_options()
        .flat_map(|option| option.names().iter().map(String::as_str))
        .collect();

    if !option_names.is_empty() {
        let prefixes = bash_bracket_class(option_names.iter().filter_map(|name| name.chars().next()));
        // A quoted right-hand side of =~ matches literally, so the regex
        // goes through a variable.
        lines.push(format!("  local prefix_re={}", bash_single_quote(&format!("^{prefixes}"))));
        lines.push(r#"  if [[ "${word}" =~ $prefix_re ]]; then"#.to_string());
        lines.push(format!(
            r#"    COMPREPLY=($(compgen -W {} -- "${{word}}"))"#,
            bash_word_list(&option_names)
        ));
        lines.push("    return".to_string());
        lines.push("  fi".to_string());
    }

    lines.push(String::new());
    lines.push("  # an option value in progress wins, then the next fixed slot, then the vararg".to_string());
    lines.push(r#"  [[ -z "${in_param}" ]] && in_param=${fixed_arg_names[0]}"#.to_string());
    lines.push(r#"  [[ -z "${in_param}" ]] && in_param=${vararg_name}"#.to_string());
    lines.push(String::new());
    lines.push(r#"  case "${in_param}" in"#.to_string());

    for param in params {
        lines.push(format!("    {})", bash_word(param.name)));
        let stub_name = custom_stub_name(func_name, param.name);
        if let Some(reply) = bash_completion(param.candidates, &stub_name) {
            lines.push(format!("      {reply}"));
        }
        lines.push("      ;;".to_string());
    }

    if !command.subcommands().is_empty() {
        let names: Vec<&str> = command.subcommands().iter().map(Command::name).collect();
        lines.push("    *)".to_string());
        lines.push(format!(
            r#"      COMPREPLY=($(compgen -W {} -- "${{word}}"))"#,
            bash_word_list(&names)
        ));
        lines.push("      ;;".to_string());
    }

    lines.push("  esac".to_string());
}

/// Dedents a snippet and indents it two spaces for a function body.
///
/// Leading and trailing blank lines are dropped; interior blank lines stay
/// empty.
fn indent_body(body: &str) -> Vec<String> {
    let lines: Vec<&str> = body.lines().collect();
    let Some(first) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return Vec::new();
    };
    let last = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(first);
    let lines = &lines[first..=last];

    let margin = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("  {}", line.chars().skip(margin).collect::<String>())
            }
        })
        .collect()
}
