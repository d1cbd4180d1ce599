//! Read-only command-tree model.
//!
//! A [`Command`] tree is built once (by hand, from a description file, or from
//! a `clap` definition) and then consumed immutably by the script generators.
//! Builder methods consume `self`; there are no setters after construction.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

// ============================================================================
// Shell Kind
// ============================================================================

/// Target shell dialect for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ShellKind {
    /// GNU bash (`complete -F`).
    Bash,
    /// zsh through its `bashcompinit` compatibility layer.
    Zsh,
    /// fish (`complete -c`).
    Fish,
}

impl ShellKind {
    /// Every supported shell, in a stable order.
    pub const ALL: [Self; 3] = [Self::Bash, Self::Zsh, Self::Fish];

    /// Lowercase shell name as used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Completion Candidates
// ============================================================================

type SnippetFn = dyn Fn(ShellKind) -> Option<String> + Send + Sync;

/// Per-shell snippet source for [`CompletionCandidate::Custom`].
///
/// Returning `None` for a shell means that shell gets no dynamic suggestions
/// for the parameter.
#[derive(Clone)]
pub struct CustomGenerator(Arc<SnippetFn>);

impl CustomGenerator {
    /// Wraps a snippet-producing function.
    pub fn new<F>(generator: F) -> Self
    where
        F: Fn(ShellKind) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(generator))
    }

    /// Builds a generator from literal bash and fish snippets.
    ///
    /// zsh runs the bash completion functions through `bashcompinit`, so it
    /// gets the bash snippet.
    #[must_use]
    pub fn from_snippets(bash: Option<String>, fish: Option<String>) -> Self {
        Self::new(move |shell| match shell {
            ShellKind::Bash | ShellKind::Zsh => bash.clone(),
            ShellKind::Fish => fish.clone(),
        })
    }

    /// Invokes the generator for `shell`.
    #[must_use]
    pub fn snippet(&self, shell: ShellKind) -> Option<String> {
        (self.0)(shell)
    }
}

impl fmt::Debug for CustomGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomGenerator(..)")
    }
}

/// Source of suggested values for an option or argument.
#[derive(Debug, Clone, Default)]
pub enum CompletionCandidate {
    /// No suggestions.
    #[default]
    None,
    /// Filesystem paths.
    Path,
    /// Known hostnames.
    Hostname,
    /// Local user names.
    Username,
    /// A fixed list of literal words.
    Fixed(Vec<String>),
    /// A shell-specific snippet supplied by the application.
    Custom(CustomGenerator),
}

impl CompletionCandidate {
    /// Fixed word list.
    pub fn fixed<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixed(words.into_iter().map(Into::into).collect())
    }

    /// Custom per-shell generator.
    pub fn custom<F>(generator: F) -> Self
    where
        F: Fn(ShellKind) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(CustomGenerator::new(generator))
    }

    /// Returns `true` for [`CompletionCandidate::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// ============================================================================
// Options
// ============================================================================

/// A named option such as `--output`/`-o`.
#[derive(Debug, Clone)]
pub struct CommandOption {
    names: Vec<String>,
    arity: usize,
    candidates: CompletionCandidate,
    help: String,
    hidden: bool,
}

impl CommandOption {
    /// Creates a flag (arity 0) accepting `names`.
    ///
    /// Duplicate names are dropped; declaration order is kept.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self {
            names: unique,
            arity: 0,
            candidates: CompletionCandidate::None,
            help: String::new(),
            hidden: false,
        }
    }

    /// Sets the number of values the option consumes.
    #[must_use]
    pub const fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the candidate source for the option's value.
    #[must_use]
    pub fn with_candidates(mut self, candidates: CompletionCandidate) -> Self {
        self.candidates = candidates;
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Marks the option hidden. Hidden options never reach a script.
    #[must_use]
    pub const fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Accepted names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of values consumed; 0 for a flag.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Candidate source for the option's value.
    #[must_use]
    pub const fn candidates(&self) -> &CompletionCandidate {
        &self.candidates
    }

    /// Help text (may be empty).
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Whether the option is hidden.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The first of the longest names, used as the option's parameter name.
    #[must_use]
    pub fn longest_name(&self) -> &str {
        self.names
            .iter()
            .rev()
            .max_by_key(|name| name.chars().count())
            .map_or("", String::as_str)
    }

    /// Names fish can register, with their dashes stripped.
    ///
    /// Short names are exactly one dash and one character; long names start
    /// with two dashes. Everything else is dropped.
    #[must_use]
    pub fn short_and_long_names(&self) -> (Vec<&str>, Vec<&str>) {
        let mut short = Vec::new();
        let mut long = Vec::new();
        for name in &self.names {
            let Some(rest) = name.strip_prefix('-') else {
                continue;
            };
            if rest.starts_with('-') {
                let trimmed = rest.trim_start_matches('-');
                if !trimmed.is_empty() {
                    long.push(trimmed);
                }
            } else if rest.chars().count() == 1 {
                short.push(rest);
            }
        }
        (short, long)
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// Number of tokens a positional argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgArity {
    /// Exactly this many tokens.
    Fixed(usize),
    /// Every remaining token.
    Unbounded,
}

impl ArgArity {
    /// Maps a signed value count; any negative count is unbounded.
    #[must_use]
    pub fn from_nvalues(nvalues: i32) -> Self {
        usize::try_from(nvalues).map_or(Self::Unbounded, Self::Fixed)
    }

    /// Signed value count, −1 for [`ArgArity::Unbounded`].
    #[must_use]
    pub fn nvalues(self) -> i32 {
        match self {
            Self::Fixed(count) => i32::try_from(count).unwrap_or(i32::MAX),
            Self::Unbounded => -1,
        }
    }

    /// Returns `true` for [`ArgArity::Unbounded`].
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl Default for ArgArity {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// A positional argument.
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    arity: ArgArity,
    candidates: CompletionCandidate,
    help: String,
}

impl Argument {
    /// Creates a single-value argument.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: ArgArity::default(),
            candidates: CompletionCandidate::None,
            help: String::new(),
        }
    }

    /// Sets the arity.
    #[must_use]
    pub const fn with_arity(mut self, arity: ArgArity) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the arity from a signed count (negative = unbounded).
    #[must_use]
    pub fn with_nvalues(self, nvalues: i32) -> Self {
        self.with_arity(ArgArity::from_nvalues(nvalues))
    }

    /// Sets the candidate source.
    #[must_use]
    pub fn with_candidates(mut self, candidates: CompletionCandidate) -> Self {
        self.candidates = candidates;
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Argument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arity.
    #[must_use]
    pub const fn arity(&self) -> ArgArity {
        self.arity
    }

    /// Candidate source.
    #[must_use]
    pub const fn candidates(&self) -> &CompletionCandidate {
        &self.candidates
    }

    /// Help text (may be empty).
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }
}

// ============================================================================
// Commands
// ============================================================================

/// A command node: the root command or any subcommand.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    help: String,
    options: Vec<CommandOption>,
    arguments: Vec<Argument>,
    subcommands: Vec<Self>,
    aliases: IndexMap<String, Vec<String>>,
    allow_interspersed_args: bool,
}

impl Command {
    /// Creates an empty command that allows interspersed arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            options: Vec::new(),
            arguments: Vec::new(),
            subcommands: Vec::new(),
            aliases: IndexMap::new(),
            allow_interspersed_args: true,
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Appends an option.
    #[must_use]
    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Appends a subcommand.
    #[must_use]
    pub fn with_subcommand(mut self, subcommand: Self) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Adds an alias expanding to `tokens`. Re-adding a name replaces it in place.
    #[must_use]
    pub fn with_alias<I, S>(mut self, name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases
            .insert(name.into(), tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Sets whether positional tokens may be mixed with options.
    #[must_use]
    pub const fn with_interspersed_args(mut self, allow: bool) -> Self {
        self.allow_interspersed_args = allow;
        self
    }

    /// Command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text (may be empty).
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// All options, hidden ones included.
    #[must_use]
    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// Options that take part in completion.
    pub fn visible_options(&self) -> impl Iterator<Item = &CommandOption> {
        self.options.iter().filter(|option| !option.is_hidden())
    }

    /// Positional arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Direct subcommands in declaration order.
    #[must_use]
    pub fn subcommands(&self) -> &[Self] {
        &self.subcommands
    }

    /// Alias name to expansion tokens, in declaration order.
    #[must_use]
    pub const fn aliases(&self) -> &IndexMap<String, Vec<String>> {
        &self.aliases
    }

    /// Whether positional tokens may be mixed with options.
    #[must_use]
    pub const fn allows_interspersed_args(&self) -> bool {
        self.allow_interspersed_args
    }

    /// Queue of positional slot names filled before the unbounded argument.
    ///
    /// Each leading fixed argument contributes its name once per value it
    /// consumes; the queue stops at the first argument that is not a positive
    /// fixed count.
    #[must_use]
    pub fn fixed_arg_names(&self) -> Vec<&str> {
        self.arguments
            .iter()
            .map_while(|arg| match arg.arity() {
                ArgArity::Fixed(count) if count > 0 => Some((arg.name(), count)),
                _ => None,
            })
            .flat_map(|(name, count)| std::iter::repeat_n(name, count))
            .collect()
    }

    /// Name of the argument that consumes every remaining token, if any.
    #[must_use]
    pub fn vararg_name(&self) -> Option<&str> {
        self.arguments
            .iter()
            .find(|arg| arg.arity().is_unbounded())
            .map(Argument::name)
    }

    /// Returns `true` when there is nothing to complete at this node.
    #[must_use]
    pub fn is_empty_for_completion(&self) -> bool {
        self.visible_options().next().is_none()
            && self.arguments.is_empty()
            && self.subcommands.is_empty()
    }
}
