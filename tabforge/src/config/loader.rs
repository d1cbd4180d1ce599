//! Description loader
//!
//! This module implements the description loading pipeline:
//! 1. Size limit check
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing
//! 4. Deserialization to [`CommandSpec`]
//! 5. Validation
//! 6. Conversion into the read-only [`Command`] tree

use std::path::Path;

use serde_yaml::Value;
use tabforge_core::Command;
use tabforge_core::config::CommandSpec;
use tabforge_core::error::ConfigError;
use tracing::debug;

use crate::config::validation::Validator;

// ============================================================================
// Public API
// ============================================================================

/// Options for the description loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for description size.
    pub config_limits: ConfigLimits,

    /// Treat validation warnings as errors.
    pub strict: bool,
}

/// Limits for description size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum description file size in bytes.
    pub max_config_size: usize,

    /// Maximum command nesting depth (the root is depth 1).
    pub max_depth: usize,

    /// Maximum number of direct subcommands of one command.
    pub max_subcommands: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("TABFORGE_MAX_CONFIG_SIZE", 1024 * 1024),
            max_depth: env_or("TABFORGE_MAX_DEPTH", 16),
            max_subcommands: env_or("TABFORGE_MAX_SUBCOMMANDS", 500),
        }
    }
}

/// Result of loading a description file.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated command tree.
    pub command: Command,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during description loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) if !location.is_empty() => {
                write!(f, "{} at {location}", self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}

/// Description loader.
///
/// Handles the full loading pipeline from YAML file to [`Command`] tree.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a description file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - An environment variable marked required is unset
    /// - YAML parsing or deserialization fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size =
            usize::try_from(metadata.len()).unwrap_or(self.options.config_limits.max_config_size);
        self.check_size(file_size)?;

        let raw_content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        debug!(path = %path.display(), bytes = raw_content.len(), "loading command description");
        self.load_from_str(&raw_content, path)
    }

    /// Loads a description from text already in memory.
    ///
    /// `source` is only used in error messages and warnings.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`], minus the file access errors.
    pub fn load_from_str(&self, content: &str, source: &Path) -> Result<LoadResult, ConfigError> {
        self.check_size(content.len())?;

        let mut warnings = Vec::new();

        // Handle UTF-8 BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        // Stage 1: Environment variable substitution (before YAML parsing)
        let mut env_sub = EnvSubstitution::new(source);
        let substituted = env_sub.substitute(content)?;
        warnings.extend(env_sub.warnings);

        // Stage 2: YAML parsing
        let root: Value =
            serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                path: source.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        if root.is_null() {
            return Err(ConfigError::EmptyFile {
                path: source.to_path_buf(),
            });
        }

        // Stage 3: Deserialize to typed description
        let spec: CommandSpec =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: source.to_path_buf(),
                line: None,
                message: format!("Failed to deserialize command description: {e}"),
            })?;

        // Stage 4: Validation
        let mut validation = Validator::new().validate(&spec, &self.options.config_limits);
        if self.options.strict {
            validation.promote_warnings();
        }

        if validation.has_errors() {
            return Err(ConfigError::ValidationError {
                path: source.display().to_string(),
                errors: validation.errors,
            });
        }

        for issue in validation.warnings {
            warnings.push(LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            });
        }

        // Stage 5: Convert
        let command = Command::from(&spec);
        debug!(
            command = command.name(),
            subcommands = command.subcommands().len(),
            warnings = warnings.len(),
            "command description loaded"
        );

        Ok(LoadResult { command, warnings })
    }

    fn check_size(&self, size: usize) -> Result<(), ConfigError> {
        let max = self.options.config_limits.max_config_size;
        if size > max {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{size} bytes"),
                expected: format!("at most {max} bytes"),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Pre-parse environment variable substitution.
///
/// Runs on raw YAML text BEFORE parsing so substituted values take part in
/// YAML type inference.
struct EnvSubstitution<'a> {
    source: &'a Path,
    line: usize,
    warnings: Vec<LoadWarning>,
}

/// A parsed `${...}` reference.
struct VarRef {
    name: String,
    fallback: Fallback,
}

enum Fallback {
    /// `${VAR}`: empty string with a warning.
    Empty,
    /// `${VAR:-default}`
    Default(String),
    /// `${VAR:?message}`
    Required(String),
}

type Chars<'s> = std::iter::Peekable<std::str::Chars<'s>>;

impl<'a> EnvSubstitution<'a> {
    const fn new(source: &'a Path) -> Self {
        Self {
            source,
            line: 1,
            warnings: Vec::new(),
        }
    }

    /// Substitutes environment variables in raw YAML text.
    ///
    /// Supports:
    /// - `${VAR}` - expand to value (empty string if unset with warning)
    /// - `${VAR:-default}` - expand to default if unset
    /// - `${VAR:?message}` - fail if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw_yaml: &str) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw_yaml.len());
        let mut chars = raw_yaml.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, chars.peek().copied()) {
                ('$', Some('$')) => {
                    chars.next();
                    result.push('$');
                }
                ('$', Some('{')) => {
                    chars.next();
                    let var = self.parse_var_ref(&mut chars)?;
                    result.push_str(&self.resolve(var)?);
                }
                _ => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    result.push(c);
                }
            }
        }

        Ok(result)
    }

    fn resolve(&mut self, var: VarRef) -> Result<String, ConfigError> {
        if let Ok(value) = std::env::var(&var.name) {
            return Ok(value);
        }

        match var.fallback {
            Fallback::Default(default) => Ok(default),
            Fallback::Required(message) => Err(ConfigError::EnvVarNotSet {
                var: var.name,
                location: format!("{}:{}: {message}", self.source.display(), self.line),
            }),
            Fallback::Empty => {
                self.warnings.push(LoadWarning {
                    message: format!(
                        "Environment variable '{}' is not set, using empty string",
                        var.name
                    ),
                    location: Some(format!("{}:{}", self.source.display(), self.line)),
                });
                Ok(String::new())
            }
        }
    }

    /// Parses the body of a `${...}` reference; the opening `${` is consumed.
    fn parse_var_ref(&mut self, chars: &mut Chars<'_>) -> Result<VarRef, ConfigError> {
        let mut name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => {
                    return Ok(VarRef {
                        name,
                        fallback: Fallback::Empty,
                    });
                }
                ':' if chars.peek() == Some(&'-') => {
                    chars.next();
                    let default = self.read_until_close(chars, &name)?;
                    return Ok(VarRef {
                        name,
                        fallback: Fallback::Default(default),
                    });
                }
                ':' if chars.peek() == Some(&'?') => {
                    chars.next();
                    let message = self.read_until_close(chars, &name)?;
                    return Ok(VarRef {
                        name,
                        fallback: Fallback::Required(message),
                    });
                }
                _ => name.push(c),
            }
        }

        Err(self.unclosed(&name))
    }

    /// Reads up to the matching `}`, keeping nested brace pairs.
    fn read_until_close(&mut self, chars: &mut Chars<'_>, name: &str) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1usize;

        for c in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                '\n' => self.line += 1,
                _ => {}
            }
            value.push(c);
        }

        Err(self.unclosed(name))
    }

    fn unclosed(&self, name: &str) -> ConfigError {
        ConfigError::ParseError {
            path: self.source.to_path_buf(),
            line: Some(self.line),
            message: format!("Unclosed environment variable reference: ${{{name}"),
        }
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
