//! Shell quoting helpers.
//!
//! All quoting for generated scripts goes through this module so the
//! emitters never build quoted text by hand. Command, option and alias names
//! are free-form strings; anything that is not plainly safe gets quoted.

/// Characters that need no quoting in a bash word, a `case` pattern or a fish word.
fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '+' | '@' | ',' | '%' | '=')
}

/// Wraps `text` in bash single quotes.
///
/// Embedded single quotes become `'\''` (close, escaped quote, reopen).
#[must_use]
pub fn bash_single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// Renders `text` as a bash word, quoting only when necessary.
///
/// Used for `case` patterns and `complete` arguments, where a bare
/// `commit)` reads better than `'commit')` but `*` must not glob.
#[must_use]
pub fn bash_word(text: &str) -> String {
    if !text.is_empty() && text.chars().all(is_plain) {
        text.to_string()
    } else {
        bash_single_quote(text)
    }
}

/// Renders a space-separated word list for `compgen -W`.
#[must_use]
pub fn bash_word_list<S: AsRef<str>>(words: &[S]) -> String {
    let joined = words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    bash_single_quote(&joined)
}

/// Builds the regex atom for an option-prefix test, e.g. `[+-]`.
///
/// Characters are de-duplicated in first-seen order. Inside the brackets `]`
/// goes first so it does not close the class, `[` goes after the ordinary
/// characters so it cannot open `[:`, `[.` or `[=`, `^` is kept off the front
/// so it does not negate, and `-` goes last so it is not a range. A lone `^`
/// is escaped outside brackets instead. POSIX brackets take `\` literally.
#[must_use]
pub fn bash_bracket_class<I: IntoIterator<Item = char>>(chars: I) -> String {
    let mut unique: Vec<char> = Vec::new();
    for c in chars {
        if !unique.contains(&c) {
            unique.push(c);
        }
    }
    let has = |c: char| unique.contains(&c);
    let ordinary: Vec<char> = unique
        .iter()
        .copied()
        .filter(|c| !matches!(*c, ']' | '[' | '^' | '-'))
        .collect();

    if has('^') && !has(']') && !has('[') && ordinary.is_empty() {
        return if has('-') { "[-^]".to_string() } else { r"\^".to_string() };
    }

    let mut class = String::from("[");
    if has(']') {
        class.push(']');
    }
    class.extend(ordinary);
    for c in ['[', '^', '-'] {
        if has(c) {
            class.push(c);
        }
    }
    class.push(']');
    class
}

/// Wraps `text` in fish single quotes, escaping `\` and `'`.
#[must_use]
pub fn fish_single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', r"\\").replace('\'', r"\'"))
}

/// Escapes `text` for the inside of a fish double-quoted string.
#[must_use]
pub fn fish_double_quote_inner(text: &str) -> String {
    text.replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('$', r"\$")
}

/// Wraps `text` in fish double quotes with `\`, `"` and `$` escaped.
#[must_use]
pub fn fish_double_quote(text: &str) -> String {
    format!("\"{}\"", fish_double_quote_inner(text))
}

/// Renders `text` as a fish word, quoting only when necessary.
#[must_use]
pub fn fish_word(text: &str) -> String {
    if !text.is_empty() && text.chars().all(is_plain) {
        text.to_string()
    } else {
        fish_single_quote(text)
    }
}
