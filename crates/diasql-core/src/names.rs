/// How [`fix_name`] treats its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMode {
    /// Trim, lowercase and join words with underscores before transliterating.
    Identifier,
    /// Only transliterate; case and whitespace are kept.
    Comment,
}

/// Normalize diagram text into an SQL-friendly identifier or comment.
///
/// Accented Latin vowels and `ñ` are folded to their plain equivalents and
/// the question marks `?`/`¿` are dropped.
pub fn fix_name(text: &str, mode: NameMode) -> String {
    let base = match mode {
        NameMode::Identifier => text.trim().replace(' ', "_").to_lowercase(),
        NameMode::Comment => text.to_string(),
    };

    base.chars().filter_map(transliterate).collect()
}

/// Shorthand for [`fix_name`] in identifier mode.
pub fn normalize_identifier(text: &str) -> String {
    fix_name(text, NameMode::Identifier)
}

/// Shorthand for [`fix_name`] in comment mode.
pub fn normalize_comment(text: &str) -> String {
    fix_name(text, NameMode::Comment)
}

/// Remove Dia's `#` string delimiters.
pub(crate) fn strip_marker(text: &str) -> String {
    text.replace('#', "")
}

fn transliterate(ch: char) -> Option<char> {
    match ch {
        'á' => Some('a'),
        'é' => Some('e'),
        'í' => Some('i'),
        'ó' => Some('o'),
        'ú' => Some('u'),
        'ñ' => Some('n'),
        '?' | '¿' => None,
        other => Some(other),
    }
}
