//! Line classification and normalization for the INI format.
//!
//! Every line of a config file is one of four record types. Entries and
//! headings are normalized here before they reach the store; the parser
//! only decides what to do with them.

/// Kind of record a single config line holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// Blank, whitespace-only or comment-only line
    Empty,
    /// `[Section Name]`
    Heading,
    /// `key = value`
    Entry,
    /// Anything else; skipped with a warning
    Unknown,
}

/// Classify one raw line.
///
/// Headings win over entries, so `[a=b]` is a heading.
pub fn classify(line: &str) -> RecordType {
    let content = line.trim_start_matches([' ', '\t']);

    if content.is_empty() || content.starts_with('#') {
        return RecordType::Empty;
    }

    if let Some(rest) = content.strip_prefix('[')
        && rest.contains(']')
    {
        return RecordType::Heading;
    }

    match content.find('=') {
        Some(pos) if pos > 0 => RecordType::Entry,
        _ => RecordType::Unknown,
    }
}

/// Truncate at the first `#`. There is no escape for a literal `#`.
pub fn remove_comments(text: &str) -> &str {
    match text.find('#') {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Trim leading and trailing spaces and tabs (only those two).
pub fn strip_whitespace(text: &str) -> &str {
    text.trim_matches([' ', '\t'])
}

/// Split an entry line on its first `=`.
///
/// Comments are removed from the value only; a `#` inside the key is kept.
pub fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((strip_whitespace(key), strip_whitespace(remove_comments(value))))
}

/// Extract the section name from a heading line.
///
/// Returns `None` for a heading that no longer ends in `]` once comments are
/// removed, or whose name is empty.
pub fn heading_name(line: &str) -> Option<&str> {
    let heading = strip_whitespace(remove_comments(line));
    let name = heading.strip_prefix('[')?.strip_suffix(']')?;
    if name.is_empty() { None } else { Some(name) }
}
