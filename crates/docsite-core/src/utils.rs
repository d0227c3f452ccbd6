//! Utility functions for character-safe string operations

/// Keep at most `max_chars` characters of `s`.
///
/// Operates on `char` boundaries so multi-byte text never splits.
///
/// ```
/// use docsite_core::utils::truncate_chars;
///
/// assert_eq!(truncate_chars("Hello 世界", 7), "Hello 世");
/// assert_eq!(truncate_chars("short", 50), "short");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_end, _)) => &s[..byte_end],
        None => s,
    }
}

/// Turn a kebab-case path segment into a title: `getting-started` → `Getting Started`.
pub fn humanize_segment(segment: &str) -> String {
    let stem = segment
        .strip_suffix(".mdx")
        .or_else(|| segment.strip_suffix(".md"))
        .unwrap_or(segment);

    stem.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Grouping label for a route: the second path segment, humanized.
///
/// `/docs/getting-started/install` → `Getting Started`; shallower paths fall
/// back to `Documentation`.
pub fn section_label(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .nth(1)
        .map_or_else(|| "Documentation".to_string(), humanize_segment)
}

/// Strip a trailing `/` unless the path is just `/`.
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// A character window around a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharWindow {
    pub text: String,
    pub clipped_start: bool,
    pub clipped_end: bool,
}

/// Extract a window of `before`/`after` characters around a match given in
/// character offsets, clamped to the content bounds.
pub fn char_window(
    content: &[char],
    match_start: usize,
    match_len: usize,
    before: usize,
    after: usize,
) -> CharWindow {
    let start = match_start.saturating_sub(before);
    let end = (match_start + match_len + after).min(content.len());
    let start = start.min(end);

    CharWindow {
        text: content[start..end].iter().collect(),
        clipped_start: start > 0,
        clipped_end: end < content.len(),
    }
}
