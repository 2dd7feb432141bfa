use crate::error::SnippetNotFound;

/// Bytes of context kept before the match.
pub const PREV_STEP: usize = 50;
/// Bytes of context kept after the start of the match.
pub const NEXT_STEP: usize = 100;
pub const ELLIPSIS: &str = "...";

/// Cut a snippet of `body` around the first case-insensitive occurrence of
/// `term`.
///
/// The window spans from `PREV_STEP` bytes before the match to `NEXT_STEP`
/// bytes after its start, clamped to the body and to char boundaries. The
/// last byte of the body is never included. Snippets may cut words in half.
pub fn extract(body: &str, term: &str) -> Result<String, SnippetNotFound> {
    if body.is_empty() || term.is_empty() {
        return Err(SnippetNotFound::EmptyInput);
    }
    let pos = find_case_insensitive(body, term).ok_or(SnippetNotFound::TermAbsent)?;

    let start = floor_char_boundary(body, pos.saturating_sub(PREV_STEP));
    let end = floor_char_boundary(body, (body.len() - 1).min(pos + NEXT_STEP));
    if start >= end {
        return Err(SnippetNotFound::DegenerateWindow);
    }

    let mut snippet = String::with_capacity(end - start + ELLIPSIS.len());
    snippet.push_str(&body[start..end]);
    snippet.push_str(ELLIPSIS);
    Ok(snippet)
}

/// Byte offset of the first occurrence of `needle` in `haystack`, comparing
/// lowercased chars.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| starts_with_ignore_case(&haystack[i..], needle))
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut text = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| text.next() == Some(p))
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "hello world this is a test document about boost asio networking";

    #[test]
    fn short_body_keeps_everything_but_the_last_byte() {
        let snippet = extract(BODY, "test").unwrap();
        assert_eq!(snippet, format!("{}...", &BODY[..BODY.len() - 1]));
    }

    #[test]
    fn window_is_bounded_on_both_sides() {
        let body = format!("{}needle{}", "a".repeat(200), "b".repeat(200));
        let snippet = extract(&body, "needle").unwrap();
        let expected = &body[150..300];
        assert_eq!(snippet, format!("{expected}..."));
        assert!(snippet.starts_with(&"a".repeat(50)));
    }

    #[test]
    fn match_ignores_case() {
        let snippet = extract("Boost.Asio Overview", "ASIO").unwrap();
        assert_eq!(snippet, "Boost.Asio Overvie...");
    }

    #[test]
    fn absent_term_is_not_found() {
        assert_eq!(extract(BODY, "filesystem"), Err(SnippetNotFound::TermAbsent));
    }

    #[test]
    fn empty_body_is_not_found() {
        assert_eq!(extract("", "asio"), Err(SnippetNotFound::EmptyInput));
    }

    #[test]
    fn single_byte_body_has_no_window() {
        assert_eq!(extract("a", "a"), Err(SnippetNotFound::DegenerateWindow));
    }

    #[test]
    fn window_never_splits_a_char() {
        // match at byte 51, so the raw window start falls inside the leading 'é'
        let body = format!("é{}asio", "x".repeat(49));
        let snippet = extract(&body, "asio").unwrap();
        assert_eq!(snippet, format!("é{}asi...", "x".repeat(49)));
    }
}
