//! Bounded-length string rendering.

/// Cut `input` down to at most `max_length` characters.
///
/// Empty input, or input that already fits, is returned unchanged. Length is
/// counted in `char`s so the cut always lands on a character boundary.
///
/// ```
/// use ob_common::truncate;
///
/// assert_eq!(truncate("abcdef", 3), "abc");
/// assert_eq!(truncate("ab", 5), "ab");
/// assert_eq!(truncate("", 5), "");
/// ```
pub fn truncate(input: &str, max_length: usize) -> &str {
    // Byte length is an upper bound on char count.
    if input.len() <= max_length {
        return input;
    }
    match input.char_indices().nth(max_length) {
        Some((cut, _)) => &input[..cut],
        None => input,
    }
}
