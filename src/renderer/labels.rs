//! Target label layout

/// Labels longer than this many characters are split
const MAX_SINGLE_LINE: usize = 14;

/// Split a label into one or two display lines.
///
/// More than two words, or more than 14 characters, wraps with the first
/// line taking the larger half of the words.
pub fn wrap_label(label: &str) -> Vec<String> {
    let words: Vec<&str> = label.split_whitespace().collect();
    if words.len() < 2 || (words.len() <= 2 && label.chars().count() <= MAX_SINGLE_LINE) {
        return vec![label.to_string()];
    }
    let split = words.len().div_ceil(2);
    vec![words[..split].join(" "), words[split..].join(" ")]
}
