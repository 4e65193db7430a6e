//! Greedy word wrapping

use crate::metrics::{Font, TextMeasure};

/// Wrap `text` into lines no wider than `max_width`
///
/// Explicit newlines always break. Words wider than a whole line are split
/// by character. Always returns at least one (possibly empty) line.
pub fn wrap_text(
    measure: &dyn TextMeasure,
    text: &str,
    font: Font,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let fits = |s: &str| measure.text_width(s, font, size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut had_words = false;

        for word in paragraph.split_whitespace() {
            had_words = true;
            if current.is_empty() {
                if fits(word) {
                    current.push_str(word);
                } else {
                    current = break_word(word, &fits, &mut lines);
                }
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if fits(&candidate) {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                if fits(word) {
                    current.push_str(word);
                } else {
                    current = break_word(word, &fits, &mut lines);
                }
            }
        }

        if had_words {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Push full-width pieces of `word` and return the trailing remainder
fn break_word(word: &str, fits: &dyn Fn(&str) -> bool, lines: &mut Vec<String>) -> String {
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if !fits(&piece) && piece.chars().count() > 1 {
            piece.pop();
            lines.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    piece
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedWidthMeasure;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    // 5pt per character at size 10
    const M: FixedWidthMeasure = FixedWidthMeasure { em_ratio: 0.5 };

    fn wrap(text: &str, max_width: f32) -> Vec<String> {
        wrap_text(&M, text, Font::Regular, 10.0, max_width)
    }

    #[test]
    fn test_empty_text_is_one_blank_line() {
        assert_eq!(wrap("", 100.0), vec![String::new()]);
    }

    #[test]
    fn test_greedy_fill() {
        // 10 chars per line
        assert_eq!(wrap("aaaa bbbb cccc dd", 50.0), vec!["aaaa bbbb", "cccc dd"]);
    }

    #[test]
    fn test_newlines_and_blank_lines_are_kept() {
        assert_eq!(wrap("one\n\ntwo", 100.0), vec!["one", "", "two"]);
    }

    #[test]
    fn test_long_word_is_split() {
        assert_eq!(wrap("abcdefghijkl xy", 25.0), vec!["abcde", "fghij", "kl xy"]);
    }

    #[test]
    fn test_single_char_always_placed() {
        assert_eq!(wrap("ab", 1.0), vec!["a", "b"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn wrapped_lines_fit(words in prop::collection::vec("[a-z]{1,12}", 0..40), chars_per_line in 1usize..30) {
            let text = words.join(" ");
            let max_width = chars_per_line as f32 * 5.0;
            for line in wrap(&text, max_width) {
                prop_assert!(line.chars().count() <= chars_per_line.max(1));
            }
        }

        #[test]
        fn words_survive_when_they_fit(words in prop::collection::vec("[a-z]{1,8}", 0..40)) {
            let text = words.join(" ");
            let lines = wrap(&text, 40.0);
            let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
            prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
