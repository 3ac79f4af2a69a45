// SPDX-License-Identifier: MPL-2.0
//! Text cleanup applied before commentary is sent for speech synthesis.
//!
//! Two passes, in order:
//!
//! 1. [`replace_numbers_with_words`] rewrites each standalone integer as
//!    `"<digits> (<words>)"` so scores are pronounced unambiguously.
//! 2. [`strip_emoji`] drops pictographic code points the voice would read
//!    out literally or stumble over.
//!
//! Numbers are expanded on the raw text: an emoji between a letter and a
//! digit still separates them, even though it is removed afterwards.
//!
//! ```
//! use pitchside::commentary::speech_text::prepare_for_speech;
//!
//! assert_eq!(
//!     prepare_for_speech("Score 10 to 5 ⚽"),
//!     "Score 10 (ten) to 5 (five) "
//! );
//! ```

use super::number_words;

/// Inclusive ranges of pictographic and emoji-joining code points.
///
/// ASCII digits, `#` and `*` are never listed even though they may start a
/// keycap sequence; only the trailing keycap mark is dropped.
const PICTOGRAPHIC_RANGES: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x200D, 0x200D),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x20E3, 0x20E3),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2199),
    (0x21A9, 0x21AA),
    (0x231A, 0x231B),
    (0x2328, 0x2328),
    (0x23CF, 0x23CF),
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FE),
    (0x2600, 0x27BF),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),
    (0x2B55, 0x2B55),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
    (0xFE0E, 0xFE0F),
    (0x1F000, 0x1FAFF),
    (0xE0020, 0xE007F),
];

/// True for code points treated as emoji or emoji modifiers.
#[must_use]
pub fn is_pictographic(c: char) -> bool {
    let code = u32::from(c);
    // Sorted by start, so a binary search finds the candidate range
    let idx = PICTOGRAPHIC_RANGES.partition_point(|&(start, _)| start <= code);
    idx > 0 && code <= PICTOGRAPHIC_RANGES[idx - 1].1
}

/// Removes every pictographic code point, leaving all other text intact.
#[must_use]
pub fn strip_emoji(text: &str) -> String {
    text.chars().filter(|&c| !is_pictographic(c)).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrites each standalone run of ASCII digits as `"<digits> (<words>)"`.
///
/// A run counts as standalone when neither neighbour is a letter, digit or
/// underscore, so `"3rd"` and `"A1"` are left alone while `"10-5"` yields two
/// substitutions. Runs too large for `u64` are left unchanged.
#[must_use]
pub fn replace_numbers_with_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);
        if let Some(c) = before.chars().next_back() {
            prev = Some(c);
        }

        let len = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (digits, after) = tail.split_at(len);
        let next = after.chars().next();

        let standalone = !prev.is_some_and(is_word_char) && !next.is_some_and(is_word_char);
        match digits.parse::<u64>() {
            Ok(value) if standalone => {
                out.push_str(digits);
                out.push_str(" (");
                out.push_str(&number_words::to_words(value));
                out.push(')');
            }
            _ => out.push_str(digits),
        }

        prev = digits.chars().next_back();
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Full preprocessing: number expansion followed by emoji removal.
#[must_use]
pub fn prepare_for_speech(text: &str) -> String {
    strip_emoji(&replace_numbers_with_words(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_sorted_and_disjoint() {
        for pair in PICTOGRAPHIC_RANGES.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0, "{:x?} overlaps {:x?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn strips_common_emoji() {
        assert_eq!(strip_emoji("Goal ⚽🔥!"), "Goal !");
        assert_eq!(strip_emoji("👍🏽 nice"), " nice");
        assert_eq!(strip_emoji("❤️ fans"), " fans");
    }

    #[test]
    fn keeps_digits_and_keycap_bases() {
        assert_eq!(strip_emoji("1️⃣ first"), "1 first");
        assert_eq!(strip_emoji("#9 *"), "#9 *");
    }

    #[test]
    fn keeps_plain_text_and_accents() {
        let text = "Mbappé, à la 90e minute";
        assert_eq!(strip_emoji(text), text);
    }

    #[test]
    fn score_line_is_expanded() {
        assert_eq!(
            replace_numbers_with_words("Score 10 to 5"),
            "Score 10 (ten) to 5 (five)"
        );
    }

    #[test]
    fn only_standalone_integers_are_expanded() {
        assert_eq!(replace_numbers_with_words("3rd minute"), "3rd minute");
        assert_eq!(replace_numbers_with_words("Player A1"), "Player A1");
        assert_eq!(
            replace_numbers_with_words("2-1 lead"),
            "2 (two)-1 (one) lead"
        );
        assert_eq!(
            replace_numbers_with_words("at 45+2."),
            "at 45 (forty-five)+2 (two)."
        );
    }

    #[test]
    fn decimal_parts_are_expanded_separately() {
        assert_eq!(
            replace_numbers_with_words("2.5 km"),
            "2 (two).5 (five) km"
        );
    }

    #[test]
    fn leading_zeros_keep_digits() {
        assert_eq!(replace_numbers_with_words("007"), "007 (seven)");
    }

    #[test]
    fn oversized_numbers_are_untouched() {
        let big = "123456789012345678901234567890";
        assert_eq!(replace_numbers_with_words(big), big);
    }

    #[test]
    fn text_without_digits_is_unchanged() {
        assert_eq!(replace_numbers_with_words("kick-off"), "kick-off");
        assert_eq!(replace_numbers_with_words(""), "");
    }

    #[test]
    fn emoji_around_numbers_are_removed() {
        assert_eq!(prepare_for_speech("🔥3🔥"), "3 (three)");
    }

    #[test]
    fn emoji_between_letter_and_digit_keeps_number_standalone() {
        assert_eq!(prepare_for_speech("A⚽2"), "A2 (two)");
        assert_eq!(prepare_for_speech("Team A⚽2 wins"), "Team A2 (two) wins");
    }

    #[test]
    fn joiner_and_variation_selector_separate_words_from_digits() {
        // U+2764 U+FE0F, then a ZWJ sequence
        assert_eq!(prepare_for_speech("fans\u{2764}\u{FE0F}7"), "fans7 (seven)");
        assert_eq!(
            prepare_for_speech("Red\u{1F468}\u{200D}\u{1F466}9"),
            "Red9 (nine)"
        );
    }

    #[test]
    fn keycap_digit_is_expanded() {
        assert_eq!(prepare_for_speech("1\u{FE0F}\u{20E3} first"), "1 (one) first");
    }
}
