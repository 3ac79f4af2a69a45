// SPDX-License-Identifier: MPL-2.0
//! English cardinal words for non-negative integers.
//!
//! Output style: `"twenty-one"`, `"one hundred twenty-three"`,
//! `"one thousand, two hundred thirty-four"`.

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Scale names, indexed by power of one thousand.
const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Spells out `n` in English words.
#[must_use]
pub fn to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    let mut scale = 0;
    while rest > 0 {
        let group = (rest % 1000) as usize;
        if group > 0 {
            let words = below_thousand(group);
            groups.push(if SCALES[scale].is_empty() {
                words
            } else {
                format!("{} {}", words, SCALES[scale])
            });
        }
        rest /= 1000;
        scale += 1;
    }

    groups.reverse();
    groups.join(", ")
}

fn below_thousand(n: usize) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let tail = match rest {
        0 => None,
        1..=19 => Some(ONES[rest].to_string()),
        _ => Some(match rest % 10 {
            0 => TENS[rest / 10].to_string(),
            unit => format!("{}-{}", TENS[rest / 10], ONES[unit]),
        }),
    };

    match (hundreds, tail) {
        (0, Some(tail)) => tail,
        (h, None) => format!("{} hundred", ONES[h]),
        (h, Some(tail)) => format!("{} hundred {}", ONES[h], tail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(to_words(0), "zero");
        assert_eq!(to_words(5), "five");
        assert_eq!(to_words(10), "ten");
        assert_eq!(to_words(13), "thirteen");
    }

    #[test]
    fn tens_use_hyphens() {
        assert_eq!(to_words(20), "twenty");
        assert_eq!(to_words(21), "twenty-one");
        assert_eq!(to_words(99), "ninety-nine");
    }

    #[test]
    fn hundreds_have_no_and() {
        assert_eq!(to_words(100), "one hundred");
        assert_eq!(to_words(123), "one hundred twenty-three");
        assert_eq!(to_words(910), "nine hundred ten");
    }

    #[test]
    fn scale_groups_are_comma_separated() {
        assert_eq!(to_words(1000), "one thousand");
        assert_eq!(to_words(1234), "one thousand, two hundred thirty-four");
        assert_eq!(to_words(2_000_005), "two million, five");
        assert_eq!(to_words(1_000_000_000), "one billion");
    }

    #[test]
    fn largest_value_is_spelled() {
        let words = to_words(u64::MAX);
        assert!(words.starts_with("eighteen quintillion"));
        assert!(words.ends_with("six hundred fifteen"));
    }
}
