//! Explicit multiplication for loosely typed polynomials.
//!
//! Users write `3x^2+2x+1`; the solver wants `3*x^2+2*x+1`. Normalization only ever inserts
//! `*` between two adjacent characters and never removes anything, so input the solver cannot
//! parse is passed through for the solver to reject.
//!
//! Only single adjacent characters are inspected. A multi-letter identifier such as `sin(x)`
//! becomes `sin*(x)`; this is a known limitation, not something the normalizer tries to guess
//! around.

use std::ops::Range;

use strum_macros::IntoStaticStr;

use crate::character_class::Class;

/// The rule that caused a multiplication sign to be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum Rule {
    #[strum(serialize = "digit followed by a letter")]
    DigitLetter,
    #[strum(serialize = "closing parenthesis followed by a letter")]
    CloseLetter,
    #[strum(serialize = "letter followed by an opening parenthesis")]
    LetterOpen,
}

impl Rule {
    #[inline]
    fn between(prev: Class, next: Class) -> Option<Self> {
        match (prev, next) {
            (Class::Digit, Class::Letter) => Some(Rule::DigitLetter),
            (Class::Close, Class::Letter) => Some(Rule::CloseLetter),
            (Class::Letter, Class::Open) => Some(Rule::LetterOpen),
            _ => None,
        }
    }
}

/// A multiplication sign inserted by [`normalize_explained`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Byte range in the raw input covering the two characters the sign was put between.
    pub span: Range<usize>,
    pub rule: Rule,
}

/// Make every implicit multiplication in `raw` explicit.
///
/// ```rust
/// use galois_render::normalize;
///
/// assert_eq!(normalize("3x^2+2x+1"), "3*x^2+2*x+1");
/// assert_eq!(normalize("3*x^2"), "3*x^2");
/// ```
pub fn normalize(raw: &str) -> String {
    normalize_explained(raw).0
}

/// Like [`normalize`], but also reports where each `*` went.
pub fn normalize_explained(raw: &str) -> (String, Vec<Insertion>) {
    let mut output = String::with_capacity(raw.len() + raw.len() / 4);
    let mut insertions = Vec::new();
    // The rules match disjoint character pairs, and an inserted `*` never forms a new pair, so a
    // single pass gives the same result as applying the rules one after the other.
    let mut prev: Option<(usize, Class)> = None;
    for (offset, ch) in raw.char_indices() {
        let class = Class::of(ch);
        if let Some((prev_offset, prev_class)) = prev
            && let Some(rule) = Rule::between(prev_class, class)
        {
            output.push('*');
            insertions.push(Insertion {
                span: prev_offset..offset + ch.len_utf8(),
                rule,
            });
        }
        output.push(ch);
        prev = Some((offset, class));
    }
    (output, insertions)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn inserts_exactly_where_needed() {
        let (normalized, insertions) = normalize_explained("3x^2+2x+1");
        assert_eq!(normalized, "3*x^2+2*x+1");
        assert_eq!(insertions.len(), 2);
        assert!(insertions.iter().all(|i| i.rule == Rule::DigitLetter));
        assert_eq!(insertions[0].span, 0..2);
        assert_eq!(insertions[1].span, 5..7);
    }

    #[test]
    fn explicit_multiplication_is_untouched() {
        assert_eq!(normalize("3*x^2"), "3*x^2");
        assert_eq!(normalize("x^4-10*x^2+1"), "x^4-10*x^2+1");
    }

    #[test]
    fn parenthesis_rules() {
        assert_eq!(normalize("(x+1)x"), "(x+1)*x");
        assert_eq!(normalize("x(x+1)"), "x*(x+1)");
        assert_eq!(normalize("2(x+1)"), "2(x+1)");
        assert_eq!(normalize("(x+1)(x-1)"), "(x+1)(x-1)");
    }

    #[test]
    fn rules_in_order() {
        let (normalized, insertions) = normalize_explained("2x(x+1)y");
        assert_eq!(normalized, "2*x*(x+1)*y");
        let rules: Vec<Rule> = insertions.iter().map(|i| i.rule).collect();
        assert_eq!(
            rules,
            [Rule::DigitLetter, Rule::LetterOpen, Rule::CloseLetter]
        );
    }

    #[test]
    fn multi_letter_identifiers_are_split() {
        assert_eq!(normalize("sin(x)"), "sin*(x)");
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(normalize("2π"), "2π");
        assert_eq!(normalize("x² + 1"), "x² + 1");
        let (_, insertions) = normalize_explained("é2x");
        assert_eq!(insertions[0].span, 2..4);
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[0-9a-z()+*^ -]{0,24}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn normalize_only_inserts(s in "\\PC{0,24}") {
            let (normalized, insertions) = normalize_explained(&s);
            prop_assert_eq!(normalized.len(), s.len() + insertions.len());
            prop_assert_eq!(normalized.replace('*', ""), s.replace('*', ""));
        }
    }
}
