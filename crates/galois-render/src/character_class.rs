/// Coarse classification of a single source character, as seen by the
/// implicit-multiplication rules.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    /// Anything the rules do not look at.
    #[default]
    Other,
    /// An ASCII digit.
    Digit,
    /// An ASCII letter.
    Letter,
    /// `(`
    Open,
    /// `)`
    Close,
}

impl Class {
    #[inline]
    pub(crate) fn of(ch: char) -> Self {
        match ch {
            '0'..='9' => Class::Digit,
            'a'..='z' | 'A'..='Z' => Class::Letter,
            '(' => Class::Open,
            ')' => Class::Close,
            _ => Class::Other,
        }
    }
}

/// Returns `true` if `ch` would continue a word, in the sense of a regex `\b`.
#[inline]
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
