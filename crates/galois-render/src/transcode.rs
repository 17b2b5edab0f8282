//! Typesetting markup for algebraic text.
//!
//! Two vocabularies exist, one for what users type and one for the glyphs the solver emits. They
//! never overlap in practice, but running either over text that is already markup would double
//! substitutions, so transcoding always starts from plain text and produces a [`Markup`].
//!
//! Anything not in a vocabulary is copied through unchanged, including existing `\commands`.

use std::fmt;

use crate::character_class::is_word_char;
use crate::symbols::{GREEK_NAMES, IMAGINARY_UNIT, RESULT_GLYPHS, Radical, superscript};

/// Which token vocabulary to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// Text typed by the user: `x^12`, `sqrt(2)`, `alpha`, `*`, `+-`.
    Input,
    /// Text produced by the solver: `√`, `∛`, `⁴√`, `ω`, `²`, `α`, `i`.
    Result,
}

/// A fragment that is ready to be handed to the typesetting engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> Self {
        markup.0
    }
}

/// Convert plain algebraic text into markup using the given vocabulary.
///
/// ```rust
/// use galois_render::{Vocabulary, to_markup};
///
/// let markup = to_markup("sqrt(2)*alpha", Vocabulary::Input);
/// assert_eq!(markup.as_str(), r"\sqrt{2}\cdot \alpha");
///
/// let markup = to_markup("∛(1+√5)", Vocabulary::Result);
/// assert_eq!(markup.as_str(), r"\sqrt[3]{1+\sqrt{5}}");
/// ```
pub fn to_markup(text: &str, vocabulary: Vocabulary) -> Markup {
    Markup(transcode(text, vocabulary))
}

/// Markup for the live preview of what the user is typing.
///
/// The raw text is previewed rather than its [`normalize`]d form: implicit products typeset
/// fine as they are, and normalizing would turn `sqrt(2)` into `sqrt*(2)`.
///
/// [`normalize`]: crate::normalize
pub fn preview(raw: &str) -> Markup {
    to_markup(raw.trim(), Vocabulary::Input)
}

fn transcode(text: &str, vocabulary: Vocabulary) -> String {
    let mut transcoder = Transcoder {
        source: text,
        pos: 0,
        output: String::with_capacity(text.len() + text.len() / 2),
        vocabulary,
    };
    transcoder.run();
    transcoder.output
}

struct Transcoder<'source> {
    source: &'source str,
    /// Byte offset of the next unread character.
    pos: usize,
    output: String,
    vocabulary: Vocabulary,
}

impl<'source> Transcoder<'source> {
    #[inline]
    fn rest(&self) -> &'source str {
        let source = self.source;
        &source[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    #[inline]
    fn prev(&self) -> Option<char> {
        self.source[..self.pos].chars().next_back()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn run(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.copy_command();
                continue;
            }
            match self.vocabulary {
                Vocabulary::Input => self.input_token(ch),
                Vocabulary::Result => self.result_token(ch),
            }
        }
    }

    /// Copy `\name` (or `\` followed by one character) verbatim.
    fn copy_command(&mut self) {
        let start = self.pos;
        self.bump();
        let name_len = self
            .rest()
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        if name_len == 0 {
            self.bump();
        } else {
            self.pos += name_len;
        }
        let source = self.source;
        self.output.push_str(&source[start..self.pos]);
    }

    /// Push `\name`. A space is added if the next source character is a letter, which would
    /// otherwise run into the command name.
    fn push_command(&mut self, name: &str) {
        self.output.push('\\');
        self.output.push_str(name);
        if self.peek().is_some_and(|ch| ch.is_ascii_alphabetic()) {
            self.output.push(' ');
        }
    }

    /// Transcode `inner` with the same vocabulary and append it.
    fn nested(&mut self, inner: &str) {
        let markup = transcode(inner, self.vocabulary);
        self.output.push_str(&markup);
    }

    /// Consume a balanced `open ... close` group starting at the current position and return
    /// what is between the delimiters.
    ///
    /// If the group is never closed, nothing is consumed and `None` is returned.
    fn group(&mut self, open: char, close: char) -> Option<&'source str> {
        let source = self.source;
        let start = self.pos + open.len_utf8();
        let mut depth = 0usize;
        for (offset, ch) in source[self.pos..].char_indices() {
            if ch == open {
                depth += 1;
            } else if ch == close {
                depth -= 1;
                if depth == 0 {
                    let end = self.pos + offset;
                    self.pos = end + close.len_utf8();
                    return Some(&source[start..end]);
                }
            }
        }
        None
    }

    fn input_token(&mut self, ch: char) {
        match ch {
            '+' | '-' => {
                self.bump();
                match (ch, self.peek()) {
                    ('+', Some('-')) => {
                        self.bump();
                        self.push_command("pm");
                    }
                    ('-', Some('+')) => {
                        self.bump();
                        self.push_command("mp");
                    }
                    _ => self.output.push(ch),
                }
            }
            '*' if self.peek_second() == Some('*') => {
                // `**` is the solver's spelling of `^`.
                self.pos += 2;
                self.output.push('^');
                self.exponent();
            }
            '*' => {
                self.bump();
                self.push_command("cdot");
            }
            '^' => {
                self.bump();
                self.output.push('^');
                self.exponent();
            }
            c if c.is_ascii_alphabetic() => self.word(),
            _ => {
                self.bump();
                self.output.push(ch);
            }
        }
    }

    /// Brace-delimit the exponent following a `^`.
    ///
    /// A parenthesized exponent loses its parentheses; a bare run of digits or letters (with an
    /// optional leading minus) is wrapped. An exponent that is already braced is left alone.
    fn exponent(&mut self) {
        let source = self.source;
        match self.peek() {
            Some('(') => {
                if let Some(inner) = self.group('(', ')') {
                    self.output.push('{');
                    self.nested(inner);
                    self.output.push('}');
                }
            }
            Some(c) if c.is_ascii_alphanumeric() || c == '-' => {
                let start = self.pos;
                let sign = usize::from(c == '-');
                let body = &source[start + sign..];
                let len = match body.chars().next() {
                    Some(d) if d.is_ascii_digit() => {
                        body.bytes().take_while(u8::is_ascii_digit).count()
                    }
                    Some(l) if l.is_ascii_alphabetic() => {
                        body.bytes().take_while(u8::is_ascii_alphabetic).count()
                    }
                    _ => 0,
                };
                if len == 0 {
                    return;
                }
                self.pos = start + sign + len;
                self.output.push('{');
                self.nested(&source[start..self.pos]);
                self.output.push('}');
            }
            _ => {}
        }
    }

    /// A maximal run of ASCII letters: a Greek letter name, `sqrt(...)`, or an identifier.
    fn word(&mut self) {
        let source = self.source;
        let start = self.pos;
        let after_boundary = !self.prev().is_some_and(is_word_char);
        let len = self
            .rest()
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        self.pos += len;
        let word = &source[start..self.pos];
        let before_boundary = !self.peek().is_some_and(is_word_char);

        if word == "sqrt"
            && self.peek() == Some('(')
            && let Some(inner) = self.group('(', ')')
        {
            self.output.push_str(r"\sqrt{");
            self.nested(inner);
            self.output.push('}');
            return;
        }
        if after_boundary
            && before_boundary
            && let Some(name) = GREEK_NAMES.get(word)
        {
            self.push_command(name);
            return;
        }
        self.output.push_str(word);
    }

    /// Returns the radical starting at the current position and the byte length of its glyph.
    fn radical_at(&self) -> Option<(Radical, usize)> {
        let ch = self.peek()?;
        if let Some(radical) = Radical::from_glyph(ch) {
            return Some((radical, ch.len_utf8()));
        }
        if ch == '⁴' && self.peek_second() == Some('√') {
            return Some((Radical::Fourth, ch.len_utf8() + '√'.len_utf8()));
        }
        None
    }

    fn result_token(&mut self, ch: char) {
        if let Some((radical, glyph_len)) = self.radical_at() {
            self.pos += glyph_len;
            let radicand = self.radicand();
            self.output.push_str(radical.opening());
            self.nested(radicand);
            self.output.push('}');
            return;
        }
        if superscript(ch).is_some() {
            self.output.push_str("^{");
            while self.radical_at().is_none()
                && let Some(ascii) = self.peek().and_then(superscript)
            {
                self.bump();
                self.output.push(ascii);
            }
            self.output.push('}');
            return;
        }
        let after_letter = self.prev().is_some_and(|c| c.is_ascii_alphabetic());
        self.bump();
        if let Some(name) = RESULT_GLYPHS.get(&ch) {
            self.push_command(name);
        } else if ch == IMAGINARY_UNIT
            && !after_letter
            && !self.peek().is_some_and(|c| c.is_ascii_alphabetic())
        {
            self.push_command("mathrm{i}");
        } else {
            self.output.push(ch);
        }
    }

    /// Consume the argument of a radical glyph and return its source text.
    ///
    /// The argument is a parenthesized or braced group, a number, a run of letters, a command, a
    /// single glyph, or another radical together with its own argument, each optionally signed.
    /// Anything else yields an empty argument, so the radical's braces are still balanced.
    fn radicand(&mut self) -> &'source str {
        let source = self.source;
        while self.peek() == Some(' ') {
            self.bump();
        }
        let start = self.pos;
        if !matches!(self.peek(), Some('-' | '+')) {
            return self.unsigned_radicand();
        }
        self.bump();
        if self.unsigned_radicand().is_empty() {
            // A lone sign stays outside the radical.
            self.pos = start;
            return "";
        }
        &source[start..self.pos]
    }

    fn unsigned_radicand(&mut self) -> &'source str {
        let source = self.source;
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return "";
        };
        match ch {
            '(' => self.group('(', ')').unwrap_or(""),
            '{' => self.group('{', '}').unwrap_or(""),
            c if c.is_ascii_digit() || c == '.' => {
                let len = self
                    .rest()
                    .bytes()
                    .take_while(|b| b.is_ascii_digit() || *b == b'.')
                    .count();
                self.pos += len;
                &source[start..self.pos]
            }
            c if c.is_ascii_alphabetic() => {
                let len = self
                    .rest()
                    .bytes()
                    .take_while(u8::is_ascii_alphabetic)
                    .count();
                self.pos += len;
                &source[start..self.pos]
            }
            '\\' => {
                self.bump();
                let len = self
                    .rest()
                    .bytes()
                    .take_while(u8::is_ascii_alphabetic)
                    .count();
                if len == 0 {
                    self.bump();
                } else {
                    self.pos += len;
                }
                &source[start..self.pos]
            }
            _ => {
                if let Some((_, glyph_len)) = self.radical_at() {
                    self.pos += glyph_len;
                    self.radicand();
                    &source[start..self.pos]
                } else if RESULT_GLYPHS.contains_key(&ch) {
                    self.bump();
                    &source[start..self.pos]
                } else {
                    ""
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn input(text: &str) -> String {
        to_markup(text, Vocabulary::Input).into_string()
    }

    fn result(text: &str) -> String {
        to_markup(text, Vocabulary::Result).into_string()
    }

    fn balanced(markup: &str) -> bool {
        let mut depth = 0i32;
        for ch in markup.chars() {
            match ch {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn polynomial_preview() {
        assert_snapshot!(input("x^4-10*x^2+1"), @r"x^{4}-10\cdot x^{2}+1");
        assert_snapshot!(preview(" 3x^2+2x+1 ").as_str(), @"3x^{2}+2x+1");
        assert_snapshot!(preview("sqrt(2)x").as_str(), @r"\sqrt{2}x");
    }

    #[test]
    fn exponents() {
        assert_eq!(input("x^12"), "x^{12}");
        assert_eq!(input("x^n"), "x^{n}");
        assert_eq!(input("x^-2"), "x^{-2}");
        assert_eq!(input("x^(n+1)"), "x^{n+1}");
        assert_eq!(input("x^{12}"), "x^{12}");
        assert_eq!(input("x**3"), "x^{3}");
        assert_eq!(input("e^alpha"), r"e^{\alpha}");
        // Nothing to brace.
        assert_eq!(input("x^"), "x^");
        assert_eq!(input("x^(n"), "x^(n");
    }

    #[test]
    fn greek_names_respect_word_boundaries() {
        assert_eq!(input("alpha"), r"\alpha");
        assert_eq!(input("alphabet"), "alphabet");
        assert_eq!(input("alpha2"), "alpha2");
        assert_eq!(input("2*pi"), r"2\cdot \pi");
        assert_eq!(input("pi*r^2"), r"\pi\cdot r^{2}");
        assert_eq!(input("beta+theta-omega"), r"\beta+\theta-\omega");
    }

    #[test]
    fn square_roots() {
        assert_eq!(input("sqrt(2)"), r"\sqrt{2}");
        assert_eq!(input("sqrt(x^2+sqrt(3))"), r"\sqrt{x^{2}+\sqrt{3}}");
        assert_eq!(input("2sqrt(3)"), r"2\sqrt{3}");
        assert_eq!(preview("x^2-2sqrt(2)x+1").as_str(), r"x^{2}-2\sqrt{2}x+1");
        assert_eq!(input("sqrt(2"), "sqrt(2");
        assert_eq!(input("xsqrt(2)"), "xsqrt(2)");
    }

    #[test]
    fn plus_minus() {
        assert_eq!(input("x+-1"), r"x\pm1");
        assert_eq!(input("x-+y"), r"x\mp y");
    }

    #[test]
    fn existing_commands_pass_through() {
        assert_eq!(input(r"\frac{1}{2}*x"), r"\frac{1}{2}\cdot x");
        assert_eq!(result(r"\pm 1.414214"), r"\pm 1.414214");
    }

    #[test]
    fn result_glyphs() {
        assert_snapshot!(result("√2"), @r"\sqrt{2}");
        assert_snapshot!(result("∛(1+√5)"), @r"\sqrt[3]{1+\sqrt{5}}");
        assert_eq!(result("⁴√2"), r"\sqrt[4]{2}");
        assert_eq!(result("∜2"), r"\sqrt[4]{2}");
        assert_eq!(result("ω²"), r"\omega^{2}");
        assert_eq!(result("x¹²"), "x^{12}");
        assert_eq!(result("αx"), r"\alpha x");
        assert_eq!(result("1.414214i"), r"1.414214\mathrm{i}");
        assert_eq!(result("0.5 ± 0.866025i"), r"0.5 ± 0.866025\mathrm{i}");
        assert_eq!(result("ⅈ"), r"\mathrm{i}");
    }

    #[test]
    fn imaginary_unit_only_standalone() {
        assert_eq!(result("pi"), "pi");
        assert_eq!(result("in"), "in");
        assert_eq!(result("2i+1"), r"2\mathrm{i}+1");
    }

    #[test]
    fn nested_radicals_stay_balanced() {
        assert_eq!(result("√√2"), r"\sqrt{\sqrt{2}}");
        assert_eq!(result("√α"), r"\sqrt{\alpha}");
        assert_eq!(result("√(2+√(3+ω))"), r"\sqrt{2+\sqrt{3+\omega}}");
        assert_eq!(result("∛ 7"), r"\sqrt[3]{7}");
        assert_eq!(result("∛-2"), r"\sqrt[3]{-2}");
        assert_eq!(result("√-√3"), r"\sqrt{-\sqrt{3}}");
        assert_eq!(result("2+√+ω"), r"2+\sqrt{+\omega}");
        assert_eq!(result("√-"), r"\sqrt{}-");
        for text in ["√", "√(", "√(1", "1+√", "√√", "⁴√(√2", "∛-", "√- 2"] {
            let markup = result(text);
            assert!(balanced(&markup), "{text:?} gave {markup:?}");
        }
    }

    #[test]
    fn unknown_characters_are_preserved() {
        assert_eq!(result("ℚ(α) : ℚ"), r"ℚ(\alpha) : ℚ");
        assert_eq!(input("x ≥ 0"), "x ≥ 0");
        assert_eq!(result(""), "");
    }
}
