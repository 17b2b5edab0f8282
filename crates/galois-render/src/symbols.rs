use phf::phf_map;

/// Greek letter names recognized in typed input, mapped to their command names.
pub(crate) static GREEK_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "pi" => "pi",
    "alpha" => "alpha",
    "beta" => "beta",
    "theta" => "theta",
    "omega" => "omega",
};

/// Single glyphs emitted by the solver, mapped to the command they stand for.
///
/// Radicals and superscripts take arguments and are handled separately.
pub(crate) static RESULT_GLYPHS: phf::Map<char, &'static str> = phf_map! {
    'ω' => "omega",
    'α' => "alpha",
    'ⅈ' => "mathrm{i}",
};

/// The letter the solver uses for the imaginary unit when it is not emitted as `ⅈ`.
pub(crate) const IMAGINARY_UNIT: char = 'i';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Radical {
    Square,
    Cube,
    Fourth,
}

impl Radical {
    /// The opening of the radical command, up to (and including) the argument brace.
    pub(crate) fn opening(self) -> &'static str {
        match self {
            Radical::Square => r"\sqrt{",
            Radical::Cube => r"\sqrt[3]{",
            Radical::Fourth => r"\sqrt[4]{",
        }
    }

    pub(crate) fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '√' => Some(Radical::Square),
            '∛' => Some(Radical::Cube),
            '∜' => Some(Radical::Fourth),
            _ => None,
        }
    }
}

/// Maps a superscript glyph to its ASCII counterpart.
pub(crate) fn superscript(ch: char) -> Option<char> {
    Some(match ch {
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        '⁺' => '+',
        '⁻' => '-',
        _ => return None,
    })
}
