//! TeX notation for transitive permutation groups of small degree.
//!
//! Groups are indexed by their transitive label `nTk`: the degree `n` of the action and the
//! position `k` in the standard (Conway–Hulpke–McKay) numbering. Only degrees 1 through 11 are
//! tabulated, matching what the solver accepts.

use std::borrow::Cow;

/// Notation for the transitive group `nTk`, or `None` if the label is outside the table.
pub fn transitive_group_tex(degree: usize, number: usize) -> Option<&'static str> {
    let row = TRANSITIVE_GROUPS.get(degree.checked_sub(1)?)?;
    row.get(number.checked_sub(1)?).copied()
}

/// Find the first `nTk` token in a group description such as
/// `"Galois group 4T3 (D(4)) with order 8 of x^4 + 1"`.
pub fn parse_transitive_label(description: &str) -> Option<(usize, usize)> {
    description.split_whitespace().find_map(|word| {
        let (degree, number) = word.split_once('T')?;
        if degree.is_empty()
            || number.is_empty()
            || !degree.bytes().all(|b| b.is_ascii_digit())
            || !number.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some((degree.parse().ok()?, number.parse().ok()?))
    })
}

/// The markup used to display a Galois group.
///
/// Prefers the notation the solver supplied, then the table entry for the label in the
/// description, and finally a generic group of the given order.
pub fn group_markup<'a>(explicit: &'a str, description: &str, order: u64) -> Cow<'a, str> {
    let explicit = explicit.trim();
    if !explicit.is_empty() {
        return Cow::Borrowed(explicit);
    }
    if let Some(tex) = parse_transitive_label(description)
        .and_then(|(degree, number)| transitive_group_tex(degree, number))
    {
        return Cow::Borrowed(tex);
    }
    Cow::Owned(format!("G_{{{order}}}"))
}

static TRANSITIVE_GROUPS: [&[&str]; 11] = [
    // degree 1
    &[
        r"C_1 \cong \{1\}",
    ],
    // degree 2
    &[
        r"C_2 \cong \mathbb{Z}/2\mathbb{Z}",
    ],
    // degree 3
    &[
        r"C_3 \cong \mathbb{Z}/3\mathbb{Z}",
        r"S_3 \cong D_3",
    ],
    // degree 4
    &[
        r"C_4 \cong \mathbb{Z}/4\mathbb{Z}",
        r"V_4 \cong \mathbb{Z}/2\mathbb{Z} \times \mathbb{Z}/2\mathbb{Z}",
        r"D_4",
        r"A_4",
        r"S_4",
    ],
    // degree 5
    &[
        r"C_5 \cong \mathbb{Z}/5\mathbb{Z}",
        r"D_5",
        r"F_5 \cong C_5 \rtimes C_4",
        r"A_5",
        r"S_5",
    ],
    // degree 6
    &[
        r"C_6 \cong \mathbb{Z}/6\mathbb{Z}",
        r"S_6",
        r"D_6",
        r"A_6",
        r"S_3 \times C_3",
        r"A_4 \times C_2",
        r"S_4",
        r"S_4",
        r"S_3 \times S_3",
        r"(C_3 \times C_3) \rtimes C_4",
        r"S_4 \times C_2",
        r"\mathrm{PSL}(2, 5)",
        r"(C_3 \times C_3) \rtimes D_4",
        r"\mathrm{PGL}(2, 5)",
        r"A_6",
        r"S_6",
    ],
    // degree 7
    &[
        r"C_7 \cong \mathbb{Z}/7\mathbb{Z}",
        r"D_7",
        r"C_7 \rtimes C_3",
        r"F_7 \cong C_7 \rtimes C_6",
        r"\mathrm{GL}(3, 2)",
        r"A_7",
        r"S_7",
    ],
    // degree 8
    &[
        r"C_8 \cong \mathbb{Z}/8\mathbb{Z}",
        r"C_4 \times C_2",
        r"C_2 \times C_2 \times C_2",
        r"D_4",
        r"Q_8",
        r"D_8",
        r"C_8 \rtimes C_2",
        r"QD_{16}",
        r"D_4 \times C_2",
        r"V_4 \rtimes C_4",
        r"Q_8 \rtimes C_2",
        r"\mathrm{SL}(2, 3)",
        r"A_4 \times C_2",
        r"S_4",
        r"D_8 \rtimes C_2",
        r"(C_8 \rtimes C_2) \rtimes C_2",
        r"C_4 \wr C_2",
        r"V_4 \wr C_2",
        r"(C_2 \times C_2 \times C_2) \rtimes C_4",
        r"(C_2 \times C_2 \times C_2) \rtimes C_4",
        r"(C_2 \times C_2 \times C_2) \rtimes C_4",
        r"Q_8 \rtimes V_4",
        r"\mathrm{GL}(2, 3)",
        r"S_4 \times C_2",
        r"(C_2 \times C_2 \times C_2) \rtimes C_7",
        r"((C_4 \times C_4) \rtimes C_2) \rtimes C_2",
        r"((C_8 \rtimes C_2) \rtimes C_2) \rtimes C_2",
        r"(((C_4 \times C_2) \rtimes C_2) \rtimes C_2) \rtimes C_2",
        r"(((C_4 \times C_2) \rtimes C_2) \rtimes C_2) \rtimes C_2",
        r"(((C_4 \times C_2) \rtimes C_2) \rtimes C_2) \rtimes C_2",
        r"(((C_4 \times C_2) \rtimes C_2) \rtimes C_2) \rtimes C_2",
        r"((C_2 \times D_4) \rtimes C_2) \rtimes C_3",
        r"(V_4 \times V_4) \rtimes C_6",
        r"(V_4 \times V_4) \rtimes S_3",
        r"C_2 \wr C_2 \wr C_2",
        r"(C_2 \times C_2 \times C_2) \rtimes (C_7 \rtimes C_3)",
        r"\mathrm{PSL}(2, 7)",
        r"C_2 \wr A_4",
        r"(C_2 \times C_2 \times C_2) \rtimes S_4",
        r"Q_8 \rtimes S_4",
        r"(V_4 \times V_4) \rtimes (S_3 \times C_2)",
        r"A_4 \wr C_2",
        r"\mathrm{PGL}(2, 7)",
        r"C_2 \wr S_4",
        r"(A_4 \wr C_2) \rtimes C_2",
        r"(A_4 \times A_4) \rtimes C_2",
        r"S_4 \wr C_2",
        r"(C_2 \times C_2 \times C_2) \rtimes \mathrm{GL}(3, 2)",
        r"A_8",
        r"S_8",
    ],
    // degree 9
    &[
        r"C_9 \cong \mathbb{Z}/9\mathbb{Z}",
        r"C_3 \times C_3",
        r"D_9",
        r"S_3 \times C_3",
        r"(C_3 \times C_3) \rtimes C_2",
        r"C_9 \rtimes C_3",
        r"(C_3 \times C_3) \rtimes C_3",
        r"S_3 \times S_3",
        r"(C_3 \times C_3) \rtimes C_4",
        r"(C_9 \rtimes C_3) \rtimes C_2",
        r"(C_3 \times C_3) \rtimes C_6",
        r"((C_3 \times C_3) \rtimes C_3) \rtimes C_2",
        r"(C_3 \times C_3) \rtimes S_3",
        r"(C_3 \times C_3) \rtimes Q_8",
        r"(C_3 \times C_3) \rtimes C_8",
        r"(S_3 \times S_3) \rtimes C_2",
        r"C_3 \wr C_3",
        r"(C_3 \times C_3) \rtimes D_6",
        r"((C_3 \times C_3) \rtimes C_8) \rtimes C_2",
        r"C_3 \wr S_3",
        r"((C_3 \times C_3 \times C_3) \rtimes C_3) \rtimes C_2",
        r"((C_3 \times C_3 \times C_3) \rtimes C_3) \rtimes C_2",
        r"((C_3 \times C_3) \rtimes Q_8) \rtimes C_3",
        r"(((C_3 \times C_3 \times C_3) \rtimes C_3) \rtimes C_2) \rtimes C_2",
        r"((C_3 \times ((C_3 \times C_3) \rtimes C_2)) \rtimes C_2) \rtimes C_3",
        r"(((C_3 \times C_3) \rtimes Q_8) \rtimes C_3) \rtimes C_2",
        r"\mathrm{PSL}(2, 8)",
        r"S_3 \wr C_3",
        r"(((C_3 \times ((C_3 \times C_3) \rtimes C_2)) \rtimes C_2) \rtimes C_3) \rtimes C_2",
        r"(((C_3 \times ((C_3 \times C_3) \rtimes C_2)) \rtimes C_2) \rtimes C_3) \rtimes C_2",
        r"S_3 \wr S_3",
        r"\mathrm{P}\Gamma\mathrm{L}(2,8)",
        r"A_9",
        r"S_9",
    ],
    // degree 10
    &[
        r"C_{10} \cong \mathbb{Z}/10\mathbb{Z}",
        r"D_5",
        r"D_{10}",
        r"F_5",
        r"F_5 \times C_2",
        r"D_5 \times C_5",
        r"A_5",
        r"(V_4 \times V_4) \rtimes C_5",
        r"D_5 \times D_5",
        r"(C_5 \times C_5) \rtimes C_4",
        r"A_5 \times C_2",
        r"S_5",
        r"S_5",
        r"C_2 \times ((V_4 \times V_4) \rtimes C_5)",
        r"((V_4 \times V_4) \rtimes C_5) \rtimes C_2",
        r"((V_4 \times V_4) \rtimes C_5) \rtimes C_2",
        r"((C_5 \times C_5) \rtimes C_4) \rtimes C_2",
        r"(C_5 \times C_5) \rtimes C_8",
        r"(D_5 \times D_5) \rtimes C_2",
        r"(C_5 \times C_5) \rtimes Q_8",
        r"(D_5 \times D_5) \rtimes C_2",
        r"S_5 \times C_2",
        r"C_2 \times ((V_4 \times V_4) \rtimes D_5)",
        r"((V_4 \times V_4) \rtimes C_5) \rtimes C_4",
        r"((V_4 \times V_4) \rtimes C_5) \rtimes C_4",
        r"\mathrm{PSL}(2, 9)",
        r"(D_5 \wr C_2) \rtimes C_2",
        r"((C_5 \times C_5) \rtimes C_8) \rtimes C_2",
        r"(((V_4 \times V_4) \rtimes C_5) \rtimes C_4) \times C_2",
        r"\mathrm{PGL}(2, 9)",
        r"M_{10}",
        r"S_6",
        r"F_5 \wr C_2",
        r"(V_4 \times V_4) \rtimes A_5",
        r"(A_6 \rtimes C_2) \rtimes C_2",
        r"C_2 \wr A_5",
        r"((V_4 \times V_4) \rtimes A_5) \rtimes C_2",
        r"((V_4 \times V_4) \rtimes A_5) \rtimes C_2",
        r"C_2 \wr S_5",
        r"A_5 \wr C_2",
        r"((A_5 \times A_5) \rtimes C_2) \rtimes C_2",
        r"(A_5 \times A_5) \rtimes C_4",
        r"(S_5 \times S_5) \wr C_2",
        r"A_{10}",
        r"S_{10}",
    ],
    // degree 11
    &[
        r"C_{11} \cong \mathbb{Z}/11\mathbb{Z}",
        r"D_{11}",
        r"C_{11} \rtimes C_5",
        r"F_{11} \cong C_{11} \rtimes C_{10}",
        r"\mathrm{PSL}(2, 11)",
        r"M_{11}",
        r"A_{11}",
        r"S_{11}",
    ],
];
