//! Breaking polynomials onto several lines.
//!
//! Lines are always built from the source text, never from markup, so a line break can only
//! fall between terms. Every term lands on exactly one line, in order.

use memchr::memchr2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::measure::MeasureWidth;
use crate::plan::{Planned, RenderPlan};
use crate::sizing::{DisplayBudget, SizeChoice, pick_size};
use crate::transcode::{Markup, Vocabulary, to_markup};

/// How terms are grouped into lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineBreak {
    /// A fixed number of terms per line.
    #[default]
    Fixed,
    /// As many terms per line as fit at the smallest font size.
    Greedy,
}

/// Split `source` before every top-level `+` or `-` that is a binary operator.
///
/// A sign at the start, after another operator or after an opening parenthesis belongs to the
/// term that follows it. Signs inside brackets never split. The terms are slices of `source`
/// that concatenate back to it.
pub fn split_terms(source: &str) -> Vec<&str> {
    if source.is_empty() {
        return Vec::new();
    }
    let bytes = source.as_bytes();
    if memchr2(b'+', b'-', bytes).is_none() {
        return vec![source];
    }

    let mut terms = Vec::new();
    let mut start = 0;
    let mut depth = 0i32;
    let mut previous: Option<u8> = None;
    for (index, &byte) in bytes.iter().enumerate() {
        match byte {
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth -= 1,
            b'+' | b'-'
                if depth <= 0
                    && previous.is_some_and(|prev| !b"+-*/^([{".contains(&prev)) =>
            {
                terms.push(&source[start..index]);
                start = index;
            }
            _ => {}
        }
        if byte != b' ' {
            previous = Some(byte);
        }
    }
    terms.push(&source[start..]);
    terms
}

/// Join consecutive terms into lines of at most `per_line` terms.
pub fn group_terms(terms: &[&str], per_line: usize) -> Vec<String> {
    terms
        .chunks(per_line.max(1))
        .map(|chunk| chunk.concat())
        .collect()
}

/// Lay out a polynomial, breaking it into lines if it does not fit on one.
///
/// With [`LineBreak::Fixed`], at most `terms_per_line` terms go on each line, and never more than
/// half of them (rounded up) so a polynomial that does not fit always gets at least two lines. A
/// term that is too wide on its own still gets a line of its own. All lines share the smallest
/// of their individually chosen sizes.
pub async fn wrap<M>(
    measurer: &M,
    source: &str,
    budget: &DisplayBudget,
    line_break: LineBreak,
    terms_per_line: usize,
) -> Planned
where
    M: MeasureWidth + ?Sized,
{
    let whole = to_markup(source, Vocabulary::Input);
    let choice = pick_size(measurer, &whole, budget).await;
    if choice.fits {
        return single_line(choice, whole);
    }

    let terms = split_terms(source);
    if terms.len() < 2 {
        debug!(source, "nothing to split; keeping one line");
        return single_line(choice, whole);
    }
    let lines = match line_break {
        LineBreak::Fixed => {
            let per_line = terms_per_line.min(terms.len().div_ceil(2)).max(1);
            group_terms(&terms, per_line)
        }
        LineBreak::Greedy => greedy_lines(measurer, &terms, budget).await,
    };
    debug!(source, terms = terms.len(), lines = lines.len(), "wrapping");

    let mut font_size = budget.scale.largest();
    let mut fits = true;
    let mut fallback = choice.fallback;
    let mut markups = Vec::with_capacity(lines.len());
    for line in &lines {
        let markup = to_markup(line.trim(), Vocabulary::Input);
        let line_choice = pick_size(measurer, &markup, budget).await;
        font_size = font_size.min(line_choice.font_size);
        fits &= line_choice.fits;
        fallback = fallback.or(line_choice.fallback);
        markups.push(markup);
    }
    Planned {
        plan: RenderPlan {
            font_size,
            lines: markups,
            fits,
        },
        fallback,
    }
}

fn single_line(choice: SizeChoice, markup: Markup) -> Planned {
    Planned {
        plan: RenderPlan {
            font_size: choice.font_size,
            lines: vec![markup],
            fits: choice.fits,
        },
        fallback: choice.fallback,
    }
}

/// Fill each line with terms until the next one would overflow at the smallest size.
async fn greedy_lines<M>(measurer: &M, terms: &[&str], budget: &DisplayBudget) -> Vec<String>
where
    M: MeasureWidth + ?Sized,
{
    let smallest = budget.scale.smallest();
    let mut lines = Vec::new();
    let mut current = String::new();
    for term in terms {
        if current.is_empty() {
            current.push_str(term);
            continue;
        }
        let candidate = format!("{current}{term}");
        let markup = to_markup(candidate.trim(), Vocabulary::Input);
        if measurer.measure(&markup, smallest).await.width <= budget.width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(term);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;
    use crate::measure::{CharWidth, EngineSlot, FallbackReason, TypesetMeasurer};
    use crate::sizing::SizeScale;

    fn budget(width: f32) -> DisplayBudget {
        DisplayBudget::new(width, SizeScale::default())
    }

    fn lines(planned: &Planned) -> Vec<&str> {
        planned.plan.lines.iter().map(|line| line.as_str()).collect()
    }

    #[test]
    fn split_before_binary_signs() {
        assert_eq!(split_terms("x^4-10*x^2+1"), ["x^4", "-10*x^2", "+1"]);
        assert_eq!(split_terms("-x^2+1"), ["-x^2", "+1"]);
        assert_eq!(split_terms("x^2 + 1"), ["x^2 ", "+ 1"]);
    }

    #[test]
    fn unary_signs_stay_attached() {
        assert_eq!(split_terms("x^-2+1"), ["x^-2", "+1"]);
        assert_eq!(split_terms("2*-3"), ["2*-3"]);
        assert_eq!(split_terms("x^(n-1)-1"), ["x^(n-1)", "-1"]);
        assert_eq!(split_terms("(x+1)*(x-1)+3"), ["(x+1)*(x-1)", "+3"]);
        assert_eq!(split_terms("x^{-1}+1"), ["x^{-1}", "+1"]);
    }

    #[test]
    fn monomials_and_empty_input() {
        assert_eq!(split_terms("3*x^5"), ["3*x^5"]);
        assert!(split_terms("").is_empty());
    }

    #[test]
    fn grouping() {
        let terms = ["x^4", "-10*x^2", "+1"];
        assert_eq!(group_terms(&terms, 3), ["x^4-10*x^2+1"]);
        assert_eq!(group_terms(&terms, 2), ["x^4-10*x^2", "+1"]);
        assert_eq!(group_terms(&terms, 0), ["x^4", "-10*x^2", "+1"]);
    }

    proptest! {
        #[test]
        fn terms_partition_the_source(source in "[x0-9+\\-*^() ]{0,40}") {
            let terms = split_terms(&source);
            prop_assert_eq!(terms.concat(), source.clone());
            prop_assert!(terms.iter().all(|term| !term.is_empty()));
        }

        #[test]
        fn lines_partition_the_terms(source in "[x0-9+\\-*^ ]{1,40}", per_line in 1usize..6) {
            let terms = split_terms(&source);
            let lines = group_terms(&terms, per_line);
            prop_assert_eq!(lines.concat(), source.clone());
            prop_assert_eq!(lines.len(), terms.len().div_ceil(per_line));
        }
    }

    #[tokio::test]
    async fn fitting_polynomial_is_one_line() {
        let measurer = CharWidth { em: 0.5 };
        let planned = wrap(&measurer, "x^4-10*x^2+1", &budget(400.0), LineBreak::Fixed, 3).await;
        assert_eq!(lines(&planned), [r"x^{4}-10\cdot x^{2}+1"]);
        assert_eq!(planned.plan.font_size, 32.0);
    }

    #[tokio::test]
    async fn narrow_budget_splits_between_terms() {
        let measurer = CharWidth { em: 0.5 };
        let planned = wrap(&measurer, "x^4-10*x^2+1", &budget(70.0), LineBreak::Fixed, 3).await;
        assert_eq!(lines(&planned), [r"x^{4}-10\cdot x^{2}", "+1"]);
        assert_eq!(planned.plan.font_size, 16.0);
        assert!(planned.plan.fits);
    }

    #[tokio::test]
    async fn fixed_grouping_caps_terms_per_line() {
        let measurer = CharWidth { em: 0.5 };
        let source = "x^6+x^5+x^4+x^3+x^2+x+1";
        let planned = wrap(&measurer, source, &budget(100.0), LineBreak::Fixed, 3).await;
        assert_eq!(
            lines(&planned),
            ["x^{6}+x^{5}+x^{4}", "+x^{3}+x^{2}+x", "+1"]
        );
        assert_eq!(planned.plan.font_size, 24.0);
    }

    #[tokio::test]
    async fn greedy_grouping_fills_lines() {
        let measurer = CharWidth { em: 0.5 };
        let source = "x^6+x^5+x^4+x^3+x^2+x+1";
        let planned = wrap(&measurer, source, &budget(100.0), LineBreak::Greedy, 3).await;
        assert_eq!(lines(&planned), ["x^{6}+x^{5}+x^{4}+x^{3}", "+x^{2}+x+1"]);
        assert_eq!(planned.plan.font_size, 16.0);
        assert!(planned.plan.fits);
    }

    #[tokio::test]
    async fn wide_terms_keep_their_own_line() {
        let measurer = CharWidth { em: 0.5 };
        let planned = wrap(
            &measurer,
            "12345678901234567890",
            &budget(70.0),
            LineBreak::Fixed,
            3,
        )
        .await;
        assert_eq!(lines(&planned), ["12345678901234567890"]);
        assert!(!planned.plan.fits);

        let planned = wrap(
            &measurer,
            "12345678901234567890+1",
            &budget(70.0),
            LineBreak::Fixed,
            3,
        )
        .await;
        assert_eq!(lines(&planned), ["12345678901234567890", "+1"]);
        assert_eq!(planned.plan.font_size, 16.0);
        assert!(!planned.plan.fits);
    }

    #[tokio::test]
    async fn absent_engine_still_wraps() {
        let measurer =
            TypesetMeasurer::new(Arc::new(EngineSlot::empty()), Duration::from_secs(1), 0.6);
        let planned = wrap(&measurer, "x^4-10*x^2+1", &budget(60.0), LineBreak::Fixed, 3).await;
        assert!(!planned.plan.lines.is_empty());
        assert_eq!(planned.fallback, Some(FallbackReason::EngineAbsent));
    }
}
