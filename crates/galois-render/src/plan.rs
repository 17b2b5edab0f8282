//! Render plans for displayed fields.

use crate::RenderConfig;
use crate::measure::{FallbackReason, MeasureWidth};
use crate::sizing::{DisplayBudget, pick_size};
use crate::transcode::{Markup, Vocabulary, to_markup};
use crate::wrap::wrap;

/// What a field displays, which decides the vocabulary and whether it may wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A polynomial in input notation. Wraps onto several lines when too wide.
    Polynomial,
    /// Text from the solver, such as a root or a group name. Always one line.
    Result,
}

impl FieldKind {
    #[inline]
    pub fn vocabulary(self) -> Vocabulary {
        match self {
            FieldKind::Polynomial => Vocabulary::Input,
            FieldKind::Result => Vocabulary::Result,
        }
    }
}

/// How a fragment is shown: one font size for every line.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub font_size: f32,
    pub lines: Vec<Markup>,
    /// Whether every line fits the container at `font_size`.
    pub fits: bool,
}

/// A plan together with how it was measured.
#[derive(Debug, Clone, PartialEq)]
pub struct Planned {
    pub plan: RenderPlan,
    /// Set if any measurement behind the plan was an estimate.
    pub fallback: Option<FallbackReason>,
}

/// Plan how `source` is displayed in a container `width` pixels wide.
pub async fn plan<M>(
    measurer: &M,
    source: &str,
    kind: FieldKind,
    width: f32,
    config: &RenderConfig,
) -> Planned
where
    M: MeasureWidth + ?Sized,
{
    let budget = DisplayBudget::new(width, config.scale.clone());
    match kind {
        FieldKind::Polynomial => {
            wrap(
                measurer,
                source,
                &budget,
                config.line_break,
                config.terms_per_line,
            )
            .await
        }
        FieldKind::Result => {
            let markup = to_markup(source, kind.vocabulary());
            let choice = pick_size(measurer, &markup, &budget).await;
            Planned {
                plan: RenderPlan {
                    font_size: choice.font_size,
                    lines: vec![markup],
                    fits: choice.fits,
                },
                fallback: choice.fallback,
            }
        }
    }
}
