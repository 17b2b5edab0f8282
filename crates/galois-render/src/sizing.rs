//! Choosing a font size that fits the container.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::measure::{FallbackReason, MeasureWidth};
use crate::transcode::Markup;

/// Candidate font sizes in pixels, largest first.
///
/// A scale is never empty, and its sizes are positive and strictly decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct SizeScale(Vec<f32>);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("the size scale has no sizes")]
    Empty,
    #[error("font size {0} is not a positive number")]
    NotPositive(f32),
    #[error("font sizes must be listed from largest to smallest")]
    NotDescending,
}

impl SizeScale {
    pub fn new(sizes: Vec<f32>) -> Result<Self, ScaleError> {
        if sizes.is_empty() {
            return Err(ScaleError::Empty);
        }
        if let Some(&size) = sizes.iter().find(|size| !(size.is_finite() && **size > 0.0)) {
            return Err(ScaleError::NotPositive(size));
        }
        if sizes.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(ScaleError::NotDescending);
        }
        Ok(SizeScale(sizes))
    }

    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn largest(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn smallest(&self) -> f32 {
        self.0[self.0.len() - 1]
    }
}

impl Default for SizeScale {
    fn default() -> Self {
        SizeScale(vec![32.0, 28.0, 24.0, 20.0, 16.0])
    }
}

impl TryFrom<Vec<f32>> for SizeScale {
    type Error = ScaleError;

    fn try_from(sizes: Vec<f32>) -> Result<Self, Self::Error> {
        SizeScale::new(sizes)
    }
}

impl From<SizeScale> for Vec<f32> {
    fn from(scale: SizeScale) -> Self {
        scale.0
    }
}

/// The width a fragment has to fit into, and the sizes it may be shown at.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBudget {
    /// Container width in pixels.
    pub width: f32,
    pub scale: SizeScale,
}

impl DisplayBudget {
    pub fn new(width: f32, scale: SizeScale) -> Self {
        DisplayBudget { width, scale }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeChoice {
    pub font_size: f32,
    /// Width at the chosen size.
    pub width: f32,
    /// `false` if even the smallest size is too wide.
    pub fits: bool,
    pub fallback: Option<FallbackReason>,
}

/// Pick the largest size at which `markup` fits the budget, or the smallest size if none does.
///
/// The markup is measured once, at the largest size. Width is proportional to font size, so the
/// widths at the other sizes follow from that one measurement.
pub async fn pick_size<M>(measurer: &M, markup: &Markup, budget: &DisplayBudget) -> SizeChoice
where
    M: MeasureWidth + ?Sized,
{
    let largest = budget.scale.largest();
    let measurement = measurer.measure(markup, largest).await;
    let fallback = measurement.fallback_reason();
    let width_at = |size: f32| measurement.width * size / largest;

    for &font_size in budget.scale.sizes() {
        let width = width_at(font_size);
        if width <= budget.width {
            return SizeChoice {
                font_size,
                width,
                fits: true,
                fallback,
            };
        }
    }
    let font_size = budget.scale.smallest();
    SizeChoice {
        font_size,
        width: width_at(font_size),
        fits: false,
        fallback,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::measure::{CharWidth, EngineSlot, TypesetMeasurer};
    use crate::transcode::{Vocabulary, to_markup};

    fn budget(width: f32) -> DisplayBudget {
        DisplayBudget::new(width, SizeScale::default())
    }

    #[test]
    fn scale_validation() {
        assert_eq!(SizeScale::new(vec![]), Err(ScaleError::Empty));
        assert_eq!(
            SizeScale::new(vec![20.0, 0.0]),
            Err(ScaleError::NotPositive(0.0))
        );
        assert!(matches!(
            SizeScale::new(vec![20.0, f32::NAN]),
            Err(ScaleError::NotPositive(_))
        ));
        assert_eq!(
            SizeScale::new(vec![16.0, 20.0]),
            Err(ScaleError::NotDescending)
        );
        assert_eq!(
            SizeScale::new(vec![20.0, 20.0]),
            Err(ScaleError::NotDescending)
        );
        let scale = SizeScale::new(vec![18.0]).unwrap();
        assert_eq!((scale.largest(), scale.smallest()), (18.0, 18.0));
    }

    #[test]
    fn scale_from_json() {
        let scale: SizeScale = serde_json::from_str("[40, 30, 20]").unwrap();
        assert_eq!(scale.sizes(), &[40.0, 30.0, 20.0]);
        assert!(serde_json::from_str::<SizeScale>("[20, 30]").is_err());
        assert!(serde_json::from_str::<SizeScale>("[]").is_err());
    }

    #[tokio::test]
    async fn first_fitting_size_wins() {
        let measurer = CharWidth { em: 0.5 };
        // Ten glyphs: 160px at 32px.
        let markup = to_markup("x^4-10*x^2+1", Vocabulary::Input);

        let choice = pick_size(&measurer, &markup, &budget(500.0)).await;
        assert_eq!((choice.font_size, choice.fits), (32.0, true));

        let choice = pick_size(&measurer, &markup, &budget(120.0)).await;
        assert_eq!(choice.font_size, 24.0);
        assert_eq!(choice.width, 120.0);
        assert!(choice.fits);
        assert_eq!(choice.fallback, None);
    }

    #[tokio::test]
    async fn smallest_size_when_nothing_fits() {
        let measurer = CharWidth { em: 0.5 };
        let markup = to_markup("x^4-10*x^2+1", Vocabulary::Input);
        let choice = pick_size(&measurer, &markup, &budget(10.0)).await;
        assert_eq!(choice.font_size, 16.0);
        assert_eq!(choice.width, 80.0);
        assert!(!choice.fits);
    }

    #[tokio::test]
    async fn absent_engine_still_picks_a_size() {
        let measurer =
            TypesetMeasurer::new(Arc::new(EngineSlot::empty()), Duration::from_secs(1), 0.6);
        let markup = to_markup("x^2+1", Vocabulary::Input);
        let choice = pick_size(&measurer, &markup, &budget(300.0)).await;
        assert!(SizeScale::default().sizes().contains(&choice.font_size));
        assert_eq!(choice.fallback, Some(FallbackReason::EngineAbsent));
    }
}
