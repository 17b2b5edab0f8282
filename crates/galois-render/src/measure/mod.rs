//! Rendered-width measurement.
//!
//! A [`MeasureWidth`] always produces a width. When the typesetting engine is missing, fails or
//! hangs, [`TypesetMeasurer`] answers with an estimate from the glyph count instead and marks
//! the measurement as a fallback.

mod engine;
mod metrics;
mod surface;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use strum_macros::IntoStaticStr;
use tracing::{debug, trace, warn};

pub use self::engine::{EngineSlot, MathCoreEngine, TypesetEngine, TypesetError};
pub use self::metrics::mathml_width_em;
pub use self::surface::{LayoutNode, OffscreenSurface};
use crate::transcode::Markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FallbackReason {
    EngineAbsent,
    EngineFailed,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureOutcome {
    Typeset,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Width in pixels.
    pub width: f32,
    pub outcome: MeasureOutcome,
}

impl Measurement {
    #[inline]
    pub fn typeset(width: f32) -> Self {
        Measurement {
            width,
            outcome: MeasureOutcome::Typeset,
        }
    }

    #[inline]
    pub fn fallback(width: f32, reason: FallbackReason) -> Self {
        Measurement {
            width,
            outcome: MeasureOutcome::Fallback(reason),
        }
    }

    #[inline]
    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self.outcome {
            MeasureOutcome::Typeset => None,
            MeasureOutcome::Fallback(reason) => Some(reason),
        }
    }
}

/// Measures the rendered width of markup at a given font size.
///
/// Calls are independent of each other and may run concurrently.
#[async_trait]
pub trait MeasureWidth: Send + Sync {
    async fn measure(&self, markup: &Markup, font_size: f32) -> Measurement;
}

/// Commands that change the font of their argument without drawing anything themselves.
const FONT_SWITCHES: &[&str] = &[
    "mathrm", "mathbb", "mathbf", "mathit", "mathcal", "mathfrak", "mathsf", "text",
];

/// Width estimate from the number of glyphs, at `em` times the font size per glyph.
///
/// A command such as `\alpha` counts as one glyph, and a font switch such as `\mathrm{i}` only
/// counts its argument. Braces, brackets, script markers and spaces are not drawn and count as
/// nothing. The result is rounded up to a whole pixel.
pub fn estimate_width(markup: &Markup, font_size: f32, em: f32) -> f32 {
    let text = markup.as_str();
    let mut glyphs = 0usize;
    let mut chars = text.char_indices();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '{' | '}' | '[' | ']' | '^' | '_' | ' ' => {}
            '\\' => {
                let name = &text[index + 1..];
                let letters = name.bytes().take_while(u8::is_ascii_alphabetic).count();
                if letters == 0 {
                    // An escaped character, like `\{`.
                    chars.next();
                }
                for _ in 0..letters {
                    chars.next();
                }
                if !FONT_SWITCHES.contains(&&name[..letters]) {
                    glyphs += 1;
                }
            }
            _ => glyphs += 1,
        }
    }
    (glyphs as f32 * font_size * em).ceil()
}

/// A deterministic measurer: every glyph is `em` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidth {
    pub em: f32,
}

#[async_trait]
impl MeasureWidth for CharWidth {
    async fn measure(&self, markup: &Markup, font_size: f32) -> Measurement {
        Measurement::typeset(estimate_width(markup, font_size, self.em))
    }
}

/// Measures by mounting the markup on an off-screen surface and typesetting it with the engine
/// currently installed in the slot.
#[derive(Debug)]
pub struct TypesetMeasurer {
    engine: Arc<EngineSlot>,
    surface: OffscreenSurface,
    timeout: Duration,
    fallback_em: f32,
}

impl TypesetMeasurer {
    pub fn new(engine: Arc<EngineSlot>, timeout: Duration, fallback_em: f32) -> Self {
        TypesetMeasurer {
            engine,
            surface: OffscreenSurface::new(),
            timeout,
            fallback_em,
        }
    }

    #[inline]
    pub fn surface(&self) -> &OffscreenSurface {
        &self.surface
    }

    #[inline]
    pub fn engine(&self) -> &EngineSlot {
        &self.engine
    }

    fn fallback(&self, markup: &Markup, font_size: f32, reason: FallbackReason) -> Measurement {
        let reason_name: &'static str = reason.into();
        debug!(reason = reason_name, %markup, "using estimated width");
        Measurement::fallback(estimate_width(markup, font_size, self.fallback_em), reason)
    }
}

#[async_trait]
impl MeasureWidth for TypesetMeasurer {
    async fn measure(&self, markup: &Markup, font_size: f32) -> Measurement {
        let Some(engine) = self.engine.load() else {
            return self.fallback(markup, font_size, FallbackReason::EngineAbsent);
        };
        let node = self.surface.mount(markup, font_size);
        let result = tokio::time::timeout(self.timeout, engine.typeset(&node)).await;
        drop(node);
        match result {
            Ok(Ok(width)) if width.is_finite() && width >= 0.0 => {
                trace!(%markup, font_size, width, "typeset");
                Measurement::typeset(width)
            }
            Ok(Ok(width)) => {
                warn!(%markup, width, "typesetter reported an invalid width");
                self.fallback(markup, font_size, FallbackReason::EngineFailed)
            }
            Ok(Err(err)) => {
                debug!(%markup, %err, "typesetting failed");
                self.fallback(markup, font_size, FallbackReason::EngineFailed)
            }
            Err(_) => {
                warn!(%markup, timeout = ?self.timeout, "typesetting timed out");
                self.fallback(markup, font_size, FallbackReason::TimedOut)
            }
        }
    }
}

static_assertions::assert_impl_all!(TypesetMeasurer: Send, Sync);
static_assertions::assert_impl_all!(EngineSlot: Send, Sync);
static_assertions::assert_impl_all!(CharWidth: Send, Sync);

#[cfg(test)]
mod tests {
    use std::future::pending;

    use super::*;
    use crate::transcode::{Vocabulary, to_markup};

    struct Hangs;

    #[async_trait]
    impl TypesetEngine for Hangs {
        async fn typeset(&self, _node: &LayoutNode<'_>) -> Result<f32, TypesetError> {
            pending().await
        }
    }

    struct Fails;

    #[async_trait]
    impl TypesetEngine for Fails {
        async fn typeset(&self, _node: &LayoutNode<'_>) -> Result<f32, TypesetError> {
            Err(TypesetError::Unavailable)
        }
    }

    struct NotANumber;

    #[async_trait]
    impl TypesetEngine for NotANumber {
        async fn typeset(&self, _node: &LayoutNode<'_>) -> Result<f32, TypesetError> {
            Ok(f32::NAN)
        }
    }

    fn measurer(slot: EngineSlot) -> TypesetMeasurer {
        TypesetMeasurer::new(Arc::new(slot), Duration::from_millis(1500), 0.6)
    }

    #[test]
    fn estimate_counts_commands_once() {
        let markup = to_markup("sqrt(2)*alpha", Vocabulary::Input);
        // \sqrt, 2, \cdot, \alpha
        assert_eq!(estimate_width(&markup, 10.0, 0.5), 20.0);
        let markup = to_markup("x^4-10*x^2+1", Vocabulary::Input);
        // x 4 - 1 0 \cdot x 2 + 1
        assert_eq!(estimate_width(&markup, 10.0, 1.0), 100.0);
        assert_eq!(estimate_width(&Markup::default(), 32.0, 0.6), 0.0);
    }

    #[test]
    fn estimate_skips_font_switches_and_root_brackets() {
        let markup = to_markup("2i", Vocabulary::Result);
        // 2 i
        assert_eq!(estimate_width(&markup, 10.0, 1.0), 20.0);
        let markup = to_markup("∛2", Vocabulary::Result);
        // \sqrt 3 2
        assert_eq!(estimate_width(&markup, 10.0, 1.0), 30.0);
        let markup = to_markup(r"\mathbb{Q}(α)", Vocabulary::Result);
        // Q ( \alpha )
        assert_eq!(estimate_width(&markup, 10.0, 1.0), 40.0);
    }

    #[test]
    fn estimate_rounds_up() {
        let markup = to_markup("x", Vocabulary::Input);
        assert_eq!(estimate_width(&markup, 16.0, 0.6), 10.0);
    }

    #[tokio::test]
    async fn absent_engine_falls_back() {
        let measurer = measurer(EngineSlot::empty());
        let markup = to_markup("x^2+1", Vocabulary::Input);
        let measurement = measurer.measure(&markup, 20.0).await;
        assert_eq!(measurement.fallback_reason(), Some(FallbackReason::EngineAbsent));
        assert_eq!(measurement.width, estimate_width(&markup, 20.0, 0.6));
        assert_eq!(measurer.surface().live_nodes(), 0);
    }

    #[tokio::test]
    async fn failing_engine_falls_back() {
        for slot in [EngineSlot::with_engine(Fails), EngineSlot::with_engine(NotANumber)] {
            let measurer = measurer(slot);
            let markup = to_markup("x", Vocabulary::Input);
            let measurement = measurer.measure(&markup, 20.0).await;
            assert_eq!(measurement.fallback_reason(), Some(FallbackReason::EngineFailed));
            assert_eq!(measurer.surface().live_nodes(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_engine_times_out() {
        let measurer = measurer(EngineSlot::with_engine(Hangs));
        let markup = to_markup("x", Vocabulary::Input);
        let measurement = measurer.measure(&markup, 20.0).await;
        assert_eq!(measurement.fallback_reason(), Some(FallbackReason::TimedOut));
        assert!(measurement.width > 0.0);
        assert_eq!(measurer.surface().live_nodes(), 0);
    }

    #[tokio::test]
    async fn math_core_measures() {
        let engine = MathCoreEngine::new().unwrap();
        let measurer = measurer(EngineSlot::with_engine(engine));
        let markup = to_markup("x^4-10*x^2+1", Vocabulary::Input);
        let measurement = measurer.measure(&markup, 20.0).await;
        assert_eq!(measurement.outcome, MeasureOutcome::Typeset);
        assert!(measurement.width > 0.0);
        assert_eq!(measurer.surface().live_nodes(), 0);
    }

    #[tokio::test]
    async fn engine_can_be_swapped_between_calls() {
        let measurer = measurer(EngineSlot::empty());
        let markup = to_markup("x", Vocabulary::Input);
        assert!(measurer.measure(&markup, 20.0).await.fallback_reason().is_some());
        measurer.engine().install(MathCoreEngine::new().unwrap());
        assert_eq!(
            measurer.measure(&markup, 20.0).await.outcome,
            MeasureOutcome::Typeset
        );
    }
}
