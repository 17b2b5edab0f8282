//! Normalize polynomial input and typeset algebraic results so they fit their container.
//!
//! # Usage
//!
//! User input goes through [`normalize`] before it is sent to the solver. Anything that is
//! displayed, whether the polynomial itself or a field of the solver's reply, is turned into
//! markup with [`to_markup`] and laid out with [`plan()`], which picks a font size from the
//! configured scale and, for polynomials, breaks lines between terms:
//!
//! ```rust
//! use galois_render::{CharWidth, FieldKind, RenderConfig, normalize, plan};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let polynomial = normalize("x^4-10x^2+1");
//! assert_eq!(polynomial, "x^4-10*x^2+1");
//!
//! let measurer = CharWidth { em: 0.5 };
//! let config = RenderConfig::default();
//! let planned = plan(&measurer, &polynomial, FieldKind::Polynomial, 70.0, &config).await;
//! assert_eq!(planned.plan.lines.len(), 2);
//! assert_eq!(planned.plan.font_size, 16.0);
//! # });
//! ```
//!
//! Widths come from a [`MeasureWidth`]. [`TypesetMeasurer`] typesets with whatever engine is
//! installed in its [`EngineSlot`] and falls back to an estimate when there is none.
//! [`FieldRenderer`] and [`ResultView`] keep displayed fields up to date as their content or the
//! container width changes.
//!
mod character_class;
mod error;
mod field;
mod group_label;
mod measure;
mod normalize;
mod plan;
mod sizing;
mod solver;
mod symbols;
mod transcode;
mod view;
mod wrap;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use self::error::{DisplayError, ErrorCategory, ErrorSlot, ReducibleInfo};
pub use self::field::{FieldRenderer, FieldState};
pub use self::group_label::{group_markup, parse_transitive_label, transitive_group_tex};
pub use self::measure::{
    CharWidth, EngineSlot, FallbackReason, LayoutNode, MathCoreEngine, MeasureOutcome,
    MeasureWidth, Measurement, OffscreenSurface, TypesetEngine, TypesetError, TypesetMeasurer,
    estimate_width, mathml_width_em,
};
pub use self::normalize::{Insertion, Rule, normalize, normalize_explained};
pub use self::plan::{FieldKind, Planned, RenderPlan, plan};
pub use self::sizing::{DisplayBudget, ScaleError, SizeChoice, SizeScale, pick_size};
pub use self::solver::{
    Computation, FailureKind, GaloisGroup, SolveRequest, Solver, SolverFailure, SolverReply,
    SplittingField, TransportError, complete_splitting_field, submit,
};
pub use self::transcode::{Markup, Vocabulary, preview, to_markup};
pub use self::view::{FieldKey, ResultView, field_sources};
pub use self::wrap::{LineBreak, group_terms, split_terms, wrap};

/// Settings for sizing and wrapping.
///
/// ```rust
/// use galois_render::{LineBreak, RenderConfig};
///
/// let config: RenderConfig = serde_json::from_str(r#"{"line-break": "greedy"}"#).unwrap();
/// assert_eq!(config.line_break, LineBreak::Greedy);
/// assert_eq!(config.terms_per_line, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Candidate font sizes in pixels, largest first.
    pub scale: SizeScale,
    /// How long a field waits for further changes before it is measured.
    pub debounce_ms: u64,
    /// How long a single typesetting pass may take before its width is estimated instead.
    pub measure_timeout_ms: u64,
    pub line_break: LineBreak,
    /// The most terms on one line when breaking with [`LineBreak::Fixed`].
    pub terms_per_line: usize,
    /// Glyph width in em used for estimated widths.
    pub fallback_char_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            scale: SizeScale::default(),
            debounce_ms: 100,
            measure_timeout_ms: 1500,
            line_break: LineBreak::Fixed,
            terms_per_line: 3,
            fallback_char_width: 0.6,
        }
    }
}

impl RenderConfig {
    #[inline]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[inline]
    pub fn measure_timeout(&self) -> Duration {
        Duration::from_millis(self.measure_timeout_ms)
    }

    /// A measurer using the engine in `engine`, with this configuration's timeout and fallback.
    pub fn measurer(&self, engine: std::sync::Arc<EngineSlot>) -> TypesetMeasurer {
        TypesetMeasurer::new(engine, self.measure_timeout(), self.fallback_char_width)
    }
}
