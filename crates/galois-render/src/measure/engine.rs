//! The typesetting capability and the slot it is installed in.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use math_core::{LatexToMathML, MathCoreConfig, MathDisplay};
use thiserror::Error;

use super::metrics::mathml_width_em;
use super::surface::LayoutNode;
use crate::transcode::Markup;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesetError {
    #[error("markup rejected by the typesetter: {0}")]
    Rejected(String),
    #[error("typesetter unavailable")]
    Unavailable,
}

/// Something that can lay out a mounted node and report its width in pixels.
#[async_trait]
pub trait TypesetEngine: Send + Sync {
    async fn typeset(&self, node: &LayoutNode<'_>) -> Result<f32, TypesetError>;
}

/// Holds the typesetting engine, which may be installed or removed at any time.
///
/// Measurers check the slot before every pass and fall back when it is empty.
pub struct EngineSlot {
    engine: ArcSwapOption<Box<dyn TypesetEngine>>,
}

impl EngineSlot {
    pub fn empty() -> Self {
        Self {
            engine: ArcSwapOption::empty(),
        }
    }

    pub fn with_engine(engine: impl TypesetEngine + 'static) -> Self {
        let slot = Self::empty();
        slot.install(engine);
        slot
    }

    pub fn install(&self, engine: impl TypesetEngine + 'static) {
        let engine: Box<dyn TypesetEngine> = Box::new(engine);
        self.engine.store(Some(Arc::new(engine)));
    }

    pub fn remove(&self) {
        self.engine.store(None);
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.engine.load().is_some()
    }

    /// A handle to the current engine that stays valid even if the slot changes meanwhile.
    #[inline]
    pub fn load(&self) -> Option<Arc<Box<dyn TypesetEngine>>> {
        self.engine.load_full()
    }
}

impl Default for EngineSlot {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSlot")
            .field("available", &self.is_available())
            .finish()
    }
}

/// Typesets markup by converting it to MathML and estimating the width of the result.
pub struct MathCoreEngine {
    converter: LatexToMathML,
}

impl MathCoreEngine {
    pub fn new() -> Result<Self, TypesetError> {
        let converter = LatexToMathML::new(MathCoreConfig::default())
            .map_err(|_| TypesetError::Unavailable)?;
        Ok(Self { converter })
    }

    /// The MathML for one line of markup, as an inline formula.
    pub fn to_mathml(&self, markup: &Markup) -> Result<String, TypesetError> {
        self.converter
            .convert_with_local_counter(markup.as_str(), MathDisplay::Inline)
            .map_err(|err| TypesetError::Rejected(err.to_string()))
    }
}

impl fmt::Debug for MathCoreEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MathCoreEngine")
    }
}

#[async_trait]
impl TypesetEngine for MathCoreEngine {
    async fn typeset(&self, node: &LayoutNode<'_>) -> Result<f32, TypesetError> {
        let mathml = self.to_mathml(node.markup())?;
        Ok(mathml_width_em(&mathml) * node.font_size())
    }
}
