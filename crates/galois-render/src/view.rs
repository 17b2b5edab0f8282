//! The fields shown for one computation.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::RenderConfig;
use crate::field::{FieldRenderer, FieldState};
use crate::group_label::group_markup;
use crate::measure::MeasureWidth;
use crate::plan::FieldKind;
use crate::solver::Computation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Polynomial,
    Group,
    FieldDegree,
    Root(usize),
    SplittingField,
}

impl FieldKey {
    pub fn kind(self) -> FieldKind {
        match self {
            FieldKey::Polynomial => FieldKind::Polynomial,
            _ => FieldKind::Result,
        }
    }
}

/// The text each field of `computation` displays, in display order.
pub fn field_sources(computation: &Computation) -> Vec<(FieldKey, String)> {
    let group = &computation.group;
    let mut sources = vec![
        (FieldKey::Polynomial, computation.polynomial.clone()),
        (
            FieldKey::Group,
            group_markup(
                group.explicit.as_deref().unwrap_or_default(),
                &group.description,
                group.order,
            )
            .into_owned(),
        ),
        (
            FieldKey::FieldDegree,
            format!(r"[\mathbb{{Q}}(α) : \mathbb{{Q}}] = {}", computation.degree),
        ),
    ];
    sources.extend(
        computation
            .roots
            .iter()
            .enumerate()
            .map(|(index, root)| (FieldKey::Root(index), root.clone())),
    );
    if let Some(field) = &computation.splitting_field {
        sources.push((FieldKey::SplittingField, field.field.clone()));
    }
    sources
}

/// One [`FieldRenderer`] per field of the computation being shown.
pub struct ResultView<M: ?Sized> {
    measurer: Arc<M>,
    config: Arc<RenderConfig>,
    order: Vec<FieldKey>,
    fields: FxHashMap<FieldKey, FieldRenderer<M>>,
}

impl<M> ResultView<M>
where
    M: MeasureWidth + ?Sized + 'static,
{
    pub fn new(measurer: Arc<M>, config: Arc<RenderConfig>) -> Self {
        ResultView {
            measurer,
            config,
            order: Vec::new(),
            fields: FxHashMap::default(),
        }
    }

    /// Show a new computation. Fields it does not have are dropped, cancelling their work.
    pub fn show(&mut self, computation: &Computation, width: f32) {
        let sources = field_sources(computation);
        self.order = sources.iter().map(|(key, _)| *key).collect();
        self.fields.retain(|key, _| sources.iter().any(|(k, _)| k == key));
        for (key, source) in sources {
            let field = self.fields.entry(key).or_insert_with(|| {
                let measurer = Arc::clone(&self.measurer);
                FieldRenderer::new(measurer, key.kind(), Arc::clone(&self.config))
            });
            field.update(source, width);
        }
    }

    /// Re-plan every field for a new container width.
    pub fn resize(&mut self, width: f32) {
        for field in self.fields.values_mut() {
            field.resize(width);
        }
    }

    pub fn field(&self, key: FieldKey) -> Option<&FieldRenderer<M>> {
        self.fields.get(&key)
    }

    /// Keys of the shown fields, in display order.
    pub fn keys(&self) -> &[FieldKey] {
        &self.order
    }

    /// Wait for every field to settle, and return their states in display order.
    pub async fn settled(&self) -> Vec<(FieldKey, FieldState)> {
        let mut states = Vec::with_capacity(self.order.len());
        for key in &self.order {
            if let Some(field) = self.fields.get(key) {
                states.push((*key, field.settled().await));
            }
        }
        states
    }
}
