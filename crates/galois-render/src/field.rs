//! Debounced re-planning of a single displayed field.
//!
//! Every change to a field's source or container width starts a new generation. The pending
//! task of the previous generation is cancelled, and a task that finishes anyway only commits
//! its plan if no newer generation has started since. Observers watch [`FieldState`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::RenderConfig;
use crate::measure::MeasureWidth;
use crate::plan::{FieldKind, Planned, RenderPlan, plan};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldState {
    /// Nothing has been shown yet.
    #[default]
    Idle,
    /// A plan for `generation` is being debounced or measured.
    Measuring { generation: u64 },
    Sized(RenderPlan),
    /// Sized, but from estimated widths.
    FallbackSized(RenderPlan),
}

impl FieldState {
    pub fn plan(&self) -> Option<&RenderPlan> {
        match self {
            FieldState::Sized(plan) | FieldState::FallbackSized(plan) => Some(plan),
            FieldState::Idle | FieldState::Measuring { .. } => None,
        }
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        !matches!(self, FieldState::Measuring { .. })
    }
}

impl From<Planned> for FieldState {
    fn from(planned: Planned) -> Self {
        match planned.fallback {
            None => FieldState::Sized(planned.plan),
            Some(_) => FieldState::FallbackSized(planned.plan),
        }
    }
}

pub struct FieldRenderer<M: ?Sized> {
    measurer: Arc<M>,
    kind: FieldKind,
    config: Arc<RenderConfig>,
    generation: Arc<AtomicU64>,
    pending: Option<CancellationToken>,
    state: Arc<watch::Sender<FieldState>>,
    source: String,
    width: f32,
}

impl<M> FieldRenderer<M>
where
    M: MeasureWidth + ?Sized + 'static,
{
    pub fn new(measurer: Arc<M>, kind: FieldKind, config: Arc<RenderConfig>) -> Self {
        let (state, _) = watch::channel(FieldState::Idle);
        FieldRenderer {
            measurer,
            kind,
            config,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            state: Arc::new(state),
            source: String::new(),
            width: 0.0,
        }
    }

    /// Show `source` in a container `width` pixels wide. Returns the new generation.
    ///
    /// Must be called within a Tokio runtime.
    pub fn update(&mut self, source: impl Into<String>, width: f32) -> u64 {
        self.source = source.into();
        self.width = width;
        self.schedule()
    }

    /// Re-plan the current source for a new container width.
    pub fn resize(&mut self, width: f32) -> u64 {
        self.width = width;
        self.schedule()
    }

    fn schedule(&mut self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(pending) = self.pending.take() {
            trace!(generation, "cancelling superseded render task");
            pending.cancel();
        }
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        self.state.send_replace(FieldState::Measuring { generation });

        let measurer = Arc::clone(&self.measurer);
        let config = Arc::clone(&self.config);
        let latest = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);
        let source = self.source.clone();
        let (kind, width) = (self.kind, self.width);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(config.debounce()) => {}
            }
            let planned = tokio::select! {
                _ = token.cancelled() => return,
                planned = plan(&*measurer, &source, kind, width, &config) => planned,
            };
            state.send_if_modified(|current| {
                if latest.load(Ordering::Acquire) != generation {
                    debug!(generation, "discarding stale render plan");
                    return false;
                }
                *current = FieldState::from(planned);
                true
            });
        });
        generation
    }

    pub fn subscribe(&self) -> watch::Receiver<FieldState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FieldState {
        self.state.borrow().clone()
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Wait until the latest generation has committed its plan.
    pub async fn settled(&self) -> FieldState {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(FieldState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl<M: ?Sized> Drop for FieldRenderer<M> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}
