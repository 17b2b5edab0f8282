//! Errors shown to the user.
//!
//! Every failure that reaches the user is a [`DisplayError`]: a category tag and a message.
//! Measurement problems are not errors; see [`FallbackReason`](crate::measure::FallbackReason).

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;
use tracing::warn;

use crate::solver::{FailureKind, SolverFailure, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorCategory {
    /// Nothing was entered.
    InputEmpty,
    /// The solver could not be reached, or its reply could not be read.
    Transport,
    /// The polynomial factors over the rationals.
    Reducible,
    /// Any other failure reported by the solver.
    Computation,
}

/// The factored polynomial the solver sent back with a reducibility failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducibleInfo {
    pub polynomial: String,
    pub degree: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category}: {message}")]
pub struct DisplayError {
    pub category: ErrorCategory,
    pub message: String,
    pub reducible: Option<ReducibleInfo>,
}

impl DisplayError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        DisplayError {
            category,
            message: message.into(),
            reducible: None,
        }
    }

    pub fn input_empty() -> Self {
        DisplayError::new(ErrorCategory::InputEmpty, "please enter a polynomial")
    }
}

impl From<TransportError> for DisplayError {
    fn from(err: TransportError) -> Self {
        DisplayError::new(ErrorCategory::Transport, err.to_string())
    }
}

impl From<SolverFailure> for DisplayError {
    fn from(failure: SolverFailure) -> Self {
        match failure.kind {
            FailureKind::Reducible { polynomial, degree } => DisplayError {
                category: ErrorCategory::Reducible,
                message: failure.message,
                reducible: Some(ReducibleInfo { polynomial, degree }),
            },
            FailureKind::DegreeTooHigh { .. } | FailureKind::Malformed(_) | FailureKind::Other => {
                DisplayError::new(ErrorCategory::Computation, failure.message)
            }
        }
    }
}

/// Holds at most one error until it is dismissed. A newer error replaces an older one.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    current: Option<DisplayError>,
}

impl ErrorSlot {
    pub fn raise(&mut self, error: DisplayError) {
        let category: &'static str = error.category.into();
        warn!(category, message = %error.message, "raising error");
        self.current = Some(error);
    }

    #[inline]
    pub fn current(&self) -> Option<&DisplayError> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) -> Option<DisplayError> {
        self.current.take()
    }

    /// Raise the error of `result`, if any, and pass on its value.
    pub fn catch<T>(&mut self, result: Result<T, DisplayError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.raise(error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let transport = DisplayError::from(TransportError::Status(503));
        assert_eq!(transport.category, ErrorCategory::Transport);
        assert_eq!(
            transport.to_string(),
            "transport: the solver answered with HTTP status 503"
        );

        let reducible = DisplayError::from(SolverFailure {
            kind: FailureKind::Reducible {
                polynomial: "(x - 1) * (x + 1)".to_string(),
                degree: Some(2),
            },
            message: "reducible".to_string(),
        });
        assert_eq!(reducible.category, ErrorCategory::Reducible);
        assert_eq!(
            reducible.reducible.map(|info| info.polynomial).as_deref(),
            Some("(x - 1) * (x + 1)")
        );

        let too_high = DisplayError::from(SolverFailure {
            kind: FailureKind::DegreeTooHigh { degree: Some(12) },
            message: "too high".to_string(),
        });
        assert_eq!(too_high.category, ErrorCategory::Computation);
        assert_eq!(
            DisplayError::input_empty().to_string(),
            "input-empty: please enter a polynomial"
        );
    }

    #[test]
    fn slot_holds_latest_until_dismissed() {
        let mut slot = ErrorSlot::default();
        assert!(slot.current().is_none());
        slot.raise(DisplayError::input_empty());
        slot.raise(DisplayError::new(ErrorCategory::Computation, "failed"));
        assert_eq!(slot.current().map(|e| e.category), Some(ErrorCategory::Computation));
        assert_eq!(slot.dismiss().map(|e| e.message), Some("failed".to_string()));
        assert!(slot.current().is_none());
        assert_eq!(slot.catch(Ok::<_, DisplayError>(3)), Some(3));
        assert_eq!(slot.catch::<()>(Err(DisplayError::input_empty())), None);
        assert_eq!(slot.current().map(|e| e.category), Some(ErrorCategory::InputEmpty));
    }
}
