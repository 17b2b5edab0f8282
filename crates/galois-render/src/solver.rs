//! Requests to and replies from the external solver.
//!
//! The solver computes Galois groups, roots and splitting fields; this crate only formats what
//! it sends back. Replies are deserialized leniently, since failed computations leave most
//! fields out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::DisplayError;
use crate::normalize::normalize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// The normalized polynomial.
    pub polynomial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_splitting_field: Option<bool>,
}

impl SolveRequest {
    pub fn new(polynomial: impl Into<String>) -> Self {
        SolveRequest {
            polynomial: polynomial.into(),
            compute_splitting_field: None,
        }
    }

    pub fn with_splitting_field(mut self, compute: bool) -> Self {
        self.compute_splitting_field = compute.then_some(true);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaloisGroup {
    /// Group notation as markup, if the solver knows it.
    pub explicit: Option<String>,
    #[serde(default)]
    pub order: u64,
    /// The solver's own description, e.g. `Galois group 4T3 (D(4)) with order 8 of x^4 + 1`.
    #[serde(default)]
    pub description: String,
    pub structure: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplittingField {
    #[serde(default)]
    pub field: String,
    pub degree: Option<u64>,
    pub defining_polynomial: Option<String>,
    pub description: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub computed: bool,
    /// Set while the solver is still working on the field; fetch it again later.
    #[serde(default)]
    pub computing: bool,
}

/// A reply from either solver endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverReply {
    pub polynomial: Option<String>,
    pub degree: Option<u32>,
    pub galois_group: Option<GaloisGroup>,
    pub roots: Option<Vec<String>>,
    pub splitting_field: Option<SplittingField>,
    pub number_field: Option<String>,
    #[serde(default)]
    pub computation_successful: bool,
    pub error: Option<String>,
    pub error_type: Option<String>,
    pub computation_time_seconds: Option<f64>,
}

/// A successful computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub polynomial: String,
    pub degree: u32,
    pub group: GaloisGroup,
    pub roots: Vec<String>,
    pub splitting_field: Option<SplittingField>,
    pub number_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The polynomial factors over the rationals.
    Reducible {
        polynomial: String,
        degree: Option<u32>,
    },
    /// The solver refuses polynomials of degree 12 and up.
    DegreeTooHigh { degree: Option<u32> },
    /// The reply claimed success but lacked the named field.
    Malformed(&'static str),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SolverFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SolverReply {
    pub fn into_result(self) -> Result<Computation, SolverFailure> {
        if !self.computation_successful {
            return Err(self.into_failure());
        }
        let (Some(degree), Some(group)) = (self.degree, self.galois_group) else {
            return Err(malformed(if self.degree.is_none() {
                "degree"
            } else {
                "galois_group"
            }));
        };
        Ok(Computation {
            polynomial: self.polynomial.unwrap_or_default(),
            degree,
            group,
            roots: self.roots.unwrap_or_default(),
            splitting_field: self.splitting_field,
            number_field: self.number_field,
        })
    }

    /// The result of the splitting-field endpoint.
    pub fn into_splitting_field(self) -> Result<SplittingField, SolverFailure> {
        if !self.computation_successful {
            return Err(self.into_failure());
        }
        self.splitting_field
            .ok_or_else(|| malformed("splitting_field"))
    }

    fn into_failure(self) -> SolverFailure {
        let kind = match self.error_type.as_deref() {
            Some("reducible_polynomial") => FailureKind::Reducible {
                polynomial: self.polynomial.unwrap_or_default(),
                degree: self.degree,
            },
            Some("degree_too_high") => FailureKind::DegreeTooHigh {
                degree: self.degree,
            },
            _ => FailureKind::Other,
        };
        let message = self
            .error
            .unwrap_or_else(|| "the solver did not give a reason".to_string());
        SolverFailure { kind, message }
    }
}

fn malformed(field: &'static str) -> SolverFailure {
    SolverFailure {
        kind: FailureKind::Malformed(field),
        message: format!("the solver reported success without `{field}`"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("the solver answered with HTTP status {0}")]
    Status(u16),
    #[error("could not reach the solver: {0}")]
    Network(String),
    #[error("could not read the solver's reply: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Solver: Send + Sync {
    /// Ask for the Galois group, roots and (optionally) the splitting field.
    async fn solve(&self, request: &SolveRequest) -> Result<SolverReply, TransportError>;

    /// Ask for the splitting field alone.
    async fn splitting_field(&self, polynomial: &str) -> Result<SolverReply, TransportError>;
}

/// Normalize what the user typed and submit it.
pub async fn submit<S>(
    solver: &S,
    raw: &str,
    splitting_field: bool,
) -> Result<Computation, DisplayError>
where
    S: Solver + ?Sized,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DisplayError::input_empty());
    }
    let request = SolveRequest::new(normalize(raw)).with_splitting_field(splitting_field);
    debug!(polynomial = %request.polynomial, "submitting to solver");
    let reply = solver.solve(&request).await?;
    if let Some(seconds) = reply.computation_time_seconds {
        debug!(seconds, "solver finished");
    }
    Ok(reply.into_result()?)
}

/// Fetch the splitting field if the reply left it out or it was still being computed.
pub async fn complete_splitting_field<S>(
    solver: &S,
    computation: &mut Computation,
) -> Result<(), DisplayError>
where
    S: Solver + ?Sized,
{
    if computation
        .splitting_field
        .as_ref()
        .is_some_and(|field| !field.computing)
    {
        return Ok(());
    }
    debug!(polynomial = %computation.polynomial, "requesting splitting field");
    let reply = solver.splitting_field(&computation.polynomial).await?;
    computation.splitting_field = Some(reply.into_splitting_field()?);
    Ok(())
}
