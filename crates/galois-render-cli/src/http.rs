use std::time::Duration;

use async_trait::async_trait;
use galois_render::{SolveRequest, Solver, SolverReply, TransportError};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// The solver service, reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSolver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct SplittingFieldRequest<'a> {
    polynomial: &'a str,
}

impl HttpSolver {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn post<T: Serialize + Sync + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<SolverReply, TransportError> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(%url, "posting to solver");
        let response = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        // Rejected polynomials still get a 200; the reply says why.
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Solver for HttpSolver {
    async fn solve(&self, request: &SolveRequest) -> Result<SolverReply, TransportError> {
        self.post("/api/galois", request).await
    }

    async fn splitting_field(&self, polynomial: &str) -> Result<SolverReply, TransportError> {
        self.post("/api/splitting-field", &SplittingFieldRequest { polynomial })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_without_trailing_slash() {
        let solver = HttpSolver::new("http://localhost:8001/", Duration::from_secs(1));
        assert_eq!(solver.base_url, "http://localhost:8001");
    }

    #[tokio::test]
    async fn unreachable_solver_is_a_network_error() {
        // Nothing listens on the discard port.
        let solver = HttpSolver::new("http://127.0.0.1:9", Duration::from_secs(5));
        let result = solver.solve(&SolveRequest::new("x^2+1")).await;
        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
