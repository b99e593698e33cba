use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use shared::domain::TaxRow;
use shared::error::SaveFailure;
use shared::protocol::SaveResponse;

/// A save that did not reach durable storage. Surfaced to the user as a
/// one-shot notice; the editing session keeps its data either way, so a
/// plain retry is always possible.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("persistence request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("persistence service rejected the batch ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
}

/// Client for the persistence service. Submits whatever snapshot it is
/// handed verbatim: no retries, no pre-submission validation.
pub struct PersistenceClient {
    http: Client,
    base_url: String,
}

impl PersistenceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Posts the full row snapshot to `/api/save-json`. Returns the
    /// service's confirmation message.
    pub async fn save_rows(&self, rows: &[TaxRow]) -> Result<String, SaveError> {
        self.post_batch("/api/save-json", rows).await
    }

    /// Posts the identifier column to `/api/save-tckn`.
    pub async fn save_identifiers(&self, identifiers: &[u64]) -> Result<String, SaveError> {
        self.post_batch("/api/save-tckn", identifiers).await
    }

    async fn post_batch<T>(&self, path: &str, batch: &T) -> Result<String, SaveError>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.http.post(&url).json(batch).send().await?;
        let status = response.status();

        if status.is_success() {
            let confirmation: SaveResponse = response.json().await?;
            return Ok(confirmation.message);
        }

        let message = match response.json::<SaveFailure>().await {
            Ok(failure) => failure.error,
            Err(_) => format!("{path} returned no failure detail"),
        };
        warn!(%status, %message, "save rejected");
        Err(SaveError::Rejected { status, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use shared::domain::{RowId, TaxCategory};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        format!("http://{addr}")
    }

    fn sample_row() -> TaxRow {
        TaxRow {
            identifier: 12345678901,
            category: TaxCategory::Income,
            price: 1000.0,
            tax_amount: 100.0,
            last_payment_date: "11/12/2024".to_string(),
            total: 900.0,
            ..TaxRow::blank(RowId(1))
        }
    }

    #[tokio::test]
    async fn save_rows_returns_the_confirmation_message() {
        let router = Router::new().route(
            "/api/save-json",
            post(|Json(batch): Json<Vec<serde_json::Value>>| async move {
                assert_eq!(batch.len(), 1);
                assert_eq!(batch[0]["category"], "Income Tax");
                Json(SaveResponse {
                    message: "JSON file updated successfully".to_string(),
                })
            }),
        );
        let base_url = spawn(router).await;

        let client = PersistenceClient::new(base_url);
        let message = client.save_rows(&[sample_row()]).await.expect("save");
        assert_eq!(message, "JSON file updated successfully");
    }

    #[tokio::test]
    async fn save_identifiers_posts_bare_integers() {
        let router = Router::new().route(
            "/api/save-tckn",
            post(|Json(batch): Json<Vec<u64>>| async move {
                assert_eq!(batch, vec![12345678901, 0]);
                Json(SaveResponse {
                    message: "TCKN file updated successfully".to_string(),
                })
            }),
        );
        let base_url = spawn(router).await;

        let client = PersistenceClient::new(base_url);
        let message = client
            .save_identifiers(&[12345678901, 0])
            .await
            .expect("save");
        assert_eq!(message, "TCKN file updated successfully");
    }

    #[tokio::test]
    async fn service_failure_surfaces_as_rejected() {
        let router = Router::new().route(
            "/api/save-json",
            post(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(SaveFailure::new("Failed to save JSON file")),
                )
            }),
        );
        let base_url = spawn(router).await;

        let client = PersistenceClient::new(base_url);
        let err = client.save_rows(&[sample_row()]).await.unwrap_err();
        match err {
            SaveError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "Failed to save JSON file");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_surfaces_as_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = PersistenceClient::new(format!("http://{addr}"));
        let err = client.save_identifiers(&[1]).await.unwrap_err();
        assert!(matches!(err, SaveError::Transport(_)));
    }
}
