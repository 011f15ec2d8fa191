//! HTTP client for the GestorBot backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::api::{
    ApiError, GestorApi,
    models::{
        BatchExtractionResponse, BatchUploadRequest, ExtractionResponse, MonthTotals,
        NewTransaction, ReceiptUpload, SubcategoryExpenses, TransactionCreated, TransactionList,
        TransactionQuery,
    },
};

/// How much of a non-JSON error body is kept for the error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Talks to the backend API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGestorApi {
    client: Client,
    base_url: String,
}

impl HttpGestorApi {
    /// Create a client for the backend served at `base_url`, e.g. "http://localhost:5000".
    ///
    /// Requests that take longer than `request_timeout` fail with [ApiError::Timeout].
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn map_request_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else if error.is_connect() {
        ApiError::Unavailable
    } else {
        ApiError::Request(error)
    }
}

/// Decode a JSON body regardless of the status code.
///
/// The backend reports most failures as JSON with `sucesso: false`, often with a
/// 4xx or 5xx status. Only bodies that are not JSON are turned into errors.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_request_error)?;

    serde_json::from_slice(&body).map_err(|error| {
        if status.is_success() {
            tracing::error!("could not decode backend response: {error}");
            ApiError::Decode(error.to_string())
        } else {
            let message: String = String::from_utf8_lossy(&body)
                .chars()
                .take(ERROR_BODY_LIMIT)
                .collect();
            tracing::warn!("backend responded with {status}: {message}");
            ApiError::Status {
                status: status.as_u16(),
                message,
            }
        }
    })
}

#[async_trait]
impl GestorApi for HttpGestorApi {
    async fn extract_receipt(
        &self,
        upload: &ReceiptUpload,
    ) -> Result<ExtractionResponse, ApiError> {
        tracing::debug!("extracting receipt {}", upload.file_name);

        let response = self
            .client
            .post(self.url("/upload-nota"))
            .json(upload)
            .send()
            .await
            .map_err(map_request_error)?;

        read_json(response).await
    }

    async fn extract_batch(
        &self,
        uploads: &[ReceiptUpload],
    ) -> Result<BatchExtractionResponse, ApiError> {
        tracing::debug!("extracting batch of {} receipts", uploads.len());

        let response = self
            .client
            .post(self.url("/upload-notas-massa"))
            .json(&BatchUploadRequest { files: uploads })
            .send()
            .await
            .map_err(map_request_error)?;

        read_json(response).await
    }

    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionCreated, ApiError> {
        let response = self
            .client
            .post(self.url("/transacao"))
            .json(transaction)
            .send()
            .await
            .map_err(map_request_error)?;

        read_json(response).await
    }

    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<TransactionList, ApiError> {
        let response = self
            .client
            .get(self.url("/transacoes"))
            .query(query)
            .send()
            .await
            .map_err(map_request_error)?;

        read_json(response).await
    }

    async fn month_totals(&self, year: i32, month: u8) -> Result<MonthTotals, ApiError> {
        let response = self
            .client
            .get(self.url("/api/totais"))
            .query(&[("mes", i32::from(month)), ("ano", year)])
            .send()
            .await
            .map_err(map_request_error)?;

        read_json(response).await
    }

    async fn subcategory_expenses(
        &self,
        category: &str,
        year: i32,
        month: u8,
    ) -> Result<SubcategoryExpenses, ApiError> {
        let month = month.to_string();
        let year = year.to_string();

        let response = self
            .client
            .get(self.url("/api/gastos-subcategoria"))
            .query(&[
                ("categoria", category),
                ("mes", month.as_str()),
                ("ano", year.as_str()),
            ])
            .send()
            .await
            .map_err(map_request_error)?;

        read_json(response).await
    }
}
