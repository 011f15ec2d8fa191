//! The client side of the GestorBot backend API.
//!
//! The backend owns receipt extraction, persistence and aggregation. Pages in
//! this crate only reach it through [GestorApi] so that handlers can be tested
//! against an in-memory fake.

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod models;

use async_trait::async_trait;

pub use client::HttpGestorApi;
pub use models::{
    BatchExtractionResponse, BatchItem, ExtractedReceipt, ExtractionResponse, FileKind,
    MonthTotals, NewTransaction, ReceiptUpload, SubcategoryExpenses, TransactionCreated,
    TransactionList, TransactionQuery, TransactionRecord,
};

/// Errors that prevent a backend call from producing a response.
///
/// A response with `sucesso: false` is not an error at this level, it is
/// returned to the caller like any other response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend could not be reached.
    #[error("backend unavailable")]
    Unavailable,

    /// The backend did not respond in time.
    #[error("request timed out")]
    Timeout,

    /// The request failed for any other reason.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend responded with an error status and a body that is not JSON.
    #[error("backend responded with status {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The start of the response body.
        message: String,
    },

    /// The backend responded with a success status but the body could not be decoded.
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

/// The operations the backend API offers to the pages of this crate.
#[async_trait]
pub trait GestorApi: Send + Sync + std::fmt::Debug {
    /// Extract the fields of a single receipt.
    async fn extract_receipt(&self, upload: &ReceiptUpload)
    -> Result<ExtractionResponse, ApiError>;

    /// Extract the fields of several receipts in one request.
    async fn extract_batch(
        &self,
        uploads: &[ReceiptUpload],
    ) -> Result<BatchExtractionResponse, ApiError>;

    /// Store a transaction confirmed by the user.
    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionCreated, ApiError>;

    /// List the transactions of a month, optionally filtered by kind and category.
    async fn list_transactions(&self, query: &TransactionQuery)
    -> Result<TransactionList, ApiError>;

    /// Get the revenue, expenses and expenses per category of a month.
    async fn month_totals(&self, year: i32, month: u8) -> Result<MonthTotals, ApiError>;

    /// Get the expenses per subcategory of `category` in a month.
    async fn subcategory_expenses(
        &self,
        category: &str,
        year: i32,
        month: u8,
    ) -> Result<SubcategoryExpenses, ApiError>;
}
