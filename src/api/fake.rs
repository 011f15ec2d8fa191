//! An in-memory [GestorApi] for handler tests.
//!
//! Every call is recorded so tests can check which requests reached the
//! backend and in what order.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;

use crate::api::{
    ApiError, BatchExtractionResponse, BatchItem, ExtractedReceipt, ExtractionResponse,
    GestorApi, MonthTotals, NewTransaction, ReceiptUpload, SubcategoryExpenses,
    TransactionCreated, TransactionList, TransactionQuery, TransactionRecord,
};

/// A request received by [FakeGestorApi].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ApiCall {
    ExtractReceipt(ReceiptUpload),
    ExtractBatch(Vec<ReceiptUpload>),
    CreateTransaction(NewTransaction),
    ListTransactions(TransactionQuery),
    MonthTotals { year: i32, month: u8 },
    SubcategoryExpenses { category: String, year: i32, month: u8 },
}

#[derive(Debug, Default)]
pub(crate) struct FakeGestorApi {
    calls: Mutex<Vec<ApiCall>>,
    unavailable: AtomicBool,
    extraction: Mutex<Option<ExtractionResponse>>,
    batch: Mutex<Option<BatchExtractionResponse>>,
    /// `None` entries simulate a request that fails in transit.
    creation_results: Mutex<VecDeque<Option<TransactionCreated>>>,
    month_totals: Mutex<HashMap<(i32, u8), MonthTotals>>,
    transactions: Mutex<Vec<TransactionRecord>>,
    subcategories: Mutex<Option<SubcategoryExpenses>>,
}

impl FakeGestorApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the backend was down.
    pub(crate) fn unavailable(self) -> Self {
        self.unavailable.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn with_extraction(self, response: ExtractionResponse) -> Self {
        *self.extraction.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn with_batch(self, response: BatchExtractionResponse) -> Self {
        *self.batch.lock().unwrap() = Some(response);
        self
    }

    /// Queue the responses of successive transaction creations.
    ///
    /// Once the queue is empty, creations succeed.
    pub(crate) fn with_creation_results(self, results: Vec<Option<TransactionCreated>>) -> Self {
        *self.creation_results.lock().unwrap() = results.into();
        self
    }

    pub(crate) fn with_month_totals(self, year: i32, month: u8, totals: MonthTotals) -> Self {
        self.month_totals
            .lock()
            .unwrap()
            .insert((year, month), totals);
        self
    }

    pub(crate) fn with_transactions(self, transactions: Vec<TransactionRecord>) -> Self {
        *self.transactions.lock().unwrap() = transactions;
        self
    }

    pub(crate) fn with_subcategories(self, response: SubcategoryExpenses) -> Self {
        *self.subcategories.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn created_transactions(&self) -> Vec<NewTransaction> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::CreateTransaction(transaction) => Some(transaction),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);

        if self.unavailable.load(Ordering::SeqCst) {
            Err(ApiError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GestorApi for FakeGestorApi {
    async fn extract_receipt(
        &self,
        upload: &ReceiptUpload,
    ) -> Result<ExtractionResponse, ApiError> {
        self.record(ApiCall::ExtractReceipt(upload.clone()))?;

        Ok(self
            .extraction
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| extraction_success(ExtractedReceipt::default(), "")))
    }

    async fn extract_batch(
        &self,
        uploads: &[ReceiptUpload],
    ) -> Result<BatchExtractionResponse, ApiError> {
        self.record(ApiCall::ExtractBatch(uploads.to_vec()))?;

        let configured = self.batch.lock().unwrap().clone();

        Ok(configured.unwrap_or_else(|| {
            let results = uploads
                .iter()
                .map(|upload| batch_item_success(&upload.file_name, ExtractedReceipt::default()))
                .collect::<Vec<_>>();

            BatchExtractionResponse {
                success: true,
                processed: results.len(),
                failed: 0,
                results,
                error: None,
            }
        }))
    }

    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionCreated, ApiError> {
        self.record(ApiCall::CreateTransaction(transaction.clone()))?;

        match self.creation_results.lock().unwrap().pop_front() {
            Some(Some(response)) => Ok(response),
            Some(None) => Err(ApiError::Unavailable),
            None => Ok(creation_success(1)),
        }
    }

    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<TransactionList, ApiError> {
        self.record(ApiCall::ListTransactions(query.clone()))?;

        let transactions = self.transactions.lock().unwrap().clone();

        Ok(TransactionList {
            total: transactions.len(),
            transactions,
            error: None,
        })
    }

    async fn month_totals(&self, year: i32, month: u8) -> Result<MonthTotals, ApiError> {
        self.record(ApiCall::MonthTotals { year, month })?;

        Ok(self
            .month_totals
            .lock()
            .unwrap()
            .get(&(year, month))
            .cloned()
            .unwrap_or(MonthTotals {
                success: true,
                ..Default::default()
            }))
    }

    async fn subcategory_expenses(
        &self,
        category: &str,
        year: i32,
        month: u8,
    ) -> Result<SubcategoryExpenses, ApiError> {
        self.record(ApiCall::SubcategoryExpenses {
            category: category.to_owned(),
            year,
            month,
        })?;

        Ok(self
            .subcategories
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(SubcategoryExpenses {
                success: true,
                ..Default::default()
            }))
    }
}

pub(crate) fn extraction_success(data: ExtractedReceipt, receipt_url: &str) -> ExtractionResponse {
    ExtractionResponse {
        success: true,
        data: Some(data),
        receipt_url: Some(receipt_url.to_owned()),
        error: None,
    }
}

pub(crate) fn extraction_failure(error: &str) -> ExtractionResponse {
    ExtractionResponse {
        success: false,
        data: None,
        receipt_url: None,
        error: Some(error.to_owned()),
    }
}

pub(crate) fn batch_item_success(file_name: &str, data: ExtractedReceipt) -> BatchItem {
    BatchItem {
        success: true,
        data: Some(data),
        receipt_url: Some(format!("/uploads/{file_name}")),
        file_name: file_name.to_owned(),
        error: None,
    }
}

pub(crate) fn batch_item_failure(file_name: &str, error: &str) -> BatchItem {
    BatchItem {
        success: false,
        data: None,
        receipt_url: None,
        file_name: file_name.to_owned(),
        error: Some(error.to_owned()),
    }
}

pub(crate) fn creation_success(id: i64) -> TransactionCreated {
    TransactionCreated {
        success: true,
        id: Some(id),
        message: Some("Transação salva com sucesso".to_owned()),
        error: None,
    }
}

pub(crate) fn creation_failure(error: &str) -> TransactionCreated {
    TransactionCreated {
        success: false,
        id: None,
        message: None,
        error: Some(error.to_owned()),
    }
}
