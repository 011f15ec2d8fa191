//! Request and response bodies of the backend API.
//!
//! The backend speaks Portuguese on the wire, the field names here are renamed
//! with serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::category::TransactionKind;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// How the backend should read an uploaded receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileKind {
    /// A photo or scan of the receipt.
    #[serde(rename = "imagem")]
    Image,
    /// A PDF document.
    #[serde(rename = "pdf")]
    Pdf,
}

/// A receipt file encoded for the extraction endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptUpload {
    /// The file as a base64 data URL.
    #[serde(rename = "imagem")]
    pub data_url: String,
    /// Whether the file is an image or a PDF.
    #[serde(rename = "tipo_arquivo")]
    pub kind: FileKind,
    /// The name of the file on the user's device.
    #[serde(rename = "nome_arquivo")]
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchUploadRequest<'a> {
    #[serde(rename = "arquivos")]
    pub files: &'a [ReceiptUpload],
}

/// The fields read from a receipt.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedReceipt {
    /// The receipt date as `YYYY-MM-DD`.
    #[serde(rename = "data", default)]
    pub date: Option<String>,
    /// The name of the business that issued the receipt.
    #[serde(rename = "estabelecimento", default)]
    pub establishment: Option<String>,
    /// The total amount.
    #[serde(rename = "valor_total", default)]
    pub total: Option<f64>,
    /// The category suggested by the extraction model.
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    /// A free text note about the purchase.
    #[serde(rename = "observacao", default)]
    pub note: Option<String>,
}

/// The response of the single receipt extraction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractionResponse {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "dados", default)]
    pub data: Option<ExtractedReceipt>,
    /// Where the backend stored the receipt file.
    #[serde(rename = "comprovante_url", default)]
    pub receipt_url: Option<String>,
    #[serde(rename = "erro", default)]
    pub error: Option<String>,
}

/// The extraction result of one file in a batch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchItem {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "dados", default)]
    pub data: Option<ExtractedReceipt>,
    #[serde(rename = "comprovante_url", default)]
    pub receipt_url: Option<String>,
    #[serde(rename = "nome_arquivo", default)]
    pub file_name: String,
    #[serde(rename = "erro", default)]
    pub error: Option<String>,
}

/// The response of the batch extraction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchExtractionResponse {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "total_processados", default)]
    pub processed: usize,
    #[serde(rename = "total_erros", default)]
    pub failed: usize,
    #[serde(rename = "resultados", default)]
    pub results: Vec<BatchItem>,
    #[serde(rename = "erro", default)]
    pub error: Option<String>,
}

/// A transaction confirmed by the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "data", with = "iso_date")]
    pub date: Date,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "subcategoria", skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "estabelecimento")]
    pub establishment: String,
    #[serde(rename = "comprovante_url")]
    pub receipt_url: String,
}

/// The response of the transaction creation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionCreated {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
    #[serde(rename = "erro", default)]
    pub error: Option<String>,
}

/// The filters for listing transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionQuery {
    #[serde(rename = "mes")]
    pub month: u8,
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A stored transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    #[serde(rename = "valor")]
    pub amount: f64,
    /// The transaction date as an ISO 8601 date or date-time.
    #[serde(rename = "data", default)]
    pub date: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "subcategoria", default)]
    pub subcategory: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "estabelecimento", default)]
    pub establishment: Option<String>,
    #[serde(rename = "comprovante_url", default)]
    pub receipt_url: Option<String>,
}

/// The response of the transaction listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionList {
    #[serde(rename = "transacoes", default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub total: usize,
    /// Only present when the listing failed.
    #[serde(rename = "erro", default)]
    pub error: Option<String>,
}

/// The response of the monthly totals endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthTotals {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "faturamento", default)]
    pub revenue: f64,
    #[serde(rename = "gastos", default)]
    pub expenses: f64,
    #[serde(rename = "lucro", default)]
    pub profit: f64,
    #[serde(rename = "gastos_por_categoria", default)]
    pub expenses_by_category: BTreeMap<String, f64>,
    #[serde(rename = "erro", default)]
    pub error: Option<String>,
}

/// The response of the subcategory expenses endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubcategoryExpenses {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "gastos_por_subcategoria", default)]
    pub expenses_by_subcategory: BTreeMap<String, f64>,
    #[serde(rename = "erro", default)]
    pub error: Option<String>,
}
