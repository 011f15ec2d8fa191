//! The receipt upload workflow.
//!
//! A receipt is validated, encoded and sent to the backend for extraction. The
//! extracted fields fill a review form, and the reviewed form is saved as a
//! transaction. The bulk workflow does the same for up to [MAX_BATCH_FILES]
//! receipts at once.

mod bulk;
mod effects;
mod encoding;
mod page;
mod review;
mod single;
mod transaction;
mod validation;

use std::sync::Arc;

use axum::{
    extract::{FromRef, Multipart, multipart::MultipartError},
    http::StatusCode,
};

pub use bulk::{confirm_batch, upload_batch};
pub use page::get_upload_page;
pub use review::get_review_subcategories;
pub use single::{confirm_receipt, upload_receipt};
pub use validation::{MAX_BATCH_FILES, MAX_FILE_SIZE, ValidationError};

use crate::{AppState, Error, api::GestorApi, category::TransactionKind};
use validation::ReceiptFile;

/// The state needed by the upload handlers.
#[derive(Debug, Clone)]
pub struct UploadState {
    /// The client for the GestorBot backend.
    pub api: Arc<dyn GestorApi>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for UploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The fields of an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    kind: TransactionKind,
    files: Vec<ReceiptFile>,
}

/// Read the transaction kind and the files of an upload form.
///
/// File fields without a file name are skipped, browsers send them when no
/// file was picked. A form larger than the body limit is rejected through
/// `invalid`, as too many files or as a file that is too large.
async fn read_upload_form(
    mut multipart: Multipart,
    invalid: fn(ValidationError) -> Error,
) -> Result<UploadForm, Error> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                let last_file = form.files.last().map(|file| file.file_name.as_str());
                return Err(read_error(error, form.files.len() + 1, last_file, invalid));
            }
        };
        let name = field.name().unwrap_or_default().to_owned();

        if name == "tipo" {
            let value = field
                .text()
                .await
                .map_err(|error| read_error(error, form.files.len(), None, invalid))?;

            form.kind = value.parse().unwrap_or_else(|error| {
                tracing::warn!("{error}, saving as an expense");
                TransactionKind::Expense
            });
            continue;
        }

        let file_name = match field.file_name() {
            Some(file_name) if !file_name.is_empty() => file_name.to_owned(),
            _ => {
                tracing::debug!("Skipping multipart field \"{name}\" without a file");
                continue;
            }
        };
        let content_type = field.content_type().unwrap_or_default().to_owned();

        let bytes = field.bytes().await.map_err(|error| {
            read_error(error, form.files.len() + 1, Some(&file_name), invalid)
        })?;

        tracing::debug!(
            "Received file '{}' ({}) that is {} bytes",
            file_name,
            content_type,
            bytes.len()
        );

        form.files.push(ReceiptFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(form)
}

/// Map a multipart error, where `file_count` files had been seen and
/// `file_name` was the file being read.
fn read_error(
    error: MultipartError,
    file_count: usize,
    file_name: Option<&str>,
    invalid: fn(ValidationError) -> Error,
) -> Error {
    if error.status() != StatusCode::PAYLOAD_TOO_LARGE {
        tracing::error!("Could not read multipart form: {error}");
        return Error::MultipartError(error.to_string());
    }

    tracing::warn!("Upload rejected after {file_count} files: {error}");

    if file_count > MAX_BATCH_FILES {
        invalid(ValidationError::TooManyFiles(file_count))
    } else {
        invalid(ValidationError::TooLarge(
            file_name.unwrap_or_default().to_owned(),
        ))
    }
}
