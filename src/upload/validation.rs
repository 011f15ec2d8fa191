//! Checks receipt files before anything is sent to the backend.

use axum::body::Bytes;

use crate::api::FileKind;

/// The largest receipt file accepted, in bytes.
pub const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;

/// The most files accepted in one bulk upload.
pub const MAX_BATCH_FILES: usize = 10;

/// A file received from the upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFile {
    /// The name of the file on the user's device.
    pub file_name: String,
    /// The MIME type reported by the browser, empty if none was sent.
    pub content_type: String,
    /// The file contents.
    pub bytes: Bytes,
}

impl ReceiptFile {
    /// Whether the backend should read this file as a PDF or as an image.
    pub fn kind(&self) -> FileKind {
        if is_pdf(&self.content_type, &self.file_name) {
            FileKind::Pdf
        } else {
            FileKind::Image
        }
    }
}

/// Why an upload was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The form did not contain any file.
    #[error("no file was uploaded")]
    NoFiles,

    /// A bulk upload contained more than [MAX_BATCH_FILES] files.
    #[error("{0} files were uploaded but at most {MAX_BATCH_FILES} are allowed")]
    TooManyFiles(usize),

    /// The named file is neither an image nor a PDF.
    #[error("{0} is not an image or a PDF")]
    UnsupportedType(String),

    /// The named file is larger than [MAX_FILE_SIZE].
    #[error("{0} is larger than {MAX_FILE_SIZE} bytes")]
    TooLarge(String),
}

fn is_pdf(content_type: &str, file_name: &str) -> bool {
    content_type == "application/pdf" || file_name.to_lowercase().ends_with(".pdf")
}

/// Whether a file with this MIME type and name can be read as a receipt.
pub fn is_supported_type(content_type: &str, file_name: &str) -> bool {
    content_type.starts_with("image/") || is_pdf(content_type, file_name)
}

/// Check the type and then the size of a single file.
pub fn validate_file(file: &ReceiptFile) -> Result<(), ValidationError> {
    if !is_supported_type(&file.content_type, &file.file_name) {
        return Err(ValidationError::UnsupportedType(file.file_name.clone()));
    }

    if file.bytes.len() > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge(file.file_name.clone()));
    }

    Ok(())
}

/// Check the number of files, then each file in order.
///
/// The first invalid file stops the check.
pub fn validate_batch(files: &[ReceiptFile]) -> Result<(), ValidationError> {
    match files.len() {
        0 => return Err(ValidationError::NoFiles),
        count if count > MAX_BATCH_FILES => return Err(ValidationError::TooManyFiles(count)),
        _ => {}
    }

    files.iter().try_for_each(validate_file)
}
