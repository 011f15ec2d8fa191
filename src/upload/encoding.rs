//! Encoding of receipt files for the extraction endpoints.

use std::fmt::Display;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    api::{FileKind, ReceiptUpload},
    upload::validation::ReceiptFile,
};

/// How many files of a batch have been encoded so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingProgress {
    /// The number of files encoded, including the current one.
    pub done: usize,
    /// The number of files in the batch.
    pub total: usize,
}

impl Display for EncodingProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

/// The file as a `data:<mime>;base64,<payload>` URL.
pub fn to_data_url(file: &ReceiptFile) -> String {
    let mime = match (file.content_type.as_str(), file.kind()) {
        ("", FileKind::Pdf) => "application/pdf",
        ("", FileKind::Image) => "application/octet-stream",
        (content_type, _) => content_type,
    };

    format!("data:{mime};base64,{}", STANDARD.encode(&file.bytes))
}

/// Encode a single file for upload.
pub fn encode_receipt(file: &ReceiptFile) -> ReceiptUpload {
    ReceiptUpload {
        data_url: to_data_url(file),
        kind: file.kind(),
        file_name: file.file_name.clone(),
    }
}

/// Encode `files` one after the other, calling `on_progress` after each file.
pub fn encode_batch(
    files: &[ReceiptFile],
    mut on_progress: impl FnMut(EncodingProgress),
) -> Vec<ReceiptUpload> {
    let total = files.len();

    files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let upload = encode_receipt(file);
            on_progress(EncodingProgress {
                done: index + 1,
                total,
            });
            upload
        })
        .collect()
}
