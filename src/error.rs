//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    api::ApiError,
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
    upload::{MAX_BATCH_FILES, ValidationError},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A single receipt upload was rejected before reaching the backend.
    #[error("invalid receipt upload: {0}")]
    InvalidUpload(ValidationError),

    /// A bulk receipt upload was rejected before reaching the backend.
    #[error("invalid bulk upload: {0}")]
    InvalidBulkUpload(ValidationError),

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The amount in a review form is not a positive number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The date in a review form is not a `YYYY-MM-DD` date.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// The backend could not extract a receipt and said why.
    #[error("receipt extraction failed: {0}")]
    ExtractionFailed(String),

    /// The backend could not extract a batch of receipts and said why.
    #[error("batch extraction failed: {0}")]
    BatchExtractionFailed(String),

    /// The backend refused to store a transaction and said why.
    #[error("could not save transaction: {0}")]
    SaveFailed(String),

    /// The backend could not be reached while extracting a receipt.
    #[error("backend unavailable during extraction: {0}")]
    ExtractionUnavailable(String),

    /// The backend could not be reached while extracting a batch of receipts.
    #[error("backend unavailable during batch extraction: {0}")]
    BatchExtractionUnavailable(String),

    /// The backend could not be reached while saving a transaction.
    #[error("backend unavailable while saving: {0}")]
    SaveUnavailable(String),

    /// The backend could not be reached while loading a page.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered a page load with an error.
    #[error("backend error: {0}")]
    BackendError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        tracing::error!("backend request failed: {error}");
        Error::BackendUnavailable(error.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Fuso horário inválido",
                fix: &format!(
                    "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor e use um nome canônico, como America/Sao_Paulo."
                ),
            }
            .into_response(),
            Error::BackendUnavailable(_) => InternalServerError {
                description: "Não foi possível carregar os dados.",
                fix: "O servidor do GestorBot não respondeu. Tente novamente em instantes.",
            }
            .into_response(),
            Error::BackendError(error) => InternalServerError {
                description: "Não foi possível carregar os dados.",
                fix: &error,
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown as a page.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidUpload(error) => (
                validation_status(&error),
                Alert::ErrorSimple {
                    message: match error {
                        ValidationError::TooLarge(_) => {
                            "Arquivo muito grande. Tamanho máximo: 16MB".to_owned()
                        }
                        _ => "Por favor, selecione uma imagem ou PDF válido.".to_owned(),
                    },
                },
            ),
            Error::InvalidBulkUpload(error) => (
                validation_status(&error),
                Alert::ErrorSimple {
                    message: match error {
                        ValidationError::NoFiles => {
                            "Selecione pelo menos um arquivo.".to_owned()
                        }
                        ValidationError::TooManyFiles(count) => format!(
                            "Máximo de {MAX_BATCH_FILES} arquivos por vez. Você selecionou {count}"
                        ),
                        ValidationError::UnsupportedType(file_name) => {
                            format!("Arquivo inválido: {file_name}")
                        }
                        ValidationError::TooLarge(file_name) if file_name.is_empty() => {
                            "Arquivo muito grande. Tamanho máximo: 16MB".to_owned()
                        }
                        ValidationError::TooLarge(file_name) => {
                            format!("Arquivo muito grande: {file_name}")
                        }
                    },
                },
            ),
            Error::MultipartError(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Não foi possível ler o arquivo enviado.".to_owned(),
                    details: "Tente selecionar o arquivo novamente.".to_owned(),
                },
            ),
            Error::InvalidAmount(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Por favor, informe um valor válido.".to_owned(),
                },
            ),
            Error::InvalidDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Data inválida".to_owned(),
                    details: format!("\"{date}\" não é uma data no formato AAAA-MM-DD."),
                },
            ),
            Error::ExtractionFailed(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::ErrorSimple {
                    message: format!("Erro ao processar nota: {error}"),
                },
            ),
            Error::BatchExtractionFailed(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::ErrorSimple {
                    message: format!("Erro: {error}"),
                },
            ),
            Error::SaveFailed(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::ErrorSimple {
                    message: format!("Erro ao salvar: {error}"),
                },
            ),
            Error::ExtractionUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple {
                    message: "Erro ao processar arquivo. Verifique sua conexão e tente novamente."
                        .to_owned(),
                },
            ),
            Error::BatchExtractionUnavailable(error) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple {
                    message: format!("Erro ao processar arquivos: {error}"),
                },
            ),
            Error::SaveUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple {
                    message: "Erro ao salvar. Verifique sua conexão e tente novamente.".to_owned(),
                },
            ),
            Error::BackendUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple {
                    message: "Erro de conexão.".to_owned(),
                },
            ),
            Error::BackendError(error) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple { message: error },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Fuso horário inválido".to_owned(),
                    details: format!(
                        "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                        configurações do servidor."
                    ),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "Recurso não encontrado.".to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

fn validation_status(error: &ValidationError) -> StatusCode {
    match error {
        ValidationError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, test_utils::get_alert_message, upload::ValidationError};

    #[tokio::test]
    async fn single_upload_messages() {
        let response =
            Error::InvalidUpload(ValidationError::UnsupportedType("a.txt".to_owned()))
                .into_alert_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_alert_message(response).await,
            "Por favor, selecione uma imagem ou PDF válido."
        );

        let response = Error::InvalidUpload(ValidationError::TooLarge("a.png".to_owned()))
            .into_alert_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            get_alert_message(response).await,
            "Arquivo muito grande. Tamanho máximo: 16MB"
        );
    }

    #[tokio::test]
    async fn bulk_upload_messages_name_the_file() {
        let response = Error::InvalidBulkUpload(ValidationError::TooManyFiles(12))
            .into_alert_response();
        assert_eq!(
            get_alert_message(response).await,
            "Máximo de 10 arquivos por vez. Você selecionou 12"
        );

        let response =
            Error::InvalidBulkUpload(ValidationError::UnsupportedType("planilha.xlsx".to_owned()))
                .into_alert_response();
        assert_eq!(
            get_alert_message(response).await,
            "Arquivo inválido: planilha.xlsx"
        );

        let response = Error::InvalidBulkUpload(ValidationError::TooLarge("scan.png".to_owned()))
            .into_alert_response();
        assert_eq!(
            get_alert_message(response).await,
            "Arquivo muito grande: scan.png"
        );

        let response =
            Error::InvalidBulkUpload(ValidationError::TooLarge(String::new())).into_alert_response();
        assert_eq!(
            get_alert_message(response).await,
            "Arquivo muito grande. Tamanho máximo: 16MB"
        );
    }

    #[tokio::test]
    async fn backend_messages_include_reason() {
        let response = Error::SaveFailed("Categoria inválida".to_owned()).into_alert_response();

        assert_eq!(
            get_alert_message(response).await,
            "Erro ao salvar: Categoria inválida"
        );
    }

    #[tokio::test]
    async fn page_errors_render_error_page() {
        let response = Error::BackendUnavailable("timeout".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
