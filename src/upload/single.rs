//! Route handlers for uploading and saving one receipt.

use axum::{
    Form,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_TRIGGER;
use maud::Markup;
use serde::Deserialize;

use crate::{
    Error,
    category::TransactionKind,
    timezone::local_today,
    upload::{
        UploadState,
        effects::{SINGLE_CONFIRM_EFFECTS, trigger_header},
        encoding::encode_receipt,
        read_upload_form,
        review::{ReviewForm, review_modal},
        transaction::{ReviewedFields, build_transaction},
        validation::{ValidationError, validate_file},
    },
};

/// The message used when the backend fails without saying why.
pub(super) const UNKNOWN_ERROR: &str = "erro desconhecido";

/// Route handler for reading a receipt and showing the review form.
///
/// Invalid files are rejected before anything is sent to the backend.
pub async fn upload_receipt(State(state): State<UploadState>, multipart: Multipart) -> Response {
    match extract_receipt(&state, multipart).await {
        Ok(review) => review.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

async fn extract_receipt(state: &UploadState, multipart: Multipart) -> Result<Markup, Error> {
    let form = read_upload_form(multipart, Error::InvalidUpload).await?;
    let file = form
        .files
        .into_iter()
        .next()
        .ok_or(Error::InvalidUpload(ValidationError::NoFiles))?;

    validate_file(&file).map_err(Error::InvalidUpload)?;

    let upload = encode_receipt(&file);
    let response = state.api.extract_receipt(&upload).await.map_err(|error| {
        tracing::error!("Could not extract receipt {}: {error}", file.file_name);
        Error::ExtractionUnavailable(error.to_string())
    })?;

    if !response.success {
        let message = response.error.unwrap_or_else(|| UNKNOWN_ERROR.to_owned());
        tracing::warn!("Backend could not read {}: {message}", file.file_name);
        return Err(Error::ExtractionFailed(message));
    }

    let today = local_today(&state.local_timezone)?;
    let extracted = response.data.unwrap_or_default();
    let review = ReviewForm::new(
        form.kind,
        &extracted,
        response.receipt_url.as_deref(),
        &file.file_name,
        file.kind(),
        today,
    );

    Ok(review_modal(&review))
}

/// The reviewed values of a single receipt.
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub valor: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub subcategoria: Option<String>,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub estabelecimento: String,
    #[serde(default)]
    pub comprovante_url: String,
}

/// Route handler for saving a reviewed receipt.
///
/// Only a response with `sucesso: true` from the backend closes the review
/// modal, resets the form and shows the success modal, in that order.
pub async fn confirm_receipt(
    State(state): State<UploadState>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let kind = form.tipo.parse().unwrap_or_else(|error| {
        tracing::warn!("{error}, saving as an expense");
        TransactionKind::Expense
    });
    let fields = ReviewedFields {
        date: &form.data,
        amount: &form.valor,
        category: &form.categoria,
        subcategory: form.subcategoria.as_deref(),
        description: &form.descricao,
        establishment: &form.estabelecimento,
        receipt_url: &form.comprovante_url,
    };

    let transaction = match build_transaction(kind, &fields) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    match state.api.create_transaction(&transaction).await {
        Ok(created) if created.success => {
            tracing::info!(
                "Saved {} of {} as transaction {:?}",
                transaction.kind,
                transaction.amount,
                created.id
            );
            [(HX_TRIGGER, trigger_header(&SINGLE_CONFIRM_EFFECTS))].into_response()
        }
        Ok(created) => {
            Error::SaveFailed(created.error.unwrap_or_else(|| UNKNOWN_ERROR.to_owned()))
                .into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not save transaction: {error}");
            Error::SaveUnavailable(error.to_string()).into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Form, extract::State, http::StatusCode};

    use super::{ConfirmForm, confirm_receipt, upload_receipt};
    use crate::{
        api::{
            ExtractedReceipt,
            fake::{
                ApiCall, FakeGestorApi, creation_failure, extraction_failure, extraction_success,
            },
        },
        category::TransactionKind,
        endpoints,
        test_utils::{
            FilePart, TEST_TIMEZONE, assert_hx_endpoint, assert_valid_html, get_alert_message,
            get_header, must_get_form, must_get_required_input, must_make_multipart,
            parse_html_fragment,
        },
        upload::UploadState,
    };

    fn get_state(api: &Arc<FakeGestorApi>) -> UploadState {
        UploadState {
            api: api.clone(),
            local_timezone: TEST_TIMEZONE.to_owned(),
        }
    }

    fn confirm_form(valor: &str) -> ConfirmForm {
        ConfirmForm {
            tipo: "DESPESA".to_owned(),
            data: "2025-03-07".to_owned(),
            valor: valor.to_owned(),
            categoria: "Insumos".to_owned(),
            subcategoria: Some("Gelo".to_owned()),
            descricao: "Gelo para o fim de semana".to_owned(),
            estabelecimento: "Gelo Bom".to_owned(),
            comprovante_url: "/uploads/1.jpg".to_owned(),
        }
    }

    #[tokio::test]
    async fn renders_review_form_from_extraction() {
        let api = Arc::new(FakeGestorApi::new().with_extraction(extraction_success(
            ExtractedReceipt {
                date: Some("2025-03-07".to_owned()),
                total: Some(120.0),
                ..Default::default()
            },
            "/uploads/peixaria.jpg",
        )));
        let multipart = must_make_multipart(
            endpoints::UPLOAD_RECEIPT,
            &[("tipo", "DESPESA")],
            &[FilePart::new("arquivo", "peixaria_jan.jpg", "image/jpeg")],
        )
        .await;

        let response = upload_receipt(State(get_state(&api)), multipart).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        must_get_form(&html);

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        let ApiCall::ExtractReceipt(upload) = &calls[0] else {
            panic!("want an extraction call, got {calls:?}");
        };
        assert_eq!(upload.file_name, "peixaria_jan.jpg");
        assert!(upload.data_url.starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn unsupported_file_never_reaches_backend() {
        let api = Arc::new(FakeGestorApi::new());
        let multipart = must_make_multipart(
            endpoints::UPLOAD_RECEIPT,
            &[("tipo", "DESPESA")],
            &[FilePart::new("arquivo", "planilha.xlsx", "application/vnd.ms-excel")],
        )
        .await;

        let response = upload_receipt(State(get_state(&api)), multipart).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_alert_message(response).await,
            "Por favor, selecione uma imagem ou PDF válido."
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_file_never_reaches_backend() {
        let api = Arc::new(FakeGestorApi::new());
        let multipart =
            must_make_multipart(endpoints::UPLOAD_RECEIPT, &[("tipo", "DESPESA")], &[]).await;

        let response = upload_receipt(State(get_state(&api)), multipart).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn review_form_posts_to_confirm() {
        let api = Arc::new(FakeGestorApi::new());
        let multipart = must_make_multipart(
            endpoints::UPLOAD_RECEIPT,
            &[],
            &[FilePart::new("arquivo", "nota.png", "image/png").with_size(1024)],
        )
        .await;

        let response = upload_receipt(State(get_state(&api)), multipart).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CONFIRM_RECEIPT, "hx-post");
        must_get_required_input(&form, "data", "date");
        must_get_required_input(&form, "valor", "number");
    }

    #[tokio::test]
    async fn backend_rejection_shows_reason() {
        let api =
            Arc::new(FakeGestorApi::new().with_extraction(extraction_failure("Imagem ilegível")));
        let multipart = must_make_multipart(
            endpoints::UPLOAD_RECEIPT,
            &[],
            &[FilePart::new("arquivo", "nota.png", "image/png")],
        )
        .await;

        let response = upload_receipt(State(get_state(&api)), multipart).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            get_alert_message(response).await,
            "Erro ao processar nota: Imagem ilegível"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_asks_to_check_connection() {
        let api = Arc::new(FakeGestorApi::new().unavailable());
        let multipart = must_make_multipart(
            endpoints::UPLOAD_RECEIPT,
            &[],
            &[FilePart::new("arquivo", "nota.pdf", "application/pdf")],
        )
        .await;

        let response = upload_receipt(State(get_state(&api)), multipart).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            get_alert_message(response).await,
            "Erro ao processar arquivo. Verifique sua conexão e tente novamente."
        );
    }

    #[tokio::test]
    async fn successful_confirm_triggers_effects_in_order() {
        let api = Arc::new(FakeGestorApi::new());

        let response = confirm_receipt(State(get_state(&api)), Form(confirm_form("15,50"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, "hx-trigger"),
            "close-review-modal, reset-review-form, show-success-modal"
        );

        let created = api.created_transactions();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].amount, 15.5);
        assert_eq!(created[0].kind, TransactionKind::Expense);
        assert_eq!(created[0].subcategory.as_deref(), Some("Gelo"));
    }

    #[tokio::test]
    async fn rejected_confirm_has_no_effects() {
        let api = Arc::new(
            FakeGestorApi::new()
                .with_creation_results(vec![Some(creation_failure("Categoria inválida"))]),
        );

        let response = confirm_receipt(State(get_state(&api)), Form(confirm_form("10"))).await;

        assert!(response.headers().get("hx-trigger").is_none());
        assert_eq!(
            get_alert_message(response).await,
            "Erro ao salvar: Categoria inválida"
        );
    }

    #[tokio::test]
    async fn failed_request_has_no_effects() {
        let api = Arc::new(FakeGestorApi::new().with_creation_results(vec![None]));

        let response = confirm_receipt(State(get_state(&api)), Form(confirm_form("10"))).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get("hx-trigger").is_none());
        assert_eq!(
            get_alert_message(response).await,
            "Erro ao salvar. Verifique sua conexão e tente novamente."
        );
    }

    #[tokio::test]
    async fn invalid_amount_is_not_sent() {
        let api = Arc::new(FakeGestorApi::new());

        let response = confirm_receipt(State(get_state(&api)), Form(confirm_form("0"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_alert_message(response).await,
            "Por favor, informe um valor válido."
        );
        assert!(api.calls().is_empty());
    }
}
