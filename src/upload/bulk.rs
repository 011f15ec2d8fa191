//! Route handlers for uploading and saving up to [MAX_BATCH_FILES] receipts at once.

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    api::{BatchItem, ExtractedReceipt},
    category::{CategoryOption, TransactionKind, find_option, subcategories_for},
    classification::classify_filename,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, MODAL_BACKDROP_STYLE, MODAL_STYLE, loading_spinner,
    },
    period::DATE_FORMAT,
    timezone::local_today,
    upload::{
        MAX_BATCH_FILES, UploadState,
        effects::{BULK_CONFIRM_EFFECTS, trigger_header},
        encoding::encode_batch,
        read_upload_form,
        review::{pick_category, review_date},
        single::UNKNOWN_ERROR,
        transaction::{ReviewedFields, build_transaction},
        validation::validate_batch,
    },
};

/// Route handler for reading a batch of receipts and showing the bulk review list.
///
/// The whole selection is checked before anything is encoded or sent.
pub async fn upload_batch(State(state): State<UploadState>, multipart: Multipart) -> Response {
    match extract_batch(&state, multipart).await {
        Ok(review) => review.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

async fn extract_batch(state: &UploadState, multipart: Multipart) -> Result<Markup, Error> {
    let form = read_upload_form(multipart, Error::InvalidBulkUpload).await?;
    validate_batch(&form.files).map_err(Error::InvalidBulkUpload)?;

    let uploads = encode_batch(&form.files, |progress| {
        tracing::debug!("Encoded receipt {progress}");
    });

    let response = state.api.extract_batch(&uploads).await.map_err(|error| {
        tracing::error!("Could not extract {} receipts: {error}", uploads.len());
        Error::BatchExtractionUnavailable(error.to_string())
    })?;

    if !response.success {
        return Err(Error::BatchExtractionFailed(
            response.error.unwrap_or_else(|| UNKNOWN_ERROR.to_owned()),
        ));
    }

    tracing::info!(
        "Backend read {} receipts, {} failed",
        response.processed,
        response.failed
    );

    let today = local_today(&state.local_timezone)?;
    let items = response
        .results
        .iter()
        .map(|item| BulkItem::new(form.kind, item, today))
        .collect::<Vec<_>>();

    Ok(bulk_review_modal(form.kind, &items))
}

/// The starting values of one receipt in the bulk review list.
#[derive(Debug, Clone, PartialEq)]
struct BulkReviewValues {
    date: Date,
    amount: String,
    category: &'static str,
    subcategory: &'static str,
    establishment: String,
    description: String,
    receipt_url: String,
}

/// One entry of the bulk review list.
#[derive(Debug, Clone, PartialEq)]
enum BulkItem {
    Extracted {
        file_name: String,
        values: BulkReviewValues,
    },
    Failed {
        file_name: String,
        error: String,
    },
}

impl BulkItem {
    fn new(kind: TransactionKind, item: &BatchItem, today: Date) -> Self {
        if !item.success {
            return BulkItem::Failed {
                file_name: item.file_name.clone(),
                error: item.error.clone().unwrap_or_else(|| UNKNOWN_ERROR.to_owned()),
            };
        }

        let default_data = ExtractedReceipt::default();
        let data = item.data.as_ref().unwrap_or(&default_data);
        let classification = classify_filename(&item.file_name);
        let category = pick_category(
            &kind.category_options(),
            classification.map(|c| c.category),
            data.category.as_deref(),
        );
        let subcategory = classification
            .filter(|_| kind == TransactionKind::Expense)
            .and_then(|c| find_option(subcategories_for(category), c.subcategory))
            .map(|option| option.value)
            .unwrap_or_default();

        BulkItem::Extracted {
            file_name: item.file_name.clone(),
            values: BulkReviewValues {
                date: review_date(data.date.as_deref(), today),
                amount: format!("{:.2}", data.total.unwrap_or(0.0)),
                category,
                subcategory,
                establishment: data.establishment.clone().unwrap_or_default(),
                description: data.note.clone().unwrap_or_default(),
                receipt_url: item.receipt_url.clone().unwrap_or_default(),
            },
        }
    }
}

fn bulk_item_view(
    index: usize,
    file_name: &str,
    values: &BulkReviewValues,
    options: &[CategoryOption],
) -> Markup {
    let date_id = format!("data-{index}");
    let amount_id = format!("valor-{index}");
    let category_id = format!("categoria-{index}");
    let establishment_id = format!("estabelecimento-{index}");

    html! {
        fieldset class=(CARD_STYLE) data-bulk-item=(index)
        {
            legend class="px-1 text-sm font-semibold" { "📄 " (file_name) }

            input type="hidden" name="subcategoria" value=(values.subcategory);
            input type="hidden" name="descricao" value=(values.description);
            input type="hidden" name="comprovante_url" value=(values.receipt_url);

            div class="grid grid-cols-2 gap-2"
            {
                div
                {
                    label for=(date_id) class=(FORM_LABEL_STYLE) { "Data" }
                    input
                        id=(date_id)
                        name="data"
                        type="date"
                        required
                        value=(values.date.format(DATE_FORMAT).unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for=(amount_id) class=(FORM_LABEL_STYLE) { "Valor (R$)" }
                    input
                        id=(amount_id)
                        name="valor"
                        type="number"
                        step="0.01"
                        required
                        value=(values.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for=(category_id) class=(FORM_LABEL_STYLE) { "Categoria" }
                    select id=(category_id) name="categoria" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for option in options {
                            option value=(option.value) selected[option.value == values.category] { (option.label) }
                        }
                    }
                }

                div
                {
                    label for=(establishment_id) class=(FORM_LABEL_STYLE) { "Estabelecimento" }
                    input
                        id=(establishment_id)
                        name="estabelecimento"
                        type="text"
                        value=(values.establishment)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }
        }
    }
}

fn bulk_review_modal(kind: TransactionKind, items: &[BulkItem]) -> Markup {
    let options = kind.category_options();
    let success_count = items
        .iter()
        .filter(|item| matches!(item, BulkItem::Extracted { .. }))
        .count();
    let failed_count = items.len() - success_count;
    let confirm_text = format!("Salvar {success_count} {}", kind.count_label());

    html! {
        div id="bulk-modal" class=(MODAL_BACKDROP_STYLE)
        {
            div class=(MODAL_STYLE) role="dialog" aria-modal="true" aria-labelledby="bulk-title"
            {
                h2 id="bulk-title" class="mb-1 text-xl font-bold" { "Conferir notas" }
                p id="bulk-summary" class="mb-4 text-sm text-gray-600 dark:text-gray-300"
                {
                    (success_count) " lida(s)"
                    @if failed_count > 0 { ", " (failed_count) " com erro" }
                }

                form
                    id="bulk-form"
                    hx-post=(endpoints::CONFIRM_BATCH)
                    hx-target="#bulk-success-text"
                    hx-swap="innerHTML"
                    hx-target-error="#alert-container"
                    hx-indicator="#bulk-indicator"
                    hx-disabled-elt="#bulk-submit"
                    class="space-y-4"
                {
                    input type="hidden" name="tipo" value=(kind.as_str());

                    @for (index, item) in items.iter().enumerate() {
                        @match item {
                            BulkItem::Extracted { file_name, values } => {
                                (bulk_item_view(index, file_name, values, &options))
                            }
                            BulkItem::Failed { file_name, error } => {
                                div
                                    class="p-3 rounded-lg border border-red-300 bg-red-50 \
                                        text-sm text-red-800 dark:bg-gray-800 dark:text-red-400"
                                    data-bulk-error=(index)
                                {
                                    p class="font-semibold" { "📄 " (file_name) }
                                    p { (error) }
                                }
                            }
                        }
                    }

                    div class="flex gap-2"
                    {
                        button
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                            onclick="document.getElementById('review-container').replaceChildren()"
                        {
                            "Cancelar"
                        }

                        @if success_count > 0 {
                            button id="bulk-submit" type="submit" class=(BUTTON_PRIMARY_STYLE)
                            {
                                span id="bulk-indicator" class="htmx-indicator" { (loading_spinner()) }
                                (confirm_text)
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The reviewed values of a batch, one entry per receipt in each list.
#[derive(Debug, Default, Deserialize)]
pub struct BatchConfirmForm {
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub valor: Vec<String>,
    #[serde(default)]
    pub categoria: Vec<String>,
    #[serde(default)]
    pub subcategoria: Vec<String>,
    #[serde(default)]
    pub estabelecimento: Vec<String>,
    #[serde(default)]
    pub descricao: Vec<String>,
    #[serde(default)]
    pub comprovante_url: Vec<String>,
}

impl BatchConfirmForm {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn fields(&self, index: usize) -> ReviewedFields<'_> {
        ReviewedFields {
            date: nth(&self.data, index),
            amount: nth(&self.valor, index),
            category: nth(&self.categoria, index),
            subcategory: self.subcategoria.get(index).map(String::as_str),
            description: nth(&self.descricao, index),
            establishment: nth(&self.estabelecimento, index),
            receipt_url: nth(&self.comprovante_url, index),
        }
    }
}

fn nth(values: &[String], index: usize) -> &str {
    values.get(index).map(String::as_str).unwrap_or_default()
}

/// The outcome of saving a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Receipts the backend stored.
    pub saved: usize,
    /// Receipts that were rejected or could not be sent.
    pub failed: usize,
}

impl BatchOutcome {
    /// The summary shown once the batch has been saved, e.g. "3 despesa(s) salva(s), 1 erro(s)".
    pub fn summary(&self, kind: TransactionKind) -> String {
        let mut text = format!("{} {} salva(s)", self.saved, kind.count_label());

        if self.failed > 0 {
            text.push_str(&format!(", {} erro(s)", self.failed));
        }

        text
    }
}

/// Route handler for saving the reviewed receipts of a batch.
///
/// Receipts are saved one after the other. A receipt only counts as saved when
/// the backend answers `sucesso: true`. Invalid values and failed requests
/// count as errors and do not stop the remaining receipts.
pub async fn confirm_batch(
    State(state): State<UploadState>,
    Form(form): Form<BatchConfirmForm>,
) -> Response {
    let kind = form.tipo.parse().unwrap_or_else(|error| {
        tracing::warn!("{error}, saving as expenses");
        TransactionKind::Expense
    });

    if form.len() > MAX_BATCH_FILES {
        tracing::warn!("Received {} receipts in one batch", form.len());
    }

    let mut outcome = BatchOutcome::default();

    for index in 0..form.len() {
        let transaction = match build_transaction(kind, &form.fields(index)) {
            Ok(transaction) => transaction,
            Err(error) => {
                tracing::warn!("Skipping receipt {index} of batch: {error}");
                outcome.failed += 1;
                continue;
            }
        };

        match state.api.create_transaction(&transaction).await {
            Ok(created) if created.success => outcome.saved += 1,
            Ok(created) => {
                tracing::warn!(
                    "Backend rejected receipt {index} of batch: {}",
                    created.error.as_deref().unwrap_or(UNKNOWN_ERROR)
                );
                outcome.failed += 1;
            }
            Err(error) => {
                tracing::error!("Could not save receipt {index} of batch: {error}");
                outcome.failed += 1;
            }
        }
    }

    tracing::info!(
        "Saved {} receipts of batch, {} failed",
        outcome.saved,
        outcome.failed
    );

    (
        [(HX_TRIGGER, trigger_header(&BULK_CONFIRM_EFFECTS))],
        outcome.summary(kind),
    )
        .into_response()
}
