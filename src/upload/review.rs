//! The review form shown after a receipt has been read by the backend.
//!
//! The form is filled from the extracted fields, with the file name used to
//! guess the category and, when there is no note, the description.

use axum::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    api::{ExtractedReceipt, FileKind},
    category::{
        CategoryOption, DEFAULT_EXPENSE_CATEGORY, FALLBACK_CATEGORY, TransactionKind, find_option,
        subcategories_for,
    },
    classification::classify_filename,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        MODAL_BACKDROP_STYLE, MODAL_STYLE, loading_spinner,
    },
    period::DATE_FORMAT,
};

/// The values the review form starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewForm {
    /// Whether the receipt is saved as an expense or a revenue.
    pub kind: TransactionKind,
    /// The receipt date.
    pub date: Date,
    /// The business that issued the receipt, possibly empty.
    pub establishment: String,
    /// The total with two decimals, empty when unknown.
    pub amount: String,
    /// One of the category options of `kind`.
    pub category: &'static str,
    /// The pre-selected subcategory of an expense.
    pub subcategory: Option<&'static str>,
    /// A short description of the purchase.
    pub description: String,
    /// Where the backend stored the receipt file.
    pub receipt_url: String,
    /// The name of the uploaded file.
    pub file_name: String,
    /// Whether the uploaded file is an image or a PDF.
    pub file_kind: FileKind,
}

impl ReviewForm {
    /// Fill the form from the fields the backend extracted from `file_name`.
    pub fn new(
        kind: TransactionKind,
        extracted: &ExtractedReceipt,
        receipt_url: Option<&str>,
        file_name: &str,
        file_kind: FileKind,
        today: Date,
    ) -> Self {
        let classification = classify_filename(file_name);
        let category = pick_category(
            &kind.category_options(),
            classification.map(|c| c.category),
            extracted.category.as_deref(),
        );
        let subcategory = classification
            .filter(|_| kind == TransactionKind::Expense)
            .and_then(|c| find_option(subcategories_for(category), c.subcategory))
            .map(|option| option.value);

        let description = extracted
            .note
            .as_deref()
            .filter(|note| !note.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| description_from_file_name(file_name));

        Self {
            kind,
            date: review_date(extracted.date.as_deref(), today),
            establishment: extracted.establishment.clone().unwrap_or_default(),
            amount: extracted
                .total
                .filter(|total| *total != 0.0)
                .map(|total| format!("{total:.2}"))
                .unwrap_or_default(),
            category,
            subcategory,
            description,
            receipt_url: receipt_url.unwrap_or_default().to_owned(),
            file_name: file_name.to_owned(),
            file_kind,
        }
    }
}

/// The extracted date when it is a valid date, otherwise `today`.
///
/// Date-times are cut down to their date.
pub fn review_date(extracted: Option<&str>, today: Date) -> Date {
    extracted
        .map(str::trim)
        .and_then(|date| date.get(..10))
        .and_then(|date| Date::parse(date, DATE_FORMAT).ok())
        .unwrap_or(today)
}

/// Choose the category of a receipt.
///
/// The category guessed from the file name wins over the one suggested by the
/// extraction, which wins over [DEFAULT_EXPENSE_CATEGORY]. The chosen name must
/// be one of `options` (ignoring case), otherwise [FALLBACK_CATEGORY] is used.
pub fn pick_category(
    options: &[CategoryOption],
    classified: Option<&str>,
    extracted: Option<&str>,
) -> &'static str {
    let wanted = classified
        .or(extracted.filter(|category| !category.is_empty()))
        .unwrap_or(DEFAULT_EXPENSE_CATEGORY);

    find_option(options, wanted)
        .map(|option| option.value)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// The file name without its extension, with dashes and underscores as spaces.
pub fn description_from_file_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, extension)) if !extension.is_empty() => stem,
        _ => file_name,
    };

    stem.replace(['-', '_'], " ")
}

/// The subcategory `<select>` for an expense in `category`.
pub fn subcategory_select(category: &str, selected: Option<&str>) -> Markup {
    html! {
        select id="subcategoria" name="subcategoria" class=(FORM_TEXT_INPUT_STYLE)
        {
            @for option in subcategories_for(category) {
                option value=(option.value) selected[Some(option.value) == selected] { (option.label) }
            }
        }
    }
}

/// The category shown in the review form.
#[derive(Debug, Deserialize)]
pub struct SubcategoryQuery {
    #[serde(default)]
    pub categoria: String,
}

/// Render the subcategory options after the user picks another category.
pub async fn get_review_subcategories(Query(query): Query<SubcategoryQuery>) -> Markup {
    subcategory_select(&query.categoria, None)
}

/// The modal with the review form for a single receipt.
pub fn review_modal(form: &ReviewForm) -> Markup {
    let title = format!("Conferir {}", form.kind.label());

    html! {
        div id="review-modal" class=(MODAL_BACKDROP_STYLE)
        {
            div class=(MODAL_STYLE) role="dialog" aria-modal="true" aria-labelledby="review-title"
            {
                h2 id="review-title" class="mb-4 text-xl font-bold" { (title) }

                div class="mb-4 flex justify-center"
                {
                    @match form.file_kind {
                        FileKind::Image if !form.receipt_url.is_empty() => {
                            img
                                id="img-preview"
                                src=(form.receipt_url)
                                alt=(form.file_name)
                                class="max-h-48 rounded";
                        }
                        _ => {
                            p id="file-preview" class="text-sm text-gray-600 dark:text-gray-300"
                            {
                                "📄 " (form.file_name)
                            }
                        }
                    }
                }

                form
                    id="review-form"
                    hx-post=(endpoints::CONFIRM_RECEIPT)
                    hx-swap="none"
                    hx-target-error="#alert-container"
                    hx-indicator="#review-indicator"
                    hx-disabled-elt="#review-submit"
                    class="space-y-4"
                {
                    input type="hidden" name="tipo" value=(form.kind.as_str());
                    input type="hidden" name="comprovante_url" value=(form.receipt_url);

                    div
                    {
                        label for="data" class=(FORM_LABEL_STYLE) { "Data" }
                        input
                            id="data"
                            name="data"
                            type="date"
                            required
                            value=(form.date.format(DATE_FORMAT).unwrap_or_default())
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="valor" class=(FORM_LABEL_STYLE) { "Valor (R$)" }
                        input
                            id="valor"
                            name="valor"
                            type="number"
                            step="0.01"
                            min="0.01"
                            required
                            value=(form.amount)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="estabelecimento" class=(FORM_LABEL_STYLE) { "Estabelecimento" }
                        input
                            id="estabelecimento"
                            name="estabelecimento"
                            type="text"
                            value=(form.establishment)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="categoria" class=(FORM_LABEL_STYLE) { "Categoria" }
                        select
                            id="categoria"
                            name="categoria"
                            class=(FORM_TEXT_INPUT_STYLE)
                            hx-get=[(form.kind == TransactionKind::Expense).then_some(endpoints::REVIEW_SUBCATEGORIES)]
                            hx-target="#subcategoria"
                            hx-swap="outerHTML"
                        {
                            @for option in form.kind.category_options() {
                                option value=(option.value) selected[option.value == form.category] { (option.label) }
                            }
                        }
                    }

                    @if form.kind == TransactionKind::Expense {
                        div
                        {
                            label for="subcategoria" class=(FORM_LABEL_STYLE) { "Subcategoria" }
                            (subcategory_select(form.category, form.subcategory))
                        }
                    }

                    div
                    {
                        label for="descricao" class=(FORM_LABEL_STYLE) { "Descrição" }
                        input
                            id="descricao"
                            name="descricao"
                            type="text"
                            value=(form.description)
                            class=(FORM_TEXT_INPUT_STYLE);
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

                        button id="review-submit" type="submit" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span id="review-indicator" class="htmx-indicator" { (loading_spinner()) }
                            "Confirmar"
                        }
                    }
                }
            }
        }
    }
}
