//! The transaction kind and category filters of the dashboard.

use axum::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    category::{EXPENSE_CATEGORIES, REVENUE_CATEGORIES, TransactionKind, is_revenue_category},
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The kind and category the dashboard transactions are filtered by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Only show this kind of transaction. `None` shows both.
    pub kind: Option<TransactionKind>,
    /// Only show this category. `None` shows all.
    pub category: Option<String>,
}

impl CategoryFilter {
    /// Read the filter from the raw `tipo` and `categoria` query values.
    ///
    /// A category outside the option group of the chosen kind is cleared.
    pub fn from_query(kind: Option<&str>, category: Option<&str>) -> Self {
        let kind = kind.and_then(|kind| kind.parse::<TransactionKind>().ok());
        let category = category
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .filter(|category| match kind {
                Some(TransactionKind::Expense) => !is_revenue_category(category),
                Some(TransactionKind::Revenue) => is_revenue_category(category),
                None => true,
            })
            .map(str::to_owned);

        Self { kind, category }
    }

    fn shows_expense_group(&self) -> bool {
        self.kind != Some(TransactionKind::Revenue)
    }

    fn shows_revenue_group(&self) -> bool {
        self.kind != Some(TransactionKind::Expense)
    }

    fn is_selected(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

/// The query of the filter fragment.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub tipo: Option<String>,
    pub categoria: Option<String>,
}

/// Render the filter selects again after the kind changed.
pub async fn get_dashboard_filters(Query(query): Query<FilterQuery>) -> Markup {
    let filter = CategoryFilter::from_query(query.tipo.as_deref(), query.categoria.as_deref());

    filter_selects(&filter)
}

/// The kind and category selects, replaced as a whole when the kind changes.
pub fn filter_selects(filter: &CategoryFilter) -> Markup {
    html! {
        div id="dashboard-filters" class="flex flex-wrap gap-4"
        {
            div
            {
                label for="tipo" class=(FORM_LABEL_STYLE) { "Tipo" }
                select
                    id="tipo"
                    name="tipo"
                    class=(FORM_TEXT_INPUT_STYLE)
                    hx-get=(endpoints::DASHBOARD_FILTERS)
                    hx-include="#categoria"
                    hx-target="#dashboard-filters"
                    hx-swap="outerHTML"
                {
                    option value="" selected[filter.kind.is_none()] { "Todos" }
                    @for kind in [TransactionKind::Expense, TransactionKind::Revenue] {
                        option value=(kind.as_str()) selected[filter.kind == Some(kind)] { (kind.label()) }
                    }
                }
            }

            div
            {
                label for="categoria" class=(FORM_LABEL_STYLE) { "Categoria" }
                select id="categoria" name="categoria" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[filter.category.is_none()] { "Todas" }

                    @if filter.shows_expense_group() {
                        optgroup label="Despesas"
                        {
                            @for category in EXPENSE_CATEGORIES {
                                option value=(category.name) selected[filter.is_selected(category.name)]
                                {
                                    (category.name)
                                }
                            }
                        }
                    }

                    @if filter.shows_revenue_group() {
                        optgroup label="Receitas"
                        {
                            @for &category in REVENUE_CATEGORIES {
                                option value=(category) selected[filter.is_selected(category)]
                                {
                                    (category)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
