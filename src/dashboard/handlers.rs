//! Dashboard HTTP handler and view rendering.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    api::{MonthTotals, TransactionList, TransactionQuery, TransactionRecord},
    category::{FALLBACK_CATEGORY, TransactionKind, expense_color, revenue_color},
    charts::{
        DOUGHNUT_RADIUS, DoughnutSlice, ECHARTS_SCRIPT, PageChart, charts_script, charts_view,
        doughnut_chart,
    },
    dashboard::{
        DashboardState,
        filters::{CategoryFilter, filter_selects},
        transactions::{Tab, transactions_table, visible_transactions},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        LINK_STYLE, base, format_currency,
    },
    navigation::NavBar,
    pagination::{
        MAX_PAGE_LINKS, PAGE_SIZES, create_pagination_indicators, page_count, page_from_query,
        page_size_from_query, pagination_view,
    },
    period::MonthYear,
    preferences::{get_theme, is_sidebar_collapsed, sidebar_script, sidebar_toggle, sidebar_view},
    timezone::local_today,
};

const EXPENSE_CHART_ID: &str = "expense-chart";
const REVENUE_CHART_ID: &str = "revenue-chart";

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub mes: Option<String>,
    pub ano: Option<String>,
    pub tipo: Option<String>,
    pub categoria: Option<String>,
    pub aba: Option<String>,
    pub busca: Option<String>,
    pub pagina: Option<String>,
    pub por_pagina: Option<String>,
}

/// Everything that selects which transactions are listed.
#[derive(Debug, Clone)]
struct ListView {
    period: MonthYear,
    filter: CategoryFilter,
    tab: Tab,
    search: String,
    page_size: u64,
}

impl ListView {
    /// The dashboard URL for `page` of this list.
    fn url(&self, tab: Tab, page: u64) -> String {
        let mut params = vec![
            ("mes", self.period.month.to_string()),
            ("ano", self.period.year.to_string()),
        ];

        if let Some(kind) = self.filter.kind {
            params.push(("tipo", kind.as_str().to_owned()));
        }
        if let Some(category) = &self.filter.category {
            params.push(("categoria", category.clone()));
        }
        if !self.search.is_empty() {
            params.push(("busca", self.search.clone()));
        }

        params.push(("aba", tab.as_str().to_owned()));
        params.push(("por_pagina", self.page_size.to_string()));
        params.push(("pagina", page.to_string()));

        let query = serde_urlencoded::to_string(&params).unwrap_or_default();

        format!("{}?{query}", endpoints::DASHBOARD_VIEW)
    }
}

/// Display the totals, charts and transactions of a month.
///
/// A month or year outside the valid range falls back to the current one.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let view = ListView {
        period: MonthYear::from_query(query.mes.as_deref(), query.ano.as_deref(), today),
        filter: CategoryFilter::from_query(query.tipo.as_deref(), query.categoria.as_deref()),
        tab: Tab::from_query(query.aba.as_deref()),
        search: query.busca.as_deref().unwrap_or_default().trim().to_owned(),
        page_size: page_size_from_query(query.por_pagina.as_deref()),
    };
    let period = view.period;

    let totals = state.api.month_totals(period.year, period.month).await?;

    if !totals.success {
        let error = totals
            .error
            .unwrap_or_else(|| "Erro ao carregar dados.".to_owned());
        tracing::error!("Backend could not total {period}: {error}");
        return Err(Error::BackendError(error));
    }

    let transactions = state
        .api
        .list_transactions(&TransactionQuery {
            month: period.month,
            year: period.year,
            kind: view.filter.kind,
            category: view.filter.category.clone(),
        })
        .await?;
    let revenue = state
        .api
        .list_transactions(&TransactionQuery {
            month: period.month,
            year: period.year,
            kind: Some(TransactionKind::Revenue),
            category: None,
        })
        .await?;

    let expense_chart = expense_chart(&totals).map(|chart| PageChart {
        id: EXPENSE_CHART_ID,
        options: chart.to_string(),
    });
    let revenue_chart = revenue_chart(&revenue.transactions).map(|chart| PageChart {
        id: REVENUE_CHART_ID,
        options: chart.to_string(),
    });

    let theme = get_theme(&jar);
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, theme).into_html();
    let sidebar = sidebar_view(period, is_sidebar_collapsed(&jar));

    let content = html! {
        (nav_bar)

        (sidebar_toggle())

        div class="flex min-h-screen"
        {
            (sidebar)

            main
                id="dashboard-content"
                class="flex-1 flex flex-col gap-6 px-2 lg:px-6 py-6 mx-auto
                    max-w-screen-xl text-gray-900 dark:text-white"
            {
                (month_header(period))
                (totals_cards(&totals))

                section id="charts" class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    div class=(CARD_STYLE)
                    {
                        (chart_or_message(expense_chart.as_ref(), "Nenhuma despesa neste mês."))
                        (category_buttons(period, &totals))
                    }

                    div class=(CARD_STYLE)
                    {
                        (chart_or_message(revenue_chart.as_ref(), "Nenhuma receita neste mês."))
                    }
                }

                div id="mini-dashboard" class=(CARD_STYLE) {}

                (list_section(&view, &transactions, query.pagina.as_deref()))
            }
        }
    };

    let charts = [expense_chart, revenue_chart]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
        sidebar_script(),
    ];

    Ok(base("Dashboard", theme, &scripts, &content).into_response())
}

fn chart_or_message(chart: Option<&PageChart>, message: &str) -> Markup {
    match chart {
        Some(chart) => charts_view(std::slice::from_ref(chart)),
        None => html! {
            p class="py-8 text-center text-gray-500 dark:text-gray-400" { (message) }
        },
    }
}

fn month_header(period: MonthYear) -> Markup {
    html! {
        div class="flex items-center justify-between"
        {
            a id="previous-month" href=(period.previous().dashboard_url()) class=(LINK_STYLE) { "← Anterior" }
            h1 class="text-2xl font-bold" { (period.to_string()) }
            a id="next-month" href=(period.next().dashboard_url()) class=(LINK_STYLE) { "Próximo →" }
        }
    }
}

fn totals_cards(totals: &MonthTotals) -> Markup {
    let profit_style = if totals.profit >= 0.0 {
        "text-2xl font-bold text-green-600 dark:text-green-400"
    } else {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    };

    html! {
        section id="totals" class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            div class=(CARD_STYLE) data-total="receitas"
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Receitas" }
                p class="text-2xl font-bold text-green-600 dark:text-green-400" { (format_currency(totals.revenue)) }
            }
            div class=(CARD_STYLE) data-total="despesas"
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Despesas" }
                p class="text-2xl font-bold text-red-600 dark:text-red-400" { (format_currency(totals.expenses)) }
            }
            div class=(CARD_STYLE) data-total="lucro"
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Lucro" }
                p class=(profit_style) { (format_currency(totals.profit)) }
            }
        }
    }
}

/// Slices sorted from the largest value, leaving out empty values.
fn sorted_slices(
    values: impl IntoIterator<Item = (String, f64)>,
    color: fn(&str) -> &'static str,
) -> Vec<DoughnutSlice> {
    let mut slices = values
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(label, value)| DoughnutSlice {
            color: color(&label).to_owned(),
            label,
            value,
        })
        .collect::<Vec<_>>();

    slices.sort_by(|a, b| b.value.total_cmp(&a.value));

    slices
}

fn expense_chart(totals: &MonthTotals) -> Option<charming::Chart> {
    let slices = sorted_slices(totals.expenses_by_category.clone(), expense_color);

    doughnut_chart("Despesas por categoria", &slices, DOUGHNUT_RADIUS)
}

/// The revenue of `transactions` per category, uncategorized revenue under [FALLBACK_CATEGORY].
pub(crate) fn revenue_by_category(transactions: &[TransactionRecord]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Revenue)
    {
        let category = transaction
            .category
            .clone()
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_owned());
        *totals.entry(category).or_insert(0.0) += transaction.amount;
    }

    totals
}

fn revenue_chart(transactions: &[TransactionRecord]) -> Option<charming::Chart> {
    let slices = sorted_slices(revenue_by_category(transactions), revenue_color);

    doughnut_chart("Receitas por categoria", &slices, DOUGHNUT_RADIUS)
}

/// One button per expense category that loads its subcategories.
fn category_buttons(period: MonthYear, totals: &MonthTotals) -> Markup {
    let slices = sorted_slices(totals.expenses_by_category.clone(), expense_color);

    html! {
        ul class="mt-4 grid grid-cols-2 gap-2 text-sm"
        {
            @for slice in &slices {
                @let query = serde_urlencoded::to_string([
                    ("categoria", slice.label.clone()),
                    ("mes", period.month.to_string()),
                    ("ano", period.year.to_string()),
                ]).unwrap_or_default();
                li
                {
                    button
                        type="button"
                        class="flex w-full items-center justify-between gap-2 px-2 py-1 rounded
                            hover:bg-gray-100 dark:hover:bg-gray-700"
                        hx-get={ (endpoints::DASHBOARD_SUBCATEGORIES) "?" (query) }
                        hx-target="#mini-dashboard"
                        hx-target-error="#alert-container"
                    {
                        span class="flex items-center gap-2"
                        {
                            span class="inline-block w-3 h-3 rounded-full" style={ "background-color: " (slice.color) } {}
                            (slice.label)
                        }
                        span { (format_currency(slice.value)) }
                    }
                }
            }
        }
    }
}

fn list_section(view: &ListView, list: &TransactionList, page: Option<&str>) -> Markup {
    let visible = visible_transactions(&list.transactions, view.tab, &view.search);
    let pages = page_count(visible.len(), view.page_size);
    let current_page = page_from_query(page, pages);
    let offset = ((current_page - 1) * view.page_size) as usize;
    let page_items = visible
        .into_iter()
        .skip(offset)
        .take(view.page_size as usize)
        .collect::<Vec<_>>();
    let indicators = create_pagination_indicators(current_page, pages, MAX_PAGE_LINKS);

    html! {
        section id="transactions-section" class="flex flex-col gap-4"
        {
            form method="get" action=(endpoints::DASHBOARD_VIEW) class="flex flex-wrap items-end gap-4"
            {
                input type="hidden" name="mes" value=(view.period.month);
                input type="hidden" name="ano" value=(view.period.year);
                input type="hidden" name="aba" value=(view.tab.as_str());

                (filter_selects(&view.filter))

                div
                {
                    label for="busca" class=(FORM_LABEL_STYLE) { "Buscar" }
                    input
                        id="busca"
                        name="busca"
                        type="search"
                        value=(view.search)
                        placeholder="Descrição ou estabelecimento"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="por_pagina" class=(FORM_LABEL_STYLE) { "Por página" }
                    select id="por_pagina" name="por_pagina" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for size in PAGE_SIZES {
                            option value=(size) selected[size == view.page_size] { (size) }
                        }
                    }
                }

                div { button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filtrar" } }
            }

            nav class="flex gap-2 border-b border-gray-200 dark:border-gray-700" aria-label="Abas"
            {
                @for tab in Tab::ALL {
                    a
                        href=(view.url(tab, 1))
                        aria-current=[(tab == view.tab).then_some("page")]
                        class=(if tab == view.tab {
                            "px-4 py-2 font-semibold border-b-2 border-blue-600 text-blue-600"
                        } else {
                            "px-4 py-2 text-gray-500 hover:text-gray-700 dark:hover:text-gray-300"
                        })
                    {
                        (tab.label())
                    }
                }
            }

            @match &list.error {
                Some(error) => {
                    p id="transactions-error" class="text-red-600" { (error) }
                }
                None => {
                    (transactions_table(&page_items))
                    (pagination_view(&indicators, |page| view.url(view.tab, page)))
                }
            }
        }
    }
}
