//! The annual analysis page.

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
    annual::{
        AnnualState,
        aggregation::{TOP_CATEGORY_COUNT, YearSummary, top_categories, variation},
        charts::{EXPENSE_COLOR, REVENUE_COLOR, SeriesFilter, annual_chart, ranking_chart},
    },
    api::{GestorApi, TransactionQuery},
    category::TransactionKind,
    charts::{ECHARTS_SCRIPT, PageChart, charts_script, charts_view},
    dashboard::revenue_by_category,
    endpoints,
    html::{
        CARD_STYLE, HeadElement, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency, format_variation,
    },
    navigation::NavBar,
    period::{MAX_YEAR, MIN_YEAR, MONTH_NAMES, year_from_query},
    preferences::get_theme,
    timezone::local_today,
};

const ANNUAL_CHART_ID: &str = "annual-chart";
const EXPENSE_RANKING_CHART_ID: &str = "expense-ranking-chart";
const REVENUE_RANKING_CHART_ID: &str = "revenue-ranking-chart";

/// The query string of the annual analysis page.
#[derive(Debug, Default, Deserialize)]
pub struct AnnualQuery {
    pub ano: Option<String>,
    pub filtro: Option<String>,
    pub comparar: Option<String>,
}

/// What the page shows, read from [AnnualQuery].
#[derive(Debug, Clone, Copy)]
struct AnnualView {
    year: i32,
    filter: SeriesFilter,
    compare: bool,
}

impl AnnualView {
    fn url(self, year: i32) -> String {
        let mut params = vec![
            ("ano", year.to_string()),
            ("filtro", self.filter.as_str().to_owned()),
        ];

        if self.compare {
            params.push(("comparar", "1".to_owned()));
        }

        let query = serde_urlencoded::to_string(&params).unwrap_or_default();

        format!("{}?{query}", endpoints::ANNUAL_VIEW)
    }
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|value| value.trim().to_lowercase()).as_deref(),
        Some("1" | "on" | "true" | "sim")
    )
}

/// Fetch the totals of every month of `year`.
async fn fetch_year(api: &dyn GestorApi, year: i32) -> Result<YearSummary, Error> {
    let mut months = Vec::with_capacity(12);

    for month in 1..=12 {
        let totals = api.month_totals(year, month).await?;

        if !totals.success {
            let error = totals
                .error
                .unwrap_or_else(|| "Erro ao carregar análise anual.".to_owned());
            tracing::error!("Backend could not total {month}/{year}: {error}");
            return Err(Error::BackendError(error));
        }

        months.push(totals);
    }

    Ok(YearSummary::from_months(year, &months))
}

/// Add the revenue per category of every month of `summary`'s year.
///
/// The totals endpoint only splits expenses by category, so revenue comes
/// from the monthly transaction listings.
async fn fetch_revenue_categories(
    api: &dyn GestorApi,
    summary: &mut YearSummary,
) -> Result<(), Error> {
    for month in 1..=12 {
        let list = api
            .list_transactions(&TransactionQuery {
                month,
                year: summary.year,
                kind: Some(TransactionKind::Revenue),
                category: None,
            })
            .await?;

        if let Some(error) = list.error {
            tracing::error!(
                "Backend could not list revenue of {month}/{}: {error}",
                summary.year
            );
            return Err(Error::BackendError(error));
        }

        summary.add_revenue(revenue_by_category(&list.transactions));
    }

    Ok(())
}

/// A ranking of the largest categories with its share of the yearly total.
struct Ranking<'a> {
    id: &'static str,
    title: &'static str,
    empty_message: &'static str,
    /// Category, value and percentage of the total.
    entries: Vec<(&'a str, f64, f64)>,
    chart: Option<PageChart>,
}

impl<'a> Ranking<'a> {
    fn new(
        id: &'static str,
        chart_id: &'static str,
        title: &'static str,
        empty_message: &'static str,
        by_category: &'a BTreeMap<String, f64>,
        color: &str,
    ) -> Self {
        let top = top_categories(by_category, TOP_CATEGORY_COUNT);
        let total = by_category.values().filter(|value| **value > 0.0).sum::<f64>();
        let chart = ranking_chart(title, &top, color).map(|chart| PageChart {
            id: chart_id,
            options: chart.to_string(),
        });
        let entries = top
            .into_iter()
            .map(|(category, value)| {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                (category, value, share)
            })
            .collect();

        Self {
            id,
            title,
            empty_message,
            entries,
            chart,
        }
    }
}

/// Display the monthly evolution of a year compared with the year before.
///
/// A year outside the valid range falls back to the current year.
pub async fn get_annual_page(
    State(state): State<AnnualState>,
    jar: PrivateCookieJar,
    Query(query): Query<AnnualQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let view = AnnualView {
        year: year_from_query(query.ano.as_deref(), today),
        filter: SeriesFilter::from_query(query.filtro.as_deref()),
        compare: is_checked(query.comparar.as_deref()),
    };

    let mut current = fetch_year(state.api.as_ref(), view.year).await?;
    let previous = fetch_year(state.api.as_ref(), view.year - 1).await?;
    fetch_revenue_categories(state.api.as_ref(), &mut current).await?;

    tracing::debug!(
        "Annual totals for {}: revenue {}, expenses {}",
        view.year,
        current.total_revenue(),
        current.total_expenses()
    );

    let chart = PageChart {
        id: ANNUAL_CHART_ID,
        options: annual_chart(&current, view.compare.then_some(&previous), view.filter)
            .to_string(),
    };

    let expense_ranking = Ranking::new(
        "top-expenses",
        EXPENSE_RANKING_CHART_ID,
        "Maiores despesas",
        "Nenhuma despesa neste ano.",
        &current.expenses_by_category,
        EXPENSE_COLOR,
    );
    let revenue_ranking = Ranking::new(
        "top-revenue",
        REVENUE_RANKING_CHART_ID,
        "Maiores receitas",
        "Nenhuma receita neste ano.",
        &current.revenue_by_category,
        REVENUE_COLOR,
    );

    let theme = get_theme(&jar);
    let nav_bar = NavBar::new(endpoints::ANNUAL_VIEW, theme).into_html();

    let content = html! {
        (nav_bar)

        main
            id="annual-content"
            class="flex flex-col gap-6 px-2 lg:px-6 py-6 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (year_header(view))
            (totals_cards(&current, &previous))

            section class=(CARD_STYLE)
            {
                (chart_controls(view))
                (charts_view(std::slice::from_ref(&chart)))
            }

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                (ranking_view(&expense_ranking))
                (ranking_view(&revenue_ranking))
            }

            (monthly_table(&current))
        }
    };

    let charts = std::iter::once(chart)
        .chain(expense_ranking.chart)
        .chain(revenue_ranking.chart)
        .collect::<Vec<_>>();
    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
    ];

    Ok(base("Análise Anual", theme, &scripts, &content).into_response())
}

fn year_header(view: AnnualView) -> Markup {
    let previous = view.year - 1;
    let next = view.year + 1;

    html! {
        div class="flex items-center justify-between"
        {
            @if previous >= MIN_YEAR {
                a id="previous-year" href=(view.url(previous)) class=(LINK_STYLE) { "← " (previous) }
            } @else {
                span {}
            }

            h1 class="text-2xl font-bold" { "Análise Anual " (view.year) }

            @if next <= MAX_YEAR {
                a id="next-year" href=(view.url(next)) class=(LINK_STYLE) { (next) " →" }
            } @else {
                span {}
            }
        }
    }
}

/// `higher_is_better` is false for expenses, which are shown red when they grow.
fn variation_view(current: f64, previous: f64, higher_is_better: bool) -> Markup {
    match variation(current, previous) {
        Some(change) => {
            let is_good = (change >= 0.0) == higher_is_better;
            let style = if is_good {
                "text-sm text-green-600 dark:text-green-400"
            } else {
                "text-sm text-red-600 dark:text-red-400"
            };

            html! {
                p class=(style) data-variation { (format_variation(change)) }
            }
        }
        None => html! {
            p class="text-sm text-gray-500 dark:text-gray-400" data-variation { "N/A" }
        },
    }
}

fn total_card(
    name: &str,
    label: &str,
    current: f64,
    previous: f64,
    value_style: &str,
    higher_is_better: bool,
) -> Markup {
    html! {
        div class=(CARD_STYLE) data-total=(name)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class=(value_style) { (format_currency(current)) }
            p class="text-xs text-gray-500 dark:text-gray-400"
            {
                "Ano anterior: " (format_currency(previous))
            }
            (variation_view(current, previous, higher_is_better))
        }
    }
}

fn totals_cards(current: &YearSummary, previous: &YearSummary) -> Markup {
    let profit_style = if current.profit() >= 0.0 {
        "text-2xl font-bold text-green-600 dark:text-green-400"
    } else {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    };

    html! {
        section id="totals" class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            (total_card(
                "receitas",
                "Receitas",
                current.total_revenue(),
                previous.total_revenue(),
                "text-2xl font-bold text-green-600 dark:text-green-400",
                true,
            ))
            (total_card(
                "despesas",
                "Despesas",
                current.total_expenses(),
                previous.total_expenses(),
                "text-2xl font-bold text-red-600 dark:text-red-400",
                false,
            ))
            (total_card("lucro", "Lucro", current.profit(), previous.profit(), profit_style, true))
        }
    }
}

/// The series filter and the comparison checkbox, submitted on change.
fn chart_controls(view: AnnualView) -> Markup {
    html! {
        form
            id="annual-filters"
            method="get"
            action=(endpoints::ANNUAL_VIEW)
            onchange="this.requestSubmit()"
            class="flex flex-wrap items-center gap-4 mb-4 text-sm"
        {
            input type="hidden" name="ano" value=(view.year);

            @for filter in SeriesFilter::ALL {
                label class="flex items-center gap-1"
                {
                    input
                        type="radio"
                        name="filtro"
                        value=(filter.as_str())
                        checked[filter == view.filter];
                    (filter.label())
                }
            }

            label class="flex items-center gap-1"
            {
                input type="checkbox" id="comparar" name="comparar" value="1" checked[view.compare];
                "Comparar com " (view.year - 1)
            }

            noscript { button type="submit" class=(LINK_STYLE) { "Aplicar" } }
        }
    }
}

/// A percentage with a decimal comma, e.g. "83,3%".
fn format_share(share: f64) -> String {
    format!("{share:.1}%").replace('.', ",")
}

fn ranking_view(ranking: &Ranking) -> Markup {
    html! {
        section id=(ranking.id) class=(CARD_STYLE)
        {
            h2 class="mb-4 text-lg font-semibold" { (ranking.title) }

            @match &ranking.chart {
                Some(chart) => {
                    (charts_view(std::slice::from_ref(chart)))

                    ol class="mt-4 space-y-1 text-sm"
                    {
                        @for (category, value, share) in &ranking.entries {
                            li data-category=(category) class="flex justify-between"
                            {
                                span { (category) }
                                span class="font-medium"
                                {
                                    (format_currency(*value)) " (" (format_share(*share)) ")"
                                }
                            }
                        }
                    }
                }
                None => {
                    p class="text-sm text-gray-500 dark:text-gray-400" { (ranking.empty_message) }
                }
            }
        }
    }
}

fn monthly_table(current: &YearSummary) -> Markup {
    let profit = current.monthly_profit();

    html! {
        section class={ (CARD_STYLE) " overflow-x-auto" }
        {
            table id="monthly-totals" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Mês" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Receitas" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Despesas" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Lucro" }
                    }
                }

                tbody
                {
                    @for (index, month) in MONTH_NAMES.iter().enumerate() {
                        tr class=(TABLE_ROW_STYLE) data-month=(index + 1)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                a
                                    href={ (endpoints::DASHBOARD_VIEW) "?mes=" (index + 1) "&ano=" (current.year) }
                                    class=(LINK_STYLE)
                                {
                                    (month)
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (format_currency(current.revenue[index])) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(current.expenses[index])) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(profit[index])) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc};

    use axum::extract::{Query, State};
    use axum_extra::extract::PrivateCookieJar;
    use scraper::{Html, Selector};

    use super::{AnnualQuery, get_annual_page};
    use crate::{
        Error,
        annual::AnnualState,
        api::{
            MonthTotals, TransactionQuery, TransactionRecord,
            fake::{ApiCall, FakeGestorApi},
        },
        app_state::create_cookie_key,
        category::TransactionKind,
        test_utils::{TEST_TIMEZONE, assert_valid_html, parse_html_document},
        timezone::local_today,
    };

    fn get_state(api: &Arc<FakeGestorApi>) -> AnnualState {
        AnnualState {
            api: api.clone(),
            local_timezone: TEST_TIMEZONE.to_owned(),
        }
    }

    fn jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    fn totals(revenue: f64, expenses: f64, categories: &[(&str, f64)]) -> MonthTotals {
        MonthTotals {
            success: true,
            revenue,
            expenses,
            profit: revenue - expenses,
            expenses_by_category: categories
                .iter()
                .map(|(category, value)| (category.to_string(), *value))
                .collect::<BTreeMap<_, _>>(),
            error: None,
        }
    }

    fn revenue(id: i64, category: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            id,
            kind: TransactionKind::Revenue,
            amount,
            date: Some("2025-01-10".to_owned()),
            category: Some(category.to_owned()),
            subcategory: None,
            description: None,
            establishment: None,
            receipt_url: None,
        }
    }

    fn ranked_categories(html: &Html, ranking: &str) -> Vec<String> {
        html.select(&Selector::parse(&format!("{ranking} li")).unwrap())
            .filter_map(|item| item.value().attr("data-category"))
            .map(str::to_owned)
            .collect()
    }

    fn query_2025() -> AnnualQuery {
        AnnualQuery {
            ano: Some("2025".to_owned()),
            ..Default::default()
        }
    }

    async fn get_page(api: &Arc<FakeGestorApi>, query: AnnualQuery) -> Html {
        let response = get_annual_page(State(get_state(api)), jar(), Query(query))
            .await
            .unwrap();
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        html
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("nothing matches {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn fetches_both_years_and_revenue_of_current_year() {
        let api = Arc::new(FakeGestorApi::new());

        get_page(&api, query_2025()).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 36);
        assert_eq!(calls[0], ApiCall::MonthTotals { year: 2025, month: 1 });
        assert_eq!(calls[11], ApiCall::MonthTotals { year: 2025, month: 12 });
        assert_eq!(calls[12], ApiCall::MonthTotals { year: 2024, month: 1 });
        assert_eq!(calls[23], ApiCall::MonthTotals { year: 2024, month: 12 });
        assert_eq!(
            calls[35],
            ApiCall::ListTransactions(TransactionQuery {
                month: 12,
                year: 2025,
                kind: Some(TransactionKind::Revenue),
                category: None,
            })
        );
    }

    #[tokio::test]
    async fn shows_totals_with_variation() {
        let api = Arc::new(
            FakeGestorApi::new()
                .with_month_totals(2025, 1, totals(1500.0, 500.0, &[("Insumos", 500.0)]))
                .with_month_totals(2024, 1, totals(1000.0, 0.0, &[])),
        );

        let html = get_page(&api, query_2025()).await;

        assert_eq!(text_of(&html, "h1"), "Análise Anual 2025");
        assert_eq!(text_of(&html, "[data-total=receitas] p.text-2xl"), "R$ 1.500,00");
        assert_eq!(text_of(&html, "[data-total=receitas] [data-variation]"), "+50,0%");
        assert_eq!(text_of(&html, "[data-total=despesas] [data-variation]"), "N/A");
        assert_eq!(text_of(&html, "[data-total=lucro] [data-variation]"), "+0,0%");
        assert!(html.select(&Selector::parse("#annual-chart").unwrap()).next().is_some());
    }

    #[tokio::test]
    async fn ranks_top_five_expense_categories() {
        let api = Arc::new(
            FakeGestorApi::new()
                .with_month_totals(
                    2025,
                    2,
                    totals(
                        0.0,
                        0.0,
                        &[
                            ("Insumos", 900.0),
                            ("Aluguel", 800.0),
                            ("Gelo", 50.0),
                            ("Bebidas", 300.0),
                            ("Embalagens", 100.0),
                            ("Limpeza", 10.0),
                        ],
                    ),
                )
                .with_month_totals(2025, 3, totals(0.0, 0.0, &[("Gelo", 200.0)])),
        );

        let html = get_page(&api, query_2025()).await;

        assert_eq!(
            ranked_categories(&html, "#top-expenses"),
            ["Insumos", "Aluguel", "Bebidas", "Gelo", "Embalagens"]
        );
        assert!(
            html.select(&Selector::parse("#top-expenses #expense-ranking-chart").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn ranks_revenue_categories_over_the_year() {
        // The fake returns the same listing for every month.
        let api = Arc::new(FakeGestorApi::new().with_transactions(vec![
            revenue(1, "Vendas", 300.0),
            revenue(2, "PIX", 100.0),
            revenue(3, "Vendas", 200.0),
        ]));

        let html = get_page(&api, query_2025()).await;

        assert_eq!(ranked_categories(&html, "#top-revenue"), ["Vendas", "PIX"]);
        assert_eq!(
            text_of(&html, "#top-revenue li[data-category=Vendas] span.font-medium"),
            "R$ 6.000,00 (83,3%)"
        );
        assert!(
            html.select(&Selector::parse("#top-revenue #revenue-ranking-chart").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn empty_year_has_no_ranking_charts() {
        let api = Arc::new(FakeGestorApi::new());

        let html = get_page(&api, query_2025()).await;

        assert_eq!(text_of(&html, "#top-expenses p"), "Nenhuma despesa neste ano.");
        assert_eq!(text_of(&html, "#top-revenue p"), "Nenhuma receita neste ano.");
        let charts = Selector::parse("#expense-ranking-chart, #revenue-ranking-chart").unwrap();
        assert!(html.select(&charts).next().is_none());
    }

    #[tokio::test]
    async fn keeps_filter_and_comparison_in_year_links() {
        let api = Arc::new(FakeGestorApi::new());

        let html = get_page(
            &api,
            AnnualQuery {
                filtro: Some("DESPESAS".to_owned()),
                comparar: Some("1".to_owned()),
                ..query_2025()
            },
        )
        .await;

        let previous = html.select(&Selector::parse("#previous-year").unwrap()).next().unwrap();
        assert_eq!(
            previous.value().attr("href"),
            Some("/analise-anual?ano=2024&filtro=DESPESAS&comparar=1")
        );
        let checked = html
            .select(&Selector::parse("input[name=filtro][checked]").unwrap())
            .next()
            .unwrap();
        assert_eq!(checked.value().attr("value"), Some("DESPESAS"));
        assert!(
            html.select(&Selector::parse("#comparar[checked]").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn invalid_year_falls_back_to_current_year() {
        let api = Arc::new(FakeGestorApi::new());
        let year = local_today(TEST_TIMEZONE).unwrap().year();

        get_page(
            &api,
            AnnualQuery {
                ano: Some("1999".to_owned()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(api.calls()[0], ApiCall::MonthTotals { year, month: 1 });
    }

    #[tokio::test]
    async fn first_year_has_no_previous_link() {
        let api = Arc::new(FakeGestorApi::new());

        let html = get_page(
            &api,
            AnnualQuery {
                ano: Some("2000".to_owned()),
                ..Default::default()
            },
        )
        .await;

        assert!(html.select(&Selector::parse("#previous-year").unwrap()).next().is_none());
        assert!(html.select(&Selector::parse("#next-year").unwrap()).next().is_some());
    }

    #[tokio::test]
    async fn backend_failure_is_an_error_page() {
        let api = Arc::new(FakeGestorApi::new().with_month_totals(
            2024,
            6,
            MonthTotals {
                success: false,
                error: Some("Banco indisponível".to_owned()),
                ..Default::default()
            },
        ));

        let result = get_annual_page(State(get_state(&api)), jar(), Query(query_2025())).await;

        assert_eq!(
            result.err(),
            Some(Error::BackendError("Banco indisponível".to_owned()))
        );
    }
}
