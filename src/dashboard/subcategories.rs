//! The mini dashboard with the subcategories of one expense category.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    category::subcategory_color,
    charts::{DoughnutSlice, MINI_DOUGHNUT_RADIUS, PageChart, chart_fragment, doughnut_chart},
    dashboard::DashboardState,
    html::format_currency,
    period::MonthYear,
    timezone::local_today,
};

const SUBCATEGORY_CHART_ID: &str = "subcategory-chart";

/// The category and month of the mini dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct SubcategoryQuery {
    #[serde(default)]
    pub categoria: String,
    pub mes: Option<String>,
    pub ano: Option<String>,
}

/// Render the expenses of a category per subcategory, largest first.
pub async fn get_subcategory_dashboard(
    State(state): State<DashboardState>,
    Query(query): Query<SubcategoryQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };
    let period = MonthYear::from_query(query.mes.as_deref(), query.ano.as_deref(), today);

    let response = match state
        .api
        .subcategory_expenses(&query.categoria, period.year, period.month)
        .await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::error!(
                "Could not get subcategories of {} for {period}: {error}",
                query.categoria
            );
            return message_view(&query.categoria, "Erro de conexão.").into_response();
        }
    };

    if !response.success {
        let message = response
            .error
            .unwrap_or_else(|| "Erro ao carregar dados.".to_owned());
        return message_view(&query.categoria, &message).into_response();
    }

    let mut subcategories = response
        .expenses_by_subcategory
        .into_iter()
        .collect::<Vec<_>>();

    if subcategories.is_empty() {
        return message_view(&query.categoria, "Nenhuma subcategoria registrada.").into_response();
    }

    subcategories.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    subcategories_view(&query.categoria, &subcategories).into_response()
}

fn message_view(category: &str, message: &str) -> Markup {
    html! {
        div id="mini-dashboard-content"
        {
            h3 class="mb-2 text-lg font-semibold" { (category) }
            p class="text-sm text-gray-500 dark:text-gray-400" { (message) }
        }
    }
}

fn subcategories_view(category: &str, subcategories: &[(String, f64)]) -> Markup {
    let total = subcategories.iter().map(|(_, value)| value).sum::<f64>();
    let slices = subcategories
        .iter()
        .map(|(name, value)| DoughnutSlice {
            label: name.clone(),
            value: *value,
            color: subcategory_color(name).to_owned(),
        })
        .collect::<Vec<_>>();
    let chart = doughnut_chart(category, &slices, MINI_DOUGHNUT_RADIUS).map(|chart| PageChart {
        id: SUBCATEGORY_CHART_ID,
        options: chart.to_string(),
    });

    html! {
        div id="mini-dashboard-content"
        {
            h3 class="mb-2 text-lg font-semibold"
            {
                (category) " "
                span class="text-sm font-normal text-gray-500" { (format_currency(total)) }
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                ul class="space-y-2"
                {
                    @for slice in &slices {
                        li class="flex items-center justify-between gap-2 text-sm" data-subcategory=(slice.label)
                        {
                            span class="flex items-center gap-2"
                            {
                                span
                                    class="inline-block w-3 h-3 rounded-full"
                                    style={ "background-color: " (slice.color) }
                                {}
                                (slice.label)
                            }
                            span class="font-medium" { (format_currency(slice.value)) }
                        }
                    }
                }

                @if let Some(chart) = &chart {
                    div { (chart_fragment(chart)) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc};

    use axum::extract::{Query, State};
    use scraper::Selector;

    use super::{SubcategoryQuery, get_subcategory_dashboard};
    use crate::{
        api::{
            SubcategoryExpenses,
            fake::{ApiCall, FakeGestorApi},
        },
        dashboard::DashboardState,
        test_utils::{TEST_TIMEZONE, assert_valid_html, parse_html_fragment},
    };

    fn get_state(api: &Arc<FakeGestorApi>) -> DashboardState {
        DashboardState {
            api: api.clone(),
            local_timezone: TEST_TIMEZONE.to_owned(),
        }
    }

    fn query() -> SubcategoryQuery {
        SubcategoryQuery {
            categoria: "Insumos".to_owned(),
            mes: Some("3".to_owned()),
            ano: Some("2025".to_owned()),
        }
    }

    async fn get_text(api: FakeGestorApi) -> String {
        let api = Arc::new(api);
        let response = get_subcategory_dashboard(State(get_state(&api)), Query(query())).await;
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        html.select(&Selector::parse("#mini-dashboard-content p").unwrap())
            .next()
            .map(|p| p.text().collect::<String>())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn lists_subcategories_largest_first() {
        let api = Arc::new(FakeGestorApi::new().with_subcategories(SubcategoryExpenses {
            success: true,
            expenses_by_subcategory: BTreeMap::from([
                ("Gelo".to_owned(), 30.0),
                ("Frutos do Mar".to_owned(), 250.0),
                ("Hortifruti".to_owned(), 80.5),
            ]),
            error: None,
        }));

        let response = get_subcategory_dashboard(State(get_state(&api)), Query(query())).await;

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let got = html
            .select(&Selector::parse("li[data-subcategory]").unwrap())
            .filter_map(|item| item.value().attr("data-subcategory"))
            .collect::<Vec<_>>();
        assert_eq!(got, ["Frutos do Mar", "Hortifruti", "Gelo"]);
        assert!(
            html.select(&Selector::parse("#subcategory-chart").unwrap())
                .next()
                .is_some()
        );
        assert_eq!(
            api.calls(),
            [ApiCall::SubcategoryExpenses {
                category: "Insumos".to_owned(),
                year: 2025,
                month: 3
            }]
        );
    }

    #[tokio::test]
    async fn empty_data_has_message() {
        assert_eq!(
            get_text(FakeGestorApi::new()).await,
            "Nenhuma subcategoria registrada."
        );
    }

    #[tokio::test]
    async fn backend_error_is_shown() {
        let api = FakeGestorApi::new().with_subcategories(SubcategoryExpenses {
            success: false,
            error: Some("Categoria desconhecida".to_owned()),
            ..Default::default()
        });

        assert_eq!(get_text(api).await, "Categoria desconhecida");

        let api = FakeGestorApi::new().with_subcategories(SubcategoryExpenses::default());
        assert_eq!(get_text(api).await, "Erro ao carregar dados.");
    }

    #[tokio::test]
    async fn connection_error_is_shown() {
        assert_eq!(
            get_text(FakeGestorApi::new().unavailable()).await,
            "Erro de conexão."
        );
    }
}
