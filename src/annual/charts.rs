//! The charts of the annual analysis: the monthly evolution of revenue and
//! expenses, and the rankings of the largest categories.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, LineStyle, LineStyleType,
        Tooltip, Trigger,
    },
    series::{Line, bar},
};

use crate::{annual::aggregation::YearSummary, charts::currency_formatter, period::MONTH_NAMES};

pub const REVENUE_COLOR: &str = "#198754";
const PREVIOUS_REVENUE_COLOR: &str = "rgba(25, 135, 84, 0.4)";
pub const EXPENSE_COLOR: &str = "#dc3545";
const PREVIOUS_EXPENSE_COLOR: &str = "rgba(220, 53, 69, 0.4)";

/// Which series the chart shows, read from the `filtro` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesFilter {
    #[default]
    Both,
    Revenue,
    Expenses,
}

impl SeriesFilter {
    pub const ALL: [SeriesFilter; 3] = [
        SeriesFilter::Both,
        SeriesFilter::Revenue,
        SeriesFilter::Expenses,
    ];

    /// Anything but "RECEITAS" or "DESPESAS" shows both series.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(|value| value.trim().to_uppercase()).as_deref() {
            Some("RECEITAS") => SeriesFilter::Revenue,
            Some("DESPESAS") => SeriesFilter::Expenses,
            _ => SeriesFilter::Both,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeriesFilter::Both => "AMBOS",
            SeriesFilter::Revenue => "RECEITAS",
            SeriesFilter::Expenses => "DESPESAS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeriesFilter::Both => "Ambos",
            SeriesFilter::Revenue => "Receitas",
            SeriesFilter::Expenses => "Despesas",
        }
    }

    fn shows_revenue(self) -> bool {
        self != SeriesFilter::Expenses
    }

    fn shows_expenses(self) -> bool {
        self != SeriesFilter::Revenue
    }
}

/// Three letter month labels, e.g. "Jan", "Fev".
fn month_labels() -> Vec<String> {
    MONTH_NAMES
        .iter()
        .map(|name| name.chars().take(3).collect())
        .collect()
}

fn current_series(name: String, values: &[f64; 12], color: &str) -> Line {
    Line::new()
        .name(name)
        .item_style(ItemStyle::new().color(color))
        .line_style(LineStyle::new().color(color).width(3))
        .data(values.to_vec())
}

fn previous_series(name: String, values: &[f64; 12], color: &str) -> Line {
    Line::new()
        .name(name)
        .item_style(ItemStyle::new().color(color))
        .line_style(LineStyle::new().color(color).type_(LineStyleType::Dashed))
        .data(values.to_vec())
}

/// A horizontal bar chart of `ranking`, largest first, drawn in `color`.
///
/// Returns `None` when the ranking is empty.
pub fn ranking_chart(name: &str, ranking: &[(&str, f64)], color: &str) -> Option<Chart> {
    if ranking.is_empty() {
        return None;
    }

    // Category axes start at the bottom, so the largest goes last.
    let labels = ranking
        .iter()
        .rev()
        .map(|(category, _)| category.to_string())
        .collect::<Vec<_>>();
    let values = ranking.iter().rev().map(|(_, value)| *value).collect::<Vec<_>>();

    Some(
        Chart::new()
            .tooltip(
                Tooltip::new()
                    .trigger(Trigger::Axis)
                    .value_formatter(currency_formatter())
                    .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
            )
            .grid(
                Grid::new()
                    .left("3%")
                    .right("4%")
                    .bottom("3%")
                    .top("3%")
                    .contain_label(true),
            )
            .x_axis(
                Axis::new()
                    .type_(AxisType::Value)
                    .axis_label(AxisLabel::new().formatter(currency_formatter())),
            )
            .y_axis(Axis::new().type_(AxisType::Category).data(labels))
            .series(
                bar::Bar::new()
                    .name(name)
                    .item_style(ItemStyle::new().color(color))
                    .data(values),
            ),
    )
}

/// Revenue and expenses per month of `current`, with the dashed series of
/// `previous` when given.
pub fn annual_chart(
    current: &YearSummary,
    previous: Option<&YearSummary>,
    filter: SeriesFilter,
) -> Chart {
    let mut chart = Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line)),
        )
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(month_labels()))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    if filter.shows_revenue() {
        chart = chart.series(current_series(
            format!("Receitas {}", current.year),
            &current.revenue,
            REVENUE_COLOR,
        ));

        if let Some(previous) = previous {
            chart = chart.series(previous_series(
                format!("Receitas {}", previous.year),
                &previous.revenue,
                PREVIOUS_REVENUE_COLOR,
            ));
        }
    }

    if filter.shows_expenses() {
        chart = chart.series(current_series(
            format!("Despesas {}", current.year),
            &current.expenses,
            EXPENSE_COLOR,
        ));

        if let Some(previous) = previous {
            chart = chart.series(previous_series(
                format!("Despesas {}", previous.year),
                &previous.expenses,
                PREVIOUS_EXPENSE_COLOR,
            ));
        }
    }

    chart
}
