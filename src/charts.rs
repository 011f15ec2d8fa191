//! Chart containers and the ECharts options shared by the dashboard and the annual analysis.
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a container div and JavaScript initialization code.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, ItemStyle, JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

/// The ECharts bundle served from the static directory.
pub const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// The inner and outer radius of the doughnut charts.
pub const DOUGHNUT_RADIUS: [&str; 2] = ["45%", "75%"];

/// The inner and outer radius of the small doughnut in the subcategory view.
pub const MINI_DOUGHNUT_RADIUS: [&str; 2] = ["44%", "80%"];

/// A chart with its HTML container ID and ECharts configuration.
pub struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// One slice of a doughnut chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DoughnutSlice {
    pub label: String,
    pub value: f64,
    /// A CSS color, e.g. "#28a745".
    pub color: String,
}

/// Renders a container div for each chart.
pub fn charts_view(charts: &[PageChart]) -> Markup {
    html!(
        @for chart in charts {
            div
                id=(chart.id)
                class="min-h-[320px] w-full rounded"
            {}
        }
    )
}

fn init_chart_js(chart: &PageChart) -> String {
    format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            if (!chartDom) return;
            const isDark = document.documentElement.classList.contains('dark');
            const chart = echarts.init(chartDom, isDark ? 'dark' : null);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);
            window.addEventListener('gestorbot:theme', (event) => {{
                chart.setTheme(event.detail.isDark ? 'dark' : 'default');
            }});
        }})();"#,
        chart.id, chart.options
    )
}

/// Generates JavaScript that initializes `charts` once the page has loaded.
///
/// The charts follow the page theme through the `gestorbot:theme` event.
pub fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(init_chart_js)
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A container and an inline script for a chart in an htmx fragment.
///
/// htmx runs inline scripts of swapped content, so the chart starts as soon
/// as the fragment is in the page.
pub fn chart_fragment(chart: &PageChart) -> Markup {
    html! {
        div id=(chart.id) class="min-h-[240px] w-full" {}
        script { (PreEscaped(init_chart_js(chart))) }
    }
}

/// A doughnut chart with one colored slice per entry, or `None` when there is no data.
pub fn doughnut_chart(title: &str, slices: &[DoughnutSlice], radius: [&str; 2]) -> Option<Chart> {
    if slices.is_empty() {
        return None;
    }

    let colors = slices
        .iter()
        .map(|slice| Color::from(slice.color.as_str()))
        .collect::<Vec<_>>();
    let data = slices
        .iter()
        .map(|slice| (slice.value, slice.label.as_str()))
        .collect::<Vec<_>>();

    Some(
        Chart::new()
            .title(Title::new().text(title).left("center"))
            .tooltip(
                Tooltip::new()
                    .trigger(Trigger::Item)
                    .formatter("{b}: R$ {c} ({d}%)"),
            )
            .legend(Legend::new().show(false))
            .color(colors)
            .series(
                Pie::new()
                    .name(title)
                    .radius(vec![radius[0], radius[1]])
                    .item_style(
                        ItemStyle::new()
                            .border_color("#fff")
                            .border_width(3),
                    )
                    .data(data),
            ),
    )
}

/// Formats axis values as Brazilian reais.
pub fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
