//! The month navigation sidebar and its collapsed state.
//!
//! On wide screens the sidebar sits beside the page and can be collapsed.
//! On narrow screens it is hidden until opened with the toggle button, and
//! closes again on the overlay, on Escape or when a month is picked.

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;

use crate::{
    AppState, endpoints,
    html::HeadElement,
    period::{MONTH_NAMES, MonthYear},
    preferences::theme::PREFERENCE_COOKIE_DURATION,
    timezone::local_today,
};

/// The viewport width in pixels below which the sidebar opens over the page.
pub const MOBILE_BREAKPOINT: u32 = 992;

/// The name of the cookie holding whether the sidebar is collapsed.
pub(crate) const SIDEBAR_COOKIE: &str = "gestorbot-sidebar-collapsed";

/// The state needed to render the sidebar.
#[derive(Debug, Clone)]
pub struct SidebarState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for SidebarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Whether the sidebar was collapsed by the user.
pub fn is_sidebar_collapsed(jar: &PrivateCookieJar) -> bool {
    jar.get(SIDEBAR_COOKIE)
        .is_some_and(|cookie| cookie.value() == "true")
}

fn set_sidebar_cookie(jar: PrivateCookieJar, collapsed: bool) -> PrivateCookieJar {
    jar.add(
        Cookie::build((SIDEBAR_COOKIE, if collapsed { "true" } else { "false" }))
            .path("/")
            .max_age(PREFERENCE_COOKIE_DURATION)
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// The month shown by the page that holds the sidebar.
#[derive(Debug, Deserialize)]
pub struct SidebarForm {
    #[serde(default)]
    pub mes: Option<String>,
    #[serde(default)]
    pub ano: Option<String>,
}

/// Collapse or expand the sidebar and render it again.
pub async fn toggle_sidebar(
    State(state): State<SidebarState>,
    jar: PrivateCookieJar,
    Form(form): Form<SidebarForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let period = MonthYear::from_query(form.mes.as_deref(), form.ano.as_deref(), today);
    let collapsed = !is_sidebar_collapsed(&jar);

    tracing::debug!("sidebar collapsed: {collapsed}");

    (
        set_sidebar_cookie(jar, collapsed),
        sidebar_view(period, collapsed),
    )
        .into_response()
}

/// The twelve months of the selected year, with the selected month highlighted.
pub fn sidebar_view(selected: MonthYear, collapsed: bool) -> Markup {
    let width = if collapsed { "w-16" } else { "w-56" };
    let previous_year = MonthYear {
        month: selected.month,
        year: selected.year - 1,
    };
    let next_year = MonthYear {
        month: selected.month,
        year: selected.year + 1,
    };
    let annual_url = format!("{}?ano={}", endpoints::ANNUAL_VIEW, selected.year);

    html! {
        aside
            id="sidebar"
            data-collapsed=(if collapsed { "true" } else { "false" })
            class={ "shrink-0 hidden lg:flex flex-col bg-white border-r border-gray-200 \
                dark:bg-gray-800 dark:border-gray-700 text-gray-900 dark:text-white " (width) }
        {
            form
                hx-post=(endpoints::SIDEBAR_PREFERENCE)
                hx-target="#sidebar"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class="flex justify-end p-2"
            {
                input type="hidden" name="mes" value=(selected.month);
                input type="hidden" name="ano" value=(selected.year);

                button
                    type="submit"
                    aria-expanded=(if collapsed { "false" } else { "true" })
                    aria-label=(if collapsed { "Expandir menu" } else { "Recolher menu" })
                    class="p-2 rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700"
                {
                    "☰"
                }
            }

            div class="flex items-center justify-between px-3 pb-2 text-sm font-semibold"
            {
                a
                    href=(previous_year.dashboard_url())
                    aria-label="Ano anterior"
                    class="px-1 text-blue-600 dark:text-blue-400"
                { "‹" }

                span { (selected.year) }

                a
                    href=(next_year.dashboard_url())
                    aria-label="Próximo ano"
                    class="px-1 text-blue-600 dark:text-blue-400"
                { "›" }
            }

            nav class="sidebar-nav flex-1 overflow-y-auto px-2"
            {
                ul class="flex flex-col gap-1 text-sm"
                {
                    @for (index, name) in MONTH_NAMES.iter().enumerate() {
                        @let month = MonthYear { month: index as u8 + 1, year: selected.year };
                        @let is_current = month == selected;
                        li {
                            a
                                href=(month.dashboard_url())
                                title=(name)
                                aria-current=[is_current.then_some("page")]
                                class=(month_link_style(is_current))
                            {
                                @if collapsed {
                                    (name.chars().take(3).collect::<String>())
                                } @else {
                                    (name)
                                }
                            }
                        }
                    }
                }
            }

            a
                href=(annual_url)
                class="m-2 px-3 py-2 text-sm text-center rounded-lg text-blue-700 \
                    bg-blue-50 hover:bg-blue-100 dark:bg-blue-900/30 dark:text-blue-200"
            {
                @if collapsed { "📈" } @else { "Análise " (selected.year) }
            }
        }
    }
}

/// The button that opens the sidebar on narrow screens and the overlay that
/// dims the page behind it.
///
/// Rendered outside [sidebar_view] so that collapsing the sidebar does not
/// replace them.
pub fn sidebar_toggle() -> Markup {
    html! {
        button
            id="btn-sidebar-toggle"
            type="button"
            aria-controls="sidebar"
            aria-expanded="false"
            aria-label="Abrir menu"
            class="lg:hidden fixed bottom-4 left-4 z-50 p-3 rounded-full shadow-lg \
                bg-blue-600 text-white hover:bg-blue-700"
        {
            "☰"
        }

        div
            id="sidebar-overlay"
            aria-hidden="true"
            class="hidden lg:hidden fixed inset-0 z-30 bg-black/50"
        {}
    }
}

fn month_link_style(is_current: bool) -> &'static str {
    if is_current {
        "block px-3 py-2 rounded-lg font-semibold bg-blue-600 text-white"
    } else {
        "block px-3 py-2 rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700"
    }
}

/// Keeps the scroll position of the month list across page loads and sidebar
/// swaps, and opens and closes the sidebar on narrow screens.
pub fn sidebar_script() -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(format!(
        r#"
        document.addEventListener('DOMContentLoaded', function() {{
            const key = 'gestorbot-sidebar-scroll';
            const breakpoint = {MOBILE_BREAKPOINT};
            const openClasses = ['flex', 'fixed', 'inset-y-0', 'left-0', 'z-40'];
            const toggle = document.getElementById('btn-sidebar-toggle');
            const overlay = document.getElementById('sidebar-overlay');

            const isOpen = () => {{
                const sidebar = document.getElementById('sidebar');
                return !!sidebar && sidebar.dataset.open === 'true';
            }};

            const setOpen = (open) => {{
                const sidebar = document.getElementById('sidebar');
                if (!sidebar) return;

                sidebar.dataset.open = open ? 'true' : 'false';
                sidebar.classList.toggle('hidden', !open);
                openClasses.forEach((name) => sidebar.classList.toggle(name, open));
                if (overlay) overlay.classList.toggle('hidden', !open);
                if (toggle) toggle.setAttribute('aria-expanded', open ? 'true' : 'false');
            }};

            const bind = () => {{
                const nav = document.querySelector('#sidebar .sidebar-nav');
                if (!nav || nav.dataset.scrollBound) return;

                nav.dataset.scrollBound = 'true';
                const saved = sessionStorage.getItem(key);
                if (saved) {{
                    nav.scrollTop = parseInt(saved, 10);
                }}
                nav.addEventListener('scroll', () => sessionStorage.setItem(key, nav.scrollTop));
            }};

            if (toggle) toggle.addEventListener('click', () => setOpen(!isOpen()));
            if (overlay) overlay.addEventListener('click', () => setOpen(false));

            document.addEventListener('keydown', (event) => {{
                if (event.key === 'Escape' && isOpen()) setOpen(false);
            }});

            document.addEventListener('click', (event) => {{
                const link = event.target.closest('#sidebar .sidebar-nav a');
                if (!link) return;

                const nav = link.closest('.sidebar-nav');
                sessionStorage.setItem(key, nav.scrollTop);
                if (window.innerWidth < breakpoint) setOpen(false);
            }});

            bind();
            document.body.addEventListener('htmx:afterSwap', bind);
        }});
        "#
    )))
}
