//! The light/dark theme preference.

use std::{fmt::Display, str::FromStr};

use axum::{
    Form,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::endpoints;

/// The name of the cookie holding the theme.
pub(crate) const THEME_COOKIE: &str = "gestorbot-theme";

/// How long preference cookies are kept.
pub(crate) const PREFERENCE_COOKIE_DURATION: Duration = Duration::days(365);

/// The color scheme of the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
    /// Follow the operating system preference.
    Auto,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    /// The theme the toggle button switches to: dark goes to light, anything else to dark.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::Auto => Theme::Dark,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(format!("unknown theme \"{other}\"")),
        }
    }
}

/// Read the theme from `jar`, defaulting to [Theme::Light].
pub fn get_theme(jar: &PrivateCookieJar) -> Theme {
    jar.get(THEME_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
        .unwrap_or_default()
}

fn set_theme_cookie(jar: PrivateCookieJar, theme: Theme) -> PrivateCookieJar {
    jar.add(
        Cookie::build((THEME_COOKIE, theme.as_str()))
            .path("/")
            .max_age(PREFERENCE_COOKIE_DURATION)
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    /// The theme to switch to. The current theme is toggled when missing.
    #[serde(default, rename = "tema")]
    pub theme: Option<String>,
}

/// Store the chosen theme and tell the page to apply it.
///
/// The page listens for the `themechange` event sent in the `HX-Trigger` header.
pub async fn update_theme(jar: PrivateCookieJar, Form(form): Form<ThemeForm>) -> Response {
    let current = get_theme(&jar);

    let requested = form.theme.as_deref().filter(|theme| !theme.is_empty());

    let theme = match requested.map(str::parse::<Theme>) {
        Some(Ok(theme)) => theme,
        Some(Err(error)) => {
            tracing::warn!("{error}, toggling the theme instead");
            current.toggled()
        }
        None => current.toggled(),
    };

    tracing::debug!("theme changed from {current} to {theme}");

    let trigger = json!({ "themechange": { "theme": theme.as_str() } }).to_string();

    (
        set_theme_cookie(jar, theme),
        [(HX_TRIGGER, trigger)],
        theme_toggle(theme),
    )
        .into_response()
}

/// The buttons for switching between light, dark and automatic themes.
pub fn theme_toggle(theme: Theme) -> Markup {
    let (icon, label) = match theme {
        Theme::Dark => ("☀️", "Usar tema claro"),
        Theme::Light | Theme::Auto => ("🌙", "Usar tema escuro"),
    };
    let is_auto = theme == Theme::Auto;
    let auto_style = if is_auto {
        "px-2 py-1 text-xs rounded bg-blue-100 text-blue-700 dark:bg-blue-900 dark:text-blue-200"
    } else {
        "px-2 py-1 text-xs rounded text-gray-600 hover:bg-gray-100 dark:text-gray-300 dark:hover:bg-gray-700"
    };

    html! {
        div id="theme-toggle" class="flex items-center gap-1"
        {
            button
                type="button"
                hx-post=(endpoints::THEME_PREFERENCE)
                hx-target="#theme-toggle"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                title=(label)
                aria-label=(label)
                class="p-2 rounded-lg text-lg hover:bg-gray-100 dark:hover:bg-gray-700"
            {
                (icon)
            }

            button
                type="button"
                hx-post=(endpoints::THEME_PREFERENCE)
                hx-vals=r#"{"tema": "auto"}"#
                hx-target="#theme-toggle"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                aria-pressed=(if is_auto { "true" } else { "false" })
                class=(auto_style)
            {
                "Auto"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;

    use super::{THEME_COOKIE, Theme, ThemeForm, update_theme};
    use crate::{app_state::create_cookie_key, endpoints};

    #[test]
    fn toggle_goes_to_dark_unless_dark() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Auto.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!("DARK".parse(), Ok(Theme::Dark));
        assert_eq!("auto".parse(), Ok(Theme::Auto));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn form_allows_missing_theme() {
        let form: ThemeForm = serde_html_form::from_str("").unwrap();

        assert_eq!(form.theme, None);
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(endpoints::THEME_PREFERENCE, post(update_theme))
            .with_state(create_cookie_key("foobar"));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn toggling_twice_returns_to_light() {
        let server = get_test_server();

        let first = server
            .post(endpoints::THEME_PREFERENCE)
            .form(&[("tema", "")])
            .await;
        first.assert_status(StatusCode::OK);
        assert_eq!(
            first.header("hx-trigger"),
            r#"{"themechange":{"theme":"dark"}}"#
        );

        let second = server
            .post(endpoints::THEME_PREFERENCE)
            .add_cookie(first.cookie(THEME_COOKIE))
            .form(&[("tema", "")])
            .await;
        assert_eq!(
            second.header("hx-trigger"),
            r#"{"themechange":{"theme":"light"}}"#
        );
    }

    #[tokio::test]
    async fn explicit_theme_is_stored() {
        let server = get_test_server();

        let response = server
            .post(endpoints::THEME_PREFERENCE)
            .form(&[("tema", "auto")])
            .await;

        let cookie = response.cookie(THEME_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            response.header("hx-trigger"),
            r#"{"themechange":{"theme":"auto"}}"#
        );
        assert!(response.text().contains(r#"aria-pressed="true""#));
    }
}
