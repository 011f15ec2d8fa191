//! Alert messages shown at the bottom of the page.
//!
//! Alerts are rendered as an out-of-band swap of `#alert-container`, so they
//! replace the container wherever the triggering form points its target.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A success or error message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with details.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_error, message, details) = match self {
            Alert::Success { message, details } => (false, message, Some(details)),
            Alert::SuccessSimple { message } => (false, message, None),
            Alert::Error { message, details } => (true, message, Some(details)),
            Alert::ErrorSimple { message } => (true, message, None),
        };

        let style = if is_error {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            text-green-800 bg-green-50 border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div role=(if is_error { "alert" } else { "status" }) class=(style)
                {
                    div class="flex-1"
                    {
                        p class="text-sm font-medium" { (message) }

                        @if let Some(details) = details.filter(|details| !details.is_empty()) {
                            p class="mt-1 text-sm opacity-80" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Fechar"
                        class="text-lg leading-none opacity-70 hover:opacity-100"
                        onclick="this.closest('#alert-container').replaceChildren()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_renders_message_and_details() {
        let alert = Alert::Error {
            message: "Erro ao salvar".to_owned(),
            details: "Valor inválido".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().into_string());

        let message = html
            .select(&Selector::parse("#alert-container p.text-sm.font-medium").unwrap())
            .next()
            .expect("No alert message found");
        let details = html
            .select(&Selector::parse("#alert-container p.mt-1.text-sm.opacity-80").unwrap())
            .next()
            .expect("No alert details found");
        assert_eq!(message.text().collect::<String>(), "Erro ao salvar");
        assert_eq!(details.text().collect::<String>(), "Valor inválido");
        assert!(
            html.select(&Selector::parse("[role=alert]").unwrap())
                .next()
                .is_some()
        );
    }

    #[test]
    fn simple_alert_has_no_details() {
        let alert = Alert::SuccessSimple {
            message: "Salvo".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().into_string());

        assert!(
            html.select(&Selector::parse("p.opacity-80").unwrap())
                .next()
                .is_none()
        );
        assert!(
            html.select(&Selector::parse("[role=status]").unwrap())
                .next()
                .is_some()
        );
    }
}
