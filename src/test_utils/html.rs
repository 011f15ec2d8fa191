use axum::response::Response;
use scraper::{Html, Selector};

use crate::test_utils::http::get_body_text;

pub(crate) async fn parse_html_document(response: Response) -> Html {
    Html::parse_document(&get_body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response) -> Html {
    Html::parse_fragment(&get_body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The message of the alert in an alert response.
pub(crate) async fn get_alert_message(response: Response) -> String {
    let html = parse_html_fragment(response).await;
    assert_valid_html(&html);

    html.select(&Selector::parse("#alert-container p.text-sm.font-medium").unwrap())
        .next()
        .expect("No alert message found")
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}
