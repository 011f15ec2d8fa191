#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod multipart;

use std::sync::Arc;

use crate::{AppState, api::fake::FakeGestorApi};

pub(crate) use form::{assert_hx_endpoint, must_get_form, must_get_required_input};
pub(crate) use html::{
    assert_valid_html, get_alert_message, parse_html_document, parse_html_fragment,
};
pub(crate) use http::{get_body_text, get_header};
pub(crate) use multipart::{FilePart, must_make_multipart};

pub(crate) const TEST_TIMEZONE: &str = "Etc/UTC";

pub(crate) fn get_test_app_state(api: Arc<FakeGestorApi>) -> AppState {
    AppState::new("foobar", TEST_TIMEZONE, api)
}
