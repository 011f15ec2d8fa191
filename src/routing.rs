//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    annual::get_annual_page,
    dashboard::{get_dashboard_filters, get_dashboard_page, get_subcategory_dashboard},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    preferences::{toggle_sidebar, update_theme},
    upload::{
        MAX_BATCH_FILES, MAX_FILE_SIZE, confirm_batch, confirm_receipt, get_review_subcategories,
        get_upload_page, upload_batch, upload_receipt,
    },
};

/// Room for the other form fields and the multipart framing of an upload.
const UPLOAD_OVERHEAD: usize = 1024 * 1024;

/// The largest upload request body: a full batch plus [UPLOAD_OVERHEAD].
///
/// Oversized files must reach the handlers so they can be rejected with a
/// message naming the file, so the limit is set above the per-file limit.
pub const MAX_UPLOAD_BODY_SIZE: usize = MAX_BATCH_FILES * MAX_FILE_SIZE + UPLOAD_OVERHEAD;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let upload_routes = Router::new()
        .route(endpoints::UPLOAD_RECEIPT, post(upload_receipt))
        .route(endpoints::UPLOAD_BATCH, post(upload_batch))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_SIZE));

    Router::new()
        .route(endpoints::ROOT, get(get_upload_page))
        .route(endpoints::CONFIRM_RECEIPT, post(confirm_receipt))
        .route(endpoints::CONFIRM_BATCH, post(confirm_batch))
        .route(endpoints::REVIEW_SUBCATEGORIES, get(get_review_subcategories))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_FILTERS, get(get_dashboard_filters))
        .route(
            endpoints::DASHBOARD_SUBCATEGORIES,
            get(get_subcategory_dashboard),
        )
        .route(endpoints::ANNUAL_VIEW, get(get_annual_page))
        .route(endpoints::THEME_PREFERENCE, post(update_theme))
        .route(endpoints::SIDEBAR_PREFERENCE, post(toggle_sidebar))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .merge(upload_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
