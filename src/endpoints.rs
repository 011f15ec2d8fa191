//! The endpoint URIs served by the app.

/// The upload page, where new expenses and revenues start.
pub const ROOT: &str = "/";
/// The monthly dashboard.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The annual trend analysis page.
pub const ANNUAL_VIEW: &str = "/analise-anual";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for extracting a single receipt and showing the review form.
pub const UPLOAD_RECEIPT: &str = "/upload/nota";
/// The route for saving a reviewed receipt.
pub const CONFIRM_RECEIPT: &str = "/upload/confirmar";
/// The route for extracting up to ten receipts and showing the review list.
pub const UPLOAD_BATCH: &str = "/upload/notas-massa";
/// The route for saving a reviewed batch of receipts.
pub const CONFIRM_BATCH: &str = "/upload/notas-massa/confirmar";
/// The route for the subcategory options of the category picked in the review form.
pub const REVIEW_SUBCATEGORIES: &str = "/upload/subcategorias";
/// The route for the dashboard category filter fragment.
pub const DASHBOARD_FILTERS: &str = "/dashboard/filtros";
/// The route for the expenses per subcategory of a category.
pub const DASHBOARD_SUBCATEGORIES: &str = "/dashboard/subcategorias";
/// The route for changing the theme.
pub const THEME_PREFERENCE: &str = "/preferencias/tema";
/// The route for collapsing or expanding the sidebar.
pub const SIDEBAR_PREFERENCE: &str = "/preferencias/sidebar";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::ANNUAL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::UPLOAD_RECEIPT);
        assert_endpoint_is_valid_uri(endpoints::CONFIRM_RECEIPT);
        assert_endpoint_is_valid_uri(endpoints::UPLOAD_BATCH);
        assert_endpoint_is_valid_uri(endpoints::CONFIRM_BATCH);
        assert_endpoint_is_valid_uri(endpoints::REVIEW_SUBCATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_FILTERS);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_SUBCATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::THEME_PREFERENCE);
        assert_endpoint_is_valid_uri(endpoints::SIDEBAR_PREFERENCE);
    }
}
