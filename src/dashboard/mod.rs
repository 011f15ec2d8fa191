//! The monthly dashboard.
//!
//! Shows the month's revenue, expenses and profit, doughnut charts of both by
//! category, and the month's transactions. Clicking an expense category loads
//! its subcategories into a mini dashboard.

mod filters;
mod handlers;
mod subcategories;
mod transactions;

use std::sync::Arc;

use axum::extract::FromRef;

pub use filters::get_dashboard_filters;
pub use handlers::get_dashboard_page;
pub(crate) use handlers::revenue_by_category;
pub use subcategories::get_subcategory_dashboard;

use crate::{AppState, api::GestorApi};

/// The state needed by the dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the GestorBot backend.
    pub api: Arc<dyn GestorApi>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
