//! The annual analysis: the revenue and expenses of each month of a year,
//! compared with the year before, and the largest expense and revenue
//! categories.

mod aggregation;
mod charts;
mod handlers;

use std::sync::Arc;

use axum::extract::FromRef;

pub use handlers::get_annual_page;

use crate::{AppState, api::GestorApi};

/// The state needed by the annual analysis page.
#[derive(Debug, Clone)]
pub struct AnnualState {
    /// The client for the GestorBot backend.
    pub api: Arc<dyn GestorApi>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnnualState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
