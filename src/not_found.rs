//! The page shown for unknown routes.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Html(
                error_view(
                    "Página não encontrada",
                    "404",
                    "Página não encontrada.",
                    "Verifique o endereço ou volte para a página inicial.",
                )
                .into_string(),
            ),
        )
            .into_response()
    }
}

pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
