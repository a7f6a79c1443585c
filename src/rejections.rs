use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{html, Markup};

use crate::views;

#[derive(Debug)]
pub enum AppError {
    Input(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, label, message) = match self {
            AppError::Input(message) => {
                tracing::debug!("rejected input: {message}");
                (StatusCode::BAD_REQUEST, "INPUT_ERROR", message)
            }
        };

        (code, error_page(label, message)).into_response()
    }
}

fn error_page(label: &str, message: &str) -> Markup {
    views::page(
        "Error",
        html! {
            h1 { (label) }
            p { (message) }
        },
    )
}
