// src/handlers/pages.rs

use axum::{http::Uri, Json};

use crate::{i18n::store::Translator, models::i18n::PageResponse};

// GET /{locale} e /{locale}/{*rest}
// O middleware já garantiu que o primeiro segmento é um locale roteável.
pub async fn show_page(t: Translator, uri: Uri) -> Json<PageResponse> {
    Json(PageResponse {
        locale: t.locale().to_string(),
        path: uri.path().to_string(),
        title: t.t("home.title"),
    })
}
