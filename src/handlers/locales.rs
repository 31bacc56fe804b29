// src/handlers/locales.rs

use axum::{extract::State, Json};

use crate::{config::AppState, models::i18n::LocalesResponse};

// GET /api/locales
pub async fn list_locales(State(app_state): State<AppState>) -> Json<LocalesResponse> {
    let config = &app_state.config;
    Json(LocalesResponse {
        supported_locales: config.resolver.supported().iter().map(str::to_string).collect(),
        default_locale: config.effective_default().to_string(),
    })
}
