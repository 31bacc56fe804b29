// src/models/i18n.rs

use serde::Serialize;

// GET /api/locales
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalesResponse {
    pub supported_locales: Vec<String>,
    pub default_locale: String,
}

// Resposta das páginas com locale no caminho
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub locale: String,
    pub path: String,
    pub title: String,
}
