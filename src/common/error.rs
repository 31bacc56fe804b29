use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Nenhum locale suportado e nenhum locale padrão configurado")]
    EmptyLocaleConfig,

    #[error("Locale duplicado na configuração: {0}")]
    DuplicateLocale(String),

    #[error("Locale inválido: '{0}'")]
    InvalidLocale(String),

    #[error("Valor inválido para {key}: '{value}'")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Falha ao ler {path}: {source}")]
    ResourceIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido em {path}: {source}")]
    ResourceJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Valor de cabeçalho inválido: {0}")]
    InvalidHeaderValue(#[from] axum::http::header::InvalidHeaderValue),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Nenhum destes erros é culpa do cliente: todos viram 500.
        tracing::error!("Erro Interno do Servidor: {}", self);
        let body = Json(json!({ "error": "Ocorreu um erro inesperado." }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
