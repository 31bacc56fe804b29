// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use axum::http::HeaderName;

use crate::{
    common::error::AppError,
    i18n::{
        resolver::{
            validate_locale_tag, LocaleResolver, SimilarityFallback, SimilarityKind,
            SupportedLocales,
        },
        store::I18nStore,
    },
};

const DEFAULT_LOCALE_KEY: &str = "NEXT_LOCALE";
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

/// Configuração de idiomas, validada na inicialização.
#[derive(Debug, Clone)]
pub struct I18nConfig {
    /// Nome do cookie e do cabeçalho onde o locale é persistido.
    pub locale_key: String,
    pub locale_header: HeaderName,
    pub resolver: LocaleResolver,
}

impl I18nConfig {
    pub fn new(
        supported: SupportedLocales,
        default_locale: &str,
        locale_key: &str,
    ) -> Result<Self, AppError> {
        let locale_header = HeaderName::try_from(locale_key).map_err(|_| AppError::InvalidConfig {
            key: "LOCALE_KEY",
            value: locale_key.to_string(),
        })?;

        if !default_locale.is_empty() {
            validate_locale_tag(default_locale)?;
        }

        // Sem padrão configurado, o primeiro suportado assume o papel
        let effective_default = match default_locale {
            "" => supported.first().ok_or(AppError::EmptyLocaleConfig)?.to_string(),
            configured => configured.to_string(),
        };

        Ok(Self {
            locale_key: locale_key.to_string(),
            locale_header,
            resolver: LocaleResolver::new(supported, effective_default),
        })
    }

    pub fn with_similarity(mut self, similarity: SimilarityFallback) -> Self {
        self.resolver = self.resolver.with_similarity(similarity);
        self
    }

    /// Locale usado quando nada mais bate. Nunca vazio.
    pub fn effective_default(&self) -> &str {
        self.resolver.fallback()
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(|key| env::var(key).ok())
    }

    fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let supported = SupportedLocales::new(
            get("SUPPORTED_LOCALES")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|locale| !locale.is_empty()),
        )?;
        let default_locale = get("DEFAULT_LOCALE").unwrap_or_default();
        let locale_key = get("LOCALE_KEY").unwrap_or_else(|| DEFAULT_LOCALE_KEY.to_string());

        let config = Self::new(supported, default_locale.trim(), &locale_key)?;

        let similarity = get("LOCALE_SIMILARITY").unwrap_or_default();
        if matches!(similarity.trim(), "" | "off") {
            return Ok(config);
        }
        let kind: SimilarityKind = similarity.parse()?;
        let min_score = match get("LOCALE_SIMILARITY_MIN_SCORE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|score| score.is_finite())
                .ok_or_else(|| AppError::InvalidConfig {
                    key: "LOCALE_SIMILARITY_MIN_SCORE",
                    value: raw.clone(),
                })?,
            None => 0.0,
        };

        Ok(config.with_similarity(SimilarityFallback::new(kind, min_score)))
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<I18nConfig>,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = I18nConfig::from_env()?;

        let i18n_store = match env::var("LOCALES_DIR").ok().map(PathBuf::from) {
            Some(dir) => I18nStore::load(&dir, config.resolver.routable_locales()).await?,
            None => {
                tracing::warn!("⚠️ LOCALES_DIR não definido: nenhuma tradução carregada");
                I18nStore::default()
            }
        };

        tracing::info!(
            "✅ Locales suportados: {:?} (padrão: '{}')",
            config.resolver.supported().iter().collect::<Vec<_>>(),
            config.effective_default()
        );

        Ok(Self {
            config: Arc::new(config),
            i18n_store: Arc::new(i18n_store),
        })
    }
}

pub fn server_addr() -> String {
    env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string())
}
