// src/i18n/store.rs

use std::{collections::HashMap, path::Path, sync::Arc};

use serde_json::Value;

use crate::common::error::AppError;

/// Pacotes de tradução por locale. Carregado uma vez e nunca alterado.
#[derive(Debug, Clone, Default)]
pub struct I18nStore {
    bundles: HashMap<String, Arc<Value>>,
}

impl I18nStore {
    #[cfg(test)]
    pub fn from_bundles<I, S>(bundles: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            bundles: bundles
                .into_iter()
                .map(|(locale, bundle)| (locale.into(), Arc::new(bundle)))
                .collect(),
        }
    }

    /// Lê `{dir}/{locale}.json` para cada locale roteável.
    pub async fn load<'l>(
        dir: &Path,
        locales: impl IntoIterator<Item = &'l str>,
    ) -> Result<Self, AppError> {
        let mut bundles = HashMap::new();

        for locale in locales {
            let path = dir.join(format!("{locale}.json"));
            let raw = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!("⚠️ Arquivo de tradução ausente para '{}': {}", locale, path.display());
                    continue;
                }
                Err(source) => {
                    return Err(AppError::ResourceIo {
                        path: path.display().to_string(),
                        source,
                    });
                }
            };

            let bundle: Value = serde_json::from_str(&raw).map_err(|source| AppError::ResourceJson {
                path: path.display().to_string(),
                source,
            })?;
            bundles.insert(locale.to_string(), Arc::new(bundle));
        }

        tracing::info!("✅ {} pacote(s) de tradução carregado(s)", bundles.len());
        Ok(Self { bundles })
    }

    /// Monta o tradutor da requisição. Locale sem pacote gera tradutor vazio.
    pub fn translator(&self, locale: &str) -> Translator {
        Translator {
            locale: locale.to_string(),
            resources: self
                .bundles
                .get(locale)
                .cloned()
                .unwrap_or_else(|| Arc::new(Value::Null)),
        }
    }
}

/// Tradutor de uma única requisição.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    resources: Arc<Value>,
}

impl Translator {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// `t("home.title")`. Chave ausente devolve a própria chave.
    pub fn t(&self, key: &str) -> String {
        key.split('.')
            .try_fold(self.resources.as_ref(), |node, part| node.get(part))
            .and_then(Value::as_str)
            .unwrap_or(key)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> I18nStore {
        I18nStore::from_bundles([
            ("en", json!({ "home": { "title": "Welcome" }, "count": 3 })),
            ("pt-BR", json!({ "home": { "title": "Bem-vindo" } })),
        ])
    }

    #[test]
    fn resolves_dotted_keys_per_locale() {
        let store = store();
        assert_eq!(store.translator("en").t("home.title"), "Welcome");
        assert_eq!(store.translator("pt-BR").t("home.title"), "Bem-vindo");
    }

    #[test]
    fn missing_or_non_string_keys_return_the_key() {
        let translator = store().translator("en");
        assert_eq!(translator.t("home.subtitle"), "home.subtitle");
        assert_eq!(translator.t("home"), "home");
        assert_eq!(translator.t("count"), "count");
    }

    #[test]
    fn unknown_locale_gets_empty_translator() {
        let translator = store().translator("ja");
        assert_eq!(translator.locale(), "ja");
        assert_eq!(translator.t("home.title"), "home.title");
    }

    #[tokio::test]
    async fn load_skips_missing_files_and_rejects_bad_json() {
        let dir = std::env::temp_dir().join(format!("locale-router-store-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("en.json"), r#"{"home":{"title":"Hi"}}"#)
            .await
            .unwrap();

        let store = I18nStore::load(&dir, ["en", "fr"]).await.unwrap();
        assert_eq!(store.translator("en").t("home.title"), "Hi");
        assert_eq!(store.translator("fr").t("home.title"), "home.title");

        tokio::fs::write(dir.join("fr.json"), "{ not json").await.unwrap();
        let err = I18nStore::load(&dir, ["en", "fr"]).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceJson { .. }));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
