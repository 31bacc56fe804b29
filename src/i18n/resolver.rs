// src/i18n/resolver.rs

use std::{fmt, str::FromStr, sync::Arc};

use crate::{common::error::AppError, i18n::accept_language::RankedLocaleList};

/// Locales que a aplicação realmente serve, na ordem configurada.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportedLocales(Vec<String>);

impl SupportedLocales {
    /// Valida e monta o conjunto. Rejeita duplicados e tags que não podem
    /// aparecer num segmento de caminho ou num cabeçalho/cookie.
    pub fn new<I, S>(locales: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut validated: Vec<String> = Vec::new();
        for locale in locales {
            let locale = locale.into();
            validate_locale_tag(&locale)?;
            if validated.contains(&locale) {
                return Err(AppError::DuplicateLocale(locale));
            }
            validated.push(locale);
        }
        Ok(Self(validated))
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.0.iter().any(|supported| supported == locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

pub(crate) fn validate_locale_tag(locale: &str) -> Result<(), AppError> {
    let valid = !locale.is_empty()
        && locale
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, '/' | ',' | ';' | '=' | '"' | '\\'));
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidLocale(locale.to_string()))
    }
}

/// Resultado da negociação para uma requisição.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleDecision {
    pub locale: String,
    pub previous: Option<String>,
    /// `true` quando o locale escolhido difere do armazenado (deve ser persistido).
    pub differs: bool,
}

impl LocaleDecision {
    fn new(locale: &str, previous: Option<&str>) -> Self {
        Self {
            locale: locale.to_string(),
            previous: previous.map(str::to_string),
            differs: previous != Some(locale),
        }
    }
}

/// Métrica de similaridade entre duas tags. Quanto maior, mais parecidas.
pub trait Similarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn score(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Métricas prontas, todas do `strsim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityKind {
    JaroWinkler,
    SorensenDice,
    Levenshtein,
}

impl Similarity for SimilarityKind {
    fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityKind::JaroWinkler => strsim::jaro_winkler(a, b),
            SimilarityKind::SorensenDice => strsim::sorensen_dice(a, b),
            SimilarityKind::Levenshtein => strsim::normalized_levenshtein(a, b),
        }
    }
}

impl FromStr for SimilarityKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jaro-winkler" => Ok(SimilarityKind::JaroWinkler),
            "sorensen-dice" => Ok(SimilarityKind::SorensenDice),
            "levenshtein" => Ok(SimilarityKind::Levenshtein),
            other => Err(AppError::InvalidConfig {
                key: "LOCALE_SIMILARITY",
                value: other.to_string(),
            }),
        }
    }
}

/// Fallback aproximado: só entra quando nenhuma tag do cabeçalho bate exatamente.
#[derive(Clone)]
pub struct SimilarityFallback {
    metric: Arc<dyn Similarity>,
    min_score: f64,
}

impl SimilarityFallback {
    pub fn new(metric: impl Similarity + 'static, min_score: f64) -> Self {
        Self {
            metric: Arc::new(metric),
            min_score,
        }
    }

    // Compara a tag mais prioritária com cada locale suportado.
    // Empate: vence o que aparece primeiro em `supported`.
    fn closest<'s>(&self, candidate: &str, supported: &'s SupportedLocales) -> Option<&'s str> {
        let mut best: Option<(&str, f64)> = None;
        for locale in supported.iter() {
            let score = self.metric.score(candidate, locale);
            if !score.is_finite() || score <= 0.0 || score < self.min_score {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((locale, score));
            }
        }
        best.map(|(locale, _)| locale)
    }
}

impl fmt::Debug for SimilarityFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityFallback")
            .field("min_score", &self.min_score)
            .finish_non_exhaustive()
    }
}

/// Escolhe o locale de uma requisição. Não guarda estado entre chamadas.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    supported: SupportedLocales,
    fallback: String,
    similarity: Option<SimilarityFallback>,
}

impl LocaleResolver {
    pub fn new(supported: SupportedLocales, fallback: impl Into<String>) -> Self {
        Self {
            supported,
            fallback: fallback.into(),
            similarity: None,
        }
    }

    pub fn with_similarity(mut self, similarity: SimilarityFallback) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn supported(&self) -> &SupportedLocales {
        &self.supported
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Locales que podem prefixar um caminho: os suportados mais o padrão.
    /// Tudo que `resolve` devolve está aqui, então um redirecionamento nunca
    /// leva a outro.
    pub fn is_routable(&self, locale: &str) -> bool {
        self.supported.contains(locale) || (!self.fallback.is_empty() && locale == self.fallback)
    }

    pub fn routable_locales(&self) -> impl Iterator<Item = &str> {
        let extra = Some(self.fallback.as_str())
            .filter(|fallback| !fallback.is_empty() && !self.supported.contains(fallback));
        self.supported.iter().chain(extra)
    }

    /// Ordem: cookie válido, primeira tag do cabeçalho suportada,
    /// similaridade (se configurada) e por fim o locale padrão.
    pub fn resolve(&self, stored_locale: Option<&str>, ranked: &RankedLocaleList) -> LocaleDecision {
        let stored_locale = stored_locale.filter(|stored| !stored.is_empty());

        if let Some(stored) = stored_locale.filter(|stored| self.supported.contains(stored)) {
            return LocaleDecision::new(stored, Some(stored));
        }

        if let Some(matched) = ranked.iter().find(|tag| self.supported.contains(tag)) {
            return LocaleDecision::new(matched, stored_locale);
        }

        let approximate = self
            .similarity
            .as_ref()
            .zip(ranked.first())
            .and_then(|(similarity, candidate)| similarity.closest(candidate, &self.supported));
        if let Some(approximate) = approximate {
            tracing::debug!(candidate = ?ranked.first(), locale = approximate, "locale aproximado por similaridade");
            return LocaleDecision::new(approximate, stored_locale);
        }

        LocaleDecision::new(&self.fallback, stored_locale)
    }
}
