// src/i18n/router.rs

use crate::i18n::{
    accept_language::parse_accept_language,
    resolver::{LocaleDecision, LocaleResolver},
};

/// O que o middleware precisa saber da requisição, já lido dos cabeçalhos e cookies.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleRequest<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub accept_language: &'a str,
    pub stored_locale: Option<&'a str>,
}

/// Os dois únicos desfechos possíveis de uma requisição.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDecision {
    /// O caminho já começa com um locale suportado.
    PassThrough { locale: String },
    /// Falta o prefixo: redirecionar para `location`.
    Redirect {
        location: String,
        decision: LocaleDecision,
    },
}

impl RouteDecision {
    /// Locale a gravar no cookie/cabeçalho, se houver.
    pub fn locale_to_persist(&self) -> Option<&str> {
        match self {
            RouteDecision::PassThrough { locale } => Some(locale.as_str()),
            RouteDecision::Redirect { decision, .. } => {
                decision.differs.then_some(decision.locale.as_str())
            }
        }
    }
}

/// Primeiro segmento do caminho, se for um locale suportado (ou o padrão).
/// `/en` e `/en/x` batem com `en`; `/english` não.
pub fn locale_in_path<'p>(path: &'p str, resolver: &LocaleResolver) -> Option<&'p str> {
    path.strip_prefix('/')
        .and_then(|rest| rest.split('/').next())
        .filter(|segment| resolver.is_routable(segment))
}

/// Decide entre seguir adiante ou redirecionar. Não faz I/O.
pub fn route_request(request: &LocaleRequest<'_>, resolver: &LocaleResolver) -> RouteDecision {
    if let Some(locale) = locale_in_path(request.path, resolver) {
        return RouteDecision::PassThrough {
            locale: locale.to_string(),
        };
    }

    let ranked = parse_accept_language(request.accept_language);
    let decision = resolver.resolve(request.stored_locale, &ranked);

    RouteDecision::Redirect {
        location: redirect_location(&decision.locale, request.path, request.query),
        decision,
    }
}

fn redirect_location(locale: &str, path: &str, query: Option<&str>) -> String {
    let mut location = match path {
        "" | "/" => format!("/{locale}"),
        _ if path.starts_with('/') => format!("/{locale}{path}"),
        _ => format!("/{locale}/{path}"),
    };
    if let Some(query) = query.filter(|query| !query.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}
