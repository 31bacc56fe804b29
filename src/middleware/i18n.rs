// src/middleware/i18n.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{
    common::error::AppError,
    config::{AppState, I18nConfig},
    i18n::{
        router::{route_request, LocaleRequest, RouteDecision},
        store::Translator,
    },
};

// Nosso extrator de idioma
#[derive(Debug, Clone, PartialEq)]
pub struct Locale(pub String);

/// Middleware das páginas: garante que todo caminho comece com um locale.
///
/// Caminho com locale segue adiante e o locale é gravado (cookie + cabeçalho).
/// Caminho sem locale recebe um 307 para `/{locale}{caminho}`.
pub async fn locale_router(
    State(app_state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let config = app_state.config.as_ref();

    let stored_locale = jar.get(&config.locale_key).map(|cookie| cookie.value().to_string());
    let accept_language = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let route = route_request(
        &LocaleRequest {
            path: request.uri().path(),
            query: request.uri().query(),
            accept_language,
            stored_locale: stored_locale.as_deref(),
        },
        &config.resolver,
    );

    let persist = route.locale_to_persist().map(str::to_string);

    let response = match route {
        RouteDecision::PassThrough { locale } => {
            tracing::debug!(path = %request.uri().path(), %locale, "locale no caminho, seguindo adiante");

            // Disponível para os handlers ainda nesta requisição
            let value = HeaderValue::from_str(&locale)?;
            request.headers_mut().insert(config.locale_header.clone(), value);
            request.extensions_mut().insert(Locale(locale));

            next.run(request).await
        }
        RouteDecision::Redirect { location, decision } => {
            tracing::debug!(
                path = %request.uri().path(),
                %location,
                previous = ?decision.previous,
                differs = decision.differs,
                "redirecionando para caminho com locale"
            );

            Redirect::temporary(&location).into_response()
        }
    };

    match persist {
        Some(locale) => persist_locale(config, jar, &locale, response),
        None => Ok(response),
    }
}

// Grava o locale no cookie e no cabeçalho de resposta, ambos sob `locale_key`
fn persist_locale(
    config: &I18nConfig,
    jar: CookieJar,
    locale: &str,
    response: Response,
) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(locale)?;
    let cookie = Cookie::build((config.locale_key.clone(), locale.to_string())).path("/");

    let mut response = (jar.add(cookie), response).into_response();
    response.headers_mut().insert(config.locale_header.clone(), value);
    Ok(response)
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(locale) = parts.extensions.get::<Locale>() {
            return Ok(locale.clone());
        }

        // Rotas fora do middleware: cabeçalho, senão o padrão
        let app_state = AppState::from_ref(state);
        let locale = parts
            .headers
            .get(&app_state.config.locale_header)
            .and_then(|value| value.to_str().ok())
            .filter(|locale| app_state.config.resolver.is_routable(locale))
            .unwrap_or(app_state.config.effective_default())
            .to_string();

        Ok(Locale(locale))
    }
}

impl<S> FromRequestParts<S> for Translator
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Locale(locale) = Locale::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);
        Ok(app_state.i18n_store.translator(&locale))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        middleware as axum_middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{i18n::resolver::SupportedLocales, i18n::store::I18nStore};

    fn app() -> Router {
        app_with(&["en", "pt-BR"], "en")
    }

    fn app_with(supported: &[&str], default_locale: &str) -> Router {
        let config = I18nConfig::new(
            SupportedLocales::new(supported.iter().copied()).unwrap(),
            default_locale,
            "NEXT_LOCALE",
        )
        .unwrap();
        let app_state = AppState {
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::default()),
        };

        Router::new()
            .route(
                "/{locale}/echo",
                get(|Locale(locale): Locale, headers: axum::http::HeaderMap| async move {
                    let same_request = headers
                        .get("next_locale")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    format!("{locale}|{same_request}")
                }),
            )
            .fallback(|| async { "fallback" })
            .layer(axum_middleware::from_fn_with_state(app_state.clone(), locale_router))
            .with_state(app_state)
    }

    fn header_str<'r>(response: &'r Response, name: &str) -> Option<&'r str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn redirects_unprefixed_path_and_persists_negotiated_locale() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/products?page=2")
                    .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9,en;q=0.8")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(header_str(&response, "location"), Some("/pt-BR/products?page=2"));
        assert_eq!(header_str(&response, "next_locale"), Some("pt-BR"));
        let cookie = header_str(&response, "set-cookie").unwrap();
        assert!(cookie.starts_with("NEXT_LOCALE=pt-BR"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn cookie_wins_and_is_not_rewritten() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/about")
                    .header(header::ACCEPT_LANGUAGE, "pt-BR")
                    .header(header::COOKIE, "NEXT_LOCALE=en")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(header_str(&response, "location"), Some("/en/about"));
        assert!(response.headers().get("set-cookie").is_none());
        assert!(response.headers().get("next_locale").is_none());
    }

    #[tokio::test]
    async fn unknown_language_redirects_to_default() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ACCEPT_LANGUAGE, "de-DE,de;q=0.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(header_str(&response, "location"), Some("/en"));
    }

    #[tokio::test]
    async fn prefixed_path_passes_through_and_records_locale() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pt-BR/echo")
                    .header(header::COOKIE, "NEXT_LOCALE=en")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "next_locale"), Some("pt-BR"));
        assert!(header_str(&response, "set-cookie").unwrap().starts_with("NEXT_LOCALE=pt-BR"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"pt-BR|pt-BR");
    }

    async fn send(app: Router, uri: &str, headers: &[(header::HeaderName, &str)]) -> Response {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, *value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn stale_cookie_is_replaced_by_negotiated_locale() {
        let response = send(
            app(),
            "/about",
            &[(header::ACCEPT_LANGUAGE, "pt-BR"), (header::COOKIE, "NEXT_LOCALE=zz")],
        )
        .await;

        assert_eq!(header_str(&response, "location"), Some("/pt-BR/about"));
        assert_eq!(header_str(&response, "next_locale"), Some("pt-BR"));
        assert!(header_str(&response, "set-cookie").unwrap().starts_with("NEXT_LOCALE=pt-BR"));
    }

    #[tokio::test]
    async fn default_outside_supported_does_not_redirect_again() {
        let redirect = send(app_with(&["en"], "fr"), "/x", &[(header::ACCEPT_LANGUAGE, "de")]).await;
        assert_eq!(header_str(&redirect, "location"), Some("/fr/x"));

        let response = send(app_with(&["en"], "fr"), "/fr/echo", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"fr|fr");
    }

    #[tokio::test]
    async fn default_only_configuration_settles_after_one_redirect() {
        let redirect = send(app_with(&[], "en"), "/", &[]).await;
        assert_eq!(redirect.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(header_str(&redirect, "location"), Some("/en"));

        let response = send(app_with(&[], "en"), "/en/echo", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "next_locale"), Some("en"));
    }
}
