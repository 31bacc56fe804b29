//src/main.rs

use axum::{middleware as axum_middleware, routing::get, Router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod handlers;
mod i18n;
mod middleware;
mod models;

use crate::config::AppState;
use crate::middleware::i18n::locale_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().await.inspect_err(|e| {
        tracing::error!("🔥 Falha ao inicializar o estado da aplicação: {:?}", e);
    })?;

    let addr = config::server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app(app_state)).await?;
    Ok(())
}

fn app(app_state: AppState) -> Router {
    // Rotas de API: fora do roteamento por locale
    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/locales", get(handlers::locales::list_locales));

    // Páginas: todo caminho precisa começar com um locale suportado
    let page_routes = Router::new()
        .route("/{locale}", get(handlers::pages::show_page))
        .route("/{locale}/{*rest}", get(handlers::pages::show_page))
        .fallback(handlers::pages::show_page)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            locale_router,
        ));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .with_state(app_state)
}
