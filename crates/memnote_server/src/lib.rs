//! HTTP front of memnote: `/texts` routes over the core note service.

mod error;
mod middleware;
pub mod routes;
pub mod settings;
pub mod store;

pub use error::{AppError, ErrorBody};
pub use settings::Settings;
pub use store::NoteStore;

use axum::Router;
use log::info;
use std::future::Future;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: NoteStore,
}

/// Builds the router with request logging, a body limit and permissive CORS.
pub fn app(store: NoteStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::text_routes()
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors),
        )
        .with_state(AppState { store })
}

/// Serves `store` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    store: NoteStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("event=server_start module=http status=ok addr={addr}");
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("event=server_stop module=http status=ok addr={addr}");
    Ok(())
}
