//! HTTP router.

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, store::Store};

/// Build the application router over any store backend.
///
/// The binary passes a `PgStore`; tests pass a `MemoryStore`.
pub fn build_app<S: Store>(store: S) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check::<S>))
        // Account routes
        .route("/api/v1/accounts", post(handlers::accounts::create_account::<S>))
        .route("/api/v1/accounts/{id}", get(handlers::accounts::get_account::<S>))
        // Pocket routes
        .route(
            "/api/v1/accounts/{id}/pockets",
            post(handlers::pockets::create_pocket::<S>).get(handlers::pockets::list_pockets::<S>),
        )
        .route(
            "/api/v1/accounts/{id}/pockets/{pocket_id}/fund",
            post(handlers::pockets::fund_pocket::<S>),
        )
        // Transaction routes
        .route(
            "/api/v1/transactions/transfer",
            post(handlers::transactions::create_transfer::<S>),
        )
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transactions::get_transaction::<S>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(store)
}
