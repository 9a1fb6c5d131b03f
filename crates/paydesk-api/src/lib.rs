//! HTTP API server and transaction management page
//!
//! Routes are organized into modules:
//! - routes::clients: Client list and total-paid report
//! - routes::transactions: Transaction CRUD, searches and the management page
//! - routes::bills: Pending bills report
//!
//! Every JSON endpoint is nested under the configured API prefix. The
//! management page is served at `/` and talks to the same JSON endpoints.

pub mod error;
pub mod routes;
pub mod view;

use axum::{routing::get, Router};
use paydesk_config::Config;
use paydesk_core::RepositoryRef;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, Endpoint};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryRef,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::bills::api_bills_pending;
    use routes::clients::{api_clients, api_clients_total_paid};
    use routes::transactions::{
        api_transaction_create, api_transaction_delete, api_transaction_detail, api_transaction_update,
        api_transactions, api_transactions_by_client, api_transactions_by_platform, page_transactions,
    };

    let api = Router::new()
        .route("/", get(health_check))
        .route("/clients", get(api_clients))
        .route("/clients/total-paid", get(api_clients_total_paid))
        .route("/transactions", get(api_transactions).post(api_transaction_create))
        .route(
            "/transactions/:id",
            get(api_transaction_detail)
                .put(api_transaction_update)
                .delete(api_transaction_delete),
        )
        .route("/transactions/client/:name_client", get(api_transactions_by_client))
        .route("/transactions/platform/:platform_used", get(api_transactions_by_platform))
        .route("/bills/pending", get(api_bills_pending));

    let cors_enable = state.config.server.cors_enable;
    let router = Router::new()
        .route("/", get(page_transactions))
        .nest(&state.config.server.api_prefix, api)
        .with_state(state);

    if cors_enable {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "server online"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Paydesk</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900">
    <div class="max-w-6xl mx-auto p-6">
    {}
    </div>
</body>
</html>"#,
        paydesk_utils::escape_html(title),
        content
    )
}

/// Start the HTTP server and serve until the process is stopped
pub async fn start_server(config: Config, repo: RepositoryRef) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let prefix = config.server.api_prefix.clone();
    let router = create_router(AppState { repo, config });

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Paydesk server on http://{}", addr);
    log::info!("  - / (Transaction management page)");
    log::info!("  - {}/* (JSON API endpoints)", prefix);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
