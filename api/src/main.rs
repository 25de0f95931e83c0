//! Circulation API Server
//!
//! Lending ledger for a small library: a catalog of titles, a registry of
//! borrowers and the loans between them.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ConnectionTrait, Database};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    InMemoryLibrary, PostgresBorrowerRepository, PostgresLoanRepository, PostgresTitleRepository,
};
use app::{BorrowerService, CatalogService, LedgerService, LoanPolicy, ReportService};
use config::Config;
use domain::ports::{BorrowerRepository, Clock, LoanRepository, TitleRepository};

pub type Catalog = CatalogService<dyn TitleRepository>;
pub type Registry = BorrowerService<dyn BorrowerRepository>;
pub type Ledger = LedgerService<dyn TitleRepository, dyn BorrowerRepository, dyn LoanRepository>;
pub type Reports = ReportService<dyn TitleRepository, dyn BorrowerRepository, dyn LoanRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub borrowers: Arc<Registry>,
    pub ledger: Arc<Ledger>,
    pub reports: Arc<Reports>,
    pub staff_key_hashes: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        titles: Arc<dyn TitleRepository>,
        borrowers: Arc<dyn BorrowerRepository>,
        loans: Arc<dyn LoanRepository>,
        clock: Arc<dyn Clock>,
        policy: LoanPolicy,
        staff_key_hashes: Vec<String>,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(titles.clone())),
            borrowers: Arc::new(BorrowerService::new(borrowers.clone())),
            ledger: Arc::new(
                LedgerService::new(
                    titles.clone(),
                    borrowers.clone(),
                    loans.clone(),
                    clock.clone(),
                )
                .with_policy(policy),
            ),
            reports: Arc::new(ReportService::new(titles, borrowers, loans, clock)),
            staff_key_hashes: Arc::new(staff_key_hashes),
        }
    }

    /// State backed by a fresh in-process store
    pub fn in_memory(
        clock: Arc<dyn Clock>,
        policy: LoanPolicy,
        staff_key_hashes: Vec<String>,
    ) -> Self {
        let store = Arc::new(InMemoryLibrary::new());
        Self::new(
            store.clone(),
            store.clone(),
            store,
            clock,
            policy,
            staff_key_hashes,
        )
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Routes that main wraps in a rate limiter
pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/borrowers", post(handlers::register_borrower))
}

/// Build the full router; `registration` comes from `registration_routes`
pub fn build_router(state: AppState, registration: Router<AppState>) -> Router {
    let staff_routes = Router::new()
        .route("/titles", post(handlers::create_title))
        .route("/titles/:id/restock", post(handlers::restock_title))
        .route("/borrowers", get(handlers::list_borrowers))
        .route(
            "/borrowers/:id",
            get(handlers::get_borrower).patch(handlers::update_contact),
        )
        .route("/borrowers/:id/history", get(handlers::borrower_history))
        .route(
            "/loans",
            get(handlers::list_active_loans).post(handlers::issue_loan),
        )
        .route("/loans/:id", get(handlers::get_loan))
        .route("/loans/:id/return", post(handlers::return_loan))
        .route("/reports/statistics", get(handlers::statistics_report))
        .route("/reports/overdue", get(handlers::overdue_report))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::staff_auth_middleware,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Public catalog and borrower identity lookup
        .route("/titles", get(handlers::list_titles))
        .route("/titles/:id", get(handlers::get_title))
        .route("/borrowers/lookup", get(handlers::lookup_borrower))
        .merge(registration)
        .merge(staff_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,circulation_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting circulation API...");

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.staff_key_hashes.is_empty() {
        tracing::warn!("STAFF_API_KEY_HASHES is empty; staff routes will reject every request");
    }

    let clock: Arc<dyn Clock> = Arc::new(mockable::DefaultClock);

    let state = match config.database_url.as_deref() {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(url)
                .await
                .context("Failed to connect to database")?;
            db.execute_unprepared(include_str!("../migrations/0001_create_circulation.sql"))
                .await
                .context("Failed to apply schema")?;
            tracing::info!("Database connected");

            AppState::new(
                Arc::new(PostgresTitleRepository::new(db.clone())),
                Arc::new(PostgresBorrowerRepository::new(db.clone())),
                Arc::new(PostgresLoanRepository::new(db)),
                clock,
                config.policy,
                config.staff_key_hashes.clone(),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            AppState::in_memory(clock, config.policy, config.staff_key_hashes.clone())
        }
    };

    // Registration: 2 req/sec sustained, burst of 5, keyed by peer IP
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build rate limiter config")?,
    );
    let registration = registration_routes().layer(GovernorLayer {
        config: governor_config,
    });

    let app = build_router(state, registration);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        %addr,
        late_fee_per_day = %config.policy.late_fee_per_day,
        default_loan_days = config.policy.default_loan_days,
        "Listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
