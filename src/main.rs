use placement_backend::{
    config::{get_config, init_config, LogFormat},
    database::pool::{create_pool, run_migrations},
    routes,
    store::{MemoryStore, PgStore, Store},
    utils::{time, token::TokenKeys},
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("placement_backend=info,tower_http=info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let store: Arc<dyn Store> = if config.database_url.is_some() {
        let pool = create_pool().await?;
        run_migrations(&pool).await?;
        info!("Connected to PostgreSQL, migrations applied");
        Arc::new(PgStore::new(pool))
    } else {
        warn!("DATABASE_URL not set; using the in-memory store, data will not survive a restart");
        Arc::new(MemoryStore::new())
    };

    let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_ttl_days);
    let app_state = AppState::new(store, tokens);

    if let Some(seed) = &config.admin {
        let admin = app_state
            .user_service
            .ensure_admin(&seed.name, &seed.email, &seed.password, time::now())
            .await?;
        info!(user = %admin.id, email = %admin.email, "Admin account ready");
    } else {
        warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; no admin account was seeded");
    }

    let app = routes::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
