use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use quad_server::assets::LocalAssetStore;
use quad_server::auth::{AdminAllowList, LocalAuthService};
use quad_server::config::Config;
use quad_server::events::EventFeed;
use quad_server::registration::RegistrationService;
use quad_server::routes::create_routes;
use quad_server::state::AppState;
use quad_server::store::{
    PgEventStore, PgNoticeStore, PgProfileStore, PgRegistrationStore, PgUserStore,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Arc::new(Config::from_env());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let event_store = Arc::new(PgEventStore::new(pool.clone()));
    let events = Arc::new(
        EventFeed::new(event_store.clone())
            .await
            .expect("Failed to load initial event snapshot"),
    );
    let registrations = RegistrationService::new(
        event_store,
        Arc::new(PgRegistrationStore::new(pool.clone())),
    );
    let auth = Arc::new(LocalAuthService::new(Arc::new(PgUserStore::new(
        pool.clone(),
    ))));
    let admins = AdminAllowList::new(&config.admin_emails);
    if admins.is_empty() {
        tracing::warn!("No admin emails configured; admin routes are unreachable");
    }
    let assets = Arc::new(LocalAssetStore::new(
        config.asset_dir.clone(),
        config.public_base_url.clone(),
        config.max_upload_bytes,
    ));

    let state = AppState {
        config: config.clone(),
        events,
        registrations,
        notices: Arc::new(PgNoticeStore::new(pool.clone())),
        profiles: Arc::new(PgProfileStore::new(pool)),
        auth,
        admins,
        assets,
    };

    let app: Router = create_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
