// region:    --- Imports
use crate::auth::{HeaderIdentityProvider, IdentityProvider};
use crate::database::DatabaseManager;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Modules
mod auth;
mod database;
mod error;
mod handlers;
mod listing;
mod query;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 인증 서비스 연동 (헤더 기반)
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(HeaderIdentityProvider::new(Arc::clone(&db_manager)));

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        .route("/register", post(handlers::handle_register))
        .route(
            "/listings",
            get(handlers::handle_get_active_listings).post(handlers::handle_create_listing),
        )
        .route("/listings/all", get(handlers::handle_get_all_listings))
        .route("/listings/:id", get(handlers::handle_get_listing))
        .route("/listings/:id/price", get(handlers::handle_get_current_price))
        .route("/listings/:id/bids", get(handlers::handle_get_bids))
        .route("/listings/:id/bid", post(handlers::handle_place_bid))
        .route("/listings/:id/close", post(handlers::handle_close_listing))
        .route("/listings/:id/watch", post(handlers::handle_toggle_watch))
        .route(
            "/listings/:id/comments",
            get(handlers::handle_get_comments).post(handlers::handle_add_comment),
        )
        .route("/watchlist", get(handlers::handle_get_watchlist))
        .layer(cors)
        .with_state((db_manager, identity));

    // 리스너 생성 (기본값: 3000번 포트)
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
