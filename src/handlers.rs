// region:    --- Imports
use crate::auth::IdentityProvider;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::listing::commands::{
    handle_add_comment as command_add_comment, handle_close_listing as command_close_listing,
    handle_create_listing as command_create_listing, handle_place_bid as command_place_bid,
    handle_register_user as command_register_user, handle_toggle_watch as command_toggle_watch,
    AddCommentCommand, CreateListingCommand, PlaceBidCommand, RegisterUserCommand,
};
use crate::listing::model::User;
use crate::query;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

pub type AppState = (Arc<DatabaseManager>, Arc<dyn IdentityProvider>);

/// 요청 헤더의 현재 사용자 확인, 없으면 401
async fn require_user(
    identity: &Arc<dyn IdentityProvider>,
    headers: &HeaderMap,
) -> Result<User, ServiceError> {
    identity
        .current_user(headers)
        .await?
        .ok_or(ServiceError::Unauthorized)
}

// region:    --- Command Handlers

/// 사용자 등록 요청 처리
pub async fn handle_register(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<RegisterUserCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 사용자 등록 요청: {:?}", "Command", cmd);
    let user = command_register_user(cmd, &db_manager).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 상품 등록 요청 처리
pub async fn handle_create_listing(
    State((db_manager, identity)): State<AppState>,
    headers: HeaderMap,
    Json(cmd): Json<CreateListingCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 상품 등록 요청: {:?}", "Command", cmd);
    let actor = require_user(&identity, &headers).await?;
    let listing = command_create_listing(cmd, &actor, &db_manager).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State((db_manager, identity)): State<AppState>,
    Path(listing_id): Path<i64>,
    headers: HeaderMap,
    Json(cmd): Json<PlaceBidCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    info!(
        "{:<12} --> 입찰 요청 id: {} amount: {}",
        "Command", listing_id, cmd.amount
    );
    let actor = require_user(&identity, &headers).await?;
    let bid = command_place_bid(listing_id, cmd, &actor, &db_manager).await?;
    Ok(Json(serde_json::json!({
        "message": "입찰이 성공적으로 처리되었습니다.",
        "bid_id": bid.id,
        "current_price": bid.amount,
    })))
}

/// 경매 종료 요청 처리
pub async fn handle_close_listing(
    State((db_manager, identity)): State<AppState>,
    Path(listing_id): Path<i64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "Command", listing_id);
    let actor = require_user(&identity, &headers).await?;
    let listing = command_close_listing(listing_id, &actor, &db_manager).await?;
    Ok(Json(listing))
}

/// 관심 등록 토글 요청 처리
pub async fn handle_toggle_watch(
    State((db_manager, identity)): State<AppState>,
    Path(listing_id): Path<i64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 관심 등록 토글 요청 id: {}", "Command", listing_id);
    let actor = require_user(&identity, &headers).await?;
    let watching = command_toggle_watch(listing_id, &actor, &db_manager).await?;
    Ok(Json(serde_json::json!({ "watching": watching })))
}

/// 댓글 작성 요청 처리
pub async fn handle_add_comment(
    State((db_manager, identity)): State<AppState>,
    Path(listing_id): Path<i64>,
    headers: HeaderMap,
    Json(cmd): Json<AddCommentCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 댓글 작성 요청 id: {}", "Command", listing_id);
    let actor = require_user(&identity, &headers).await?;
    let comment = command_add_comment(listing_id, cmd, &actor, &db_manager).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중인 상품 조회
pub async fn handle_get_active_listings(
    State((db_manager, _)): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 진행 중인 상품 조회", "HandlerQuery");
    let listings = query::handlers::get_active_listings(&db_manager).await?;
    Ok(Json(listings))
}

/// 모든 상품 조회
pub async fn handle_get_all_listings(
    State((db_manager, _)): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 모든 상품 조회", "HandlerQuery");
    let listings = query::handlers::get_all_listings(&db_manager).await?;
    Ok(Json(listings))
}

/// 상품 조회
pub async fn handle_get_listing(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    let listing = query::handlers::get_listing(&db_manager, listing_id).await?;
    Ok(Json(listing))
}

/// 현재 가격 조회
pub async fn handle_get_current_price(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 현재 가격 조회 id: {}", "HandlerQuery", listing_id);
    let current = query::handlers::get_current_price(&db_manager, listing_id).await?;
    Ok(Json(current))
}

/// 입찰 이력 조회
pub async fn handle_get_bids(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", listing_id);
    let bids = query::handlers::get_listing_bids(&db_manager, listing_id).await?;
    Ok(Json(bids))
}

/// 댓글 조회
pub async fn handle_get_comments(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 댓글 조회 id: {}", "HandlerQuery", listing_id);
    let comments = query::handlers::get_listing_comments(&db_manager, listing_id).await?;
    Ok(Json(comments))
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State((db_manager, identity)): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 관심 목록 조회", "HandlerQuery");
    let actor = require_user(&identity, &headers).await?;
    let listings = query::handlers::get_watched_listings(&db_manager, actor.id).await?;
    Ok(Json(listings))
}

// endregion: --- Query Handlers
