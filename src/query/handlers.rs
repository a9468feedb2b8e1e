// region:    --- Imports
use super::queries;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::listing::commands::resolve_current_price;
use crate::listing::model::{Bid, Comment, CurrentPrice, Listing, User};
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 사용자 이름으로 조회 (없으면 None)
pub async fn get_user_by_name(
    db_manager: &DatabaseManager,
    username: &str,
) -> Result<Option<User>, ServiceError> {
    info!("{:<12} --> 사용자 조회 username: {}", "Query", username);
    let username = username.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let user = sqlx::query_as::<_, User>(queries::GET_USER_BY_NAME)
                    .bind(&username)
                    .fetch_optional(&mut **tx)
                    .await?;
                Ok(user)
            })
        })
        .await
}

/// 상품 조회
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Listing, ServiceError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                    .bind(listing_id)
                    .fetch_one(&mut **tx)
                    .await?;
                Ok(listing)
            })
        })
        .await
}

/// 진행 중인 상품 조회
pub async fn get_active_listings(
    db_manager: &DatabaseManager,
) -> Result<Vec<Listing>, ServiceError> {
    info!("{:<12} --> 진행 중인 상품 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let listings = sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok(listings)
            })
        })
        .await
}

/// 모든 상품 조회
pub async fn get_all_listings(db_manager: &DatabaseManager) -> Result<Vec<Listing>, ServiceError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let listings = sqlx::query_as::<_, Listing>(queries::GET_ALL_LISTINGS)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok(listings)
            })
        })
        .await
}

/// 입찰 이력 조회
pub async fn get_listing_bids(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Bid>, ServiceError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let bids = sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok(bids)
            })
        })
        .await
}

/// 최고 입찰 조회 (입찰이 없으면 None)
pub async fn get_highest_bid(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<Bid>, ServiceError> {
    info!("{:<12} --> 최고 입찰 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let bid = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await?;
                Ok(bid)
            })
        })
        .await
}

/// 현재 가격 조회: 최고 입찰가, 입찰이 없으면 시작 가격
pub async fn get_current_price(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<CurrentPrice, ServiceError> {
    info!("{:<12} --> 현재 가격 조회 id: {}", "Query", listing_id);
    let listing = get_listing(db_manager, listing_id).await?;
    let highest_bid = get_highest_bid(db_manager, listing_id).await?;
    Ok(resolve_current_price(&listing, highest_bid.as_ref()))
}

/// 댓글 조회
pub async fn get_listing_comments(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Comment>, ServiceError> {
    info!("{:<12} --> 댓글 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let comments = sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok(comments)
            })
        })
        .await
}

/// 관심 목록 조회
pub async fn get_watched_listings(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<Listing>, ServiceError> {
    info!("{:<12} --> 관심 목록 조회 user_id: {}", "Query", user_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let listings = sqlx::query_as::<_, Listing>(queries::GET_WATCHED_LISTINGS)
                    .bind(user_id)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok(listings)
            })
        })
        .await
}

// endregion: --- Query Handlers
