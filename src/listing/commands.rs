/// 상품 관련 커맨드 처리
/// 1. 사용자 등록
/// 2. 상품 등록
/// 3. 입찰
/// 4. 관심 등록 토글
/// 5. 경매 종료
/// 6. 댓글 작성
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::listing::model::{Bid, Comment, CurrentPrice, Listing, User};
use crate::query::handlers;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Commands

/// 사용자 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterUserCommand {
    pub username: String,
    pub email: Option<String>,
}

/// 상품 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub starting_price: Decimal,
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: String,
}

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub amount: Decimal,
}

/// 댓글 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    pub content: String,
}

// endregion: --- Commands

// region:    --- Domain Rules

/// 현재 가격 계산: 최고 입찰가와 잠정 낙찰자, 입찰이 없으면 시작 가격
pub fn resolve_current_price(listing: &Listing, highest_bid: Option<&Bid>) -> CurrentPrice {
    match highest_bid {
        Some(bid) => CurrentPrice {
            amount: bid.amount,
            winner_id: Some(bid.bidder_id),
        },
        None => CurrentPrice {
            amount: listing.starting_price,
            winner_id: None,
        },
    }
}

/// 입찰 금액 검증: 현재 가격보다 엄격히 높아야 한다
pub fn validate_bid_amount(amount: Decimal, current: &CurrentPrice) -> Result<(), ServiceError> {
    if amount <= current.amount {
        return Err(ServiceError::BidTooLow {
            current_price: current.amount,
        });
    }
    Ok(())
}

/// 종료 권한 검증: 판매자 본인만 종료할 수 있다
pub fn authorize_close(listing: &Listing, actor_id: i64) -> Result<(), ServiceError> {
    if listing.owner_id != actor_id {
        return Err(ServiceError::NotOwner);
    }
    Ok(())
}

// endregion: --- Domain Rules

// region:    --- Command Handlers

/// 1. 사용자 등록
pub async fn handle_register_user(
    cmd: RegisterUserCommand,
    db_manager: &DatabaseManager,
) -> Result<User, ServiceError> {
    info!("{:<12} --> 사용자 등록 처리 시작: {:?}", "Command", cmd);

    let result = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, created_at)
         VALUES ($1, $2, $3)
         RETURNING id, username, email, created_at",
    )
    .bind(&cmd.username)
    .bind(&cmd.email)
    .bind(Utc::now())
    .fetch_one(db_manager.pool())
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ServiceError::DuplicateUsername)
        }
        Err(e) => Err(e.into()),
    }
}

/// 2. 상품 등록
pub async fn handle_create_listing(
    cmd: CreateListingCommand,
    actor: &User,
    db_manager: &DatabaseManager,
) -> Result<Listing, ServiceError> {
    info!(
        "{:<12} --> 상품 등록 처리 시작: {:?} (owner: {})",
        "Command", cmd, actor.username
    );

    let listing = sqlx::query_as::<_, Listing>(
        "INSERT INTO listings (title, description, starting_price, image_url, category, is_active, owner_id, created_at)
         VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7)
         RETURNING id, title, description, starting_price, image_url, category, is_active, owner_id, created_at",
    )
    .bind(&cmd.title)
    .bind(&cmd.description)
    .bind(cmd.starting_price)
    .bind(&cmd.image_url)
    .bind(&cmd.category)
    .bind(actor.id)
    .bind(Utc::now())
    .fetch_one(db_manager.pool())
    .await?;

    Ok(listing)
}

/// 3. 입찰
pub async fn handle_place_bid(
    listing_id: i64,
    cmd: PlaceBidCommand,
    actor: &User,
    db_manager: &DatabaseManager,
) -> Result<Bid, ServiceError> {
    info!(
        "{:<12} --> 입찰 처리 시작 id: {} amount: {} (bidder: {})",
        "Command", listing_id, cmd.amount, actor.username
    );

    let listing = handlers::get_listing(db_manager, listing_id).await?;
    if !listing.is_active {
        return Err(ServiceError::ListingClosed);
    }

    // 현재 가격 조회 후 검증
    let highest_bid = handlers::get_highest_bid(db_manager, listing_id).await?;
    let current = resolve_current_price(&listing, highest_bid.as_ref());
    validate_bid_amount(cmd.amount, &current)?;

    // 검증과 저장 사이에 잠금은 없다. 같은 현재 가격을 읽은 두 입찰이
    // 모두 저장될 수 있으며, 순서는 저장소 트랜잭션 격리에 맡긴다.
    let bid = sqlx::query_as::<_, Bid>(
        "INSERT INTO bids (listing_id, bidder_id, amount, bid_time)
         VALUES ($1, $2, $3, $4)
         RETURNING id, listing_id, bidder_id, amount, bid_time",
    )
    .bind(listing_id)
    .bind(actor.id)
    .bind(cmd.amount)
    .bind(Utc::now())
    .fetch_one(db_manager.pool())
    .await?;

    info!(
        "{:<12} --> 입찰 성공 id: {} 현재 가격: {}",
        "Command", listing_id, bid.amount
    );
    Ok(bid)
}

/// 4. 관심 등록 토글
/// 등록되어 있으면 해제, 없으면 등록. 등록 여부를 돌려준다.
pub async fn handle_toggle_watch(
    listing_id: i64,
    actor: &User,
    db_manager: &DatabaseManager,
) -> Result<bool, ServiceError> {
    info!(
        "{:<12} --> 관심 등록 토글 id: {} (user: {})",
        "Command", listing_id, actor.username
    );

    // 상품 존재 확인
    handlers::get_listing(db_manager, listing_id).await?;

    let mut tx = db_manager.pool().begin().await?;

    let deleted = sqlx::query("DELETE FROM watchlist WHERE listing_id = $1 AND user_id = $2")
        .bind(listing_id)
        .bind(actor.id)
        .execute(&mut *tx)
        .await?;

    let watching = if deleted.rows_affected() == 0 {
        sqlx::query(
            "INSERT INTO watchlist (listing_id, user_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(listing_id)
        .bind(actor.id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        true
    } else {
        false
    };

    tx.commit().await?;
    Ok(watching)
}

/// 5. 경매 종료
/// 판매자만 종료할 수 있고, 종료는 되돌릴 수 없다. 이미 종료된 경매는 그대로 둔다.
pub async fn handle_close_listing(
    listing_id: i64,
    actor: &User,
    db_manager: &DatabaseManager,
) -> Result<Listing, ServiceError> {
    info!(
        "{:<12} --> 경매 종료 처리 시작 id: {} (requester: {})",
        "Command", listing_id, actor.username
    );

    let listing = handlers::get_listing(db_manager, listing_id).await?;
    authorize_close(&listing, actor.id)?;

    if !listing.is_active {
        info!("{:<12} --> 이미 종료된 경매 id: {}", "Command", listing_id);
        return Ok(listing);
    }

    let closed = sqlx::query_as::<_, Listing>(
        "UPDATE listings SET is_active = FALSE
         WHERE id = $1
         RETURNING id, title, description, starting_price, image_url, category, is_active, owner_id, created_at",
    )
    .bind(listing_id)
    .fetch_one(db_manager.pool())
    .await?;

    info!("{:<12} --> 경매 종료 완료 id: {}", "Command", listing_id);
    Ok(closed)
}

/// 6. 댓글 작성
pub async fn handle_add_comment(
    listing_id: i64,
    cmd: AddCommentCommand,
    actor: &User,
    db_manager: &DatabaseManager,
) -> Result<Comment, ServiceError> {
    info!(
        "{:<12} --> 댓글 작성 처리 시작 id: {} (author: {})",
        "Command", listing_id, actor.username
    );

    // 상품 존재 확인
    handlers::get_listing(db_manager, listing_id).await?;

    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (listing_id, author_id, content, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, listing_id, author_id, content, created_at",
    )
    .bind(listing_id)
    .bind(actor.id)
    .bind(&cmd.content)
    .bind(Utc::now())
    .fetch_one(db_manager.pool())
    .await?;

    Ok(comment)
}

// endregion: --- Command Handlers

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// 테스트용 상품 생성
    fn test_listing(starting_price: Decimal, owner_id: i64) -> Listing {
        Listing {
            id: 1,
            title: "만년필".to_string(),
            description: "거의 새 제품입니다.".to_string(),
            starting_price,
            image_url: None,
            category: "문구".to_string(),
            is_active: true,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// 테스트용 입찰 생성
    fn test_bid(id: i64, bidder_id: i64, amount: Decimal) -> Bid {
        Bid {
            id,
            listing_id: 1,
            bidder_id,
            amount,
            bid_time: Utc::now(),
        }
    }

    #[test]
    fn test_current_price_without_bids() {
        let listing = test_listing(dec!(10.00), 1);

        let current = resolve_current_price(&listing, None);

        assert_eq!(current.amount, dec!(10.00));
        assert_eq!(current.winner_id, None);
    }

    #[test]
    fn test_current_price_is_highest_bid() {
        let listing = test_listing(dec!(5.00), 1);
        let mut bids = vec![
            test_bid(1, 10, dec!(10.00)),
            test_bid(2, 20, dec!(15.00)),
            test_bid(3, 30, dec!(12.00)),
        ];
        // 저장소와 같은 순서: 금액 내림차순의 첫 행
        bids.sort_by(|a, b| b.amount.cmp(&a.amount));

        let current = resolve_current_price(&listing, bids.first());

        assert_eq!(current.amount, dec!(15.00));
        assert_eq!(current.winner_id, Some(20));
    }

    #[test]
    fn test_bid_must_exceed_current_price() {
        let current = CurrentPrice {
            amount: dec!(15.00),
            winner_id: Some(20),
        };

        // 현재 가격과 같은 금액은 거절
        let err = validate_bid_amount(dec!(15.00), &current).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::BidTooLow {
                current_price
            } if current_price == dec!(15.00)
        ));

        // 낮은 금액도 거절
        assert!(validate_bid_amount(dec!(14.99), &current).is_err());

        // 1센트라도 높으면 허용
        assert!(validate_bid_amount(dec!(15.01), &current).is_ok());
    }

    #[test]
    fn test_only_owner_may_close() {
        let listing = test_listing(dec!(10.00), 7);

        let err = authorize_close(&listing, 8).unwrap_err();
        assert!(matches!(err, ServiceError::NotOwner));

        assert!(authorize_close(&listing, 7).is_ok());
    }
}

// endregion: --- Tests
