/// 사용자 이름으로 조회
pub const GET_USER_BY_NAME: &str =
    "SELECT id, username, email, created_at FROM users WHERE username = $1";

/// 상품 조회
pub const GET_LISTING: &str =
    "SELECT id, title, description, starting_price, image_url, category, is_active, owner_id, created_at FROM listings WHERE id = $1";

/// 진행 중인 상품 조회
pub const GET_ACTIVE_LISTINGS: &str =
    "SELECT id, title, description, starting_price, image_url, category, is_active, owner_id, created_at FROM listings WHERE is_active = TRUE ORDER BY created_at DESC";

/// 모든 상품 조회 (종료된 경매 포함)
pub const GET_ALL_LISTINGS: &str =
    "SELECT id, title, description, starting_price, image_url, category, is_active, owner_id, created_at FROM listings ORDER BY created_at DESC";

/// 입찰 이력 조회 (금액 내림차순)
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, bid_time
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC
"#;

/// 최고 입찰 조회
/// 금액이 같은 행이 외부 경로로 생겼다면 저장소가 먼저 돌려주는 행을 쓴다
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, listing_id, bidder_id, amount, bid_time
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC
    LIMIT 1
"#;

/// 댓글 조회 (최신순)
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, content, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at DESC
"#;

/// 관심 목록 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_price, l.image_url, l.category, l.is_active, l.owner_id, l.created_at
    FROM listings l
    JOIN watchlist w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY w.created_at DESC
"#;
