// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Service Error

/// 도메인 오류 타입
/// 모두 호출자 경계에서 복구 가능한 일회성 검증 결과다.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("상품을 찾을 수 없습니다.")]
    NotFound,

    #[error("입찰 금액이 현재 가격보다 높아야 합니다.")]
    BidTooLow { current_price: Decimal },

    #[error("판매자만 경매를 종료할 수 있습니다.")]
    NotOwner,

    #[error("이미 종료된 경매입니다.")]
    ListingClosed,

    #[error("이미 사용 중인 사용자 이름입니다.")]
    DuplicateUsername,

    #[error("로그인이 필요합니다.")]
    Unauthorized,

    #[error("데이터베이스 오류: {0}")]
    Db(sqlx::Error),
}

impl ServiceError {
    /// 응답 본문에 실리는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound => "NOT_FOUND",
            ServiceError::BidTooLow { .. } => "LOW_BID",
            ServiceError::NotOwner => "NOT_OWNER",
            ServiceError::ListingClosed => "ALREADY_CLOSED",
            ServiceError::DuplicateUsername => "DUPLICATE_USERNAME",
            ServiceError::Unauthorized => "UNAUTHORIZED",
            ServiceError::Db(_) => "DB_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::BidTooLow { .. } | ServiceError::ListingClosed => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotOwner => StatusCode::FORBIDDEN,
            ServiceError::DuplicateUsername => StatusCode::CONFLICT,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ServiceError::NotFound,
            e => ServiceError::Db(e),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = match &self {
            // 입찰 거절에는 비교 기준이 된 현재 가격을 함께 내려준다
            ServiceError::BidTooLow { current_price } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_price": current_price,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (self.status(), Json(body)).into_response()
    }
}

// endregion: --- Service Error
