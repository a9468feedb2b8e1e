// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::listing::model::User;
use crate::query;
use async_trait::async_trait;
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Identity Provider

/// 현재 사용자를 담는 요청 헤더
pub const USER_HEADER: &str = "x-username";

/// 인증 서비스 트레이트
/// 자격 증명 검증과 세션 발급은 별도의 인증 서비스 담당이라 가정
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 현재 인증된 사용자 또는 없음
    async fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>, ServiceError>;
}

/// 헤더 기반 구현체
/// 인증 서비스가 채워준 X-Username 헤더를 사용자 행으로 변환한다.
pub struct HeaderIdentityProvider {
    db_manager: Arc<DatabaseManager>,
}

impl HeaderIdentityProvider {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl IdentityProvider for HeaderIdentityProvider {
    async fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>, ServiceError> {
        let Some(username) = headers.get(USER_HEADER).and_then(|v| v.to_str().ok()) else {
            return Ok(None);
        };

        let user = query::handlers::get_user_by_name(&self.db_manager, username).await?;
        if user.is_none() {
            info!("{:<12} --> 알 수 없는 사용자: {}", "Auth", username);
        }
        Ok(user)
    }
}

// endregion: --- Identity Provider
