use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use kernel::model::{id::UserId, user::User};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub const USER_ID_HEADER: &str = "x-user-id";

pub struct AuthorizedUser {
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::ForbiddenOperation)
        }
    }
}

// X-User-Id ヘッダーからログイン済みユーザーを引く
#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let user_id: UserId = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::UnauthenticatedError)?
            .parse()
            .map_err(|_| AppError::UnauthenticatedError)?;

        registry
            .user_repository()
            .find_by_id(user_id)
            .await?
            .map(|user| Self { user })
            .ok_or(AppError::UnauthenticatedError)
    }
}
