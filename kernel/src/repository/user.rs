use crate::model::{
    id::{LocationId, UserId},
    role::Role,
    user::{
        event::{CreateUser, ImportUsers},
        ImportSummary, User,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<User>>;
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_location(&self, location_id: LocationId) -> AppResult<Vec<User>>;
    // (email, role) の組でユーザーを引く。一致しなければ InvalidCredentials
    async fn find_by_credentials(&self, email: &str, role: Role) -> AppResult<User>;
    async fn create(&self, event: CreateUser) -> AppResult<UserId>;
    // 行単位で取り込み、不正な行はスキップして結果に記録する
    async fn import(&self, event: ImportUsers) -> AppResult<ImportSummary>;
}
