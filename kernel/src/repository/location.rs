use crate::model::{id::LocationId, location::Location};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    // 名前順で全拠点を返す
    async fn find_all(&self) -> AppResult<Vec<Location>>;
    async fn find_by_id(&self, location_id: LocationId) -> AppResult<Option<Location>>;
    // 大文字小文字を区別しない
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Location>>;
}
