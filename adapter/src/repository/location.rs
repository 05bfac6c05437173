use crate::database::Database;
use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{id::LocationId, location::Location},
    repository::location::LocationRepository,
};
use shared::error::AppResult;

#[derive(new)]
pub struct LocationRepositoryImpl {
    db: Database,
}

#[async_trait]
impl LocationRepository for LocationRepositoryImpl {
    async fn find_all(&self) -> AppResult<Vec<Location>> {
        Ok(self.db.locations())
    }

    async fn find_by_id(&self, location_id: LocationId) -> AppResult<Option<Location>> {
        Ok(self.db.location(location_id))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Location>> {
        Ok(self.db.location_by_name(name))
    }
}
