use std::sync::Arc;

use adapter::database::Database;
use adapter::repository::{
    assistant::AssistantRepositoryImpl, booking::BookingRepositoryImpl,
    health::HealthCheckRepositoryImpl, ledger::LedgerRepositoryImpl,
    location::LocationRepositoryImpl, report::ReportRepositoryImpl, user::UserRepositoryImpl,
};
use kernel::repository::{
    assistant::AssistantRepository, booking::BookingRepository, health::HealthCheckRepository,
    ledger::LedgerRepository, location::LocationRepository, report::ReportRepository,
    user::UserRepository,
};
use shared::{
    config::{AppConfig, LedgerConfig},
    error::AppResult,
};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    location_repository: Arc<dyn LocationRepository>,
    user_repository: Arc<dyn UserRepository>,
    ledger_repository: Arc<dyn LedgerRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    report_repository: Arc<dyn ReportRepository>,
    assistant_repository: Arc<dyn AssistantRepository>,
    ledger_config: Arc<LedgerConfig>,
}

impl AppRegistry {
    pub fn new(db: Database, app_config: &AppConfig) -> AppResult<Self> {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(db.clone()));
        let location_repository = Arc::new(LocationRepositoryImpl::new(db.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(db.clone()));
        let ledger_repository = Arc::new(LedgerRepositoryImpl::new(db.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(db.clone()));
        let report_repository = Arc::new(ReportRepositoryImpl::new(db.clone()));
        let assistant_repository =
            Arc::new(AssistantRepositoryImpl::new(app_config.assistant.clone())?);
        Ok(Self {
            health_check_repository,
            location_repository,
            user_repository,
            ledger_repository,
            booking_repository,
            report_repository,
            assistant_repository,
            ledger_config: Arc::new(db.config().clone()),
        })
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn location_repository(&self) -> Arc<dyn LocationRepository> {
        self.location_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn ledger_repository(&self) -> Arc<dyn LedgerRepository> {
        self.ledger_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn report_repository(&self) -> Arc<dyn ReportRepository> {
        self.report_repository.clone()
    }

    pub fn assistant_repository(&self) -> Arc<dyn AssistantRepository> {
        self.assistant_repository.clone()
    }

    pub fn ledger_config(&self) -> &LedgerConfig {
        &self.ledger_config
    }
}
