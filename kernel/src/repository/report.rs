use crate::model::{
    calendar::YearMonth,
    report::{ComplianceEntry, DashboardStats},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    // 確定予約が threshold 未満のアソシエイト。社員コード順
    async fn compliance_report(
        &self,
        month: YearMonth,
        threshold: usize,
    ) -> AppResult<Vec<ComplianceEntry>>;
    async fn dashboard_stats(&self, today: NaiveDate) -> AppResult<DashboardStats>;
}
