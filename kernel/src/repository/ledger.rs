use crate::model::{
    booking::{Booking, DayDetails},
    calendar::YearMonth,
    change::LedgerChange,
    day_status::{DayStatus, MonthlyStatus},
    id::LocationId,
    waitlist::WaitlistEntry,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;
use tokio::sync::broadcast;

/// Read side of the capacity ledger. Every call observes a consistent
/// snapshot of each (location, date) it touches.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn confirmed_count(&self, location_id: LocationId, date: NaiveDate)
        -> AppResult<usize>;
    async fn waitlist_count(&self, location_id: LocationId, date: NaiveDate) -> AppResult<usize>;
    async fn day_status(&self, location_id: LocationId, date: NaiveDate) -> AppResult<DayStatus>;
    // 月の全日について DayStatus を返す（祝日の扱いは呼び出し側の責務）
    async fn monthly_status(
        &self,
        location_id: LocationId,
        month: YearMonth,
    ) -> AppResult<MonthlyStatus>;
    async fn day_details(&self, location_id: LocationId, date: NaiveDate)
        -> AppResult<DayDetails>;
    // timestamp の昇順（繰り上げ順）
    async fn waitlist(
        &self,
        location_id: LocationId,
        date: NaiveDate,
    ) -> AppResult<Vec<WaitlistEntry>>;
    // キャンセル済みを含む、全拠点の当月分
    async fn bookings_in_month(&self, month: YearMonth) -> AppResult<Vec<Booking>>;
    fn subscribe(&self) -> broadcast::Receiver<LedgerChange>;
}
