use crate::model::{
    booking::{
        event::{CancelBooking, ConfirmFromWaitlist, JoinWaitlist, PromoteNext, SubmitBooking},
        Booking, SubmitOutcome,
    },
    waitlist::WaitlistEntry,
};
use async_trait::async_trait;
use shared::error::AppResult;

/// Write side of the capacity ledger: the only component that creates
/// bookings and waitlist entries.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    // 週ごとの最低日数を満たさない場合はどの日付も書き込まない
    async fn submit(&self, event: SubmitBooking) -> AppResult<SubmitOutcome>;
    // 既に並んでいれば既存のエントリを返す
    async fn join_waitlist(&self, event: JoinWaitlist) -> AppResult<WaitlistEntry>;
    async fn confirm_from_waitlist(&self, event: ConfirmFromWaitlist) -> AppResult<Booking>;
    // 先頭のエントリを確定させる。空なら None
    async fn promote_next(&self, event: PromoteNext) -> AppResult<Option<Booking>>;
    async fn cancel(&self, event: CancelBooking) -> AppResult<Booking>;
}
