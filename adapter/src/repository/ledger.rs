use crate::database::Database;
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::{
    model::{
        booking::{Booking, DayDetails},
        calendar::YearMonth,
        change::LedgerChange,
        day_status::{DayStatus, MonthlyStatus},
        id::{LocationId, UserId},
        location::Location,
        user::User,
        waitlist::{fifo_order, WaitlistEntry},
    },
    repository::ledger::LedgerRepository,
};
use shared::error::{AppError, AppResult};
use tokio::sync::broadcast;

#[derive(new)]
pub struct LedgerRepositoryImpl {
    db: Database,
}

impl LedgerRepositoryImpl {
    fn location(&self, location_id: LocationId) -> AppResult<Location> {
        self.db
            .location(location_id)
            .ok_or_else(|| AppError::UnknownLocation(location_id.to_string()))
    }

    fn users(&self, ids: &[UserId]) -> Vec<User> {
        self.db.read_users(|users| {
            ids.iter()
                .filter_map(|id| users.get(*id).map(User::from))
                .collect()
        })
    }
}

#[async_trait]
impl LedgerRepository for LedgerRepositoryImpl {
    async fn confirmed_count(
        &self,
        location_id: LocationId,
        date: NaiveDate,
    ) -> AppResult<usize> {
        Ok(self.day_status(location_id, date).await?.bookings)
    }

    async fn waitlist_count(&self, location_id: LocationId, date: NaiveDate) -> AppResult<usize> {
        Ok(self.day_status(location_id, date).await?.waitlist)
    }

    async fn day_status(&self, location_id: LocationId, date: NaiveDate) -> AppResult<DayStatus> {
        let location = self.location(location_id)?;
        Ok(self.db.day_status(&location, date).await)
    }

    async fn monthly_status(
        &self,
        location_id: LocationId,
        month: YearMonth,
    ) -> AppResult<MonthlyStatus> {
        let location = self.location(location_id)?;
        let mut status = MonthlyStatus::new();
        for date in month.days() {
            status.insert(date, self.db.day_status(&location, date).await);
        }
        Ok(status)
    }

    async fn day_details(
        &self,
        location_id: LocationId,
        date: NaiveDate,
    ) -> AppResult<DayDetails> {
        self.location(location_id)?;
        // 両方の一覧を同じロックの中で読む
        let (booked, waitlisted) = match self.db.begin_existing(location_id, date).await {
            None => (Vec::new(), Vec::new()),
            Some(tx) => {
                let booked: Vec<UserId> = tx
                    .bookings
                    .iter()
                    .filter(|b| b.is_confirmed())
                    .map(|b| b.user_id)
                    .collect();
                let mut queue: Vec<WaitlistEntry> =
                    tx.waitlist.iter().cloned().map(WaitlistEntry::from).collect();
                fifo_order(&mut queue);
                (booked, queue.into_iter().map(|w| w.user_id).collect())
            }
        };
        Ok(DayDetails {
            location_id,
            date,
            booked_users: self.users(&booked),
            waitlisted_users: self.users(&waitlisted),
        })
    }

    async fn waitlist(
        &self,
        location_id: LocationId,
        date: NaiveDate,
    ) -> AppResult<Vec<WaitlistEntry>> {
        self.location(location_id)?;
        let mut queue: Vec<WaitlistEntry> = match self.db.begin_existing(location_id, date).await {
            Some(tx) => tx.waitlist.iter().cloned().map(WaitlistEntry::from).collect(),
            None => Vec::new(),
        };
        fifo_order(&mut queue);
        Ok(queue)
    }

    async fn bookings_in_month(&self, month: YearMonth) -> AppResult<Vec<Booking>> {
        Ok(self
            .db
            .bookings_in(month)
            .await
            .into_iter()
            .map(Booking::from)
            .collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<LedgerChange> {
        self.db.subscribe()
    }
}
