use crate::database::{model::booking::WaitlistRow, Database, DayTransaction};
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::{
    model::{
        booking::{
            event::{CancelBooking, ConfirmFromWaitlist, JoinWaitlist, PromoteNext, SubmitBooking},
            Booking, BookingStatus, SubmitOutcome,
        },
        change::LedgerChange,
        day_status::DayStatus,
        id::UserId,
        location::Location,
        policy::{group_by_iso_week, week_days, WeeklyPolicy},
        user::User,
        waitlist::WaitlistEntry,
    },
    repository::booking::BookingRepository,
};
use shared::{
    config::AdmissionPolicy,
    error::{AppError, AppResult},
};
use std::collections::{BTreeMap, BTreeSet};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: Database,
}

impl BookingRepositoryImpl {
    fn user_and_location(&self, user_id: UserId) -> AppResult<(User, Location)> {
        let user = self
            .db
            .user(user_id)
            .ok_or_else(|| AppError::EntityNotFound(format!("user {user_id} was not found")))?;
        let location = self
            .db
            .location(user.location_id)
            .ok_or_else(|| AppError::UnknownLocation(user.location_id.to_string()))?;
        Ok((user, location))
    }

    // 定員到達時に確定させてよいか
    fn has_room(&self, tx: &DayTransaction, location: &Location) -> bool {
        match self.db.config().admission {
            AdmissionPolicy::Strict => tx.confirmed_count() < location.capacity as usize,
            AdmissionPolicy::Advisory => true,
        }
    }

    // 対象週の 7 日分すべての DayStatus
    async fn week_statuses(
        &self,
        location: &Location,
        dates: &BTreeSet<NaiveDate>,
    ) -> BTreeMap<NaiveDate, DayStatus> {
        let mut statuses = BTreeMap::new();
        for week in group_by_iso_week(dates).into_keys() {
            for day in week_days(week).into_iter().flatten() {
                statuses.insert(day, self.db.day_status(location, day).await);
            }
        }
        statuses
    }
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn submit(&self, event: SubmitBooking) -> AppResult<SubmitOutcome> {
        let (user, location) = self.user_and_location(event.user_id)?;
        if event.dates.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "select at least one date".into(),
            ));
        }

        // 検証に通らなければ 1 日も書き込まない
        let statuses = self.week_statuses(&location, &event.dates).await;
        WeeklyPolicy::new(self.db.config().weekly_minimum_days).validate(&event.dates, |d| {
            statuses.get(&d).copied().unwrap_or_default()
        })?;

        let mut outcome = SubmitOutcome::default();
        for date in event.dates {
            let mut tx = self.db.begin(location.location_id, date).await;
            if tx.confirmed_for(user.user_id).is_some() {
                outcome.already_booked_dates.push(date);
                continue;
            }
            if !self.has_room(&tx, &location) {
                outcome.full_dates.push(date);
                continue;
            }
            tx.remove_waitlist(user.user_id);
            let booking = self.db.new_booking(&mut tx, user.user_id);
            drop(tx);

            tracing::debug!(
                location_id = %location.location_id,
                %date,
                user_id = %user.user_id,
                booking_id = %booking.booking_id,
                "booking confirmed"
            );
            self.db.publish(LedgerChange::BookingConfirmed {
                location_id: location.location_id,
                date,
                user_id: user.user_id,
                booking_id: booking.booking_id,
            });
            outcome.booked_dates.push(date);
        }

        tracing::info!(
            user_id = %user.user_id,
            location = %location.location_name,
            booked = outcome.booked_dates.len(),
            already_booked = outcome.already_booked_dates.len(),
            full = outcome.full_dates.len(),
            "booking submitted"
        );
        Ok(outcome)
    }

    async fn join_waitlist(&self, event: JoinWaitlist) -> AppResult<WaitlistEntry> {
        let (user, location) = self.user_and_location(event.user_id)?;
        let mut tx = self.db.begin(location.location_id, event.date).await;

        if tx.confirmed_for(user.user_id).is_some() {
            return Err(AppError::AlreadyBooked {
                user_id: user.user_id.raw(),
                date: event.date,
            });
        }
        if let Some(existing) = tx.waitlist_entry(user.user_id) {
            return Ok(existing.clone().into());
        }
        if tx.waitlist.len() >= self.db.config().waitlist_cap {
            return Err(AppError::WaitlistFull(event.date));
        }

        // タイムスタンプは日単位のロックを持ったまま採番する
        let row = WaitlistRow {
            entry_id: self.db.next_entry_id(),
            user_id: user.user_id,
            location_id: location.location_id,
            date: event.date,
            timestamp: self.db.now(),
        };
        tx.waitlist.push(row.clone());
        drop(tx);

        tracing::debug!(
            location_id = %location.location_id,
            date = %event.date,
            user_id = %user.user_id,
            "waitlist joined"
        );
        self.db.publish(LedgerChange::WaitlistJoined {
            location_id: location.location_id,
            date: event.date,
            user_id: user.user_id,
        });
        Ok(row.into())
    }

    async fn confirm_from_waitlist(&self, event: ConfirmFromWaitlist) -> AppResult<Booking> {
        let (user, location) = self.user_and_location(event.user_id)?;
        let mut tx = self.db.begin(location.location_id, event.date).await;

        if tx.waitlist_entry(user.user_id).is_none() {
            return Err(AppError::NotOnWaitlist {
                user_id: user.user_id.raw(),
                date: event.date,
            });
        }
        if !self.has_room(&tx, &location) {
            return Err(AppError::CapacityExhausted(event.date));
        }
        tx.remove_waitlist(user.user_id);
        let booking = self.db.new_booking(&mut tx, user.user_id);
        drop(tx);

        self.db.publish(LedgerChange::WaitlistPromoted {
            location_id: location.location_id,
            date: event.date,
            user_id: user.user_id,
            booking_id: booking.booking_id,
        });
        tracing::info!(user_id = %user.user_id, date = %event.date, "waitlist entry confirmed");
        Ok(booking.into())
    }

    async fn promote_next(&self, event: PromoteNext) -> AppResult<Option<Booking>> {
        let location = self
            .db
            .location(event.location_id)
            .ok_or_else(|| AppError::UnknownLocation(event.location_id.to_string()))?;
        let mut tx = self.db.begin(location.location_id, event.date).await;

        if tx.waitlist.is_empty() {
            return Ok(None);
        }
        if !self.has_room(&tx, &location) {
            return Err(AppError::CapacityExhausted(event.date));
        }
        let Some(head) = tx.pop_front() else {
            return Ok(None);
        };
        let booking = self.db.new_booking(&mut tx, head.user_id);
        drop(tx);

        self.db.publish(LedgerChange::WaitlistPromoted {
            location_id: location.location_id,
            date: event.date,
            user_id: head.user_id,
            booking_id: booking.booking_id,
        });
        tracing::info!(user_id = %head.user_id, date = %event.date, "waitlist head promoted");
        Ok(Some(booking.into()))
    }

    async fn cancel(&self, event: CancelBooking) -> AppResult<Booking> {
        let not_found =
            || AppError::EntityNotFound(format!("booking {} was not found", event.booking_id));
        let (location_id, date) = self
            .db
            .booking_location(event.booking_id)
            .ok_or_else(not_found)?;
        let cancelled_at = self.db.now();
        let mut tx = self.db.begin(location_id, date).await;

        let row = tx.booking_mut(event.booking_id).ok_or_else(not_found)?;
        if row.status == BookingStatus::Cancelled {
            return Err(AppError::UnprocessableEntity(format!(
                "booking {} is already cancelled",
                event.booking_id
            )));
        }
        row.status = BookingStatus::Cancelled;
        row.cancelled_at = Some(cancelled_at);
        let row = row.clone();
        drop(tx);

        self.db.publish(LedgerChange::BookingCancelled {
            location_id,
            date,
            user_id: row.user_id,
            booking_id: row.booking_id,
        });
        tracing::info!(booking_id = %row.booking_id, "booking cancelled");
        Ok(row.into())
    }
}
