use crate::database::Database;
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::{
    model::{
        calendar::YearMonth,
        id::UserId,
        report::{representative_day, ComplianceEntry, DashboardStats, DayCounts, LocationCounts},
        role::Role,
        user::User,
    },
    repository::report::ReportRepository,
};
use shared::error::AppResult;
use std::collections::HashMap;

#[derive(new)]
pub struct ReportRepositoryImpl {
    db: Database,
}

#[async_trait]
impl ReportRepository for ReportRepositoryImpl {
    async fn compliance_report(
        &self,
        month: YearMonth,
        threshold: usize,
    ) -> AppResult<Vec<ComplianceEntry>> {
        let mut counts: HashMap<UserId, usize> = HashMap::new();
        for row in self.db.bookings_in(month).await {
            if row.is_confirmed() {
                *counts.entry(row.user_id).or_default() += 1;
            }
        }

        let mut associates: Vec<User> = self.db.read_users(|users| {
            users
                .iter()
                .filter(|u| u.role == Role::Associate)
                .map(User::from)
                .collect()
        });
        associates.sort_by(|a, b| {
            a.employee_code
                .cmp(&b.employee_code)
                .then(a.user_id.cmp(&b.user_id))
        });

        Ok(associates
            .into_iter()
            .filter_map(|user| {
                let booking_count = counts.get(&user.user_id).copied().unwrap_or(0);
                (booking_count < threshold).then_some(ComplianceEntry {
                    user,
                    booking_count,
                })
            })
            .collect())
    }

    async fn dashboard_stats(&self, today: NaiveDate) -> AppResult<DashboardStats> {
        let day = representative_day(today)?;
        let month_rows = self.db.bookings_in(YearMonth::of(day)).await;

        let mut total = DayCounts::default();
        let mut locations = Vec::new();
        for location in self.db.locations() {
            // 代表日の件数は 1 つのガードの中で数える（繰り上げ途中を見せない）
            let mut counts = match self.db.begin_existing(location.location_id, day).await {
                Some(tx) => {
                    let cancelled = tx.bookings.iter().filter(|r| !r.is_confirmed()).count();
                    DayCounts {
                        booked: tx.confirmed_count(),
                        waitlisted: tx.waitlist.len(),
                        cancelled_today: cancelled,
                        cancelled_this_month: cancelled,
                    }
                }
                None => DayCounts::default(),
            };
            counts.cancelled_this_month += month_rows
                .iter()
                .filter(|r| {
                    r.location_id == location.location_id && r.date != day && !r.is_confirmed()
                })
                .count();
            total += counts;
            locations.push(LocationCounts {
                location_id: location.location_id,
                location_name: location.location_name,
                counts,
            });
        }

        Ok(DashboardStats {
            representative_day: day,
            total,
            locations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{booking::BookingRepositoryImpl, fixture};
    use kernel::{
        model::{
            booking::event::{CancelBooking, JoinWaitlist, PromoteNext, SubmitBooking},
            id::BookingId,
        },
        repository::booking::BookingRepository,
    };
    use shared::config::AdmissionPolicy;
    use std::collections::BTreeSet;

    // 2026-11 の平日を n 日分（週 3 日以上になるよう前から詰める）
    fn november_weekdays(n: usize) -> BTreeSet<NaiveDate> {
        YearMonth::of(fixture::date(11, 1))
            .days()
            .filter(|d| !kernel::model::calendar::is_weekend(*d))
            .take(n)
            .collect()
    }

    #[tokio::test]
    async fn nine_bookings_are_non_compliant_ten_are_not() -> anyhow::Result<()> {
        let db = fixture::database(10, 20, AdmissionPolicy::Strict);
        let nine = fixture::associate(&db, "E002", "Chennai").await;
        let ten = fixture::associate(&db, "E001", "Chennai").await;
        let none = fixture::associate(&db, "E003", "Pune").await;
        let admin = fixture::user(&db, "A001", "Chennai", Role::Admin).await;
        let booking = BookingRepositoryImpl::new(db.clone());

        // 11/2〜11/13 の平日 10 日（2 週分）、9 日目で切ると第 2 週が 4 日
        booking
            .submit(SubmitBooking::new(ten, november_weekdays(10)))
            .await?;
        booking
            .submit(SubmitBooking::new(nine, november_weekdays(9)))
            .await?;
        booking
            .submit(SubmitBooking::new(admin, november_weekdays(5)))
            .await?;

        let report = ReportRepositoryImpl::new(db.clone())
            .compliance_report(YearMonth::new(2026, 11)?, 10)
            .await?;
        let rows: Vec<_> = report
            .iter()
            .map(|e| (e.user.user_id, e.booking_count))
            .collect();
        assert_eq!(rows, vec![(nine, 9), (none, 0)]);
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_count_towards_compliance() -> anyhow::Result<()> {
        let db = fixture::database(10, 20, AdmissionPolicy::Strict);
        let user = fixture::associate(&db, "E001", "Chennai").await;
        let booking = BookingRepositoryImpl::new(db.clone());
        booking
            .submit(SubmitBooking::new(user, november_weekdays(10)))
            .await?;
        booking.cancel(CancelBooking::new(BookingId::new(1))).await?;

        let report = ReportRepositoryImpl::new(db)
            .compliance_report(YearMonth::new(2026, 11)?, 10)
            .await?;
        assert_eq!(report[0].booking_count, 9);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dashboard_never_sees_a_half_done_promotion() -> anyhow::Result<()> {
        let db = fixture::database(1, 20, AdmissionPolicy::Strict);
        let a = fixture::associate(&db, "A", "Chennai").await;
        let b = fixture::associate(&db, "B", "Chennai").await;
        let booking = BookingRepositoryImpl::new(db.clone());
        let chennai = fixture::location(&db, "Chennai");
        let day = fixture::date(11, 2);

        let first_week: BTreeSet<_> = [day, fixture::date(11, 3), fixture::date(11, 4)]
            .into_iter()
            .collect();
        booking.submit(SubmitBooking::new(a, first_week)).await?;
        booking.join_waitlist(JoinWaitlist::new(b, day)).await?;
        booking.cancel(CancelBooking::new(BookingId::new(1))).await?;

        // 11/3 を押さえて、月の走査を代表日の読み取りより前で止めておく
        let held = db.begin(chennai.location_id, fixture::date(11, 3)).await;
        let reader = tokio::spawn({
            let db = db.clone();
            async move {
                ReportRepositoryImpl::new(db)
                    .dashboard_stats(fixture::date(10, 19))
                    .await
            }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let promoted = booking
            .promote_next(PromoteNext::new(chennai.location_id, day))
            .await?;
        assert_eq!(promoted.map(|p| p.user_id), Some(b));
        drop(held);

        let stats = reader.await??;
        let counts = &stats.locations[0].counts;
        assert_eq!(stats.locations[0].location_name, "Chennai");
        assert_eq!(counts.booked + counts.waitlisted, 1);
        assert_eq!(
            *counts,
            DayCounts {
                booked: 1,
                waitlisted: 0,
                cancelled_today: 1,
                cancelled_this_month: 1
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_counts_the_representative_day() -> anyhow::Result<()> {
        let db = fixture::database(1, 20, AdmissionPolicy::Strict);
        let a = fixture::associate(&db, "A", "Chennai").await;
        let b = fixture::associate(&db, "B", "Chennai").await;
        let c = fixture::associate(&db, "C", "Pune").await;
        let booking = BookingRepositoryImpl::new(db.clone());

        // 2026-10-19 から見た代表日は 2026-11-02(月)
        let day = fixture::date(11, 2);
        let first_week: BTreeSet<_> = [day, fixture::date(11, 3), fixture::date(11, 4)]
            .into_iter()
            .collect();
        booking
            .submit(SubmitBooking::new(a, first_week.clone()))
            .await?;
        booking.join_waitlist(JoinWaitlist::new(b, day)).await?;
        booking.submit(SubmitBooking::new(c, first_week)).await?;
        // c の 11/2 と 11/3 をキャンセル
        booking.cancel(CancelBooking::new(BookingId::new(4))).await?;
        booking.cancel(CancelBooking::new(BookingId::new(5))).await?;

        let stats = ReportRepositoryImpl::new(db)
            .dashboard_stats(fixture::date(10, 19))
            .await?;
        assert_eq!(stats.representative_day, day);
        assert_eq!(stats.locations[0].location_name, "Chennai");
        assert_eq!(
            stats.locations[0].counts,
            DayCounts {
                booked: 1,
                waitlisted: 1,
                cancelled_today: 0,
                cancelled_this_month: 0
            }
        );
        assert_eq!(
            stats.locations[1].counts,
            DayCounts {
                booked: 0,
                waitlisted: 0,
                cancelled_today: 1,
                cancelled_this_month: 2
            }
        );
        assert_eq!(stats.total.booked, 1);
        assert_eq!(stats.total.cancelled_this_month, 2);
        Ok(())
    }
}
