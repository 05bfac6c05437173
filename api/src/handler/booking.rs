use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    booking::event::{CancelBooking, ConfirmFromWaitlist, JoinWaitlist, SubmitBooking},
    calendar::first_non_working_day,
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};
use std::collections::BTreeSet;

use crate::{
    extractor::AuthorizedUser,
    model::booking::{
        BookingResponse, ConfirmWaitlistRequest, SubmitBookingRequest, SubmitBookingResponse,
        WaitlistEntryResponse, WaitlistRequest,
    },
};

// アソシエイトは土日・祝日を選べない
fn ensure_working_days(user: &AuthorizedUser, dates: &BTreeSet<NaiveDate>) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    match first_non_working_day(dates) {
        Some(date) => Err(AppError::NonWorkingDay(date)),
        None => Ok(()),
    }
}

pub async fn submit_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<SubmitBookingRequest>,
) -> AppResult<Json<SubmitBookingResponse>> {
    req.validate(&())?;

    let dates: BTreeSet<NaiveDate> = req.dates.into_iter().collect();
    ensure_working_days(&user, &dates)?;

    registry
        .booking_repository()
        .submit(SubmitBooking::new(user.id(), dates))
        .await
        .map(SubmitBookingResponse::from)
        .map(Json)
}

pub async fn cancel_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    user.require_admin()?;

    registry
        .booking_repository()
        .cancel(CancelBooking::new(booking_id))
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn join_waitlist(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<WaitlistRequest>,
) -> AppResult<(StatusCode, Json<WaitlistEntryResponse>)> {
    ensure_working_days(&user, &BTreeSet::from([req.date]))?;

    let entry = registry
        .booking_repository()
        .join_waitlist(JoinWaitlist::new(user.id(), req.date))
        .await?;
    let position = registry
        .ledger_repository()
        .waitlist(entry.location_id, entry.date)
        .await?
        .iter()
        .position(|e| e.entry_id == entry.entry_id)
        .map(|idx| idx + 1);

    Ok((
        StatusCode::CREATED,
        Json(WaitlistEntryResponse::new(entry, position)),
    ))
}

pub async fn confirm_from_waitlist(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<ConfirmWaitlistRequest>,
) -> AppResult<Json<BookingResponse>> {
    let target = match req.user_id {
        Some(other) if other != user.id() => {
            user.require_admin()?;
            other
        }
        _ => user.id(),
    };

    registry
        .booking_repository()
        .confirm_from_waitlist(ConfirmFromWaitlist::new(target, req.date))
        .await
        .map(BookingResponse::from)
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter::database::connect_database_with;
    use kernel::model::{role::Role, user::event::CreateUser};
    use shared::config::AppConfig;

    async fn setup() -> anyhow::Result<(AppRegistry, AuthorizedUser, AuthorizedUser)> {
        let config = AppConfig::from_lookup(|key| match key {
            "OFFICE_LOCATIONS" => Some("Chennai:2".into()),
            _ => None,
        })?;
        let registry = AppRegistry::new(connect_database_with(&config.ledger), &config)?;
        let mut users = Vec::new();
        for (code, role) in [("E1", Role::Associate), ("A1", Role::Admin)] {
            let users_repo = registry.user_repository();
            let user_id = users_repo
                .create(CreateUser::new(
                    code.into(),
                    code.into(),
                    format!("{}@example.com", code.to_lowercase()),
                    role,
                    "Chennai".into(),
                    None,
                ))
                .await?;
            let user = users_repo.find_by_id(user_id).await?.unwrap();
            users.push(AuthorizedUser { user });
        }
        let admin = users.pop().unwrap();
        let associate = users.pop().unwrap();
        Ok((registry, associate, admin))
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    #[tokio::test]
    async fn associates_cannot_pick_weekends_or_holidays() -> anyhow::Result<()> {
        let (registry, associate, admin) = setup().await?;

        // 2026-12-05 は土曜日
        let weekend = NaiveDate::from_ymd_opt(2026, 12, 5).unwrap();
        let err = submit_booking(
            associate,
            State(registry.clone()),
            Json(SubmitBookingRequest {
                dates: vec![date(30), weekend],
            }),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, AppError::NonWorkingDay(d) if d == weekend));

        let Json(res) = submit_booking(
            admin,
            State(registry),
            Json(SubmitBookingRequest {
                dates: vec![weekend],
            }),
        )
        .await?;
        assert_eq!(res.booked_dates, vec![weekend]);
        Ok(())
    }

    #[tokio::test]
    async fn an_empty_selection_fails_validation() -> anyhow::Result<()> {
        let (registry, associate, _) = setup().await?;
        let err = submit_booking(
            associate,
            State(registry),
            Json(SubmitBookingRequest { dates: vec![] }),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, AppError::ValidationError(_)));
        Ok(())
    }

    #[tokio::test]
    async fn only_admins_confirm_for_someone_else() -> anyhow::Result<()> {
        let (registry, associate, admin) = setup().await?;
        let associate_id = associate.id();

        let (status, Json(entry)) = join_waitlist(
            associate,
            State(registry.clone()),
            Json(WaitlistRequest { date: date(30) }),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry.position, Some(1));

        let admin_id = admin.id();
        let err = confirm_from_waitlist(
            AuthorizedUser {
                user: registry
                    .user_repository()
                    .find_by_id(associate_id)
                    .await?
                    .unwrap(),
            },
            State(registry.clone()),
            Json(ConfirmWaitlistRequest {
                date: date(30),
                user_id: Some(admin_id),
            }),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, AppError::ForbiddenOperation));

        let Json(booking) = confirm_from_waitlist(
            admin,
            State(registry),
            Json(ConfirmWaitlistRequest {
                date: date(30),
                user_id: Some(associate_id),
            }),
        )
        .await?;
        assert_eq!(booking.user_id, associate_id);
        Ok(())
    }
}
