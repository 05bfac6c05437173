use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("email or role did not match any user")]
    InvalidCredentials,
    #[error("week starting {week_start}: at least {required} days must be booked, {selected} selected")]
    WeeklyMinimumViolation {
        week_start: NaiveDate,
        selected: usize,
        required: usize,
    },
    #[error("user {user_id} is not on the waitlist for {date}")]
    NotOnWaitlist { user_id: Uuid, date: NaiveDate },
    #[error("user {user_id} already holds a booking for {date}")]
    AlreadyBooked { user_id: Uuid, date: NaiveDate },
    #[error("no desks left on {0}")]
    CapacityExhausted(NaiveDate),
    #[error("the waitlist for {0} is full")]
    WaitlistFull(NaiveDate),
    #[error("{0} is a weekend or public holiday")]
    NonWorkingDay(NaiveDate),
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error("missing required column: {0}")]
    MissingRequiredColumn(String),
    #[error("{0}")]
    ExternalServiceError(String),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("a known user id is required in the x-user-id header")]
    UnauthenticatedError,
    #[error("this operation requires the admin role")]
    ForbiddenOperation,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::UnprocessableEntity(_) => "UnprocessableEntity",
            AppError::EntityNotFound(_) => "EntityNotFound",
            AppError::ValidationError(_) => "ValidationError",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::WeeklyMinimumViolation { .. } => "WeeklyMinimumViolation",
            AppError::NotOnWaitlist { .. } => "NotOnWaitlist",
            AppError::AlreadyBooked { .. } => "AlreadyBooked",
            AppError::CapacityExhausted(_) => "CapacityExhausted",
            AppError::WaitlistFull(_) => "WaitlistFull",
            AppError::NonWorkingDay(_) => "NonWorkingDay",
            AppError::UnknownLocation(_) => "UnknownLocation",
            AppError::DuplicateEmail(_) => "DuplicateEmail",
            AppError::MissingRequiredColumn(_) => "MissingRequiredColumn",
            AppError::ExternalServiceError(_) => "ExternalServiceError",
            AppError::ConversionEntityError(_) => "ConversionEntityError",
            AppError::UnauthenticatedError => "Unauthenticated",
            AppError::ForbiddenOperation => "Forbidden",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnprocessableEntity(_)
            | AppError::WeeklyMinimumViolation { .. }
            | AppError::NonWorkingDay(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_)
            | AppError::NotOnWaitlist { .. }
            | AppError::UnknownLocation(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_)
            | AppError::MissingRequiredColumn(_)
            | AppError::ConversionEntityError(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyBooked { .. }
            | AppError::CapacityExhausted(_)
            | AppError::WaitlistFull(_)
            | AppError::DuplicateEmail(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::UnauthenticatedError => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if matches!(self, AppError::ExternalServiceError(_)) {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status_code, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_violation_names_the_week_start() {
        let err = AppError::WeeklyMinimumViolation {
            week_start: NaiveDate::from_ymd_opt(2026, 11, 9).unwrap(),
            selected: 1,
            required: 3,
        };
        assert!(err.to_string().contains("2026-11-09"));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflicts_map_to_409() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        assert_eq!(
            AppError::CapacityExhausted(date).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotOnWaitlist {
                user_id: Uuid::nil(),
                date
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::InvalidCredentials.kind(), "InvalidCredentials");
    }

    #[test]
    fn auth_failure_messages_are_plain_ascii() {
        for err in [AppError::UnauthenticatedError, AppError::ForbiddenOperation] {
            let message = err.to_string();
            assert!(message.is_ascii(), "{message}");
        }
        assert!(AppError::UnauthenticatedError
            .to_string()
            .contains("x-user-id"));
        assert_eq!(
            AppError::ForbiddenOperation.status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
