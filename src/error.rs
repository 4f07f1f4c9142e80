use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Coarse classification used by the boundary and by logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authorization,
    Conflict,
    Infrastructure,
}

#[derive(Error, Debug)]
pub enum AppError {
    // --- validation ---
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Seat count must be a positive integer")]
    InvalidSeatCount,

    #[error("Drivers cannot book their own trip")]
    CannotBookOwnTrip,

    // --- not found ---
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Trip not found")]
    TripNotFound,

    #[error("Passenger not found")]
    PassengerNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Plan not found")]
    PlanNotFound,

    // --- authorization ---
    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Administrator only")]
    AdminOnly,

    #[error("Driver is blocked")]
    DriverBlocked,

    #[error("Platform fee of {fee_due} is unpaid for today")]
    PaymentRequired { fee_due: i64 },

    // --- state conflicts ---
    #[error("Not enough seats available")]
    InsufficientSeats,

    #[error("Operation not allowed in the current status")]
    InvalidStatus,

    #[error("Too late for this operation")]
    TooLate,

    #[error("Trip already has bookings")]
    HasBookings,

    #[error("Plan is no longer available")]
    PlanUnavailable,

    #[error("Plan was taken by another driver")]
    AlreadyTaken,

    // --- infrastructure ---
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidSeatCount
            | AppError::CannotBookOwnTrip => ErrorKind::Validation,
            AppError::NotFound(_)
            | AppError::TripNotFound
            | AppError::PassengerNotFound
            | AppError::UserNotFound
            | AppError::BookingNotFound
            | AppError::PlanNotFound => ErrorKind::NotFound,
            AppError::AuthError(_)
            | AppError::Forbidden
            | AppError::AdminOnly
            | AppError::DriverBlocked
            | AppError::PaymentRequired { .. } => ErrorKind::Authorization,
            AppError::InsufficientSeats
            | AppError::InvalidStatus
            | AppError::TooLate
            | AppError::HasBookings
            | AppError::PlanUnavailable
            | AppError::AlreadyTaken => ErrorKind::Conflict,
            AppError::DatabaseError(_)
            | AppError::ExternalApiError(_)
            | AppError::ConfigError(_)
            | AppError::InternalError(_)
            | AppError::ReqwestError(_)
            | AppError::SerdeJsonError(_) => ErrorKind::Infrastructure,
        }
    }

    /// Stable machine-readable code for the JSON envelope
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidSeatCount => "INVALID_SEAT_COUNT",
            AppError::CannotBookOwnTrip => "CANNOT_BOOK_OWN_TRIP",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::TripNotFound => "TRIP_NOT_FOUND",
            AppError::PassengerNotFound => "PASSENGER_NOT_FOUND",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::BookingNotFound => "BOOKING_NOT_FOUND",
            AppError::PlanNotFound => "PLAN_NOT_FOUND",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden => "FORBIDDEN",
            AppError::AdminOnly => "ADMIN_ONLY",
            AppError::DriverBlocked => "DRIVER_BLOCKED",
            AppError::PaymentRequired { .. } => "PAYMENT_REQUIRED",
            AppError::InsufficientSeats => "INSUFFICIENT_SEATS",
            AppError::InvalidStatus => "INVALID_STATUS",
            AppError::TooLate => "TOO_LATE",
            AppError::HasBookings => "HAS_BOOKINGS",
            AppError::PlanUnavailable => "PLAN_UNAVAILABLE",
            AppError::AlreadyTaken => "ALREADY_TAKEN",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::PaymentRequired { .. } => StatusCode::PAYMENT_REQUIRED,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::ExternalApiError(_) | AppError::ReqwestError(_) => StatusCode::BAD_GATEWAY,
            _ => match self.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self.kind() {
            ErrorKind::Infrastructure => {
                log::error!("Internal error: {self}");
                match self {
                    AppError::DatabaseError(_) => "Database error".to_string(),
                    AppError::ExternalApiError(_) | AppError::ReqwestError(_) => {
                        "External service error".to_string()
                    }
                    _ => "Internal server error".to_string(),
                }
            }
            ErrorKind::Authorization => {
                log::warn!("Access denied: {self}");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let mut body = json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        });
        if let AppError::PaymentRequired { fee_due } = self {
            body["error"]["fee_due"] = json!(fee_due);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidSeatCount.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::TripNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InsufficientSeats.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::AlreadyTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::PaymentRequired { fee_due: 50 }.status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            AppError::AuthError("missing".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InternalError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_every_conflict_has_distinct_code() {
        let conflicts = [
            AppError::InsufficientSeats,
            AppError::InvalidStatus,
            AppError::TooLate,
            AppError::HasBookings,
            AppError::PlanUnavailable,
            AppError::AlreadyTaken,
        ];
        let mut codes: Vec<&str> = conflicts.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), conflicts.len());
        assert!(conflicts.iter().all(|e| e.kind() == ErrorKind::Conflict));
    }
}
