use crate::config::ConfigError;
use crate::journal::JournalServiceError;
use crate::screening::InvalidInput;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Screening(InvalidInput),
    Journal(JournalServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Screening(err) => write!(f, "invalid screening input: {}", err),
            AppError::Journal(err) => write!(f, "journal error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Screening(err) => Some(err),
            AppError::Journal(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Screening(_) => StatusCode::BAD_REQUEST,
            AppError::Journal(err) => err.status_code(),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<InvalidInput> for AppError {
    fn from(value: InvalidInput) -> Self {
        Self::Screening(value)
    }
}

impl From<JournalServiceError> for AppError {
    fn from(value: JournalServiceError) -> Self {
        Self::Journal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::UserId;

    #[test]
    fn errors_map_to_http_statuses() {
        let cases = [
            (
                AppError::from(InvalidInput::EpdsScoreOutOfRange(31)),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(JournalServiceError::UnknownUser(UserId(9))),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "bind")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
