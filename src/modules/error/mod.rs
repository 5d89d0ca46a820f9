//
// Copyright (c) 2025 rustmailer.com (https://rustmailer.com)
//
// This file is part of the Aliasd Mailbox Settings Project
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt::Formatter;

use code::ErrorCode;
use poem::http::StatusCode;
use poem_openapi::{payload::Json, ApiResponse, Object};
use snafu::{Location, Snafu};

pub mod code;
pub mod handler;

pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AliasdError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
    /// A single settings field failed validation. The whole update is rejected.
    #[snafu(display("{field}: {message}"))]
    Validation {
        field: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
    IoError {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type AliasdResult<T, E = AliasdError> = std::result::Result<T, E>;

impl AliasdError {
    #[track_caller]
    pub fn validation(field: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            location: Location::default(),
            code,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AliasdError::Generic { code, .. } | AliasdError::Validation { code, .. } => *code,
            AliasdError::IoError { .. } => ErrorCode::IoError,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            AliasdError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AliasdError {
    fn from(source: std::io::Error) -> Self {
        Self::IoError {
            source,
            location: Location::default(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ApiError {
    pub message: String,
    pub code: u32,
    /// The settings field that was rejected, for validation failures.
    pub field: Option<String>,
}

impl From<AliasdError> for ApiErrorResponse {
    fn from(error: AliasdError) -> Self {
        match error {
            AliasdError::Generic {
                message,
                location,
                code,
            } => {
                if code.is_internal() {
                    tracing::error!(
                        "API error occurred: [{:#?}] {} at {:?}",
                        code,
                        message,
                        location
                    );
                } else {
                    tracing::debug!("Request rejected: [{:#?}] {}", code, message);
                }
                let api_error = ApiError::for_code(message, code, None);
                ApiErrorResponse::Generic(code.status(), Json(api_error))
            }
            AliasdError::Validation {
                field,
                message,
                location,
                code,
            } => {
                tracing::warn!(
                    "Validation failed: [{:#?}] field '{}': {} at {:?}",
                    code,
                    field,
                    message,
                    location
                );
                let api_error = ApiError::for_code(message, code, Some(field));
                ApiErrorResponse::Generic(code.status(), Json(api_error))
            }
            AliasdError::IoError { source, location } => {
                tracing::error!("I/O error occurred: {} at {:?}", source, location);
                let api_error = ApiError::for_code(source.to_string(), ErrorCode::IoError, None);
                ApiErrorResponse::Generic(ErrorCode::IoError.status(), Json(api_error))
            }
        }
    }
}

impl ApiError {
    /// Builds the outbound error body, masking the message of server-side failures.
    pub fn for_code(message: String, code: ErrorCode, field: Option<String>) -> Self {
        let message = if code.is_internal() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            message,
            code: code as u32,
            field,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "Error({}): {}: {}", self.code, field, self.message),
            None => write!(f, "Error({}): {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, ApiResponse)]
pub enum ApiErrorResponse {
    Generic(StatusCode, Json<ApiError>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raise_error;

    fn unpack(response: ApiErrorResponse) -> (StatusCode, ApiError) {
        match response {
            ApiErrorResponse::Generic(status, Json(body)) => (status, body),
        }
    }

    #[test]
    fn validation_error_carries_field_and_reason() {
        let error = AliasdError::validation(
            "mail_messages_per_page",
            "must be one of 10, 25, 50, 100",
            ErrorCode::InvalidEnum,
        );
        assert_eq!(error.code(), ErrorCode::InvalidEnum);
        assert_eq!(error.field(), Some("mail_messages_per_page"));

        let (status, body) = unpack(error.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, ErrorCode::InvalidEnum as u32);
        assert_eq!(body.field.as_deref(), Some("mail_messages_per_page"));
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let error = raise_error!(
            "redb: table 'alias' is corrupted".into(),
            ErrorCode::PersistenceFailure
        );
        let (status, body) = unpack(error.into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, INTERNAL_ERROR_MESSAGE);
        assert!(body.field.is_none());
    }

    #[test]
    fn client_errors_keep_their_message() {
        let error = raise_error!("Alias session is missing".into(), ErrorCode::AuthRequired);
        let (status, body) = unpack(error.into());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message, "Alias session is missing");
    }
}
